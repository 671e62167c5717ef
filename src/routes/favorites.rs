use crate::{
    auth::{AuthMiddleware, AuthenticatedUser},
    error::AppError,
    routes::posts::PostIdRequest,
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Saves a post to the caller's favorites.
///
/// Not behind `AuthMiddleware`; `AuthenticatedUser` verifies the bearer token
/// itself. Saving an already saved post succeeds without creating a duplicate.
#[post("/posts/{id}/save")]
pub async fn save_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    post_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let post_id = post_id.into_inner();
    let (post, _) = state
        .content
        .get_post(&post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    state
        .favorites
        .save_favorite(user.email(), &post.email, &post.post_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post saved",
        "postIds": post.post_id
    })))
}

/// Lists every post the caller has saved.
#[get("/favorites")]
pub async fn list_favorites(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let posts = state.favorites.list_favorites(user.email()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": posts })))
}

#[post("/removefav", wrap = "AuthMiddleware")]
pub async fn remove_favorite(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<PostIdRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    state
        .favorites
        .remove_favorite(user.email(), &body.post_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post removed from favorites"
    })))
}
