use crate::{
    auth::{AuthMiddleware, AuthenticatedUser},
    error::AppError,
    models::{post::POST_ID_REGEX, NewComment, NewPost},
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct AddPostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    /// Author email; defaults to the caller's.
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PostIdRequest {
    #[serde(rename = "postId")]
    #[validate(regex(path = "POST_ID_REGEX", message = "Invalid post id"))]
    pub post_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddReviewRequest {
    #[serde(rename = "postId")]
    #[validate(regex(path = "POST_ID_REGEX", message = "Invalid post id"))]
    pub post_id: String,
    /// Commenter email; defaults to the caller's.
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

/// Lists every post with its comments.
#[get("/allposts", wrap = "AuthMiddleware")]
pub async fn all_posts(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let posts = state.content.list_posts().await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": posts })))
}

/// Fetches one post and its comments. Public.
///
/// ## Responses:
/// - `200 OK`: `{"blog": Post, "comments": [Comment]}`.
/// - `404 Not Found`: no post with that id.
#[get("/blog/{post_id}")]
pub async fn get_blog(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let (blog, comments) = state
        .content
        .get_post(&post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "blog": blog, "comments": comments })))
}

#[post("/addpost", wrap = "AuthMiddleware")]
pub async fn add_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    post_data: web::Json<AddPostRequest>,
) -> Result<impl Responder, AppError> {
    post_data.validate()?;
    let input = post_data.into_inner();

    let post = state
        .content
        .create_post(NewPost {
            title: input.title,
            content: input.content,
            email: input.email.unwrap_or_else(|| user.email().to_string()),
        })
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Post added successfully",
        "data": post
    })))
}

/// Deletes a post along with its comments. Unknown ids succeed.
#[post("/removepost", wrap = "AuthMiddleware")]
pub async fn remove_post(
    state: web::Data<AppState>,
    body: web::Json<PostIdRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    state.content.delete_post(&body.post_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post removed successfully"
    })))
}

#[post("/addreviews", wrap = "AuthMiddleware")]
pub async fn add_review(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    review: web::Json<AddReviewRequest>,
) -> Result<impl Responder, AppError> {
    review.validate()?;
    let input = review.into_inner();

    let comment = state
        .content
        .add_comment(NewComment {
            post_id: input.post_id,
            email: input.email.unwrap_or_else(|| user.email().to_string()),
            text: input.text,
        })
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Comment added successfully",
        "data": comment
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_post_validation() {
        let valid = AddPostRequest {
            title: "Hi".into(),
            content: "Body".into(),
            email: Some("a@x.com".into()),
        };
        assert!(valid.validate().is_ok());

        let empty_title = AddPostRequest {
            title: "".into(),
            content: "Body".into(),
            email: None,
        };
        assert!(empty_title.validate().is_err());

        let bad_email = AddPostRequest {
            title: "Hi".into(),
            content: "Body".into(),
            email: Some("nope".into()),
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_post_id_validation() {
        assert!(PostIdRequest { post_id: "aB3dE9z".into() }.validate().is_ok());
        assert!(PostIdRequest { post_id: "short".into() }.validate().is_err());
        assert!(PostIdRequest { post_id: "ab$dE9z".into() }.validate().is_err());
    }
}
