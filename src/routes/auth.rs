use crate::{
    auth::{AuthMiddleware, AuthResponse, AuthenticatedUser, LoginQuery, LoginRequest, SignupRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Login user
///
/// The credentials arrive JSON-encoded in the `data` query parameter,
/// e.g. `/login?data={"email":"a@x.com","password":"pw"}`.
#[get("/login")]
pub async fn login(
    state: web::Data<AppState>,
    query: web::Query<LoginQuery>,
) -> Result<impl Responder, AppError> {
    let login: LoginRequest = serde_json::from_str(&query.data)
        .map_err(|e| AppError::BadRequest(format!("Invalid login data: {}", e)))?;

    let user = state
        .credentials
        .authenticate(&login.email, &login.password)
        .await?;
    let token = state.tokens.issue(user.id, &user.email)?;

    Ok(HttpResponse::Ok().json(AuthResponse::new(token, user.email)))
}

/// Register a new user
///
/// Creates the account and logs the user straight in.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;
    let details = signup_data.into_inner();

    let user = state
        .credentials
        .create(details.name, details.phone, &details.email, &details.password)
        .await?;
    let token = state.tokens.issue(user.id, &user.email)?;
    log::info!("New user signed up: {}", user.email);

    Ok(HttpResponse::Ok().json(AuthResponse::new(token, user.email)))
}

/// Logout
///
/// Tokens are not revoked server-side; the client discards its token.
#[get("/logout", wrap = "AuthMiddleware")]
pub async fn logout(user: AuthenticatedUser) -> impl Responder {
    log::info!("Logout successful for {}", user.email());
    HttpResponse::Ok().json(json!({ "status": "successful" }))
}
