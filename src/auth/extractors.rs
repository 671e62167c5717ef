use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;
use crate::state::AppState;

/// Reads the `Authorization: Bearer <token>` header and verifies the token.
///
/// A missing header is `Unauthenticated`; a header that is not a bearer token,
/// or a token that fails verification, is `Forbidden`.
pub fn claims_from_header(req: &HttpRequest) -> Result<Claims, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("No token provided".into()))?;

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Forbidden("Failed to authenticate token".into()))?;

    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        AppError::InternalServerError("AppState is not registered on the App".into())
    })?;

    state.tokens.verify(token)
}

/// The identity behind the request's bearer token.
///
/// Behind `AuthMiddleware` the claims are taken from the request extensions.
/// On routes without the middleware the header is verified here instead, with
/// the same error mapping.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>().cloned() {
            return ready(Ok(AuthenticatedUser(claims)));
        }
        ready(
            claims_from_header(req)
                .map(AuthenticatedUser)
                .map_err(ActixError::from),
        )
    }
}
