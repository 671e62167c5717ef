pub mod auth;
pub mod favorites;
pub mod health;
pub mod posts;

use actix_web::web;

use crate::error::AppError;

/// Registers every route. Protected handlers carry `AuthMiddleware` themselves,
/// so this can be mounted at the application root.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(health::health)
        .service(auth::login)
        .service(auth::signup)
        .service(auth::logout)
        .service(posts::all_posts)
        .service(posts::get_blog)
        .service(posts::add_post)
        .service(posts::remove_post)
        .service(posts::add_review)
        .service(favorites::save_post)
        .service(favorites::list_favorites)
        .service(favorites::remove_favorite);
}

/// Malformed JSON bodies are reported as `400` in the usual error envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Query strings that fail to deserialize get the same envelope.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
