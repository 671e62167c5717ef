#![doc = "The `blogforge` library crate."]
#![doc = ""]
#![doc = "Accounts, posts, comments and favorites behind a JSON API. The binary"]
#![doc = "(`main.rs`) loads the configuration, picks a store backend and serves"]
#![doc = "`routes::config` with `actix-web`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
