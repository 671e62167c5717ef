use std::sync::Arc;

use crate::auth::{Credentials, TokenService};
use crate::store::{ContentStore, FavoritesLedger, UserStore};

/// Everything a handler needs, built once at startup and shared through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub credentials: Credentials,
    pub content: Arc<dyn ContentStore>,
    pub favorites: Arc<dyn FavoritesLedger>,
}

impl AppState {
    /// Uses one backend for users, content and favorites.
    pub fn new<S>(store: Arc<S>, jwt_secret: &str, bcrypt_cost: u32) -> Self
    where
        S: UserStore + ContentStore + FavoritesLedger + 'static,
    {
        Self {
            tokens: TokenService::new(jwt_secret),
            credentials: Credentials::new(store.clone(), bcrypt_cost),
            content: store.clone(),
            favorites: store,
        }
    }
}
