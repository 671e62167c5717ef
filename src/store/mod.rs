//! Persistence ports and their backends.
//!
//! Handlers only see the traits below. `PgStore` is the production backend;
//! `MemoryStore` keeps everything in process and backs local runs and tests.
//! Both implement every trait, so one value can serve as all three stores.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Comment, NewComment, NewPost, NewUser, Post, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// How many times a colliding post identifier is regenerated before giving up.
pub const POST_ID_ATTEMPTS: usize = 5;

/// Persists user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `AppError::DuplicateEmail` if the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

/// Persists posts and their comments.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All posts, oldest first, each with its comments resolved.
    async fn list_posts(&self) -> Result<Vec<Post>, AppError>;

    /// One post and its comments, or `None` if no such post exists.
    async fn get_post(&self, post_id: &str) -> Result<Option<(Post, Vec<Comment>)>, AppError>;

    /// Stores a new post under a freshly generated identifier.
    async fn create_post(&self, post: NewPost) -> Result<Post, AppError>;

    /// Removes a post together with its comments and favorite records.
    /// Removing an unknown post succeeds.
    async fn delete_post(&self, post_id: &str) -> Result<(), AppError>;

    /// Attaches a comment to an existing post. Fails with `AppError::NotFound`
    /// if the post does not exist.
    async fn add_comment(&self, comment: NewComment) -> Result<Comment, AppError>;
}

/// Records which posts each user has saved.
#[async_trait]
pub trait FavoritesLedger: Send + Sync {
    /// Saves `post_id` for `user_email`. Saving the same pair twice is a no-op.
    /// Fails with `AppError::NotFound` if the post does not exist.
    async fn save_favorite(
        &self,
        user_email: &str,
        post_email: &str,
        post_id: &str,
    ) -> Result<(), AppError>;

    /// Every post the user has saved, in the order they were saved.
    async fn list_favorites(&self, user_email: &str) -> Result<Vec<Post>, AppError>;

    /// Fails with `AppError::NotFound` if the user has not saved that post.
    async fn remove_favorite(&self, user_email: &str, post_id: &str) -> Result<(), AppError>;
}
