use chrono::{DateTime, Utc};

/// Marks one post as saved by one user. Unique per (user_email, post_id).
#[derive(Debug, Clone, PartialEq)]
pub struct Favorite {
    pub user_email: String,
    /// Email of the saved post's author, copied at save time.
    pub post_email: String,
    pub post_id: String,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(user_email: &str, post_email: &str, post_id: &str) -> Self {
        Self {
            user_email: user_email.to_string(),
            post_email: post_email.to_string(),
            post_id: post_id.to_string(),
            created_at: Utc::now(),
        }
    }
}
