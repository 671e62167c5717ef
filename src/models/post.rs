use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Length of a generated post identifier.
pub const POST_ID_LEN: usize = 7;

lazy_static! {
    pub static ref POST_ID_REGEX: Regex = Regex::new(r"^[0-9A-Za-z]{7}$").unwrap();
}

/// Draws a short post identifier, each character independently and uniformly
/// from `[0-9A-Za-z]`.
pub fn generate_post_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(POST_ID_LEN)
        .map(char::from)
        .collect()
}

/// A blog post with its comments resolved, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub post_id: String,
    pub title: String,
    pub content: String,
    /// Author's email address.
    pub email: String,
    pub saved: bool,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A comment ("review") attached to exactly one post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: String,
    /// Commenter's email address.
    pub email: String,
    pub text: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: String,
    pub email: String,
    pub text: String,
}

impl Post {
    /// Creates a post with a fresh identifier, not yet saved and with no comments.
    pub fn new(input: NewPost) -> Self {
        Self {
            post_id: generate_post_id(),
            title: input.title,
            content: input.content,
            email: input.email,
            saved: false,
            created_at: Utc::now(),
            comments: Vec::new(),
        }
    }
}

impl Comment {
    pub fn new(input: NewComment) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id: input.post_id,
            email: input.email,
            text: input.text,
            created_at: Utc::now(),
        }
    }
}
