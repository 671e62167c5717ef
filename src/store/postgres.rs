use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;

use super::{ContentStore, FavoritesLedger, UserStore, POST_ID_ATTEMPTS};
use crate::error::AppError;
use crate::models::{Comment, NewComment, NewPost, NewUser, Post, User};

const POST_COLUMNS: &str = "post_id, title, content, email, saved, created_at";
const USER_COLUMNS: &str = "id, name, phone, email, password_hash, created_at";
const COMMENT_COLUMNS: &str = "id, post_id, email, text, created_at";

/// PostgreSQL backend. Multi-step operations run inside a single transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects a pool and applies pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Attaches each post's comments, oldest first.
    async fn with_comments(&self, mut posts: Vec<Post>) -> Result<Vec<Post>, AppError> {
        if posts.is_empty() {
            return Ok(posts);
        }
        let ids: Vec<String> = posts.iter().map(|p| p.post_id.clone()).collect();
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE post_id = ANY($1) ORDER BY created_at, id",
            COMMENT_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_post: HashMap<String, Vec<Comment>> = HashMap::new();
        for comment in comments {
            by_post
                .entry(comment.post_id.clone())
                .or_default()
                .push(comment);
        }
        for post in posts.iter_mut() {
            post.comments = by_post.remove(&post.post_id).unwrap_or_default();
        }
        Ok(posts)
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let user = User::new(user);
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({cols}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {cols}",
            cols = USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(AppError::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts ORDER BY created_at",
            POST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        self.with_comments(posts).await
    }

    async fn get_post(&self, post_id: &str) -> Result<Option<(Post, Vec<Comment>)>, AppError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts WHERE post_id = $1",
            POST_COLUMNS
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        match post {
            Some(post) => {
                let mut resolved = self.with_comments(vec![post]).await?;
                let post = resolved.remove(0);
                let comments = post.comments.clone();
                Ok(Some((post, comments)))
            }
            None => Ok(None),
        }
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, AppError> {
        for _ in 0..POST_ID_ATTEMPTS {
            let candidate = Post::new(post.clone());
            let inserted = sqlx::query_as::<_, Post>(&format!(
                "INSERT INTO posts ({cols}) VALUES ($1, $2, $3, $4, $5, $6)
                 ON CONFLICT (post_id) DO NOTHING
                 RETURNING {cols}",
                cols = POST_COLUMNS
            ))
            .bind(&candidate.post_id)
            .bind(&candidate.title)
            .bind(&candidate.content)
            .bind(&candidate.email)
            .bind(candidate.saved)
            .bind(candidate.created_at)
            .fetch_optional(&self.pool)
            .await?;

            if let Some(post) = inserted {
                return Ok(post);
            }
            log::warn!("Post id collision on {}, regenerating", candidate.post_id);
        }
        Err(AppError::InternalServerError(
            "Could not generate a unique post id".into(),
        ))
    }

    async fn delete_post(&self, post_id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM favorites WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn add_comment(&self, comment: NewComment) -> Result<Comment, AppError> {
        let mut tx = self.pool.begin().await?;

        let parent = sqlx::query_scalar::<_, String>(
            "SELECT post_id FROM posts WHERE post_id = $1 FOR SHARE",
        )
        .bind(&comment.post_id)
        .fetch_optional(&mut *tx)
        .await?;
        if parent.is_none() {
            return Err(AppError::NotFound("Blog not found".into()));
        }

        let comment = Comment::new(comment);
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments ({cols}) VALUES ($1, $2, $3, $4, $5) RETURNING {cols}",
            cols = COMMENT_COLUMNS
        ))
        .bind(comment.id)
        .bind(&comment.post_id)
        .bind(&comment.email)
        .bind(&comment.text)
        .bind(comment.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(comment)
    }
}

#[async_trait]
impl FavoritesLedger for PgStore {
    async fn save_favorite(
        &self,
        user_email: &str,
        post_email: &str,
        post_id: &str,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let parent = sqlx::query_scalar::<_, String>(
            "SELECT post_id FROM posts WHERE post_id = $1 FOR SHARE",
        )
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?;
        if parent.is_none() {
            return Err(AppError::NotFound("Blog not found".into()));
        }

        sqlx::query(
            "INSERT INTO favorites (user_email, post_email, post_id) VALUES ($1, $2, $3)
             ON CONFLICT (user_email, post_id) DO NOTHING",
        )
        .bind(user_email)
        .bind(post_email)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_favorites(&self, user_email: &str) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT p.post_id, p.title, p.content, p.email, p.saved, p.created_at
             FROM favorites f
             JOIN posts p ON p.post_id = f.post_id
             WHERE f.user_email = $1
             ORDER BY f.created_at",
        )
        .bind(user_email)
        .fetch_all(&self.pool)
        .await?;
        self.with_comments(posts).await
    }

    async fn remove_favorite(&self, user_email: &str, post_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_email = $1 AND post_id = $2")
            .bind(user_email)
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Post not found in favorites".into()));
        }
        Ok(())
    }
}
