use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{ContentStore, FavoritesLedger, UserStore, POST_ID_ATTEMPTS};
use crate::error::AppError;
use crate::models::{Comment, Favorite, NewComment, NewPost, NewUser, Post, User};

#[derive(Default)]
struct Collections {
    users: HashMap<String, User>,
    /// Insertion order doubles as creation order.
    posts: Vec<Post>,
    comments: Vec<Comment>,
    favorites: Vec<Favorite>,
}

impl Collections {
    fn find_post(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.post_id == post_id)
    }

    fn comments_for(&self, post_id: &str) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }

    fn resolve(&self, post: &Post) -> Post {
        Post {
            comments: self.comments_for(&post.post_id),
            ..post.clone()
        }
    }
}

/// In-process store. Every multi-step operation runs under a single write lock,
/// so readers never observe half-applied changes.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&user.email) {
            return Err(AppError::DuplicateEmail);
        }
        let user = User::new(user);
        inner.users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().await.users.get(email).cloned())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.posts.iter().map(|p| inner.resolve(p)).collect())
    }

    async fn get_post(&self, post_id: &str) -> Result<Option<(Post, Vec<Comment>)>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.find_post(post_id).map(|post| {
            let post = inner.resolve(post);
            let comments = post.comments.clone();
            (post, comments)
        }))
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, AppError> {
        let mut inner = self.inner.write().await;
        for _ in 0..POST_ID_ATTEMPTS {
            let candidate = Post::new(post.clone());
            if inner.find_post(&candidate.post_id).is_none() {
                inner.posts.push(candidate.clone());
                return Ok(candidate);
            }
        }
        Err(AppError::InternalServerError(
            "Could not generate a unique post id".into(),
        ))
    }

    async fn delete_post(&self, post_id: &str) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        inner.posts.retain(|p| p.post_id != post_id);
        inner.comments.retain(|c| c.post_id != post_id);
        inner.favorites.retain(|f| f.post_id != post_id);
        Ok(())
    }

    async fn add_comment(&self, comment: NewComment) -> Result<Comment, AppError> {
        let mut inner = self.inner.write().await;
        if inner.find_post(&comment.post_id).is_none() {
            return Err(AppError::NotFound("Blog not found".into()));
        }
        let comment = Comment::new(comment);
        inner.comments.push(comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl FavoritesLedger for MemoryStore {
    async fn save_favorite(
        &self,
        user_email: &str,
        post_email: &str,
        post_id: &str,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        if inner.find_post(post_id).is_none() {
            return Err(AppError::NotFound("Blog not found".into()));
        }
        let exists = inner
            .favorites
            .iter()
            .any(|f| f.user_email == user_email && f.post_id == post_id);
        if !exists {
            inner
                .favorites
                .push(Favorite::new(user_email, post_email, post_id));
        }
        Ok(())
    }

    async fn list_favorites(&self, user_email: &str) -> Result<Vec<Post>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .iter()
            .filter(|f| f.user_email == user_email)
            .filter_map(|f| inner.find_post(&f.post_id))
            .map(|p| inner.resolve(p))
            .collect())
    }

    async fn remove_favorite(&self, user_email: &str, post_id: &str) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let before = inner.favorites.len();
        inner
            .favorites
            .retain(|f| !(f.user_email == user_email && f.post_id == post_id));
        if inner.favorites.len() == before {
            return Err(AppError::NotFound("Post not found in favorites".into()));
        }
        Ok(())
    }
}
