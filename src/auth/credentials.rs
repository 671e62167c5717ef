use std::sync::Arc;

use tokio::sync::OnceCell;

use super::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::store::UserStore;

/// Creates accounts and checks passwords against stored bcrypt hashes.
#[derive(Clone)]
pub struct Credentials {
    users: Arc<dyn UserStore>,
    hash_cost: u32,
    /// Checked against when the email is unknown, so both failures cost one bcrypt verify.
    dummy_hash: Arc<OnceCell<String>>,
}

impl Credentials {
    pub fn new(users: Arc<dyn UserStore>, hash_cost: u32) -> Self {
        Self {
            users,
            hash_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Hashes the plaintext password and stores the user.
    ///
    /// Fails with `AppError::DuplicateEmail` if the email is already registered.
    pub async fn create(
        &self,
        name: Option<String>,
        phone: Option<String>,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let password_hash = hash_password(password, self.hash_cost)?;
        self.users
            .insert_user(NewUser {
                name,
                phone,
                email: email.to_string(),
                password_hash,
            })
            .await
    }

    /// Unknown email and wrong password both yield `AppError::InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = match self.users.find_user_by_email(email).await? {
            Some(user) => user,
            None => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| async { hash_password("unknown-account", self.hash_cost) })
                    .await?;
                verify_password(password, dummy)?;
                return Err(AppError::InvalidCredentials);
            }
        };

        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}
