pub mod credentials;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use credentials::Credentials;
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use token::{Claims, TokenService};

/// Login credentials. `GET /login` carries them JSON-encoded in the `data` query parameter.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The query string of `GET /login`.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub data: String,
}

/// Represents the payload for a new user signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response structure after successful login or signup.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Always `"successful"`.
    pub login: String,
    /// The bearer token for subsequent requests.
    pub token: String,
    pub email: String,
}

impl AuthResponse {
    pub fn new(token: String, email: String) -> Self {
        Self {
            login: "successful".to_string(),
            token,
            email,
        }
    }
}
