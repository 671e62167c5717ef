use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tokens are valid for two hours from issuance.
pub const TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The user's internal identifier.
    pub id: Uuid,
    /// The user's email address. Handlers act on behalf of this identity.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies HMAC-signed identity tokens.
///
/// The signing secret is supplied once at construction and never read from the
/// environment afterwards.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        // Expiry is checked by `verify_at` so that the boundary is exact.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Generates a token for the given user, valid for [`TOKEN_TTL_SECS`].
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AppError> {
        self.issue_at(user_id, email, chrono::Utc::now().timestamp())
    }

    pub fn issue_at(&self, user_id: Uuid, email: &str, now: i64) -> Result<String, AppError> {
        let claims = Claims {
            id: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token string and decodes its claims.
    ///
    /// Returns `AppError::Forbidden` if the token is malformed, its signature is
    /// invalid, or it has expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if now >= claims.exp {
            return Err(AppError::Forbidden(
                "Failed to authenticate token: token expired".into(),
            ));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test_secret_for_tokens")
    }

    #[test]
    fn test_token_generation_and_verification() {
        let tokens = service();
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id, "a@x.com").unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.id, user_id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_token_expiry_boundary() {
        let tokens = service();
        let issued = 1_700_000_000;
        let token = tokens.issue_at(Uuid::new_v4(), "a@x.com", issued).unwrap();

        assert!(tokens.verify_at(&token, issued).is_ok());
        assert!(tokens.verify_at(&token, issued + TOKEN_TTL_SECS - 1).is_ok());

        match tokens.verify_at(&token, issued + TOKEN_TTL_SECS) {
            Err(AppError::Forbidden(msg)) => assert!(msg.contains("expired")),
            other => panic!("token should be expired exactly at exp, got {:?}", other),
        }
        assert!(tokens
            .verify_at(&token, issued + TOKEN_TTL_SECS + 60)
            .is_err());
    }

    #[test]
    fn test_expired_token_is_rejected_now() {
        let tokens = service();
        let three_hours_ago = chrono::Utc::now().timestamp() - 3 * 60 * 60;
        let token = tokens
            .issue_at(Uuid::new_v4(), "a@x.com", three_hours_ago)
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = TokenService::new("one_secret")
            .issue(Uuid::new_v4(), "a@x.com")
            .unwrap();

        match TokenService::new("a_completely_different_secret").verify(&token) {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "Failed to authenticate token"),
            other => panic!("signature mismatch should be rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_token() {
        assert!(matches!(
            service().verify("not-a-jwt"),
            Err(AppError::Forbidden(_))
        ));
    }
}
