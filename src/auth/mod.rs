pub mod extractors;
pub mod middleware;
pub mod password;
pub mod resolver;
pub mod service;
pub mod token;

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{PasswordError, PasswordHasher};
pub use resolver::{AuthError, AuthenticatedIdentity, IdentityResolver};
pub use service::{AuthService, LoginError, RegisterError};
pub use token::{Claims, Token, TokenCodec, TokenError};

use crate::models::Profile;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Returns `None` if the header is
/// absent, not valid UTF-8, or uses another scheme.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// User's password.
    /// Between 6 and 72 characters long.
    #[validate(length(min = 6, max = 72))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account. Must be unique.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// Between 6 and 72 characters long; bcrypt reads no further.
    #[validate(length(min = 6, max = 72))]
    pub password: String,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
}

impl RegisterRequest {
    pub fn profile(&self) -> Profile {
        Profile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Response body of a successful registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: crate::models::UserId,
    pub email: String,
}

/// Response body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The bearer token to send in the `Authorization` header.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl From<Token> for TokenResponse {
    fn from(token: Token) -> Self {
        Self {
            access_token: token.into_string(),
            token_type: "bearer".to_string(),
        }
    }
}
