use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use super::token::TokenCodec;
use crate::models::UserId;
use crate::storage::{StorageError, UserStore};

/// The authenticated caller of a request. Holding one is the capability to act
/// as that user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: UserId,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,
    /// Covers bad signatures, expiry, malformed subjects and unknown users alike.
    #[error("could not validate credentials")]
    InvalidToken,
    #[error("storage failure: {0}")]
    StorageFailure(#[from] StorageError),
}

/// Turns a bearer token into an [`AuthenticatedIdentity`].
#[derive(Clone)]
pub struct IdentityResolver {
    codec: TokenCodec,
    store: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(codec: TokenCodec, store: Arc<dyn UserStore>) -> Self {
        Self { codec, store }
    }

    pub async fn resolve(&self, token: Option<&str>) -> Result<AuthenticatedIdentity, AuthError> {
        self.resolve_at(token, Utc::now()).await
    }

    pub async fn resolve_at(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedIdentity, AuthError> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(AuthError::MissingCredentials),
        };

        let claims = self.codec.verify(token, now).map_err(|e| {
            log::debug!("rejected bearer token: {}", e);
            AuthError::InvalidToken
        })?;

        let user_id: UserId = claims.sub.parse().map_err(|_| {
            log::debug!("token subject is not a user id");
            AuthError::InvalidToken
        })?;

        match self.store.find_user_by_id(&user_id).await? {
            Some(user) => Ok(AuthenticatedIdentity { user_id: user.id }),
            None => {
                log::debug!("token subject {} no longer exists", user_id);
                Err(AuthError::InvalidToken)
            }
        }
    }
}
