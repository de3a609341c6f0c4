use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use super::password::{PasswordError, PasswordHasher};
use super::token::{Token, TokenCodec, TokenError};
use crate::models::{HashedCredential, NewUser, Profile, User, UserId};
use crate::storage::{InsertError, StorageError, UserStore};

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("storage failure: {0}")]
    StorageFailure(#[from] StorageError),
    #[error(transparent)]
    Hashing(#[from] PasswordError),
}

impl From<InsertError> for RegisterError {
    fn from(error: InsertError) -> Self {
        match error {
            InsertError::DuplicateEmail => RegisterError::DuplicateEmail,
            InsertError::Storage(e) => RegisterError::StorageFailure(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    /// Returned for an unknown email and for a wrong password alike.
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("storage failure: {0}")]
    StorageFailure(#[from] StorageError),
    #[error(transparent)]
    Hashing(#[from] PasswordError),
    #[error("failed to issue token: {0}")]
    TokenIssue(#[from] TokenError),
}

/// Registration and login on top of the password hasher, the token codec and
/// the user store.
#[derive(Clone)]
pub struct AuthService {
    hasher: PasswordHasher,
    codec: TokenCodec,
    store: Arc<dyn UserStore>,
    // Verified against when the email is unknown, so both login failures cost
    // one bcrypt verification.
    dummy_hash: HashedCredential,
}

impl AuthService {
    pub fn new(
        hasher: PasswordHasher,
        codec: TokenCodec,
        store: Arc<dyn UserStore>,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = hasher.hash("tasknest-dummy-credential")?;
        Ok(Self {
            hasher,
            codec,
            store,
            dummy_hash,
        })
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        profile: Profile,
    ) -> Result<UserId, RegisterError> {
        let password_hash = self.hash_blocking(password.to_owned()).await?;

        let user_id = self
            .store
            .insert_user(NewUser {
                email: email.to_owned(),
                password_hash,
                profile,
            })
            .await?;

        log::info!("registered user {}", user_id);
        Ok(user_id)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Token, LoginError> {
        self.login_at(email, password, Utc::now()).await
    }

    pub async fn login_at(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Token, LoginError> {
        let user = self.store.find_user_by_email(email).await?;

        let (user_id, stored_hash) = match user {
            Some(user) => (Some(user.id), user.password_hash),
            None => (None, self.dummy_hash.clone()),
        };

        let matches = self.verify_blocking(password.to_owned(), stored_hash).await?;
        match user_id {
            Some(user_id) if matches => {
                log::debug!("issuing token for user {}", user_id);
                Ok(self.codec.issue(user_id, now)?)
            }
            _ => Err(LoginError::InvalidCredentials),
        }
    }

    /// Issues a token for a user whose identity is already established.
    pub fn issue_token(&self, user_id: UserId) -> Result<Token, TokenError> {
        self.codec.issue(user_id, Utc::now())
    }

    pub async fn find_user(&self, user_id: &UserId) -> Result<Option<User>, StorageError> {
        self.store.find_user_by_id(user_id).await
    }

    async fn hash_blocking(&self, password: String) -> Result<HashedCredential, PasswordError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::Hashing(e.to_string()))?
    }

    async fn verify_blocking(
        &self,
        password: String,
        hashed: HashedCredential,
    ) -> Result<bool, PasswordError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|e| PasswordError::Hashing(e.to_string()))
    }
}
