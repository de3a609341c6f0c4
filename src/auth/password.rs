use bcrypt::{hash, verify};
use thiserror::Error;

use crate::models::HashedCredential;

/// bcrypt only reads this many bytes of the plaintext.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hashing(String),
    #[error("password is longer than 72 bytes")]
    TooLong,
}

/// One-way password hashing with bcrypt.
///
/// The salt is generated per call and embedded in the output, together with the
/// cost, so [`PasswordHasher::verify`] needs nothing but the stored hash.
/// Both operations are CPU-bound; async callers should run them on a
/// blocking thread (see `AuthService`).
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// `cost` is the bcrypt work factor. `AuthConfig` keeps it in range.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Refuses plaintext longer than [`MAX_PASSWORD_BYTES`] instead of letting
    /// bcrypt drop the tail.
    pub fn hash(&self, plaintext: &str) -> Result<HashedCredential, PasswordError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        hash(plaintext, self.cost)
            .map(HashedCredential::new)
            .map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// Returns `false` for a wrong password, for plaintext no stored hash can
    /// have come from, and for a stored hash that cannot be parsed.
    pub fn verify(&self, plaintext: &str, hashed: &HashedCredential) -> bool {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match verify(plaintext, hashed.as_str()) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("stored password hash could not be verified: {}", e);
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
