use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::AuthConfig;
use crate::models::UserId;

/// Represents the claims encoded within a token. Not trusted until
/// [`TokenCodec::verify`] has checked the signature.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user id.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch). The token is invalid from this instant on.
    pub exp: i64,
}

/// A signed, compact, URL-safe bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(..)")
    }
}

/// Why a token was refused. Internal to the auth core; callers outside it only
/// ever see `AuthError::InvalidToken`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not match")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Issues and verifies HS256 tokens with the process-wide signing key.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time checks run against the caller's clock in `verify`, not the library's.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.signing_secret()),
            decoding_key: DecodingKey::from_secret(config.signing_secret()),
            validation,
            ttl: config.token_ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Claims carry whole seconds, so issuance is truncated to the second: the
    /// token is valid in `[trunc(now), trunc(now) + ttl)`.
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<Token, TokenError> {
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Encoding("expiry is out of range".to_string()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(Token)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Checks the signature, then the validity window `[iat, exp)` against `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        // `decode` checks the signature over the raw header and payload before it
        // deserializes any claim.
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::ImmatureSignature => TokenError::NotYetValid,
                _ => TokenError::Malformed,
            })?;

        let now = now.timestamp();
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        if now < claims.iat {
            return Err(TokenError::NotYetValid);
        }
        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}
