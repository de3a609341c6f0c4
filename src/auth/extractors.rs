use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::AuthenticatedIdentity;
use crate::error::AppError;
use crate::models::UserId;

/// Extracts the authenticated caller from request extensions.
///
/// This extractor is intended to be used on routes protected by `AuthMiddleware`,
/// which resolves the bearer token and inserts the `AuthenticatedIdentity`.
/// Without it the request is rejected with `AppError::Unauthorized`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub AuthenticatedIdentity);

impl AuthenticatedUser {
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedIdentity>().copied() {
            Some(identity) => ready(Ok(AuthenticatedUser(identity))),
            None => {
                log::error!(
                    "no authenticated identity on {}; is AuthMiddleware applied?",
                    req.path()
                );
                let err = AppError::Unauthorized("Not authenticated".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
