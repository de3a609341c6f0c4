use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::auth::{bearer_token, AuthenticatedIdentity, IdentityResolver};
use crate::error::AppError;

/// Paths under the protected scope that are reachable without a token. Matched
/// exactly; anything below or beside them still needs one.
const PUBLIC_PATHS: [&str; 2] = ["/api/auth/login", "/api/auth/register"];

/// Resolves the bearer token of every request it wraps and stores the
/// resulting `AuthenticatedIdentity` in the request extensions.
///
/// Requires a `web::Data<IdentityResolver>` in the application data. Rejected
/// requests are answered here and never reach the wrapped service.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

async fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedIdentity, AppError> {
    let resolver = req
        .app_data::<web::Data<IdentityResolver>>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("Identity resolver is not configured".into()))?;

    let identity = resolver.resolve(bearer_token(req.headers())).await?;
    Ok(identity)
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        if PUBLIC_PATHS.contains(&req.path()) {
            return Box::pin(async move {
                service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body)
            });
        }

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err) => {
                    log::debug!("rejected {} {}: {}", req.method(), req.path(), err);
                    Ok(req
                        .into_response(err.error_response())
                        .map_into_right_body())
                }
            }
        })
    }
}
