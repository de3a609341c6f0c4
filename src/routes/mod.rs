pub mod auth;
pub mod health;

use actix_web::web;

/// Routes mounted under `/api`. Wrap the scope in `AuthMiddleware`; it lets
/// login and register through without a token.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::register)
            .service(auth::me),
    );
}
