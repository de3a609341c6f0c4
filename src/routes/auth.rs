use crate::{
    auth::{
        AuthService, AuthenticatedUser, LoginRequest, RegisterRequest, RegisterResponse,
        TokenResponse,
    },
    error::AppError,
    models::UserPublic,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Hashes the password and creates the account. Does not log the user in.
#[post("/register")]
pub async fn register(
    service: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let user_id = service
        .register(
            &register_data.email,
            &register_data.password,
            register_data.profile(),
        )
        .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        user_id,
        email: register_data.into_inner().email,
    }))
}

/// Login user
///
/// Authenticates a user and returns a bearer token.
#[post("/login")]
pub async fn login(
    service: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let token = service
        .login(&login_data.email, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(token)))
}

/// Current user
///
/// Returns the profile of the user the bearer token belongs to.
#[get("/me")]
pub async fn me(
    service: web::Data<AuthService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let found = service.find_user(&user.user_id()).await?;

    match found {
        Some(found) => Ok(HttpResponse::Ok().json(UserPublic::from(found))),
        None => Err(AppError::NotFound("User not found".into())),
    }
}
