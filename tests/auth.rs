use actix_cors::Cors;
use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tasknest::auth::{
    AuthMiddleware, AuthService, IdentityResolver, PasswordHasher, TokenCodec, TokenResponse,
};
use tasknest::config::AuthConfig;
use tasknest::models::UserPublic;
use tasknest::routes::{self, health};
use tasknest::storage::{InMemoryUserStore, UserStore};

const SECRET: &str = "integration-test-secret";

fn codec(secret: &str) -> TokenCodec {
    TokenCodec::new(&AuthConfig::new(secret, 3600, 4).expect("valid auth config"))
}

/// Builds the same application as `main`, backed by the in-memory store.
async fn app(
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    let service = AuthService::new(PasswordHasher::new(4), codec(SECRET), store.clone())
        .expect("auth service");
    let resolver = IdentityResolver::new(codec(SECRET), store);

    test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .app_data(web::Data::new(resolver))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await
}

async fn register<S, B>(app: &S, payload: serde_json::Value) -> (StatusCode, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[actix_rt::test]
async fn test_register_login_and_me_flow() {
    let app = app().await;

    let register_payload = json!({
        "email": "integration@example.com",
        "password": "Password123!",
        "first_name": "Integration",
        "last_name": "User"
    });
    let (status, body) = register(&app, register_payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "Registration failed. Body: {}", body);

    // Registering the same email again must fail.
    let (status, body) = register(&app, register_payload).await;
    assert_eq!(
        status,
        StatusCode::BAD_REQUEST,
        "Duplicate registration did not fail as expected. Body: {}",
        body
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({
            "email": "integration@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: TokenResponse = test::read_body_json(resp).await;
    assert_eq!(login.token_type, "bearer");

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .append_header(("Authorization", format!("Bearer {}", login.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: UserPublic = test::read_body_json(resp).await;
    assert_eq!(me.email, "integration@example.com");
    assert_eq!(me.first_name.as_deref(), Some("Integration"));
    assert_eq!(me.last_name.as_deref(), Some("User"));
}

#[actix_rt::test]
async fn test_protected_route_rejects_bad_tokens() {
    let app = app().await;

    let (status, _) = register(
        &app,
        json!({ "email": "victim@example.com", "password": "Password123!" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let forged = codec("attacker-secret")
        .issue(tasknest::models::UserId::new(), chrono::Utc::now())
        .expect("token");

    let cases = vec![
        (None, "missing header"),
        (Some("Bearer ".to_string()), "empty bearer"),
        (Some("Basic dXNlcjpwYXNz".to_string()), "wrong scheme"),
        (Some("Bearer not.a.token".to_string()), "garbage token"),
        (Some(format!("Bearer {}", forged)), "forged token"),
    ];

    for (authorization, description) in cases {
        let mut req = test::TestRequest::get().uri("/api/auth/me");
        if let Some(value) = authorization {
            req = req.append_header(("Authorization", value));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "Test case failed: {}",
            description
        );
        assert_eq!(
            resp.headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer"),
            "Test case failed: {}",
            description
        );
    }
}

#[actix_rt::test]
async fn test_token_for_unknown_user_rejected() {
    let app = app().await;
    let token = codec(SECRET)
        .issue(tasknest::models::UserId::new(), chrono::Utc::now())
        .expect("token");

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .append_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let app = app().await;

    let test_cases = vec![
        // Deserialization errors (expect 400 for missing fields)
        (
            json!({ "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "email": "test@example.com" }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Validation errors (expect 422 for invalid formats/lengths after successful deserialization)
        (
            json!({ "email": "invalid-email", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "email": "test@example.com", "password": "123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
        (
            json!({ "email": "test@example.com", "password": "Password123!", "first_name": "a".repeat(101) }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "first name too long",
        ),
        (
            json!({ "email": "test@example.com", "password": format!("{}correct", "a".repeat(72)) }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password longer than bcrypt reads",
        ),
        (
            json!({ "email": "test@example.com", "password": "é".repeat(40) }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "multibyte password longer than 72 bytes",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let (status, body) = register(&app, payload).await;
        assert_eq!(
            status, expected_status,
            "Test case failed: {}. Body: {}",
            description, body
        );
    }
}

#[actix_rt::test]
async fn test_invalid_login_inputs() {
    let app = app().await;
    let valid_user_email = "login_test_user@example.com";
    let valid_user_password = "Password123!";

    let (status, _) = register(
        &app,
        json!({ "email": valid_user_email, "password": valid_user_password }),
    )
    .await;
    assert!(status.is_success(), "Setup: Failed to register test user");

    let test_cases = vec![
        (
            json!({ "password": valid_user_password }),
            StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "email": valid_user_email }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
        (
            json!({ "email": "invalid-email", "password": valid_user_password }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "email": valid_user_email, "password": "123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
        (
            json!({ "email": valid_user_email, "password": "WrongPassword123!" }),
            StatusCode::UNAUTHORIZED,
            "incorrect password",
        ),
        (
            json!({ "email": "nonexistent@example.com", "password": valid_user_password }),
            StatusCode::UNAUTHORIZED,
            "non-existent user",
        ),
    ];

    let mut unauthorized_bodies = Vec::new();
    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body)
        );
        if status == StatusCode::UNAUTHORIZED {
            unauthorized_bodies.push(body);
        }
    }

    // Wrong password and unknown account must be indistinguishable.
    assert_eq!(unauthorized_bodies.len(), 2);
    assert_eq!(unauthorized_bodies[0], unauthorized_bodies[1]);
}

#[actix_rt::test]
async fn test_login_with_shared_72_byte_prefix_rejected() {
    let app = app().await;
    let prefix = "a".repeat(72);

    let (status, body) = register(&app, json!({ "email": "long@example.com", "password": &prefix })).await;
    assert_eq!(status, StatusCode::CREATED, "Registration failed. Body: {}", body);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "long@example.com", "password": format!("{}WRONG", prefix) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_public_paths_match_exactly() {
    let app = app().await;

    let cases = vec![
        (test::TestRequest::post().uri("/api/auth/register-anything"), "register suffix"),
        (test::TestRequest::post().uri("/api/auth/login/x"), "below login"),
        (test::TestRequest::get().uri("/api/auth/loginx"), "login suffix"),
    ];

    for (req, description) in cases {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "Test case failed: {}",
            description
        );
    }
}

#[actix_rt::test]
async fn test_health_is_public() {
    let app = app().await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
