use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::io;
use std::sync::Arc;

use tasknest::{
    auth::{AuthMiddleware, AuthService, IdentityResolver, PasswordHasher, TokenCodec},
    config::Config,
    routes::{self, health},
    storage::{InMemoryUserStore, PgUserStore, UserStore},
};

fn startup_error(context: &str, error: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, error);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, error))
}

async fn user_store(config: &Config) -> io::Result<Arc<dyn UserStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = PgPool::connect(url)
                .await
                .map_err(|e| startup_error("Failed to connect to database", e))?;
            let store = PgUserStore::new(pool);
            store
                .init_schema()
                .await
                .map_err(|e| startup_error("Failed to prepare users table", e))?;
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
    log::debug!("loaded configuration: {:?}", config);

    let store = user_store(&config).await?;
    let codec = TokenCodec::new(&config.auth);
    let hasher = PasswordHasher::new(config.auth.hash_work_factor);

    let service = AuthService::new(hasher, codec.clone(), store.clone())
        .map_err(|e| startup_error("Failed to initialise auth service", e))?;
    let service = web::Data::new(service);
    let resolver = web::Data::new(IdentityResolver::new(codec, store));

    log::info!("Starting TaskNest server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(resolver.clone())
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
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
