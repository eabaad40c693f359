//! # Murmur API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use murmur_core::ports::{PasswordService, TokenService};
use murmur_infra::auth::{Argon2PasswordService, JwtTokenService};

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&telemetry::TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    // A deployment with no signing key must not come up at all.
    let Some(jwt) = config.jwt.clone() else {
        tracing::error!("JWT_SECRET is not set; refusing to start without a signing key");
        return Err(std::io::Error::other("JWT_SECRET not configured"));
    };

    tracing::info!(
        "Starting Murmur API server on {}:{}",
        config.host,
        config.port
    );

    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(jwt));
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    let state = AppState::new(config.database.as_ref()).await;

    #[cfg(feature = "rate-limit")]
    let limiter: Arc<dyn murmur_core::ports::RateLimiter> =
        Arc::new(murmur_infra::rate_limit::InMemoryRateLimiter::from_env());

    HttpServer::new(move || {
        let app = App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()));

        #[cfg(feature = "rate-limit")]
        let app = app.wrap(middleware::rate_limit::RateLimitMiddleware::new(
            limiter.clone(),
        ));

        app.configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
