use chrono::Duration;
use sea_orm::Database;
use tracing::info;

use compost_auth::config::{AuthConfig, parse_base_url};
use compost_auth::infra::backend::BackendAuthClient;
use compost_auth::infra::mailer::ResendMailer;
use compost_auth::router::build_router;
use compost_auth::state::AppState;
use compost_auth_types::identity::AccessTokenSecret;
use compost_core::config::Config;
use compost_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let backend_url = parse_base_url(&config.backend_url).expect("invalid BACKEND_URL");
    let backend = BackendAuthClient::new(
        backend_url,
        config.backend_anon_key.as_str(),
        config.backend_service_key.as_str(),
    );

    let resend_url = parse_base_url(&config.resend_base_url).expect("invalid RESEND_BASE_URL");
    let mailer = ResendMailer::new(
        &resend_url,
        config.resend_api_key.as_str(),
        config.email_from.as_str(),
    )
    .expect("invalid RESEND_BASE_URL");

    let state = AppState {
        db,
        backend,
        mailer,
        jwt_secret: AccessTokenSecret::new(config.jwt_secret.as_str()),
        site_url: parse_base_url(&config.site_url).expect("invalid SITE_URL"),
        otp_ttl: Duration::seconds(config.otp_ttl_secs),
        recovery_link_ttl: Duration::seconds(config.recovery_link_ttl_secs),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
