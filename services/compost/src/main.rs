use sea_orm::Database;
use tracing::info;

use compost_auth_types::identity::AccessTokenSecret;
use compost_core::config::Config;
use compost_core::tracing::init_tracing;
use compost_hub::config::CompostConfig;
use compost_hub::router::build_router;
use compost_hub::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = CompostConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        jwt_secret: AccessTokenSecret::new(config.jwt_secret.as_str()),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.compost_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("compost service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
