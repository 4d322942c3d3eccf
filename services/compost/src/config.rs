use serde::Deserialize;

use compost_core::config::Config;

/// Compost service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct CompostConfig {
    /// PostgreSQL connection URL of the backend database.
    pub database_url: String,
    /// TCP port to listen on. Env var: `COMPOST_PORT`.
    #[serde(default = "default_compost_port")]
    pub compost_port: u16,
    /// HS256 secret the auth provider signs access tokens with.
    pub jwt_secret: String,
}

impl Config for CompostConfig {}

fn default_compost_port() -> u16 {
    3113
}
