use serde::Deserialize;

use compost_core::config::Config;

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL of the backend database.
    pub database_url: String,
    /// TCP port to listen on. Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    /// Hosted backend project URL (e.g. "https://xyz.backend.example").
    pub backend_url: String,
    /// Public API key sent on user-scoped provider calls.
    pub backend_anon_key: String,
    /// Privileged API key for admin provider calls. Never returned to clients.
    pub backend_service_key: String,
    /// HS256 secret the provider signs access tokens with.
    pub jwt_secret: String,
    pub resend_api_key: String,
    #[serde(default = "default_resend_base_url")]
    pub resend_base_url: String,
    /// Sender address, e.g. "CompostKaki <no-reply@compostkaki.example>".
    pub email_from: String,
    /// Public site origin used in reset links and redirects.
    pub site_url: String,
    #[serde(default = "default_otp_ttl_secs")]
    pub otp_ttl_secs: i64,
    #[serde(default = "default_recovery_link_ttl_secs")]
    pub recovery_link_ttl_secs: i64,
}

impl Config for AuthConfig {}

fn default_auth_port() -> u16 {
    3112
}

fn default_resend_base_url() -> String {
    "https://api.resend.com".to_owned()
}

fn default_otp_ttl_secs() -> i64 {
    crate::domain::types::DEFAULT_OTP_TTL_SECS
}

fn default_recovery_link_ttl_secs() -> i64 {
    3600
}

/// Parse a base URL so that relative joins append to its path.
pub fn parse_base_url(raw: &str) -> Result<url::Url, url::ParseError> {
    let mut url = url::Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
