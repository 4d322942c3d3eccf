//! Email-link password reset. Superseded by the OTP flow; mail clients that
//! prefetch links can burn single-use tokens before the user clicks.

use chrono::{Duration, Utc};
use url::Url;
use uuid::Uuid;

use crate::domain::repository::{Mailer, RecoveryTokenRepository, SessionPort, UserPort};
use crate::domain::types::{EmailMessage, PasswordResetToken, SessionTokens, normalize_email};
use crate::error::AuthServiceError;

/// `{site_url}/reset-password?token=<token>`
pub fn reset_page_url(site_url: &Url, token: &str) -> Result<Url, AuthServiceError> {
    let mut url = site_url
        .join("reset-password")
        .map_err(|e| AuthServiceError::Internal(e.into()))?;
    url.query_pairs_mut().append_pair("token", token);
    Ok(url)
}

fn link_email(to: &str, link: &Url) -> EmailMessage {
    EmailMessage {
        to: to.to_owned(),
        subject: "Reset your CompostKaki password".to_owned(),
        html: format!(
            "<p>Follow this link to choose a new CompostKaki password:</p>\
             <p><a href=\"{link}\">Reset password</a></p>\
             <p>If you did not ask for a reset, you can ignore this email.</p>"
        ),
        text: format!(
            "Follow this link to choose a new CompostKaki password: {link}\n\
             If you did not ask for a reset, you can ignore this email."
        ),
    }
}

pub struct RequestRecoveryLinkInput {
    pub email: String,
}

pub struct RequestRecoveryLinkUseCase<U, S, R, M>
where
    U: UserPort,
    S: SessionPort,
    R: RecoveryTokenRepository,
    M: Mailer,
{
    pub users: U,
    pub sessions: S,
    pub tokens: R,
    pub mailer: M,
    pub site_url: Url,
    pub ttl: Duration,
}

impl<U, S, R, M> RequestRecoveryLinkUseCase<U, S, R, M>
where
    U: UserPort,
    S: SessionPort,
    R: RecoveryTokenRepository,
    M: Mailer,
{
    pub async fn execute(&self, input: RequestRecoveryLinkInput) -> Result<(), AuthServiceError> {
        if !input.email.contains('@') {
            return Err(AuthServiceError::InvalidEmail);
        }
        let email = normalize_email(&input.email);

        if self.users.find_by_email(&email).await?.is_none() {
            tracing::info!("reset link requested for unknown email");
            return Ok(());
        }

        let redirect_to = self
            .site_url
            .join("reset-password")
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let recovery = self
            .sessions
            .generate_recovery_token(&email, Some(redirect_to.as_str()))
            .await?;

        let now = Utc::now();
        let token = PasswordResetToken {
            id: Uuid::new_v4(),
            email: email.clone(),
            token_hash: recovery.hashed_token,
            created_at: now,
            expires_at: now + self.ttl,
            used_at: None,
        };
        self.tokens.create(&token).await?;

        let link = reset_page_url(&self.site_url, &token.token_hash)?;
        if let Err(e) = self.mailer.send(&link_email(&email, &link)).await {
            tracing::warn!(error = %e, token_id = %token.id, "failed to deliver reset link");
        }
        Ok(())
    }
}

pub struct VerifyRecoveryLinkUseCase<R, S>
where
    R: RecoveryTokenRepository,
    S: SessionPort,
{
    pub tokens: R,
    pub sessions: S,
}

impl<R, S> VerifyRecoveryLinkUseCase<R, S>
where
    R: RecoveryTokenRepository,
    S: SessionPort,
{
    pub async fn execute(&self, token_hash: &str) -> Result<SessionTokens, AuthServiceError> {
        let token_hash = token_hash.trim();
        if token_hash.is_empty() {
            return Err(AuthServiceError::MissingData("token is required"));
        }

        let now = Utc::now();
        let token = self
            .tokens
            .find_by_hash(token_hash)
            .await?
            .filter(|t| t.is_active_at(now))
            .ok_or(AuthServiceError::InvalidToken)?;

        if !self.tokens.consume(token.id, now).await? {
            return Err(AuthServiceError::InvalidToken);
        }

        self.sessions
            .exchange_recovery_token(&token.token_hash)
            .await
            .map_err(|e| AuthServiceError::SessionCreationFailed(e.into()))
    }
}
