use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{Mailer, OtpRepository, SessionPort, UserPort};
use crate::domain::types::{
    EmailMessage, OTP_LEN, OTP_MAX, OTP_MIN, PasswordResetOtp, SessionTokens, normalize_code,
    normalize_email,
};
use crate::error::AuthServiceError;

/// Uniform draw over the six-digit range.
pub fn generate_code() -> String {
    rand::rng().random_range(OTP_MIN..=OTP_MAX).to_string()
}

fn otp_email(to: &str, code: &str, ttl: Duration) -> EmailMessage {
    let minutes = ttl.num_minutes();
    EmailMessage {
        to: to.to_owned(),
        subject: "Your CompostKaki password reset code".to_owned(),
        html: format!(
            "<p>Use this code to reset your CompostKaki password:</p>\
             <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{code}</p>\
             <p>The code expires in {minutes} minutes. If you did not ask for a reset, \
             you can ignore this email.</p>"
        ),
        text: format!(
            "Your CompostKaki password reset code is {code}. It expires in {minutes} minutes. \
             If you did not ask for a reset, you can ignore this email."
        ),
    }
}

pub struct RequestOtpInput {
    pub email: String,
}

pub struct RequestOtpUseCase<U, O, M>
where
    U: UserPort,
    O: OtpRepository,
    M: Mailer,
{
    pub users: U,
    pub otps: O,
    pub mailer: M,
    pub ttl: Duration,
}

impl<U, O, M> RequestOtpUseCase<U, O, M>
where
    U: UserPort,
    O: OtpRepository,
    M: Mailer,
{
    /// Succeeds for unknown emails too, so callers cannot probe for accounts.
    pub async fn execute(&self, input: RequestOtpInput) -> Result<(), AuthServiceError> {
        if !input.email.contains('@') {
            return Err(AuthServiceError::InvalidEmail);
        }
        let email = normalize_email(&input.email);

        if self.users.find_by_email(&email).await?.is_none() {
            tracing::info!("password reset requested for unknown email");
            return Ok(());
        }

        let now = Utc::now();
        let otp = PasswordResetOtp {
            id: Uuid::new_v4(),
            email: email.clone(),
            otp_code: generate_code(),
            created_at: now,
            expires_at: now + self.ttl,
            used_at: None,
        };
        self.otps.upsert(&otp).await?;

        // Delivery failure still reports success; the stored code stays valid.
        if let Err(e) = self
            .mailer
            .send(&otp_email(&email, &otp.otp_code, self.ttl))
            .await
        {
            tracing::warn!(error = %e, otp_id = %otp.id, "failed to deliver reset code");
        }
        Ok(())
    }
}

pub struct VerifyOtpInput {
    pub email: String,
    pub code: String,
}

pub struct VerifyOtpUseCase<U, O, S>
where
    U: UserPort,
    O: OtpRepository,
    S: SessionPort,
{
    pub users: U,
    pub otps: O,
    pub sessions: S,
}

impl<U, O, S> VerifyOtpUseCase<U, O, S>
where
    U: UserPort,
    O: OtpRepository,
    S: SessionPort,
{
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<SessionTokens, AuthServiceError> {
        let email = normalize_email(&input.email);
        let code = normalize_code(&input.code);
        if email.is_empty() || code.is_empty() {
            return Err(AuthServiceError::MissingData("email and code are required"));
        }
        if code.len() != OTP_LEN {
            return Err(AuthServiceError::InvalidOtp);
        }

        let now = Utc::now();
        let Some(otp) = self.otps.find_active(&email, &code, now).await? else {
            return Err(self.classify_rejection(&email, &code, now).await?);
        };

        let Some(account) = self.users.find_by_email(&email).await? else {
            // Account removed after the code was issued. Burn the code and
            // answer exactly as for a wrong code.
            tracing::info!(otp_id = %otp.id, "reset code verified for vanished account");
            if !self.otps.mark_used(otp.id, now).await? {
                return Err(self.classify_rejection(&email, &code, now).await?);
            }
            return Err(AuthServiceError::InvalidOtp);
        };

        // One-shot: the code stays consumed even if the exchange below fails.
        // Losing the claim to a concurrent verify or a newer request is a rejection.
        if !self.otps.mark_used(otp.id, now).await? {
            tracing::info!(otp_id = %otp.id, "reset code claimed concurrently");
            return Err(self.classify_rejection(&email, &code, now).await?);
        }

        let recovery = self
            .sessions
            .generate_recovery_token(&account.email, None)
            .await
            .map_err(|e| AuthServiceError::SessionCreationFailed(e.into()))?;
        self.sessions
            .exchange_recovery_token(&recovery.hashed_token)
            .await
            .map_err(|e| AuthServiceError::SessionCreationFailed(e.into()))
    }

    async fn classify_rejection(
        &self,
        email: &str,
        code: &str,
        now: chrono::DateTime<Utc>,
    ) -> Result<AuthServiceError, AuthServiceError> {
        let err = match self.otps.find_latest_by_code(email, code).await? {
            Some(otp) if otp.is_used() => AuthServiceError::OtpAlreadyUsed,
            Some(otp) if otp.is_expired_at(now) => AuthServiceError::OtpExpired,
            _ => AuthServiceError::InvalidOtp,
        };
        Ok(err)
    }
}
