use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account known to the hosted auth provider.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
}

/// Stored password-reset code. One row per email; a new request overwrites it.
#[derive(Debug, Clone)]
pub struct PasswordResetOtp {
    pub id: Uuid,
    pub email: String,
    pub otp_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl PasswordResetOtp {
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Unused and not yet expired.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_used() && !self.is_expired_at(now)
    }
}

/// Access/refresh token pair issued by the provider. Owned by the client once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub token_type: String,
}

/// Single-use recovery credential minted by the provider's admin API.
#[derive(Debug, Clone)]
pub struct RecoveryToken {
    /// Provider verification URL. The OTP flow never hands it out.
    pub action_link: String,
    pub hashed_token: String,
}

/// Recovery token stored for the email-link reset.
#[cfg(feature = "legacy-link-reset")]
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub email: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

#[cfg(feature = "legacy-link-reset")]
impl PasswordResetToken {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

/// Outgoing transactional email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Inclusive range reset codes are drawn from.
pub const OTP_MIN: u32 = 100_000;
pub const OTP_MAX: u32 = 999_999;

/// Reset code length in digits.
pub const OTP_LEN: usize = 6;

/// Default reset code lifetime in seconds.
pub const DEFAULT_OTP_TTL_SECS: i64 = 600;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Lower-case and trim an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Keep only ASCII digits, dropping spaces and separators pasted with the code.
pub fn normalize_code(code: &str) -> String {
    code.chars().filter(char::is_ascii_digit).collect()
}
