use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use compost_auth::domain::repository::{Mailer, OtpRepository, SessionPort, UserPort};
use compost_auth::domain::types::{
    Account, EmailMessage, PasswordResetOtp, RecoveryToken, SessionTokens,
};
use compost_auth::error::AuthServiceError;

// ── MockUserPort ─────────────────────────────────────────────────────────────

pub struct MockUserPort {
    pub accounts: Vec<Account>,
}

impl MockUserPort {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn empty() -> Self {
        Self { accounts: vec![] }
    }
}

impl UserPort for MockUserPort {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthServiceError> {
        Ok(self.accounts.iter().find(|a| a.email == email).cloned())
    }
}

// ── MockOtpRepo ──────────────────────────────────────────────────────────────

pub struct MockOtpRepo {
    pub otps: Arc<Mutex<Vec<PasswordResetOtp>>>,
}

impl MockOtpRepo {
    pub fn new(otps: Vec<PasswordResetOtp>) -> Self {
        Self {
            otps: Arc::new(Mutex::new(otps)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns a shared handle to the stored codes for post-execution inspection.
    pub fn otps_handle(&self) -> Arc<Mutex<Vec<PasswordResetOtp>>> {
        Arc::clone(&self.otps)
    }

    /// Second repo over the same rows, for chaining use cases.
    pub fn share(&self) -> Self {
        Self {
            otps: self.otps_handle(),
        }
    }
}

impl OtpRepository for MockOtpRepo {
    async fn upsert(&self, otp: &PasswordResetOtp) -> Result<(), AuthServiceError> {
        let mut otps = self.otps.lock().unwrap();
        otps.retain(|o| o.email != otp.email);
        otps.push(PasswordResetOtp {
            used_at: None,
            ..otp.clone()
        });
        Ok(())
    }

    async fn find_active(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetOtp>, AuthServiceError> {
        Ok(self
            .otps
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.email == email && o.otp_code == code && o.is_active_at(now))
            .max_by_key(|o| o.created_at)
            .cloned())
    }

    async fn find_latest_by_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<PasswordResetOtp>, AuthServiceError> {
        Ok(self
            .otps
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.email == email && o.otp_code == code)
            .max_by_key(|o| o.created_at)
            .cloned())
    }

    async fn mark_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AuthServiceError> {
        let mut otps = self.otps.lock().unwrap();
        match otps.iter_mut().find(|o| o.id == id && o.used_at.is_none()) {
            Some(o) => {
                o.used_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockSessionPort ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct SessionCalls {
    pub recovery_emails: Vec<String>,
    pub exchanged: Vec<String>,
    pub refreshed: Vec<String>,
    pub password_updates: Vec<(String, String)>,
    pub deleted: Vec<Uuid>,
}

pub struct MockSessionPort {
    pub calls: Arc<Mutex<SessionCalls>>,
    pub fail_exchange: bool,
    pub reject_refresh: bool,
}

impl MockSessionPort {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(SessionCalls::default())),
            fail_exchange: false,
            reject_refresh: false,
        }
    }

    pub fn failing_exchange() -> Self {
        Self {
            fail_exchange: true,
            ..Self::new()
        }
    }

    pub fn rejecting_refresh() -> Self {
        Self {
            reject_refresh: true,
            ..Self::new()
        }
    }

    pub fn calls_handle(&self) -> Arc<Mutex<SessionCalls>> {
        Arc::clone(&self.calls)
    }
}

pub fn session_tokens(tag: &str) -> SessionTokens {
    SessionTokens {
        access_token: format!("access-{tag}"),
        refresh_token: format!("refresh-{tag}"),
        expires_in: 3600,
        token_type: "bearer".to_owned(),
    }
}

impl SessionPort for MockSessionPort {
    async fn generate_recovery_token(
        &self,
        email: &str,
        _redirect_to: Option<&str>,
    ) -> Result<RecoveryToken, AuthServiceError> {
        self.calls
            .lock()
            .unwrap()
            .recovery_emails
            .push(email.to_owned());
        Ok(RecoveryToken {
            action_link: format!("https://backend.example/auth/v1/verify?token=t-{email}"),
            hashed_token: format!("hashed-{email}"),
        })
    }

    async fn exchange_recovery_token(
        &self,
        token_hash: &str,
    ) -> Result<SessionTokens, AuthServiceError> {
        if self.fail_exchange {
            return Err(AuthServiceError::Upstream(anyhow::anyhow!("verify returned 403")));
        }
        self.calls
            .lock()
            .unwrap()
            .exchanged
            .push(token_hash.to_owned());
        Ok(session_tokens("recovered"))
    }

    async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<SessionTokens, AuthServiceError> {
        if self.reject_refresh {
            return Err(AuthServiceError::InvalidRefreshToken);
        }
        self.calls
            .lock()
            .unwrap()
            .refreshed
            .push(refresh_token.to_owned());
        Ok(session_tokens("refreshed"))
    }

    async fn update_password(
        &self,
        access_token: &str,
        password: &str,
    ) -> Result<(), AuthServiceError> {
        self.calls
            .lock()
            .unwrap()
            .password_updates
            .push((access_token.to_owned(), password.to_owned()));
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        self.calls.lock().unwrap().deleted.push(user_id);
        Ok(())
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<EmailMessage>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<EmailMessage>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for MockMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), AuthServiceError> {
        if self.fail {
            return Err(AuthServiceError::Upstream(anyhow::anyhow!("provider down")));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_account() -> Account {
    Account {
        id: Uuid::new_v4(),
        email: "kaki@example.com".to_owned(),
    }
}

pub fn stored_otp(email: &str, code: &str, age: Duration, ttl: Duration) -> PasswordResetOtp {
    let created_at = Utc::now() - age;
    PasswordResetOtp {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        otp_code: code.to_owned(),
        created_at,
        expires_at: created_at + ttl,
        used_at: None,
    }
}
