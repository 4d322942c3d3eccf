use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use compost_auth::domain::repository::OtpRepository;
use compost_auth::domain::types::{Account, DEFAULT_OTP_TTL_SECS, PasswordResetOtp};
use compost_auth::error::AuthServiceError;
use compost_auth::usecase::otp::{
    RequestOtpInput, RequestOtpUseCase, VerifyOtpInput, VerifyOtpUseCase,
};

use crate::helpers::{
    MockMailer, MockOtpRepo, MockSessionPort, MockUserPort, stored_otp, test_account,
};

fn ttl() -> Duration {
    Duration::seconds(DEFAULT_OTP_TTL_SECS)
}

fn request_uc(
    users: MockUserPort,
    otps: MockOtpRepo,
    mailer: MockMailer,
) -> RequestOtpUseCase<MockUserPort, MockOtpRepo, MockMailer> {
    RequestOtpUseCase {
        users,
        otps,
        mailer,
        ttl: ttl(),
    }
}

async fn verify(
    users: MockUserPort,
    otps: MockOtpRepo,
    sessions: MockSessionPort,
    email: &str,
    code: &str,
) -> Result<compost_auth::domain::types::SessionTokens, AuthServiceError> {
    VerifyOtpUseCase {
        users,
        otps,
        sessions,
    }
    .execute(VerifyOtpInput {
        email: email.to_owned(),
        code: code.to_owned(),
    })
    .await
}

// ── Request ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_and_email_code_for_known_account() {
    let account = test_account();
    let repo = MockOtpRepo::empty();
    let otps = repo.otps_handle();
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();

    let before = Utc::now();
    request_uc(MockUserPort::new(vec![account.clone()]), repo, mailer)
        .execute(RequestOtpInput {
            email: "  Kaki@Example.COM ".to_owned(),
        })
        .await
        .unwrap();

    let otps = otps.lock().unwrap();
    assert_eq!(otps.len(), 1, "expected exactly one stored code");
    let otp = &otps[0];
    assert_eq!(otp.email, account.email);
    assert_eq!(otp.otp_code.len(), 6);
    assert!(otp.otp_code.chars().all(|c| c.is_ascii_digit()));
    assert!(otp.used_at.is_none());
    assert!(otp.expires_at >= before + ttl());
    assert!(otp.expires_at <= Utc::now() + ttl());

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, account.email);
    assert!(sent[0].text.contains(&otp.otp_code));
}

#[tokio::test]
async fn should_succeed_silently_for_unknown_email() {
    let repo = MockOtpRepo::empty();
    let otps = repo.otps_handle();
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();

    request_uc(MockUserPort::empty(), repo, mailer)
        .execute(RequestOtpInput {
            email: "nobody@example.com".to_owned(),
        })
        .await
        .unwrap();

    assert!(otps.lock().unwrap().is_empty(), "no code may be created");
    assert!(sent.lock().unwrap().is_empty(), "no email may be sent");
}

#[tokio::test]
async fn should_reject_email_without_at_sign() {
    let result = request_uc(MockUserPort::empty(), MockOtpRepo::empty(), MockMailer::new())
        .execute(RequestOtpInput {
            email: "not-an-email".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidEmail)),
        "expected InvalidEmail, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_success_and_keep_code_when_delivery_fails() {
    let account = test_account();
    let repo = MockOtpRepo::empty();
    let otps = repo.otps_handle();

    request_uc(
        MockUserPort::new(vec![account.clone()]),
        repo,
        MockMailer::failing(),
    )
    .execute(RequestOtpInput {
        email: account.email.clone(),
    })
    .await
    .unwrap();

    let otps = otps.lock().unwrap();
    assert_eq!(otps.len(), 1);
    assert!(otps[0].is_active_at(Utc::now()), "code must stay usable");
}

#[tokio::test]
async fn should_only_accept_the_newest_code_after_two_requests() {
    let account = test_account();
    let repo = MockOtpRepo::empty();
    let otps = repo.otps_handle();
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();
    let uc = request_uc(MockUserPort::new(vec![account.clone()]), repo.share(), mailer);

    let input = || RequestOtpInput {
        email: account.email.clone(),
    };
    uc.execute(input()).await.unwrap();
    let first = otps.lock().unwrap()[0].otp_code.clone();
    // Draw again until the codes differ so the assertion below is meaningful.
    let mut second = first.clone();
    while second == first {
        uc.execute(input()).await.unwrap();
        second = otps.lock().unwrap()[0].otp_code.clone();
    }

    assert_eq!(otps.lock().unwrap().len(), 1, "upsert keeps one row per email");
    assert!(sent.lock().unwrap().len() >= 2);

    let stale = verify(
        MockUserPort::new(vec![account.clone()]),
        repo.share(),
        MockSessionPort::new(),
        &account.email,
        &first,
    )
    .await;
    assert!(
        matches!(stale, Err(AuthServiceError::InvalidOtp)),
        "expected InvalidOtp for superseded code, got {stale:?}"
    );

    let fresh = verify(
        MockUserPort::new(vec![account.clone()]),
        repo,
        MockSessionPort::new(),
        &account.email,
        &second,
    )
    .await;
    assert!(fresh.is_ok(), "newest code should verify, got {fresh:?}");
}

// ── Verify ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_exchange_valid_code_for_session() {
    let account = test_account();
    let repo = MockOtpRepo::new(vec![stored_otp(
        &account.email,
        "482913",
        Duration::seconds(30),
        ttl(),
    )]);
    let otps = repo.otps_handle();
    let sessions = MockSessionPort::new();
    let calls = sessions.calls_handle();

    let tokens = verify(
        MockUserPort::new(vec![account.clone()]),
        repo,
        sessions,
        &account.email,
        "482913",
    )
    .await
    .unwrap();

    assert_eq!(tokens.access_token, "access-recovered");
    assert_eq!(tokens.refresh_token, "refresh-recovered");
    assert!(otps.lock().unwrap()[0].used_at.is_some(), "code must be consumed");

    let calls = calls.lock().unwrap();
    assert_eq!(calls.recovery_emails, vec![account.email.clone()]);
    assert_eq!(calls.exchanged, vec![format!("hashed-{}", account.email)]);
}

#[tokio::test]
async fn should_normalize_email_and_code_before_lookup() {
    let account = test_account();
    let repo = MockOtpRepo::new(vec![stored_otp(
        &account.email,
        "482913",
        Duration::seconds(30),
        ttl(),
    )]);

    let result = verify(
        MockUserPort::new(vec![account.clone()]),
        repo,
        MockSessionPort::new(),
        " KAKI@example.com",
        " 482 913\n",
    )
    .await;
    assert!(result.is_ok(), "got {result:?}");
}

#[tokio::test]
async fn should_report_already_used_on_second_verification() {
    let account = test_account();
    let repo = MockOtpRepo::new(vec![stored_otp(
        &account.email,
        "482913",
        Duration::seconds(30),
        ttl(),
    )]);

    verify(
        MockUserPort::new(vec![account.clone()]),
        repo.share(),
        MockSessionPort::new(),
        &account.email,
        "482913",
    )
    .await
    .unwrap();

    let second = verify(
        MockUserPort::new(vec![account.clone()]),
        repo,
        MockSessionPort::new(),
        &account.email,
        "482913",
    )
    .await;
    assert!(
        matches!(second, Err(AuthServiceError::OtpAlreadyUsed)),
        "expected OtpAlreadyUsed, got {second:?}"
    );
}

#[tokio::test]
async fn should_report_expired_code() {
    let account = test_account();
    let repo = MockOtpRepo::new(vec![stored_otp(
        &account.email,
        "482913",
        Duration::seconds(601),
        ttl(),
    )]);
    let sessions = MockSessionPort::new();
    let calls = sessions.calls_handle();

    let result = verify(
        MockUserPort::new(vec![account.clone()]),
        repo,
        sessions,
        &account.email,
        "482913",
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::OtpExpired)),
        "expected OtpExpired, got {result:?}"
    );
    assert!(calls.lock().unwrap().exchanged.is_empty());
}

#[tokio::test]
async fn should_report_invalid_code_when_no_record_exists() {
    let result = verify(
        MockUserPort::new(vec![test_account()]),
        MockOtpRepo::empty(),
        MockSessionPort::new(),
        "kaki@example.com",
        "123456",
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidOtp)),
        "expected InvalidOtp, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_invalid_code_for_wrong_length() {
    let account = test_account();
    let repo = MockOtpRepo::new(vec![stored_otp(
        &account.email,
        "482913",
        Duration::seconds(30),
        ttl(),
    )]);

    let result = verify(
        MockUserPort::new(vec![account.clone()]),
        repo,
        MockSessionPort::new(),
        &account.email,
        "48291",
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidOtp)),
        "expected InvalidOtp, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_email_and_code() {
    let result = verify(
        MockUserPort::empty(),
        MockOtpRepo::empty(),
        MockSessionPort::new(),
        "kaki@example.com",
        " - ",
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::MissingData(_))),
        "expected MissingData, got {result:?}"
    );
}

#[tokio::test]
async fn should_burn_code_and_hide_vanished_account() {
    let account = test_account();
    let repo = MockOtpRepo::new(vec![stored_otp(
        &account.email,
        "482913",
        Duration::seconds(30),
        ttl(),
    )]);
    let otps = repo.otps_handle();
    let sessions = MockSessionPort::new();
    let calls = sessions.calls_handle();

    let result = verify(
        MockUserPort::empty(),
        repo,
        sessions,
        &account.email,
        "482913",
    )
    .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidOtp)),
        "expected InvalidOtp, got {result:?}"
    );
    assert!(otps.lock().unwrap()[0].used_at.is_some());
    assert!(calls.lock().unwrap().recovery_emails.is_empty());
}

#[tokio::test]
async fn should_keep_code_consumed_when_session_exchange_fails() {
    let account = test_account();
    let repo = MockOtpRepo::new(vec![stored_otp(
        &account.email,
        "482913",
        Duration::seconds(30),
        ttl(),
    )]);
    let otps = repo.otps_handle();

    let result = verify(
        MockUserPort::new(vec![account.clone()]),
        repo.share(),
        MockSessionPort::failing_exchange(),
        &account.email,
        "482913",
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::SessionCreationFailed(_))),
        "expected SessionCreationFailed, got {result:?}"
    );
    assert!(otps.lock().unwrap()[0].used_at.is_some());

    let retry = verify(
        MockUserPort::new(vec![account.clone()]),
        repo,
        MockSessionPort::new(),
        &account.email,
        "482913",
    )
    .await;
    assert!(
        matches!(retry, Err(AuthServiceError::OtpAlreadyUsed)),
        "expected OtpAlreadyUsed, got {retry:?}"
    );
}

// ── Concurrent claims ────────────────────────────────────────────────────────

/// Hands control back to the runtime between the lookup and the claim, and
/// optionally lets a newer request replace the row in that gap.
struct InterleavingOtpRepo {
    inner: MockOtpRepo,
    replace_with: Option<PasswordResetOtp>,
}

impl OtpRepository for InterleavingOtpRepo {
    async fn upsert(&self, otp: &PasswordResetOtp) -> Result<(), AuthServiceError> {
        self.inner.upsert(otp).await
    }

    async fn find_active(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetOtp>, AuthServiceError> {
        let found = self.inner.find_active(email, code, now).await?;
        tokio::task::yield_now().await;
        if let Some(newer) = &self.replace_with {
            self.inner.upsert(newer).await?;
        }
        Ok(found)
    }

    async fn find_latest_by_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<PasswordResetOtp>, AuthServiceError> {
        self.inner.find_latest_by_code(email, code).await
    }

    async fn mark_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AuthServiceError> {
        self.inner.mark_used(id, at).await
    }
}

fn interleaving_uc(
    account: &Account,
    repo: &MockOtpRepo,
    sessions: MockSessionPort,
    replace_with: Option<PasswordResetOtp>,
) -> VerifyOtpUseCase<MockUserPort, InterleavingOtpRepo, MockSessionPort> {
    VerifyOtpUseCase {
        users: MockUserPort::new(vec![account.clone()]),
        otps: InterleavingOtpRepo {
            inner: repo.share(),
            replace_with,
        },
        sessions,
    }
}

fn input(email: &str, code: &str) -> VerifyOtpInput {
    VerifyOtpInput {
        email: email.to_owned(),
        code: code.to_owned(),
    }
}

#[tokio::test]
async fn should_issue_one_session_when_same_code_is_verified_concurrently() {
    let account = test_account();
    let repo = MockOtpRepo::new(vec![stored_otp(
        &account.email,
        "123456",
        Duration::seconds(30),
        ttl(),
    )]);
    let first_sessions = MockSessionPort::new();
    let first_calls = first_sessions.calls_handle();
    let second_sessions = MockSessionPort::new();
    let second_calls = second_sessions.calls_handle();

    let first = interleaving_uc(&account, &repo, first_sessions, None);
    let second = interleaving_uc(&account, &repo, second_sessions, None);

    let (a, b) = tokio::join!(
        first.execute(input(&account.email, "123456")),
        second.execute(input(&account.email, "123456")),
    );

    assert_eq!(
        [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "exactly one verify may win: {a:?} / {b:?}"
    );
    let loser = if a.is_ok() { b } else { a };
    assert!(
        matches!(loser, Err(AuthServiceError::OtpAlreadyUsed)),
        "expected OtpAlreadyUsed, got {loser:?}"
    );
    let exchanges =
        first_calls.lock().unwrap().exchanged.len() + second_calls.lock().unwrap().exchanged.len();
    assert_eq!(exchanges, 1);
}

#[tokio::test]
async fn should_reject_code_replaced_between_lookup_and_claim() {
    let account = test_account();
    let repo = MockOtpRepo::new(vec![stored_otp(
        &account.email,
        "123456",
        Duration::seconds(30),
        ttl(),
    )]);
    let otps = repo.otps_handle();
    let newer = stored_otp(&account.email, "654321", Duration::zero(), ttl());
    let sessions = MockSessionPort::new();
    let calls = sessions.calls_handle();

    let result = interleaving_uc(&account, &repo, sessions, Some(newer))
        .execute(input(&account.email, "123456"))
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidOtp)),
        "expected InvalidOtp, got {result:?}"
    );
    assert!(calls.lock().unwrap().exchanged.is_empty());
    let otps = otps.lock().unwrap();
    assert_eq!(otps.len(), 1);
    assert_eq!(otps[0].otp_code, "654321");
    assert!(otps[0].used_at.is_none(), "newer code must stay usable");
}
