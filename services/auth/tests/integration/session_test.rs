use uuid::Uuid;

use compost_auth::error::AuthServiceError;
use compost_auth::usecase::session::{
    DeleteAccountUseCase, RefreshSessionUseCase, UpdatePasswordInput, UpdatePasswordUseCase,
};

use crate::helpers::MockSessionPort;

#[tokio::test]
async fn should_refresh_session_through_provider() {
    let sessions = MockSessionPort::new();
    let calls = sessions.calls_handle();

    let tokens = RefreshSessionUseCase { sessions }
        .execute(" refresh-0 ")
        .await
        .unwrap();

    assert_eq!(tokens.refresh_token, "refresh-refreshed");
    assert_eq!(calls.lock().unwrap().refreshed, vec!["refresh-0".to_owned()]);
}

#[tokio::test]
async fn should_require_refresh_token() {
    let result = RefreshSessionUseCase {
        sessions: MockSessionPort::new(),
    }
    .execute("")
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::MissingData(_))),
        "expected MissingData, got {result:?}"
    );
}

#[tokio::test]
async fn should_surface_rejected_refresh_token() {
    let result = RefreshSessionUseCase {
        sessions: MockSessionPort::rejecting_refresh(),
    }
    .execute("stale")
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidRefreshToken)),
        "expected InvalidRefreshToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_short_password_without_calling_provider() {
    let sessions = MockSessionPort::new();
    let calls = sessions.calls_handle();

    let result = UpdatePasswordUseCase { sessions }
        .execute(UpdatePasswordInput {
            access_token: "user-token".to_owned(),
            password: "12345".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::WeakPassword)),
        "expected WeakPassword, got {result:?}"
    );
    assert!(calls.lock().unwrap().password_updates.is_empty());
}

#[tokio::test]
async fn should_forward_password_with_callers_token() {
    let sessions = MockSessionPort::new();
    let calls = sessions.calls_handle();

    UpdatePasswordUseCase { sessions }
        .execute(UpdatePasswordInput {
            access_token: "user-token".to_owned(),
            password: "kompos".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(
        calls.lock().unwrap().password_updates,
        vec![("user-token".to_owned(), "kompos".to_owned())]
    );
}

#[tokio::test]
async fn should_delete_account_via_provider() {
    let sessions = MockSessionPort::new();
    let calls = sessions.calls_handle();
    let user_id = Uuid::new_v4();

    DeleteAccountUseCase { sessions }
        .execute(user_id)
        .await
        .unwrap();

    assert_eq!(calls.lock().unwrap().deleted, vec![user_id]);
}
