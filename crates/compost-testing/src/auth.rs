//! Mock auth helpers for router tests.
//!
//! Real access tokens come from the hosted auth provider. In tests, `MockAuth`
//! signs tokens with a known secret so no provider round-trip is needed.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use uuid::Uuid;

use compost_auth_types::token::issue_access_token;

/// Secret shared by `MockAuth` and the test app state.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub email: String,
}

impl MockAuth {
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    /// A fresh random user.
    pub fn random() -> Self {
        let user_id = Uuid::new_v4();
        Self::new(user_id, format!("{user_id}@example.com"))
    }

    /// Signed access token valid for one hour.
    pub fn token(&self) -> String {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 3600;
        issue_access_token(self.user_id, Some(&self.email), exp, TEST_JWT_SECRET).unwrap()
    }

    /// `Authorization: Bearer <token>` header pair.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap();
        (AUTHORIZATION, value)
    }
}
