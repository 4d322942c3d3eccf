//! `Authorization: Bearer` identity extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::request::Parts;
use uuid::Uuid;

use compost_core::error::AppError;

use crate::token::validate_access_token;

/// HS256 secret used to validate access tokens. Provide it from service state
/// with `impl FromRef<AppState> for AccessTokenSecret`.
#[derive(Clone)]
pub struct AccessTokenSecret(pub Arc<str>);

impl AccessTokenSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Authenticated caller.
///
/// Rejects with 401 when the header is absent, not a bearer credential, or the
/// token fails validation. Ownership checks (403) are done by use cases.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub access_token_exp: u64,
    /// Raw bearer token, forwarded when acting on the provider as this user.
    pub access_token: String,
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    AccessTokenSecret: FromRef<S>,
{
    type Rejection = AppError;

    // axum-core 0.5 declares `fn -> impl Future + Send`; validate synchronously and
    // return a 'static future so no borrow of `parts` is captured.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = AccessTokenSecret::from_ref(state);
        let result = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or(AppError::Unauthorized)
            .and_then(|Authorization(bearer)| {
                let token = bearer.token().to_owned();
                match validate_access_token(&token, &secret.0) {
                    Ok(info) => Ok(Self {
                        user_id: info.user_id,
                        email: info.email,
                        access_token_exp: info.access_token_exp,
                        access_token: token,
                    }),
                    Err(e) => {
                        tracing::debug!(error = %e, "rejected bearer token");
                        Err(AppError::Unauthorized)
                    }
                }
            });

        async move { result }
    }
}
