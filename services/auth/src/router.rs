use axum::{
    Router,
    routing::{delete, get, post, put},
};

use compost_core::health::healthz;
use compost_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    account::{delete_account, update_password},
    health::readyz,
    otp::{request_otp, verify_otp},
    session::{current_session, refresh_session},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // OTP password reset
        .route("/auth/password-reset/otp", post(request_otp))
        .route("/auth/password-reset/otp/verify", post(verify_otp))
        // Session
        .route("/auth/session", get(current_session))
        .route("/auth/session/refresh", post(refresh_session))
        // Account
        .route("/auth/password", put(update_password))
        .route("/auth/account", delete(delete_account));

    #[cfg(feature = "legacy-link-reset")]
    let router = {
        use crate::handlers::recovery_link::{follow_link, request_link, verify_link};
        router
            .route("/auth/password-reset/link", post(request_link).get(follow_link))
            .route("/auth/password-reset/link/verify", post(verify_link))
    };

    router
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
