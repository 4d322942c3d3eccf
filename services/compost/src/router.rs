use axum::{
    Router,
    routing::{delete, get, post},
};

use compost_core::health::healthz;
use compost_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    bin::{create_bin, delete_bin, get_bin, join_bin, list_members, list_my_bins, update_bin},
    forum::{create_post, create_reply, delete_post, get_post, list_posts},
    health::readyz,
    log::{create_log, list_logs},
    profile::{get_my_profile, update_my_profile},
    task::{accept_task, complete_task, create_task, delete_task, list_tasks},
    tip::{create_tip, list_tips},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Profiles
        .route("/profiles/@me", get(get_my_profile).put(update_my_profile))
        // Bins
        .route("/bins", get(list_my_bins).post(create_bin))
        .route(
            "/bins/{id}",
            get(get_bin).patch(update_bin).delete(delete_bin),
        )
        .route("/bins/{id}/join", post(join_bin))
        .route("/bins/{id}/members", get(list_members))
        .route("/bins/{id}/logs", get(list_logs).post(create_log))
        // Tasks
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", delete(delete_task))
        .route("/tasks/{id}/accept", post(accept_task))
        .route("/tasks/{id}/complete", post(complete_task))
        // Forum
        .route("/forum/posts", get(list_posts).post(create_post))
        .route("/forum/posts/{id}", get(get_post).delete(delete_post))
        .route("/forum/posts/{id}/replies", post(create_reply))
        // Tips
        .route("/tips", get(list_tips).post(create_tip))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
