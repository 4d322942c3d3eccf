use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use compost_auth_types::identity::Identity;

use crate::domain::types::Profile;
use crate::error::CompostServiceError;
use crate::state::AppState;
use crate::usecase::profile::{GetProfileUseCase, UpdateProfileUseCase};

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub display_name: String,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            display_name: p.display_name,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ── GET /profiles/@me ────────────────────────────────────────────────────────

pub async fn get_my_profile(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, CompostServiceError> {
    let usecase = GetProfileUseCase {
        repo: state.profile_repo(),
    };
    let profile = usecase.execute(identity.user_id).await?;
    Ok(Json(profile.into()))
}

// ── PUT /profiles/@me ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub display_name: String,
}

pub async fn update_my_profile(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, CompostServiceError> {
    let usecase = UpdateProfileUseCase {
        repo: state.profile_repo(),
    };
    let profile = usecase
        .execute(identity.user_id, &body.display_name)
        .await?;
    Ok(Json(profile.into()))
}
