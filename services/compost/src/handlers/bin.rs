use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use compost_auth_types::identity::Identity;
use compost_domain::bin::{HealthStatus, MemberRole, MoistureLevel};

use crate::domain::types::{Bin, BinMember, BinUpdate};
use crate::error::CompostServiceError;
use crate::state::AppState;
use crate::usecase::bin::{
    CreateBinInput, CreateBinUseCase, DeleteBinUseCase, GetBinUseCase, JoinBinUseCase,
    ListMembersUseCase, ListMyBinsUseCase, UpdateBinUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BinResponse {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub latest_temperature_c: Option<f64>,
    pub latest_moisture: Option<MoistureLevel>,
    pub health_status: HealthStatus,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Bin> for BinResponse {
    fn from(bin: Bin) -> Self {
        Self {
            id: bin.id,
            name: bin.name,
            location: bin.location,
            description: bin.description,
            owner_id: bin.owner_id,
            latest_temperature_c: bin.latest_temperature_c,
            latest_moisture: bin.latest_moisture,
            health_status: bin.health_status,
            created_at: bin.created_at,
            updated_at: bin.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct BinDetailResponse {
    #[serde(flatten)]
    pub bin: BinResponse,
    pub member_count: u64,
}

#[derive(Serialize)]
pub struct MemberResponse {
    pub user_id: Uuid,
    pub role: MemberRole,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms")]
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

impl From<BinMember> for MemberResponse {
    fn from(m: BinMember) -> Self {
        Self {
            user_id: m.user_id,
            role: m.role,
            joined_at: m.joined_at,
        }
    }
}

#[derive(Serialize)]
pub struct JoinResponse {
    pub bin_id: Uuid,
    pub joined: bool,
}

// ── GET /bins ────────────────────────────────────────────────────────────────

pub async fn list_my_bins(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<BinResponse>>, CompostServiceError> {
    let usecase = ListMyBinsUseCase {
        repo: state.bin_repo(),
    };
    let bins = usecase.execute(identity.user_id).await?;
    Ok(Json(bins.into_iter().map(BinResponse::from).collect()))
}

// ── POST /bins ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateBinRequest {
    #[serde(default)]
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

pub async fn create_bin(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateBinRequest>,
) -> Result<(StatusCode, Json<BinResponse>), CompostServiceError> {
    let usecase = CreateBinUseCase {
        repo: state.bin_repo(),
    };
    let bin = usecase
        .execute(
            identity.user_id,
            CreateBinInput {
                name: body.name,
                location: body.location,
                description: body.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(bin.into())))
}

// ── GET /bins/{id} ───────────────────────────────────────────────────────────

pub async fn get_bin(
    _identity: Identity,
    State(state): State<AppState>,
    Path(bin_id): Path<Uuid>,
) -> Result<Json<BinDetailResponse>, CompostServiceError> {
    let usecase = GetBinUseCase {
        repo: state.bin_repo(),
    };
    let detail = usecase.execute(bin_id).await?;
    Ok(Json(BinDetailResponse {
        bin: detail.bin.into(),
        member_count: detail.member_count,
    }))
}

// ── PATCH /bins/{id} ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateBinRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

pub async fn update_bin(
    identity: Identity,
    State(state): State<AppState>,
    Path(bin_id): Path<Uuid>,
    Json(body): Json<UpdateBinRequest>,
) -> Result<Json<BinResponse>, CompostServiceError> {
    let usecase = UpdateBinUseCase {
        repo: state.bin_repo(),
    };
    let bin = usecase
        .execute(
            identity.user_id,
            bin_id,
            BinUpdate {
                name: body.name,
                location: body.location,
                description: body.description,
            },
        )
        .await?;
    Ok(Json(bin.into()))
}

// ── DELETE /bins/{id} ────────────────────────────────────────────────────────

pub async fn delete_bin(
    identity: Identity,
    State(state): State<AppState>,
    Path(bin_id): Path<Uuid>,
) -> Result<StatusCode, CompostServiceError> {
    let usecase = DeleteBinUseCase {
        repo: state.bin_repo(),
    };
    usecase.execute(identity.user_id, bin_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /bins/{id}/join ─────────────────────────────────────────────────────

pub async fn join_bin(
    identity: Identity,
    State(state): State<AppState>,
    Path(bin_id): Path<Uuid>,
) -> Result<(StatusCode, Json<JoinResponse>), CompostServiceError> {
    let usecase = JoinBinUseCase {
        repo: state.bin_repo(),
    };
    let joined = usecase.execute(identity.user_id, bin_id).await?;
    let status = if joined {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(JoinResponse { bin_id, joined })))
}

// ── GET /bins/{id}/members ───────────────────────────────────────────────────

pub async fn list_members(
    _identity: Identity,
    State(state): State<AppState>,
    Path(bin_id): Path<Uuid>,
) -> Result<Json<Vec<MemberResponse>>, CompostServiceError> {
    let usecase = ListMembersUseCase {
        repo: state.bin_repo(),
    };
    let members = usecase.execute(bin_id).await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}
