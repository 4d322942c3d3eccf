use chrono::Utc;
use uuid::Uuid;

use compost_domain::bin::{HealthStatus, MemberRole};

use crate::domain::repository::BinRepository;
use crate::domain::types::{
    BIN_NAME_MAX_LEN, Bin, BinDetail, BinMember, BinUpdate, normalize_optional,
};
use crate::error::CompostServiceError;
use crate::usecase::required_text;

/// Load a bin and check that `user_id` belongs to it.
pub(crate) async fn ensure_member<R: BinRepository>(
    repo: &R,
    bin_id: Uuid,
    user_id: Uuid,
) -> Result<Bin, CompostServiceError> {
    let bin = repo
        .find_by_id(bin_id)
        .await?
        .ok_or(CompostServiceError::BinNotFound)?;
    if repo.find_member(bin_id, user_id).await?.is_none() {
        return Err(CompostServiceError::NotBinMember);
    }
    Ok(bin)
}

async fn ensure_owner<R: BinRepository>(
    repo: &R,
    bin_id: Uuid,
    user_id: Uuid,
) -> Result<Bin, CompostServiceError> {
    let bin = repo
        .find_by_id(bin_id)
        .await?
        .ok_or(CompostServiceError::BinNotFound)?;
    if !bin.is_owned_by(user_id) {
        return Err(CompostServiceError::NotBinOwner);
    }
    Ok(bin)
}

// ── ListMyBins ───────────────────────────────────────────────────────────────

pub struct ListMyBinsUseCase<R: BinRepository> {
    pub repo: R,
}

impl<R: BinRepository> ListMyBinsUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Bin>, CompostServiceError> {
        self.repo.list_for_member(user_id).await
    }
}

// ── CreateBin ────────────────────────────────────────────────────────────────

pub struct CreateBinInput {
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

pub struct CreateBinUseCase<R: BinRepository> {
    pub repo: R,
}

impl<R: BinRepository> CreateBinUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreateBinInput,
    ) -> Result<Bin, CompostServiceError> {
        let name = required_text(&input.name, "name", BIN_NAME_MAX_LEN)?;
        let now = Utc::now();
        let bin = Bin {
            id: Uuid::now_v7(),
            name,
            location: normalize_optional(input.location),
            description: normalize_optional(input.description),
            owner_id: user_id,
            latest_temperature_c: None,
            latest_moisture: None,
            health_status: HealthStatus::derive(None, None),
            created_at: now,
            updated_at: now,
        };
        let owner = BinMember {
            bin_id: bin.id,
            user_id,
            role: MemberRole::Owner,
            joined_at: now,
        };
        self.repo.create_with_owner(&bin, &owner).await?;
        tracing::info!(bin_id = %bin.id, owner_id = %user_id, "bin created");
        Ok(bin)
    }
}

// ── GetBin ───────────────────────────────────────────────────────────────────

pub struct GetBinUseCase<R: BinRepository> {
    pub repo: R,
}

impl<R: BinRepository> GetBinUseCase<R> {
    pub async fn execute(&self, bin_id: Uuid) -> Result<BinDetail, CompostServiceError> {
        let bin = self
            .repo
            .find_by_id(bin_id)
            .await?
            .ok_or(CompostServiceError::BinNotFound)?;
        let member_count = self.repo.count_members(bin_id).await?;
        Ok(BinDetail { bin, member_count })
    }
}

// ── UpdateBin ────────────────────────────────────────────────────────────────

pub struct UpdateBinUseCase<R: BinRepository> {
    pub repo: R,
}

impl<R: BinRepository> UpdateBinUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        bin_id: Uuid,
        update: BinUpdate,
    ) -> Result<Bin, CompostServiceError> {
        ensure_owner(&self.repo, bin_id, user_id).await?;
        let update = BinUpdate {
            name: update
                .name
                .map(|name| required_text(&name, "name", BIN_NAME_MAX_LEN))
                .transpose()?,
            location: update.location.map(|v| v.trim().to_owned()),
            description: update.description.map(|v| v.trim().to_owned()),
        };
        self.repo.update(bin_id, &update, Utc::now()).await
    }
}

// ── DeleteBin ────────────────────────────────────────────────────────────────

pub struct DeleteBinUseCase<R: BinRepository> {
    pub repo: R,
}

impl<R: BinRepository> DeleteBinUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, bin_id: Uuid) -> Result<(), CompostServiceError> {
        ensure_owner(&self.repo, bin_id, user_id).await?;
        self.repo.delete(bin_id).await?;
        tracing::info!(bin_id = %bin_id, "bin deleted");
        Ok(())
    }
}

// ── JoinBin ──────────────────────────────────────────────────────────────────

pub struct JoinBinUseCase<R: BinRepository> {
    pub repo: R,
}

impl<R: BinRepository> JoinBinUseCase<R> {
    /// Returns `true` when the caller was not yet a member. Joining twice is
    /// not an error and never downgrades the owner.
    pub async fn execute(&self, user_id: Uuid, bin_id: Uuid) -> Result<bool, CompostServiceError> {
        if self.repo.find_by_id(bin_id).await?.is_none() {
            return Err(CompostServiceError::BinNotFound);
        }
        self.repo
            .add_member(&BinMember {
                bin_id,
                user_id,
                role: MemberRole::Member,
                joined_at: Utc::now(),
            })
            .await
    }
}

// ── ListMembers ──────────────────────────────────────────────────────────────

pub struct ListMembersUseCase<R: BinRepository> {
    pub repo: R,
}

impl<R: BinRepository> ListMembersUseCase<R> {
    pub async fn execute(&self, bin_id: Uuid) -> Result<Vec<BinMember>, CompostServiceError> {
        if self.repo.find_by_id(bin_id).await?.is_none() {
            return Err(CompostServiceError::BinNotFound);
        }
        self.repo.list_members(bin_id).await
    }
}
