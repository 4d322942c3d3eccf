use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::ProfileRepository;
use crate::domain::types::{DISPLAY_NAME_MAX_LEN, Profile};
use crate::error::CompostServiceError;
use crate::usecase::required_text;

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<R: ProfileRepository> {
    pub repo: R,
}

impl<R: ProfileRepository> GetProfileUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Profile, CompostServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(CompostServiceError::ProfileNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileUseCase<R: ProfileRepository> {
    pub repo: R,
}

impl<R: ProfileRepository> UpdateProfileUseCase<R> {
    /// First call creates the profile; later calls rename it.
    pub async fn execute(
        &self,
        user_id: Uuid,
        display_name: &str,
    ) -> Result<Profile, CompostServiceError> {
        let display_name = required_text(display_name, "display_name", DISPLAY_NAME_MAX_LEN)?;
        let now = Utc::now();
        self.repo
            .upsert(&Profile {
                id: user_id,
                display_name,
                created_at: now,
                updated_at: now,
            })
            .await
    }
}
