use chrono::Utc;
use uuid::Uuid;

use compost_domain::activity::LogKind;
use compost_domain::bin::MoistureLevel;
use compost_domain::pagination::PageRequest;

use crate::domain::repository::{BinLogRepository, BinRepository};
use crate::domain::types::{Bin, BinLog, TEMPERATURE_RANGE_C, normalize_optional};
use crate::error::CompostServiceError;
use crate::usecase::bin::ensure_member;

// ── ListLogs ─────────────────────────────────────────────────────────────────

pub struct ListLogsUseCase<B: BinRepository, L: BinLogRepository> {
    pub bins: B,
    pub logs: L,
}

impl<B: BinRepository, L: BinLogRepository> ListLogsUseCase<B, L> {
    pub async fn execute(
        &self,
        bin_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<BinLog>, CompostServiceError> {
        if self.bins.find_by_id(bin_id).await?.is_none() {
            return Err(CompostServiceError::BinNotFound);
        }
        self.logs.list(bin_id, page.clamped()).await
    }
}

// ── CreateLog ────────────────────────────────────────────────────────────────

pub struct CreateLogInput {
    pub kind: String,
    pub temperature_c: Option<f64>,
    pub moisture: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub struct CreatedLog {
    pub log: BinLog,
    /// Present when the log carried readings and the bin was updated.
    pub bin: Option<Bin>,
}

pub struct CreateLogUseCase<B: BinRepository, L: BinLogRepository> {
    pub bins: B,
    pub logs: L,
}

impl<B: BinRepository, L: BinLogRepository> CreateLogUseCase<B, L> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        bin_id: Uuid,
        input: CreateLogInput,
    ) -> Result<CreatedLog, CompostServiceError> {
        let kind: LogKind = input.kind.trim().parse()?;
        let out_of_range = input
            .temperature_c
            .is_some_and(|t| !(t.is_finite() && TEMPERATURE_RANGE_C.contains(&t)));
        if out_of_range {
            return Err(CompostServiceError::validation(format!(
                "temperature_c must be between {} and {}",
                TEMPERATURE_RANGE_C.start(),
                TEMPERATURE_RANGE_C.end()
            )));
        }
        let moisture = input
            .moisture
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::parse::<MoistureLevel>)
            .transpose()?;

        ensure_member(&self.bins, bin_id, user_id).await?;

        let log = BinLog {
            id: Uuid::now_v7(),
            bin_id,
            user_id,
            kind,
            temperature_c: input.temperature_c,
            moisture,
            notes: normalize_optional(input.notes),
            created_at: Utc::now(),
        };
        let bin = self.logs.append(&log).await?;
        if let Some(bin) = &bin {
            tracing::info!(
                bin_id = %bin.id,
                health_status = bin.health_status.as_str(),
                "bin readings updated"
            );
        }
        Ok(CreatedLog { log, bin })
    }
}
