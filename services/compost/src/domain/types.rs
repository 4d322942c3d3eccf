use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use compost_domain::activity::LogKind;
use compost_domain::bin::{HealthStatus, MemberRole, MoistureLevel};
use compost_domain::task::{TaskStatus, TaskUrgency};

pub const DISPLAY_NAME_MAX_LEN: usize = 50;
pub const BIN_NAME_MAX_LEN: usize = 100;
pub const TITLE_MAX_LEN: usize = 200;
/// Plausible probe readings; anything outside is treated as a typo.
pub const TEMPERATURE_RANGE_C: std::ops::RangeInclusive<f64> = -20.0..=100.0;

#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Bin {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub latest_temperature_c: Option<f64>,
    pub latest_moisture: Option<MoistureLevel>,
    pub health_status: HealthStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bin {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Fold a new reading into the bin's latest state and recompute health.
    ///
    /// A reading that is absent keeps the previous value, so a moisture-only
    /// check does not erase the last known temperature. A reading taken
    /// before the bin's last change is ignored and `false` is returned.
    pub fn apply_readings(
        &mut self,
        temperature_c: Option<f64>,
        moisture: Option<MoistureLevel>,
        at: DateTime<Utc>,
    ) -> bool {
        if at < self.updated_at {
            return false;
        }
        if let Some(t) = temperature_c {
            self.latest_temperature_c = Some(t);
        }
        if let Some(m) = moisture {
            self.latest_moisture = Some(m);
        }
        self.health_status = HealthStatus::derive(self.latest_temperature_c, self.latest_moisture);
        self.updated_at = at;
        true
    }
}

/// Bin as shown on its detail page.
#[derive(Debug, Clone)]
pub struct BinDetail {
    pub bin: Bin,
    pub member_count: u64,
}

/// Partial bin edit. `None` leaves a field untouched; an empty optional text
/// field clears it.
#[derive(Debug, Clone, Default)]
pub struct BinUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BinMember {
    pub bin_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BinLog {
    pub id: Uuid,
    pub bin_id: Uuid,
    pub user_id: Uuid,
    pub kind: LogKind,
    pub temperature_c: Option<f64>,
    pub moisture: Option<MoistureLevel>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BinLog {
    pub fn has_readings(&self) -> bool {
        self.temperature_c.is_some() || self.moisture.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub id: Uuid,
    pub bin_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub urgency: TaskUrgency,
    pub status: TaskStatus,
    pub created_by: Uuid,
    pub accepted_by: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub bin_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone)]
pub struct ForumPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Post as shown in the forum listing.
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub post: ForumPost,
    pub reply_count: u64,
}

#[derive(Debug, Clone)]
pub struct ForumReply {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Post with its replies, oldest reply first.
#[derive(Debug, Clone)]
pub struct PostThread {
    pub post: ForumPost,
    pub replies: Vec<ForumReply>,
}

#[derive(Debug, Clone)]
pub struct Tip {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Trim optional free text, mapping blank input to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
