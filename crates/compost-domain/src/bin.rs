//! Compost bin domain types: moisture readings, derived health, membership.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownValue;

/// Lowest temperature (°C) before a bin is considered critical (pile has gone cold).
pub const CRITICAL_TEMP_LOW_C: f64 = 20.0;
/// Highest temperature (°C) before a bin is considered critical (risk of killing microbes).
pub const CRITICAL_TEMP_HIGH_C: f64 = 75.0;
/// Thermophilic range considered healthy, inclusive.
pub const HEALTHY_TEMP_RANGE_C: std::ops::RangeInclusive<f64> = 40.0..=65.0;

/// Moisture as judged by the squeeze test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoistureLevel {
    VeryDry,
    Dry,
    Perfect,
    Wet,
    VeryWet,
}

impl MoistureLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryDry => "very_dry",
            Self::Dry => "dry",
            Self::Perfect => "perfect",
            Self::Wet => "wet",
            Self::VeryWet => "very_wet",
        }
    }

    fn is_extreme(self) -> bool {
        matches!(self, Self::VeryDry | Self::VeryWet)
    }
}

impl FromStr for MoistureLevel {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very_dry" => Ok(Self::VeryDry),
            "dry" => Ok(Self::Dry),
            "perfect" => Ok(Self::Perfect),
            "wet" => Ok(Self::Wet),
            "very_wet" => Ok(Self::VeryWet),
            _ => Err(UnknownValue::new("moisture level", s)),
        }
    }
}

/// Three-tier bin health, derived from the latest readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    NeedsAttention,
    Critical,
}

impl HealthStatus {
    /// Derive health from the latest temperature and moisture readings.
    ///
    /// Any critical signal wins. `Healthy` requires both readings to be present
    /// and in range; a missing reading alone never makes a bin critical.
    pub fn derive(temperature_c: Option<f64>, moisture: Option<MoistureLevel>) -> Self {
        let temp_critical = temperature_c
            .is_some_and(|t| t < CRITICAL_TEMP_LOW_C || t > CRITICAL_TEMP_HIGH_C);
        let moisture_critical = moisture.is_some_and(MoistureLevel::is_extreme);
        if temp_critical || moisture_critical {
            return Self::Critical;
        }

        let temp_ok = temperature_c.is_some_and(|t| HEALTHY_TEMP_RANGE_C.contains(&t));
        let moisture_ok = moisture == Some(MoistureLevel::Perfect);
        if temp_ok && moisture_ok {
            Self::Healthy
        } else {
            Self::NeedsAttention
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::NeedsAttention => "needs_attention",
            Self::Critical => "critical",
        }
    }
}

impl FromStr for HealthStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "healthy" => Ok(Self::Healthy),
            "needs_attention" => Ok(Self::NeedsAttention),
            "critical" => Ok(Self::Critical),
            _ => Err(UnknownValue::new("health status", s)),
        }
    }
}

/// Role of a user within a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Member,
}

impl MemberRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl FromStr for MemberRole {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "member" => Ok(Self::Member),
            _ => Err(UnknownValue::new("member role", s)),
        }
    }
}
