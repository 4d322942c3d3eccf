//! Bin activity log types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownValue;

/// What a volunteer did at the bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Reading-only visit (temperature / moisture check).
    Monitor,
    Turn,
    AddGreens,
    AddBrowns,
    Water,
    Harvest,
    Other,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monitor => "monitor",
            Self::Turn => "turn",
            Self::AddGreens => "add_greens",
            Self::AddBrowns => "add_browns",
            Self::Water => "water",
            Self::Harvest => "harvest",
            Self::Other => "other",
        }
    }
}

impl FromStr for LogKind {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monitor" => Ok(Self::Monitor),
            "turn" => Ok(Self::Turn),
            "add_greens" => Ok(Self::AddGreens),
            "add_browns" => Ok(Self::AddBrowns),
            "water" => Ok(Self::Water),
            "harvest" => Ok(Self::Harvest),
            "other" => Ok(Self::Other),
            _ => Err(UnknownValue::new("log kind", s)),
        }
    }
}
