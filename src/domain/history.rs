// Historical assessment records
use super::degradation::{DegradationSample, PatternResult};
use super::measurement::{Measurement, PerformanceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Performance,
    Degradation,
}

impl HistoryKind {
    pub const ALL: [HistoryKind; 2] = [HistoryKind::Performance, HistoryKind::Degradation];

    /// Key of the persisted log for this kind in the key-value store.
    pub fn storage_key(&self) -> &'static str {
        match self {
            HistoryKind::Performance => "insulation_performance_history",
            HistoryKind::Degradation => "insulation_degradation_history",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Performance => "performance",
            HistoryKind::Degradation => "degradation",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs and derived result of one assessment. The variant tag is the record kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Assessment {
    Performance {
        inputs: Measurement,
        result: PerformanceResult,
    },
    Degradation {
        inputs: Vec<DegradationSample>,
        result: PatternResult,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Creation clock reading in milliseconds. Unique enough within a kind, not guaranteed.
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub assessment: Assessment,
}

impl HistoryRecord {
    /// Stamp an assessment with `created_at`, deriving the id from the same clock reading.
    pub fn new(created_at: DateTime<Utc>, assessment: Assessment) -> Self {
        Self {
            id: created_at.timestamp_millis(),
            created_at,
            assessment,
        }
    }

    pub fn kind(&self) -> HistoryKind {
        match self.assessment {
            Assessment::Performance { .. } => HistoryKind::Performance,
            Assessment::Degradation { .. } => HistoryKind::Degradation,
        }
    }

    pub fn performance(&self) -> Option<(&Measurement, &PerformanceResult)> {
        match &self.assessment {
            Assessment::Performance { inputs, result } => Some((inputs, result)),
            Assessment::Degradation { .. } => None,
        }
    }

    /// Whether every number in the record survives a JSON round trip.
    pub fn is_finite(&self) -> bool {
        match &self.assessment {
            Assessment::Performance { inputs, result } => [
                inputs.current,
                inputs.temperature,
                result.delta_i,
                result.delta_t,
                result.sensitivity,
                result.i_critic,
            ]
            .iter()
            .all(|v| v.is_finite()),
            Assessment::Degradation { inputs, result } => {
                inputs.iter().all(|sample| sample.resistance.is_finite())
                    && [
                        result.decrease_rate,
                        result.volatility,
                        result.first_value,
                        result.last_value,
                        result.min_value,
                        result.max_value,
                    ]
                    .iter()
                    .all(|v| v.is_finite())
            }
        }
    }

    pub fn degradation(&self) -> Option<(&[DegradationSample], &PatternResult)> {
        match &self.assessment {
            Assessment::Degradation { inputs, result } => Some((inputs.as_slice(), result)),
            Assessment::Performance { .. } => None,
        }
    }
}
