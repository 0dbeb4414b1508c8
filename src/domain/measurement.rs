// Instantaneous current/temperature readings and their risk bands
use super::error::{parse_number, require_positive, AssessmentResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One instantaneous reading: load current (A) and wiring temperature (℃).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub current: f64,
    pub temperature: f64,
}

impl Measurement {
    pub fn new(current: f64, temperature: f64) -> AssessmentResult<Self> {
        Ok(Self {
            current: require_positive("current", current)?,
            temperature: require_positive("temperature", temperature)?,
        })
    }

    /// Build a measurement from raw form fields.
    pub fn parse(current: &str, temperature: &str) -> AssessmentResult<Self> {
        Self::new(
            parse_number("current", current)?,
            parse_number("temperature", temperature)?,
        )
    }
}

/// Four-level severity band, ordered L1 < L2 < L3 < L4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    L1,
    L2,
    L3,
    L4,
}

impl RiskLevel {
    pub fn code(&self) -> &'static str {
        match self {
            RiskLevel::L1 => "L1",
            RiskLevel::L2 => "L2",
            RiskLevel::L3 => "L3",
            RiskLevel::L4 => "L4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::L1 => "Normal",
            RiskLevel::L2 => "Caution",
            RiskLevel::L3 => "Warning",
            RiskLevel::L4 => "Danger",
        }
    }

    /// Whether this band calls for an inspection checklist.
    pub fn needs_attention(&self) -> bool {
        *self >= RiskLevel::L2
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The three independent axes a performance assessment is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskAxis {
    Electrical,
    Thermal,
    Sensitivity,
}

impl RiskAxis {
    /// Lower bounds of L2, L3 and L4 on this axis. Bands are half-open `[lower, upper)`.
    pub fn band_bounds(&self) -> [f64; 3] {
        match self {
            RiskAxis::Electrical => [1.0, 1.2, 1.5],
            RiskAxis::Thermal => [0.5, 0.8, 1.0],
            RiskAxis::Sensitivity => [0.4, 1.0, 1.5],
        }
    }

    /// Display name of a level on this axis. Sensitivity uses its own vocabulary.
    pub fn level_name(&self, level: RiskLevel) -> &'static str {
        match (self, level) {
            (RiskAxis::Sensitivity, RiskLevel::L1) => "Moderate",
            (RiskAxis::Sensitivity, RiskLevel::L2) => "High",
            (RiskAxis::Sensitivity, RiskLevel::L3) => "Danger",
            (RiskAxis::Sensitivity, RiskLevel::L4) => "Critical",
            (_, level) => level.label(),
        }
    }

    /// Human-readable value range covered by `level` on this axis.
    pub fn range_description(&self, level: RiskLevel) -> String {
        let [l2, l3, l4] = self.band_bounds();
        match level {
            RiskLevel::L1 => format!("below {:.1}", l2),
            RiskLevel::L2 => format!("{:.1} to below {:.1}", l2, l3),
            RiskLevel::L3 => format!("{:.1} to below {:.1}", l3, l4),
            RiskLevel::L4 => format!("{:.1} or above", l4),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RiskAxis::Electrical => "Electrical stress (ΔI)",
            RiskAxis::Thermal => "Thermal stress (ΔT)",
            RiskAxis::Sensitivity => "Temperature response sensitivity (R)",
        }
    }
}

/// Inspection checklist groups raised by an elevated risk axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistCategory {
    Current,
    Temperature,
    ThermalResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResult {
    pub delta_i: f64,
    pub delta_t: f64,
    pub sensitivity: f64,
    pub i_critic: f64,
    pub risk_i: RiskLevel,
    pub risk_t: RiskLevel,
    pub risk_r: RiskLevel,
}

impl PerformanceResult {
    pub fn risk(&self, axis: RiskAxis) -> RiskLevel {
        match axis {
            RiskAxis::Electrical => self.risk_i,
            RiskAxis::Thermal => self.risk_t,
            RiskAxis::Sensitivity => self.risk_r,
        }
    }

    pub fn highest_risk(&self) -> RiskLevel {
        self.risk_i.max(self.risk_t).max(self.risk_r)
    }

    /// Checklist groups to walk through; empty when every indicator is in L1.
    pub fn checklist(&self) -> Vec<ChecklistCategory> {
        [
            (self.risk_i, ChecklistCategory::Current),
            (self.risk_t, ChecklistCategory::Temperature),
            (self.risk_r, ChecklistCategory::ThermalResponse),
        ]
        .into_iter()
        .filter(|(level, _)| level.needs_attention())
        .map(|(_, category)| category)
        .collect()
    }
}
