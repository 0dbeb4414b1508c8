// Stress risk classifier - Scores a reading on electrical, thermal and sensitivity axes
use crate::application::critical_current::{CriticalCurrentSolver, CRITICAL_TEMPERATURE};
use crate::domain::error::{require_positive, AssessmentError, AssessmentResult};
use crate::domain::ladder::{first_match, Rule};
use crate::domain::measurement::{Measurement, PerformanceResult, RiskAxis, RiskLevel};

const ELECTRICAL_LADDER: [Rule<f64, RiskLevel>; 4] = [
    Rule::new(|v: &f64| *v < 1.0, RiskLevel::L1),
    Rule::new(|v: &f64| *v < 1.2, RiskLevel::L2),
    Rule::new(|v: &f64| *v < 1.5, RiskLevel::L3),
    Rule::new(|_: &f64| true, RiskLevel::L4),
];

const THERMAL_LADDER: [Rule<f64, RiskLevel>; 4] = [
    Rule::new(|v: &f64| *v < 0.5, RiskLevel::L1),
    Rule::new(|v: &f64| *v < 0.8, RiskLevel::L2),
    Rule::new(|v: &f64| *v < 1.0, RiskLevel::L3),
    Rule::new(|_: &f64| true, RiskLevel::L4),
];

const SENSITIVITY_LADDER: [Rule<f64, RiskLevel>; 4] = [
    Rule::new(|v: &f64| *v < 0.4, RiskLevel::L1),
    Rule::new(|v: &f64| *v < 1.0, RiskLevel::L2),
    Rule::new(|v: &f64| *v < 1.5, RiskLevel::L3),
    Rule::new(|_: &f64| true, RiskLevel::L4),
];

/// Band a stress value on one axis. Ladders are checked in ascending order.
pub fn classify_axis(axis: RiskAxis, value: f64) -> RiskLevel {
    let ladder = match axis {
        RiskAxis::Electrical => &ELECTRICAL_LADDER,
        RiskAxis::Thermal => &THERMAL_LADDER,
        RiskAxis::Sensitivity => &SENSITIVITY_LADDER,
    };
    // Every ladder ends in a catch-all rung
    first_match(ladder, &value).copied().unwrap_or(RiskLevel::L4)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StressRiskClassifier {
    solver: CriticalCurrentSolver,
}

impl StressRiskClassifier {
    pub fn new(solver: CriticalCurrentSolver) -> Self {
        Self { solver }
    }

    pub fn classify(&self, current: f64, temperature: f64) -> AssessmentResult<PerformanceResult> {
        let current = require_positive("current", current)?;
        let temperature = require_positive("temperature", temperature)?;

        let i_critic = self.solver.critical_current();
        let delta_i = current / i_critic;
        let delta_t = temperature / CRITICAL_TEMPERATURE;

        // Underflow to zero would make sensitivity undefined
        if delta_i == 0.0 {
            return Err(AssessmentError::invalid(
                "current",
                "electrical stress is zero, sensitivity is undefined",
            ));
        }
        let sensitivity = delta_t / delta_i;
        if !(delta_i.is_finite() && delta_t.is_finite() && sensitivity.is_finite()) {
            return Err(AssessmentError::invalid(
                "measurement",
                "stress ratios are outside the representable range",
            ));
        }

        Ok(PerformanceResult {
            delta_i,
            delta_t,
            sensitivity,
            i_critic,
            risk_i: classify_axis(RiskAxis::Electrical, delta_i),
            risk_t: classify_axis(RiskAxis::Thermal, delta_t),
            risk_r: classify_axis(RiskAxis::Sensitivity, sensitivity),
        })
    }

    pub fn classify_measurement(&self, measurement: &Measurement) -> AssessmentResult<PerformanceResult> {
        self.classify(measurement.current, measurement.temperature)
    }
}
