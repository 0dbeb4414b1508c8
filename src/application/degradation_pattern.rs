// Degradation pattern classifier - Feature extraction and ordered pattern rules over a resistance series
use crate::domain::degradation::{DegradationPattern, DegradationSample, PatternResult};
use crate::domain::error::{AssessmentError, AssessmentResult};
use crate::domain::ladder::{first_match, Rule};

/// Insulation resistance (MΩ) below which the insulation is considered failed.
pub const FAILURE_RESISTANCE: f64 = 1.0;
/// Overall drop (%) that is critical regardless of the last reading.
pub const CRITICAL_DECREASE_RATE: f64 = 90.0;
/// Mid threshold (MΩ); readings below it count as below threshold.
pub const ACCELERATED_RESISTANCE: f64 = 100.0;
pub const ACCELERATED_DECREASE_RATE: f64 = 70.0;
pub const GRADUAL_DECREASE_MIN: f64 = 10.0;
pub const GRADUAL_DECREASE_MAX: f64 = 20.0;
pub const LOCALIZED_RESISTANCE: f64 = 300.0;
pub const LOCALIZED_MIN_DROPS: usize = 2;
pub const STABLE_RESISTANCE: f64 = 1000.0;
pub const STABLE_MAX_VOLATILITY: f64 = 1.0;
/// A single step counts as a temporary drop only when it loses less than this (%).
pub const TEMPORARY_DROP_MAX_PERCENT: f64 = 10.0;

/// Statistics of a chronologically ordered resistance series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStatistics {
    pub first_value: f64,
    pub last_value: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// Percentage drop from first to last reading; negative when resistance rose.
    pub decrease_rate: f64,
    /// Coefficient of variation in percent.
    pub volatility: f64,
    pub temporary_drops: usize,
}

impl SeriesStatistics {
    /// Derive statistics from resistances already in chronological order.
    pub fn from_chronological(values: &[f64]) -> AssessmentResult<Self> {
        let (first_value, last_value) = match (values.first(), values.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(AssessmentError::EmptySeries),
        };

        let n = values.len() as f64;
        let min_value = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Moments are taken over values scaled into [-1, 1] so the sums stay finite
        let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let scale = if scale > 0.0 { scale } else { 1.0 };
        let scaled_mean = values.iter().map(|v| v / scale).sum::<f64>() / n;
        let scaled_variance = values
            .iter()
            .map(|v| (v / scale - scaled_mean).powi(2))
            .sum::<f64>()
            / n;
        let scaled_std = scaled_variance.sqrt();
        let mean = scaled_mean * scale;
        let std_dev = scaled_std * scale;

        let decrease_rate = if first_value > 0.0 {
            (first_value - last_value) / first_value * 100.0
        } else {
            0.0
        };
        let volatility = if scaled_mean > 0.0 {
            scaled_std / scaled_mean * 100.0
        } else {
            0.0
        };

        let stats = Self {
            first_value,
            last_value,
            min_value,
            max_value,
            mean,
            std_dev,
            decrease_rate,
            volatility,
            temporary_drops: count_temporary_drops(values),
        };
        if !stats.is_finite() {
            return Err(AssessmentError::invalid(
                "resistance",
                "series statistics are outside the representable range",
            ));
        }
        Ok(stats)
    }

    pub fn below_threshold(&self) -> bool {
        self.last_value < ACCELERATED_RESISTANCE
    }

    fn is_finite(&self) -> bool {
        [
            self.first_value,
            self.last_value,
            self.min_value,
            self.max_value,
            self.mean,
            self.std_dev,
            self.decrease_rate,
            self.volatility,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Count interior points reached by a small drop and followed by a recovery.
fn count_temporary_drops(values: &[f64]) -> usize {
    values
        .windows(3)
        .filter(|w| {
            let (prev, cur, next) = (w[0], w[1], w[2]);
            if prev <= 0.0 {
                return false;
            }
            let drop = (prev - cur) / prev * 100.0;
            drop > 0.0 && drop < TEMPORARY_DROP_MAX_PERCENT && next > cur
        })
        .count()
}

/// Ladder outcomes. `MildDecline` is the catch-all and reports as Gradual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Critical,
    Accelerated,
    Gradual,
    Localized,
    Stable,
    MildDecline,
}

const PATTERN_LADDER: [Rule<SeriesStatistics, Branch>; 6] = [
    Rule::new(
        |s: &SeriesStatistics| s.last_value < FAILURE_RESISTANCE || s.decrease_rate >= CRITICAL_DECREASE_RATE,
        Branch::Critical,
    ),
    Rule::new(
        |s: &SeriesStatistics| s.last_value < ACCELERATED_RESISTANCE && s.decrease_rate >= ACCELERATED_DECREASE_RATE,
        Branch::Accelerated,
    ),
    Rule::new(
        |s: &SeriesStatistics| {
            (GRADUAL_DECREASE_MIN..=GRADUAL_DECREASE_MAX).contains(&s.decrease_rate) && s.temporary_drops == 0
        },
        Branch::Gradual,
    ),
    Rule::new(
        |s: &SeriesStatistics| s.last_value >= LOCALIZED_RESISTANCE && s.temporary_drops >= LOCALIZED_MIN_DROPS,
        Branch::Localized,
    ),
    Rule::new(
        |s: &SeriesStatistics| s.last_value >= STABLE_RESISTANCE && s.volatility <= STABLE_MAX_VOLATILITY,
        Branch::Stable,
    ),
    Rule::new(|_: &SeriesStatistics| true, Branch::MildDecline),
];

impl Branch {
    fn pattern(self) -> DegradationPattern {
        match self {
            Branch::Critical => DegradationPattern::Critical,
            Branch::Accelerated => DegradationPattern::Accelerated,
            Branch::Gradual | Branch::MildDecline => DegradationPattern::Gradual,
            Branch::Localized => DegradationPattern::Localized,
            Branch::Stable => DegradationPattern::Stable,
        }
    }

    fn characteristics(self, s: &SeriesStatistics) -> String {
        match self {
            Branch::Critical => format!(
                "Near-total loss of insulation: last reading {:.2} MΩ, {:.1}% drop over the window \
                 (failure below 1 MΩ or a drop of 90% or more)",
                s.last_value, s.decrease_rate
            ),
            Branch::Accelerated => format!(
                "Below 100 MΩ ({:.2} MΩ) with a steep {:.1}% drop over the window (70% or more)",
                s.last_value, s.decrease_rate
            ),
            Branch::Gradual => format!(
                "Gradual decline of {:.1}% over the window (10-20%), no temporary drops",
                s.decrease_rate
            ),
            Branch::Localized => format!(
                "300 MΩ or above ({:.2} MΩ) with {} temporary self-recovering drops under 10%",
                s.last_value, s.temporary_drops
            ),
            Branch::Stable => format!(
                "1,000 MΩ or above ({:.2} MΩ) with volatility of {:.2}% (within ±1%)",
                s.last_value, s.volatility
            ),
            Branch::MildDecline => format!(
                "Stable or mild decline: {:.1}% change over the window, volatility {:.2}%",
                s.decrease_rate, s.volatility
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DegradationPatternClassifier;

impl DegradationPatternClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a resistance series.
    ///
    /// Samples are ordered by calendar month before any statistic is computed; insertion order
    /// only breaks ties between samples of the same month.
    pub fn classify(&self, series: &[DegradationSample]) -> AssessmentResult<PatternResult> {
        let values = chronological_resistances(series);
        let stats = SeriesStatistics::from_chronological(&values)?;

        let branch = first_match(&PATTERN_LADDER, &stats)
            .copied()
            .unwrap_or(Branch::MildDecline);
        let pattern = branch.pattern();

        tracing::debug!(
            samples = values.len(),
            decrease_rate = stats.decrease_rate,
            volatility = stats.volatility,
            temporary_drops = stats.temporary_drops,
            "classified series as {}",
            pattern
        );

        Ok(PatternResult {
            pattern,
            stage: pattern.stage().to_string(),
            management: pattern.management().to_string(),
            characteristics: branch.characteristics(&stats),
            decrease_rate: stats.decrease_rate,
            volatility: stats.volatility,
            below_threshold: stats.below_threshold(),
            first_value: stats.first_value,
            last_value: stats.last_value,
            min_value: stats.min_value,
            max_value: stats.max_value,
            temporary_drops: stats.temporary_drops,
        })
    }
}

fn chronological_resistances(series: &[DegradationSample]) -> Vec<f64> {
    let mut sorted = series.to_vec();
    sorted.sort_by_key(|sample| sample.date);
    sorted.into_iter().map(|sample| sample.resistance).collect()
}
