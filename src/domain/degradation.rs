// Insulation-resistance time series and degradation patterns
use super::error::{parse_number, AssessmentError, AssessmentResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar month of a measurement, the authoritative ordering key of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> AssessmentResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| AssessmentError::invalid("date", format!("{}-{:02} is not a calendar month", year, month)))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

/// Exactly four year digits, a dash and two month digits.
fn has_year_month_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 7
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 { *b == b'-' } else { b.is_ascii_digit() })
}

/// Parses strict `YYYY-MM`; one-digit months and five-digit years are rejected.
impl FromStr for YearMonth {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !has_year_month_shape(trimmed) {
            return Err(AssessmentError::invalid(
                "date",
                format!("'{}' is not in YYYY-MM form", trimmed),
            ));
        }
        let date = NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
            .map_err(|_| AssessmentError::invalid("date", format!("'{}' is not in YYYY-MM form", trimmed)))?;
        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }
}

impl TryFrom<String> for YearMonth {
    type Error = AssessmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One insulation-resistance reading (MΩ) taken in a given month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegradationSample {
    pub date: YearMonth,
    pub resistance: f64,
}

impl DegradationSample {
    pub fn new(date: YearMonth, resistance: f64) -> AssessmentResult<Self> {
        if !resistance.is_finite() || resistance < 0.0 {
            return Err(AssessmentError::invalid(
                "resistance",
                format!("must be a non-negative number, got {}", resistance),
            ));
        }
        Ok(Self { date, resistance })
    }

    pub fn parse(date: &str, resistance: &str) -> AssessmentResult<Self> {
        Self::new(date.parse()?, parse_number("resistance", resistance)?)
    }
}

/// Collect a series from parallel `(date, resistance)` form rows.
///
/// Rows where both fields are blank are skipped; a half-filled row is an error.
pub fn collect_series<D, R>(rows: &[(D, R)]) -> AssessmentResult<Vec<DegradationSample>>
where
    D: AsRef<str>,
    R: AsRef<str>,
{
    let series = rows
        .iter()
        .filter(|(date, resistance)| !(date.as_ref().trim().is_empty() && resistance.as_ref().trim().is_empty()))
        .map(|(date, resistance)| DegradationSample::parse(date.as_ref(), resistance.as_ref()))
        .collect::<AssessmentResult<Vec<_>>>()?;

    if series.is_empty() {
        return Err(AssessmentError::EmptySeries);
    }
    Ok(series)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegradationPattern {
    Critical,
    Accelerated,
    Gradual,
    Localized,
    Stable,
}

impl DegradationPattern {
    pub fn name(&self) -> &'static str {
        match self {
            DegradationPattern::Critical => "Critical",
            DegradationPattern::Accelerated => "Accelerated",
            DegradationPattern::Gradual => "Gradual",
            DegradationPattern::Localized => "Localized",
            DegradationPattern::Stable => "Stable",
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            DegradationPattern::Critical => "Critical degradation (Failure)",
            DegradationPattern::Accelerated => "Progressive degradation (Propagation)",
            DegradationPattern::Gradual => "Early degradation (Initiation)",
            DegradationPattern::Localized => "Anomalous degradation (Anomaly)",
            DegradationPattern::Stable => "Sound condition (Healthy)",
        }
    }

    pub fn management(&self) -> &'static str {
        match self {
            DegradationPattern::Critical => "Stop operation, run a detailed inspection and replace the wiring",
            DegradationPattern::Accelerated => "Shorten the inspection interval (quarterly inspection)",
            DegradationPattern::Gradual => "Monitor the yearly trend (semi-annual inspection)",
            DegradationPattern::Localized => {
                "Monitor the yearly trend (semi-annual inspection); shorten to quarterly below 300 MΩ"
            }
            DegradationPattern::Stable => "Confirm normal insulation (annual inspection)",
        }
    }

    /// Typical plant equipment observed with this pattern.
    pub fn equipment_example(&self) -> &'static str {
        match self {
            DegradationPattern::Critical => "Concentration tank #3",
            DegradationPattern::Accelerated => "Concentration tank #2",
            DegradationPattern::Gradual => "Concentration tanks #1 and #4",
            DegradationPattern::Localized => "Concentration tank #5",
            DegradationPattern::Stable => "Pumps (CIP, transfer, vacuum, circulation, cooling)",
        }
    }
}

impl fmt::Display for DegradationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification of a resistance series together with every statistic it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternResult {
    pub pattern: DegradationPattern,
    pub stage: String,
    pub management: String,
    pub characteristics: String,
    pub decrease_rate: f64,
    pub volatility: f64,
    pub below_threshold: bool,
    pub first_value: f64,
    pub last_value: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub temporary_drops: usize,
}
