// Domain layer - Assessment data model and invariants
pub mod degradation;
pub mod error;
pub mod history;
pub mod ladder;
pub mod measurement;

pub use degradation::{collect_series, DegradationPattern, DegradationSample, PatternResult, YearMonth};
pub use error::{AssessmentError, AssessmentResult};
pub use history::{Assessment, HistoryKind, HistoryRecord};
pub use measurement::{ChecklistCategory, Measurement, PerformanceResult, RiskAxis, RiskLevel};
