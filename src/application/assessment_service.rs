// Assessment service - Use cases for scoring readings and classifying resistance series
use crate::application::degradation_pattern::DegradationPatternClassifier;
use crate::application::history_store::HistoryStore;
use crate::application::stress_risk::StressRiskClassifier;
use crate::domain::degradation::DegradationSample;
use crate::domain::error::{AssessmentError, AssessmentResult};
use crate::domain::history::{Assessment, HistoryKind, HistoryRecord};
use crate::domain::measurement::Measurement;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct AssessmentService {
    stress_classifier: StressRiskClassifier,
    pattern_classifier: DegradationPatternClassifier,
    history: Arc<HistoryStore>,
}

impl AssessmentService {
    pub fn new(history: Arc<HistoryStore>) -> Self {
        Self::with_classifiers(
            StressRiskClassifier::default(),
            DegradationPatternClassifier::new(),
            history,
        )
    }

    pub fn with_classifiers(
        stress_classifier: StressRiskClassifier,
        pattern_classifier: DegradationPatternClassifier,
        history: Arc<HistoryStore>,
    ) -> Self {
        Self {
            stress_classifier,
            pattern_classifier,
            history,
        }
    }

    pub fn history_store(&self) -> &HistoryStore {
        &self.history
    }

    /// Score a reading and record it in the performance history.
    pub async fn assess_performance(&self, measurement: Measurement) -> AssessmentResult<HistoryRecord> {
        self.assess_performance_at(measurement, Utc::now()).await
    }

    pub async fn assess_performance_at(
        &self,
        measurement: Measurement,
        created_at: DateTime<Utc>,
    ) -> AssessmentResult<HistoryRecord> {
        let result = self.stress_classifier.classify_measurement(&measurement)?;
        tracing::info!(
            current = measurement.current,
            temperature = measurement.temperature,
            "Performance assessed: ΔI={:.3} {} ΔT={:.3} {} R={:.3} {}",
            result.delta_i,
            result.risk_i,
            result.delta_t,
            result.risk_t,
            result.sensitivity,
            result.risk_r
        );

        let record = HistoryRecord::new(
            created_at,
            Assessment::Performance {
                inputs: measurement,
                result,
            },
        );
        self.history.append(record.clone()).await?;
        Ok(record)
    }

    /// Classify a resistance series and record it in the degradation history.
    pub async fn assess_degradation(&self, series: Vec<DegradationSample>) -> AssessmentResult<HistoryRecord> {
        self.assess_degradation_at(series, Utc::now()).await
    }

    pub async fn assess_degradation_at(
        &self,
        mut series: Vec<DegradationSample>,
        created_at: DateTime<Utc>,
    ) -> AssessmentResult<HistoryRecord> {
        if series.is_empty() {
            return Err(AssessmentError::EmptySeries);
        }
        // Persist the inputs in the same chronological order the statistics use
        series.sort_by_key(|sample| sample.date);

        let result = self.pattern_classifier.classify(&series)?;
        tracing::info!(
            samples = series.len(),
            "Degradation pattern {}: decrease {:.2}%, volatility {:.2}%",
            result.pattern,
            result.decrease_rate,
            result.volatility
        );

        let record = HistoryRecord::new(
            created_at,
            Assessment::Degradation {
                inputs: series,
                result,
            },
        );
        self.history.append(record.clone()).await?;
        Ok(record)
    }

    pub async fn history(&self, kind: HistoryKind) -> AssessmentResult<Vec<HistoryRecord>> {
        self.history.list(kind).await
    }

    pub async fn all_history(&self) -> AssessmentResult<Vec<HistoryRecord>> {
        self.history.list_all().await
    }

    pub async fn record(&self, id: i64, kind: HistoryKind) -> AssessmentResult<HistoryRecord> {
        self.history.get(id, kind).await
    }

    /// Delete one record. Returns `false` when no record had that id.
    pub async fn delete_record(&self, id: i64, kind: HistoryKind) -> AssessmentResult<bool> {
        match self.history.remove(id, kind).await {
            Ok(_) => Ok(true),
            Err(AssessmentError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn clear_history(&self, kind: HistoryKind) -> AssessmentResult<()> {
        self.history.clear(kind).await
    }
}
