// Chart series preparation for the external renderer
use crate::domain::degradation::DegradationSample;
use crate::domain::history::HistoryRecord;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrentTemperaturePoint {
    pub current: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyResistance {
    pub year: i32,
    pub mean_resistance: f64,
    pub samples: usize,
}

/// Current/temperature pairs of all performance records, ordered by current.
pub fn current_temperature_points(records: &[HistoryRecord]) -> Vec<CurrentTemperaturePoint> {
    let mut points: Vec<CurrentTemperaturePoint> = records
        .iter()
        .filter_map(|record| record.performance())
        .map(|(inputs, _)| CurrentTemperaturePoint {
            current: inputs.current,
            temperature: inputs.temperature,
        })
        .collect();
    points.sort_by(|a, b| a.current.total_cmp(&b.current));
    points
}

/// Mean resistance per calendar year, ascending by year.
pub fn yearly_resistance_averages(series: &[DegradationSample]) -> Vec<YearlyResistance> {
    let mut buckets: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for sample in series {
        let bucket = buckets.entry(sample.date.year()).or_insert((0.0, 0));
        bucket.0 += sample.resistance;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(year, (sum, samples))| YearlyResistance {
            year,
            mean_resistance: sum / samples as f64,
            samples,
        })
        .collect()
}
