use crate::metric::MetricDatum;
use chrono::{DateTime, Duration, Utc};
use cloudmock_core::error::BackendError;
use cloudmock_core::time;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Aggregate statistics the engine can compute per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    SampleCount,
    Sum,
    Minimum,
    Maximum,
    Average,
}

impl FromStr for Statistic {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SampleCount" => Ok(Self::SampleCount),
            "Sum" => Ok(Self::Sum),
            "Minimum" => Ok(Self::Minimum),
            "Maximum" => Ok(Self::Maximum),
            "Average" => Ok(Self::Average),
            other => Err(BackendError::InvalidParameter(format!(
                "Statistic {} is not supported",
                other
            ))),
        }
    }
}

/// Aggregates for one non-empty window. Statistics that were not requested
/// report as `None`, never as zero. Unit is always absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    /// Window start, formatted without sub-second precision.
    pub timestamp: String,
    pub sample_count: Option<f64>,
    pub sum: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub average: Option<f64>,
    pub unit: Option<String>,
}

impl Datapoint {
    fn from_window(window_start: DateTime<Utc>, values: &[f64], stats: &[Statistic]) -> Self {
        let sum: f64 = values.iter().sum();
        Self {
            timestamp: time::iso_8601_without_subseconds(window_start),
            sample_count: stats
                .contains(&Statistic::SampleCount)
                .then(|| values.len() as f64),
            sum: stats.contains(&Statistic::Sum).then_some(sum),
            minimum: stats
                .contains(&Statistic::Minimum)
                .then(|| values.iter().copied().fold(f64::INFINITY, f64::min)),
            maximum: stats
                .contains(&Statistic::Maximum)
                .then(|| values.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            average: stats
                .contains(&Statistic::Average)
                .then(|| sum / values.len() as f64),
            unit: None,
        }
    }
}

/// Buckets the points matching namespace+name within `[start, end]`
/// (inclusive both ends) into consecutive half-open windows of
/// `period_secs` width, starting at the earliest matching timestamp.
/// Windows with no assigned points are omitted; output is chronological.
///
/// `period_secs` must be positive; that is the caller's contract.
pub fn compute(
    points: &[MetricDatum],
    namespace: &str,
    metric_name: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    period_secs: i64,
    stats: &[Statistic],
) -> Vec<Datapoint> {
    debug_assert!(period_secs > 0, "period must be positive");
    let period = Duration::seconds(period_secs);

    let mut filtered: Vec<&MetricDatum> = points
        .iter()
        .filter(|md| {
            md.namespace == namespace
                && md.name == metric_name
                && start <= md.timestamp
                && md.timestamp <= end
        })
        .collect();
    filtered.sort_by_key(|md| md.timestamp);

    if filtered.is_empty() {
        return Vec::new();
    }

    let mut window_start = filtered[0].timestamp;
    let range_end = filtered[filtered.len() - 1].timestamp + period;

    let mut idx = 0;
    let mut data = Vec::new();
    while window_start < range_end {
        let window_end = window_start + period;
        let mut values = Vec::new();
        while idx < filtered.len() && filtered[idx].timestamp < window_end {
            values.push(filtered[idx].value);
            idx += 1;
        }
        if !values.is_empty() {
            data.push(Datapoint::from_window(window_start, &values, stats));
        }
        window_start = window_end;
    }

    data
}
