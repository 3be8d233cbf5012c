use chrono::{DateTime, Utc};
use cloudmock_core::time;
use cloudmock_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A metric tag narrowing a metric's identity. Two dimensions are equal
/// only when both name and value match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single stored metric sample. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDatum {
    pub namespace: String,
    pub name: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub dimensions: Vec<Dimension>,
}

impl MetricDatum {
    /// A point passes when every supplied criterion matches; absent criteria
    /// impose no constraint. The dimension criterion holds iff every requested
    /// dimension is present among the point's dimensions.
    pub fn matches(
        &self,
        namespace: Option<&str>,
        name: Option<&str>,
        dimensions: &[Dimension],
    ) -> bool {
        if let Some(ns) = namespace {
            if ns != self.namespace {
                return false;
            }
        }
        if let Some(n) = name {
            if n != self.name {
                return false;
            }
        }
        dimensions.iter().all(|d| self.dimensions.contains(d))
    }
}

/// Timestamp of an incoming data point: either an instant the decoding
/// layer already parsed, or the raw ISO-8601 text it received.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Instant(DateTime<Utc>),
    Iso(String),
}

impl Timestamp {
    fn resolve(&self) -> Result<DateTime<Utc>> {
        match self {
            Timestamp::Instant(ts) => Ok(*ts),
            Timestamp::Iso(raw) => time::parse_timestamp(raw),
        }
    }
}

/// One member of a put-metric-data request. Value defaults to 0 and
/// timestamp to the ingestion instant when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDataEntry {
    pub metric_name: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

/// Produces synthetic metrics for one namespace on demand, the way managed
/// services publish metrics without an explicit put. Registered per
/// namespace on the store; implementations live outside this crate.
pub trait MetricProvider: Send + Sync {
    fn metrics(&self) -> Vec<MetricDatum>;
}

/// Append-only collection of metric data points, plus the registry of
/// namespace providers whose points are synthesized at read time.
#[derive(Default)]
pub struct MetricStore {
    data: Vec<MetricDatum>,
    providers: HashMap<String, Box<dyn MetricProvider>>,
}

impl MetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the batch. All timestamps are resolved before anything is
    /// stored, so a malformed entry leaves the store untouched.
    pub fn put(&mut self, namespace: &str, entries: Vec<MetricDataEntry>) -> Result<()> {
        let mut incoming = Vec::with_capacity(entries.len());
        for entry in entries {
            let timestamp = match &entry.timestamp {
                Some(ts) => ts.resolve()?,
                None => Utc::now(),
            };
            incoming.push(MetricDatum {
                namespace: namespace.to_string(),
                name: entry.metric_name,
                value: entry.value.unwrap_or(0.0),
                timestamp,
                dimensions: entry.dimensions,
            });
        }
        debug!(namespace, points = incoming.len(), "ingested metric data");
        self.data.extend(incoming);
        Ok(())
    }

    /// Stored points only, in ingestion order. The statistics engine reads
    /// these; provider-synthesized points are listing-only.
    pub fn data(&self) -> &[MetricDatum] {
        &self.data
    }

    pub fn register_provider(
        &mut self,
        namespace: impl Into<String>,
        provider: Box<dyn MetricProvider>,
    ) {
        self.providers.insert(namespace.into(), provider);
    }

    /// Stored points concatenated with points synthesized by the
    /// registered providers.
    pub fn get_all(&self) -> Vec<MetricDatum> {
        let mut all = self.data.clone();
        for provider in self.providers.values() {
            all.extend(provider.metrics());
        }
        all
    }

    pub fn filter(
        &self,
        namespace: Option<&str>,
        name: Option<&str>,
        dimensions: &[Dimension],
    ) -> Vec<MetricDatum> {
        self.get_all()
            .into_iter()
            .filter(|md| md.matches(namespace, name, dimensions))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(name: &str, value: f64) -> MetricDataEntry {
        MetricDataEntry {
            metric_name: name.to_string(),
            value: Some(value),
            timestamp: None,
            dimensions: Vec::new(),
        }
    }

    #[test]
    fn test_put_defaults() {
        let mut store = MetricStore::new();
        store
            .put(
                "EC2",
                vec![MetricDataEntry {
                    metric_name: "CPUUtilization".to_string(),
                    value: None,
                    timestamp: None,
                    dimensions: Vec::new(),
                }],
            )
            .unwrap();

        let data = store.data();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].value, 0.0);
        assert!(Utc::now() - data[0].timestamp < chrono::Duration::seconds(5));
    }

    #[test]
    fn test_put_parses_iso_timestamp() {
        let mut store = MetricStore::new();
        store
            .put(
                "EC2",
                vec![MetricDataEntry {
                    metric_name: "CPUUtilization".to_string(),
                    value: Some(42.0),
                    timestamp: Some(Timestamp::Iso("2024-01-01T00:00:30Z".to_string())),
                    dimensions: Vec::new(),
                }],
            )
            .unwrap();

        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 30).unwrap();
        assert_eq!(store.data()[0].timestamp, expected);
    }

    #[test]
    fn test_bad_timestamp_leaves_store_untouched() {
        let mut store = MetricStore::new();
        let batch = vec![
            entry("ok", 1.0),
            MetricDataEntry {
                metric_name: "broken".to_string(),
                value: Some(1.0),
                timestamp: Some(Timestamp::Iso("not-a-time".to_string())),
                dimensions: Vec::new(),
            },
        ];

        let err = store.put("EC2", batch).unwrap_err();
        assert_eq!(err.error_code(), "InvalidParameterValue");
        assert!(store.data().is_empty());
    }

    #[test]
    fn test_dimension_filter_is_subset_match() {
        let datum = MetricDatum {
            namespace: "EC2".to_string(),
            name: "CPUUtilization".to_string(),
            value: 1.0,
            timestamp: Utc::now(),
            dimensions: vec![
                Dimension::new("InstanceId", "i-1234"),
                Dimension::new("AutoScalingGroupName", "web"),
            ],
        };

        assert!(datum.matches(None, None, &[]));
        assert!(datum.matches(
            Some("EC2"),
            Some("CPUUtilization"),
            &[Dimension::new("InstanceId", "i-1234")]
        ));
        // Requested dimension absent from the point.
        assert!(!datum.matches(None, None, &[Dimension::new("InstanceId", "i-9999")]));
        // Value must match exactly, not just the name.
        assert!(!datum.matches(None, None, &[Dimension::new("AutoScalingGroupName", "api")]));
        assert!(!datum.matches(Some("S3"), None, &[]));
    }

    struct FixedProvider;

    impl MetricProvider for FixedProvider {
        fn metrics(&self) -> Vec<MetricDatum> {
            vec![MetricDatum {
                namespace: "S3".to_string(),
                name: "BucketSizeBytes".to_string(),
                value: 1024.0,
                timestamp: Utc::now(),
                dimensions: Vec::new(),
            }]
        }
    }

    #[test]
    fn test_get_all_merges_provider_metrics() {
        let mut store = MetricStore::new();
        store.put("EC2", vec![entry("CPUUtilization", 1.0)]).unwrap();
        store.register_provider("S3", Box::new(FixedProvider));

        let all = store.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(store.filter(Some("S3"), None, &[]).len(), 1);
        // The statistics view sees stored points only.
        assert_eq!(store.data().len(), 1);
    }
}
