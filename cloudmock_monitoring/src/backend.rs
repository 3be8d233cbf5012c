use crate::alarm::{Alarm, AlarmRegistry, AlarmSpec, AlarmState};
use crate::dashboard::{Dashboard, DashboardRegistry};
use crate::metric::{Dimension, MetricDataEntry, MetricDatum, MetricProvider, MetricStore};
use crate::statistics::{self, Datapoint, Statistic};
use chrono::{DateTime, Utc};
use cloudmock_core::{Page, Paginator, Result};

/// One monitoring backend per account/region partition. Pure in-memory
/// test double: process restart loses everything.
#[derive(Default)]
pub struct MonitoringBackend {
    metrics: MetricStore,
    alarms: AlarmRegistry,
    dashboards: DashboardRegistry,
    paged_metrics: Paginator<MetricDatum>,
}

impl MonitoringBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // Metric data

    pub fn put_metric_data(&mut self, namespace: &str, entries: Vec<MetricDataEntry>) -> Result<()> {
        self.metrics.put(namespace, entries)
    }

    pub fn register_metric_provider(
        &mut self,
        namespace: impl Into<String>,
        provider: Box<dyn MetricProvider>,
    ) {
        self.metrics.register_provider(namespace, provider);
    }

    pub fn get_all_metrics(&self) -> Vec<MetricDatum> {
        self.metrics.get_all()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn get_metric_statistics(
        &self,
        namespace: &str,
        metric_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period_secs: i64,
        stats: &[Statistic],
    ) -> Vec<Datapoint> {
        statistics::compute(
            self.metrics.data(),
            namespace,
            metric_name,
            start,
            end,
            period_secs,
            stats,
        )
    }

    /// Token-based listing: a fresh call filters and paginates; a call with
    /// a token resumes (and consumes) a previous listing.
    pub fn list_metrics(
        &mut self,
        next_token: Option<&str>,
        namespace: Option<&str>,
        metric_name: Option<&str>,
        dimensions: &[Dimension],
    ) -> Result<Page<MetricDatum>> {
        match next_token {
            Some(token) => self.paged_metrics.resume(token),
            None => {
                let metrics = self.metrics.filter(namespace, metric_name, dimensions);
                Ok(self.paged_metrics.paginate(metrics))
            }
        }
    }

    // Alarms

    pub fn put_metric_alarm(&mut self, spec: AlarmSpec) -> &Alarm {
        self.alarms.put(spec)
    }

    pub fn get_all_alarms(&self) -> &[Alarm] {
        self.alarms.all()
    }

    pub fn get_alarms_by_action_prefix(&self, prefix: &str) -> Vec<&Alarm> {
        self.alarms.by_action_prefix(prefix)
    }

    pub fn get_alarms_by_name_prefix(&self, prefix: &str) -> Vec<&Alarm> {
        self.alarms.by_name_prefix(prefix)
    }

    pub fn get_alarms_by_names(&self, names: &[String]) -> Vec<&Alarm> {
        self.alarms.by_names(names)
    }

    pub fn get_alarms_by_state(&self, state: AlarmState) -> Vec<&Alarm> {
        self.alarms.by_state(state)
    }

    pub fn delete_alarms(&mut self, names: &[String]) {
        self.alarms.delete(names);
    }

    pub fn set_alarm_state(
        &mut self,
        name: &str,
        reason: &str,
        reason_data: Option<&str>,
        state_value: &str,
    ) -> Result<()> {
        self.alarms.set_state(name, reason, reason_data, state_value)
    }

    // Dashboards

    pub fn put_dashboard(&mut self, name: &str, body: impl Into<String>) {
        self.dashboards.put(name, body);
    }

    pub fn get_dashboard(&self, name: &str) -> Option<&Dashboard> {
        self.dashboards.get(name)
    }

    pub fn list_dashboards<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Dashboard> {
        self.dashboards.list(prefix)
    }

    pub fn delete_dashboards(&mut self, names: &[String]) -> Result<()> {
        self.dashboards.delete(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudmock_core::PartitionMap;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("cloudmock_monitoring=debug")
            .with_test_writer()
            .try_init();
    }

    fn entries(count: usize) -> Vec<MetricDataEntry> {
        (0..count)
            .map(|i| MetricDataEntry {
                metric_name: format!("metric-{}", i),
                value: Some(i as f64),
                timestamp: None,
                dimensions: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_list_metrics_paginates() {
        init_tracing();
        let mut backend = MonitoringBackend::new();
        backend.put_metric_data("EC2", entries(1200)).unwrap();

        let first = backend.list_metrics(None, None, None, &[]).unwrap();
        assert_eq!(first.items.len(), 500);
        let token1 = first.next_token.expect("more than one page");

        let second = backend.list_metrics(Some(&token1), None, None, &[]).unwrap();
        assert_eq!(second.items.len(), 500);
        let token2 = second.next_token.expect("one page left");

        let third = backend.list_metrics(Some(&token2), None, None, &[]).unwrap();
        assert_eq!(third.items.len(), 200);
        assert!(third.next_token.is_none());

        let replay = backend.list_metrics(Some(&token2), None, None, &[]);
        assert_eq!(replay.unwrap_err().error_code(), "PaginationException");
    }

    #[test]
    fn test_list_metrics_applies_filters() {
        let mut backend = MonitoringBackend::new();
        backend
            .put_metric_data(
                "EC2",
                vec![
                    MetricDataEntry {
                        metric_name: "CPUUtilization".to_string(),
                        value: Some(1.0),
                        timestamp: None,
                        dimensions: vec![Dimension::new("InstanceId", "i-1")],
                    },
                    MetricDataEntry {
                        metric_name: "NetworkIn".to_string(),
                        value: Some(2.0),
                        timestamp: None,
                        dimensions: Vec::new(),
                    },
                ],
            )
            .unwrap();
        backend.put_metric_data("S3", entries(1)).unwrap();

        let page = backend.list_metrics(None, Some("EC2"), None, &[]).unwrap();
        assert_eq!(page.items.len(), 2);

        let page = backend
            .list_metrics(None, Some("EC2"), Some("CPUUtilization"), &[])
            .unwrap();
        assert_eq!(page.items.len(), 1);

        let page = backend
            .list_metrics(None, None, None, &[Dimension::new("InstanceId", "i-1")])
            .unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_statistics_through_backend() {
        use chrono::TimeZone;

        let mut backend = MonitoringBackend::new();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points = [0, 30, 70, 130]
            .iter()
            .map(|secs| MetricDataEntry {
                metric_name: "M".to_string(),
                value: Some(1.0),
                timestamp: Some(crate::metric::Timestamp::Instant(
                    base + chrono::Duration::seconds(*secs),
                )),
                dimensions: Vec::new(),
            })
            .collect();
        backend.put_metric_data("N", points).unwrap();

        let data = backend.get_metric_statistics(
            "N",
            "M",
            base,
            base + chrono::Duration::seconds(200),
            60,
            &[Statistic::SampleCount, Statistic::Sum],
        );

        assert_eq!(data.len(), 3);
        assert_eq!(data[0].sample_count, Some(2.0));
        assert_eq!(data[1].sum, Some(1.0));
        assert_eq!(data[2].sum, Some(1.0));
    }

    #[test]
    fn test_partitioned_backends_do_not_share_state() {
        let partitions: PartitionMap<MonitoringBackend> =
            PartitionMap::new(["us-east-1", "eu-west-1"]);

        partitions
            .get("us-east-1")
            .unwrap()
            .lock()
            .unwrap()
            .put_dashboard("fleet", "{}");

        assert!(partitions
            .get("us-east-1")
            .unwrap()
            .lock()
            .unwrap()
            .get_dashboard("fleet")
            .is_some());
        assert!(partitions
            .get("eu-west-1")
            .unwrap()
            .lock()
            .unwrap()
            .get_dashboard("fleet")
            .is_none());
    }
}
