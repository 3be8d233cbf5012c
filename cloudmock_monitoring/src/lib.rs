pub mod alarm;
pub mod backend;
pub mod dashboard;
pub mod metric;
pub mod statistics;

pub use alarm::{Alarm, AlarmHistoryItem, AlarmRegistry, AlarmSpec, AlarmState};
pub use backend::MonitoringBackend;
pub use dashboard::{Dashboard, DashboardRegistry};
pub use metric::{Dimension, MetricDataEntry, MetricDatum, MetricProvider, MetricStore, Timestamp};
pub use statistics::{Datapoint, Statistic};
