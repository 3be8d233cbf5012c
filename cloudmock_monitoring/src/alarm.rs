use crate::metric::Dimension;
use chrono::{DateTime, Utc};
use cloudmock_core::{BackendError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmState {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ALARM")]
    Alarm,
    #[serde(rename = "INSUFFICIENT_DATA")]
    InsufficientData,
}

impl AlarmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Alarm => "ALARM",
            Self::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl FromStr for AlarmState {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "OK" => Ok(Self::Ok),
            "ALARM" => Ok(Self::Alarm),
            "INSUFFICIENT_DATA" => Ok(Self::InsufficientData),
            _ => Err(BackendError::InvalidParameter(
                "StateValue is not one of OK | ALARM | INSUFFICIENT_DATA".to_string(),
            )),
        }
    }
}

/// One entry in an alarm's history. The variant tag tells the consumer
/// what the payload means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AlarmHistoryItem {
    StateUpdate {
        reason: String,
        reason_data: String,
        state: AlarmState,
        timestamp: DateTime<Utc>,
    },
    ConfigurationUpdate {
        timestamp: DateTime<Utc>,
    },
    Action {
        summary: String,
        timestamp: DateTime<Utc>,
    },
}

/// Everything a put-metric-alarm call carries. Kept separate from `Alarm`
/// so an upsert always rebuilds state and history from scratch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmSpec {
    pub name: String,
    pub namespace: String,
    pub metric_name: String,
    pub comparison_operator: String,
    pub evaluation_periods: u32,
    pub period: u32,
    pub threshold: f64,
    pub statistic: String,
    pub description: Option<String>,
    pub dimensions: Vec<Dimension>,
    pub actions_enabled: bool,
    pub alarm_actions: Vec<String>,
    pub ok_actions: Vec<String>,
    pub insufficient_data_actions: Vec<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    pub name: String,
    pub namespace: String,
    pub metric_name: String,
    pub comparison_operator: String,
    pub evaluation_periods: u32,
    pub period: u32,
    pub threshold: f64,
    pub statistic: String,
    pub description: Option<String>,
    pub dimensions: Vec<Dimension>,
    pub actions_enabled: bool,
    pub alarm_actions: Vec<String>,
    pub ok_actions: Vec<String>,
    pub insufficient_data_actions: Vec<String>,
    pub unit: Option<String>,
    pub configuration_updated_timestamp: DateTime<Utc>,
    pub state_value: AlarmState,
    pub state_reason: String,
    pub state_reason_data: String,
    pub state_updated_timestamp: DateTime<Utc>,
    pub history: Vec<AlarmHistoryItem>,
}

impl Alarm {
    fn new(spec: AlarmSpec) -> Self {
        let now = Utc::now();
        Self {
            name: spec.name,
            namespace: spec.namespace,
            metric_name: spec.metric_name,
            comparison_operator: spec.comparison_operator,
            evaluation_periods: spec.evaluation_periods,
            period: spec.period,
            threshold: spec.threshold,
            statistic: spec.statistic,
            description: spec.description,
            dimensions: spec.dimensions,
            actions_enabled: spec.actions_enabled,
            alarm_actions: spec.alarm_actions,
            ok_actions: spec.ok_actions,
            insufficient_data_actions: spec.insufficient_data_actions,
            unit: spec.unit,
            configuration_updated_timestamp: now,
            state_value: AlarmState::Ok,
            state_reason: String::new(),
            state_reason_data: "{}".to_string(),
            state_updated_timestamp: now,
            history: Vec::new(),
        }
    }

    /// The previous state is recorded in history before the new one takes
    /// effect.
    fn update_state(&mut self, reason: &str, reason_data: &str, state: AlarmState) {
        self.history.push(AlarmHistoryItem::StateUpdate {
            reason: self.state_reason.clone(),
            reason_data: self.state_reason_data.clone(),
            state: self.state_value,
            timestamp: self.state_updated_timestamp,
        });

        self.state_reason = reason.to_string();
        self.state_reason_data = reason_data.to_string();
        self.state_value = state;
        self.state_updated_timestamp = Utc::now();
    }
}

/// Alarms keyed by case-sensitive name, iterated in insertion order.
/// Upserting an existing name replaces it in place.
#[derive(Debug, Default)]
pub struct AlarmRegistry {
    alarms: Vec<Alarm>,
}

impl AlarmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full upsert: any prior alarm of the same name is replaced entirely,
    /// history included, and state resets to OK.
    pub fn put(&mut self, spec: AlarmSpec) -> &Alarm {
        info!(alarm = %spec.name, "putting metric alarm");
        let alarm = Alarm::new(spec);
        let idx = match self.alarms.iter().position(|a| a.name == alarm.name) {
            Some(idx) => {
                self.alarms[idx] = alarm;
                idx
            }
            None => {
                self.alarms.push(alarm);
                self.alarms.len() - 1
            }
        };
        &self.alarms[idx]
    }

    pub fn all(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn by_action_prefix(&self, prefix: &str) -> Vec<&Alarm> {
        self.alarms
            .iter()
            .filter(|a| a.alarm_actions.iter().any(|action| action.starts_with(prefix)))
            .collect()
    }

    pub fn by_name_prefix(&self, prefix: &str) -> Vec<&Alarm> {
        self.alarms
            .iter()
            .filter(|a| a.name.starts_with(prefix))
            .collect()
    }

    pub fn by_names(&self, names: &[String]) -> Vec<&Alarm> {
        self.alarms
            .iter()
            .filter(|a| names.contains(&a.name))
            .collect()
    }

    pub fn by_state(&self, state: AlarmState) -> Vec<&Alarm> {
        self.alarms
            .iter()
            .filter(|a| a.state_value == state)
            .collect()
    }

    /// Names not present are ignored; deleting is idempotent.
    pub fn delete(&mut self, names: &[String]) {
        self.alarms.retain(|a| !names.contains(&a.name));
    }

    /// Transitions an alarm's state, recording the previous state in
    /// history. Validation happens before any mutation.
    pub fn set_state(
        &mut self,
        name: &str,
        reason: &str,
        reason_data: Option<&str>,
        state_value: &str,
    ) -> Result<()> {
        let alarm = self
            .alarms
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| BackendError::NotFound(format!("Alarm {} not found", name)))?;

        if let Some(raw) = reason_data {
            serde_json::from_str::<serde_json::Value>(raw).map_err(|_| {
                BackendError::InvalidFormat("StateReasonData is invalid JSON".to_string())
            })?;
        }

        let state = state_value.parse::<AlarmState>()?;

        info!(alarm = name, state = state.as_str(), "setting alarm state");
        alarm.update_state(reason, reason_data.unwrap_or("{}"), state);
        Ok(())
    }
}
