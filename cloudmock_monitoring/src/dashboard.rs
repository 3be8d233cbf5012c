use chrono::{DateTime, Utc};
use cloudmock_core::{arn, time, BackendError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub name: String,
    /// Opaque JSON document; the backend never interprets it.
    pub body: String,
    pub arn: String,
    pub last_modified: DateTime<Utc>,
}

impl Dashboard {
    fn new(account_id: &str, name: &str, body: String) -> Self {
        Self {
            arn: arn::dashboard_arn(account_id, name),
            name: name.to_string(),
            body,
            last_modified: Utc::now(),
        }
    }

    pub fn last_modified_iso(&self) -> String {
        time::iso_8601_without_subseconds(self.last_modified)
    }

    pub fn size(&self) -> usize {
        self.body.len()
    }
}

/// Dashboards keyed by name, iterated in insertion order.
#[derive(Debug)]
pub struct DashboardRegistry {
    account_id: String,
    dashboards: Vec<Dashboard>,
}

impl Default for DashboardRegistry {
    fn default() -> Self {
        Self::with_account(arn::DEFAULT_ACCOUNT_ID)
    }
}

impl DashboardRegistry {
    pub fn with_account(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            dashboards: Vec::new(),
        }
    }

    /// Upsert by name; replaces the body and resets `last_modified`.
    pub fn put(&mut self, name: &str, body: impl Into<String>) {
        info!(dashboard = name, "putting dashboard");
        let dashboard = Dashboard::new(&self.account_id, name, body.into());
        match self.dashboards.iter().position(|d| d.name == name) {
            Some(idx) => self.dashboards[idx] = dashboard,
            None => self.dashboards.push(dashboard),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Dashboard> {
        self.dashboards.iter().find(|d| d.name == name)
    }

    pub fn list<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Dashboard> {
        self.dashboards.iter().filter(move |d| d.name.starts_with(prefix))
    }

    /// All-or-nothing delete: when any requested name is missing, nothing
    /// is deleted and the error reports every missing name.
    pub fn delete(&mut self, names: &[String]) -> Result<()> {
        let missing: Vec<&str> = names
            .iter()
            .filter(|name| self.get(name).is_none())
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(BackendError::NotFound(format!(
                "The specified dashboard does not exist. [{}]",
                missing.join(", ")
            )));
        }

        info!(count = names.len(), "deleting dashboards");
        self.dashboards.retain(|d| !names.contains(&d.name));
        Ok(())
    }
}
