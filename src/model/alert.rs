use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Alert raised against a host or one of its databases
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(default)]
    pub alert_category: String,
    #[serde(default)]
    pub alert_affected_technology: Option<String>,
    #[serde(default)]
    pub alert_code: String,
    #[serde(default)]
    pub alert_severity: String,
    pub alert_status: AlertStatus,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub other_info: HashMap<String, serde_json::Value>,
}

impl Alert {
    /// Hostname recorded in the alert's extra info, if any
    pub fn hostname(&self) -> Option<&str> {
        self.other_info.get("hostname").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AlertStatus {
    #[serde(rename = "NEW")]
    New,
    #[serde(rename = "ACK")]
    Ack,
    #[serde(rename = "DISMISSED")]
    Dismissed,
}
