use super::{AlertStatus, MAX_TIME, MIN_TIME};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Filters shared by every inventory query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalFilter {
    pub location: String,
    pub environment: String,
    pub older_than: DateTime<Utc>,
}

impl Default for GlobalFilter {
    fn default() -> Self {
        Self {
            location: String::new(),
            environment: String::new(),
            older_than: MAX_TIME,
        }
    }
}

/// Criteria for host searches and host based reports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchHostsFilters {
    #[serde(flatten)]
    pub global_filter: GlobalFilter,
    pub search: Vec<String>,
    pub sort_by: String,
    pub sort_desc: bool,
    /// Zero based page; negative disables pagination
    pub page_number: i64,
    /// Negative or zero disables pagination
    pub page_size: i64,
    pub hostname: String,
    pub database: String,
    pub technology: String,
    pub hardware_abstraction_technology: String,
    pub cluster: String,
    pub virtualization_node: String,
    pub operating_system: String,
    pub kernel: String,
}

impl Default for SearchHostsFilters {
    fn default() -> Self {
        Self {
            global_filter: GlobalFilter::default(),
            search: Vec::new(),
            sort_by: String::new(),
            sort_desc: false,
            page_number: -1,
            page_size: -1,
            hostname: String::new(),
            database: String::new(),
            technology: String::new(),
            hardware_abstraction_technology: String::new(),
            cluster: String::new(),
            virtualization_node: String::new(),
            operating_system: String::new(),
            kernel: String::new(),
        }
    }
}

/// Criteria for the license compliance report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchHostsAsLms {
    #[serde(flatten)]
    pub filters: SearchHostsFilters,
    /// Hosts created after this instant also land in the "added" sheet
    pub newer_than: DateTime<Utc>,
}

impl Default for SearchHostsAsLms {
    fn default() -> Self {
        Self {
            filters: SearchHostsFilters::default(),
            newer_than: MIN_TIME,
        }
    }
}

impl SearchHostsAsLms {
    /// True when neither time bound restricts the report
    pub fn is_unbounded(&self) -> bool {
        self.newer_than == MIN_TIME && self.filters.global_filter.older_than == MAX_TIME
    }

    /// True when `instant` lies strictly between the two bounds
    pub fn is_recent(&self, instant: DateTime<Utc>) -> bool {
        instant > self.newer_than && instant < self.filters.global_filter.older_than
    }
}

/// Criteria selecting alerts; unset fields match anything
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertsFilter {
    pub alert_type: Option<String>,
    pub alert_category: Option<String>,
    pub alert_severity: Option<String>,
    pub alert_status: Option<AlertStatus>,
    pub other_info: HashMap<String, serde_json::Value>,
}

impl AlertsFilter {
    /// Filter for every alert naming `hostname`
    pub fn for_hostname(hostname: &str) -> Self {
        let mut other_info = HashMap::new();
        other_info.insert(
            "hostname".to_string(),
            serde_json::Value::String(hostname.to_string()),
        );
        Self {
            other_info,
            ..Default::default()
        }
    }
}
