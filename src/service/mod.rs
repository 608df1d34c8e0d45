pub mod hosts;
pub mod migrability;

use crate::config::ServiceConfig;
use crate::model::{HostDataSummary, LmsHostRecord};
use crate::report::{TemplateError, TemplateStore, WorkbookError};
use crate::store::{AlertService, InventoryStore, StoreError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to callers of the inventory service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("READ_TEMPLATE: {0}")]
    ReadTemplate(#[source] TemplateError),

    #[error("Spreadsheet error: {0}")]
    Workbook(#[from] WorkbookError),

    #[error("Unknown search mode: {0}")]
    InvalidMode(String),
}

impl ServiceError {
    /// Tag naming the failing stage
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Store(e) => e.code(),
            ServiceError::ReadTemplate(_) => "READ_TEMPLATE",
            ServiceError::Workbook(_) => "WORKBOOK",
            ServiceError::InvalidMode(_) => "INVALID_MODE",
        }
    }
}

/// Shape of the records returned by a host search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Full host summaries
    Summary,
    /// One license compliance row per database
    Lms,
    /// Hostnames only
    Hostnames,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Summary => "summary",
            SearchMode::Lms => "lms",
            SearchMode::Hostnames => "hostnames",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(SearchMode::Summary),
            "lms" => Ok(SearchMode::Lms),
            "hostnames" => Ok(SearchMode::Hostnames),
            other => Err(ServiceError::InvalidMode(other.to_string())),
        }
    }
}

/// Records returned by a host search, one variant per mode
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SearchHostsResult {
    Summary(Vec<HostDataSummary>),
    Lms(Vec<LmsHostRecord>),
    Hostnames(Vec<String>),
}

impl SearchHostsResult {
    pub fn len(&self) -> usize {
        match self {
            SearchHostsResult::Summary(hosts) => hosts.len(),
            SearchHostsResult::Lms(rows) => rows.len(),
            SearchHostsResult::Hostnames(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Query and reporting entry point over the inventory collaborators
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
    alerts: Arc<dyn AlertService>,
    templates: Arc<dyn TemplateStore>,
    config: ServiceConfig,
}

impl InventoryService {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        alerts: Arc<dyn AlertService>,
        templates: Arc<dyn TemplateStore>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            alerts,
            templates,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::model::{
        Agreement, AlertsFilter, LmsHostRecord, OracleDatabasePartitioning, PgsqlMigrability,
        SearchHostsFilters,
    };
    use crate::report::Workbook;
    use crate::store::{InventoryDump, MemoryStore, StoreResult};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Template store serving an in-memory workbook, or failing when empty
    pub struct StaticTemplates(pub Option<Workbook>);

    impl TemplateStore for StaticTemplates {
        fn open(&self, name: &str) -> Result<Workbook, TemplateError> {
            self.0.clone().ok_or_else(|| TemplateError::Io {
                path: name.into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            })
        }
    }

    /// Alert backend that always fails
    pub struct BrokenAlerts {
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl AlertService for BrokenAlerts {
        async fn ack_alerts(&self, _filter: &AlertsFilter) -> StoreResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Query("alert backend unavailable".to_string()))
        }
    }

    /// Store whose every query fails
    pub struct FailingStore;

    #[async_trait]
    impl InventoryStore for FailingStore {
        async fn search_host_summaries(&self, _: &SearchHostsFilters) -> StoreResult<Vec<HostDataSummary>> {
            Err(StoreError::Query("connection refused".to_string()))
        }
        async fn search_lms_hosts(&self, _: &SearchHostsFilters) -> StoreResult<Vec<LmsHostRecord>> {
            Err(StoreError::Query("connection refused".to_string()))
        }
        async fn search_hostnames(&self, _: &SearchHostsFilters) -> StoreResult<Vec<String>> {
            Err(StoreError::Query("connection refused".to_string()))
        }
        async fn get_host(&self, _: &str, _: DateTime<Utc>, _: bool) -> StoreResult<serde_json::Value> {
            Err(StoreError::Query("connection refused".to_string()))
        }
        async fn list_locations(&self, _: &str, _: &str, _: DateTime<Utc>) -> StoreResult<Vec<String>> {
            Err(StoreError::Query("connection refused".to_string()))
        }
        async fn list_environments(&self, _: &str, _: &str, _: DateTime<Utc>) -> StoreResult<Vec<String>> {
            Err(StoreError::Query("connection refused".to_string()))
        }
        async fn archive_host(&self, _: &str) -> StoreResult<()> {
            Err(StoreError::Query("connection refused".to_string()))
        }
        async fn list_agreements(&self) -> StoreResult<Vec<Agreement>> {
            Err(StoreError::Query("connection refused".to_string()))
        }
        async fn find_psql_migrabilities(&self, _: &str, _: &str) -> StoreResult<Vec<PgsqlMigrability>> {
            Err(StoreError::Query("connection refused".to_string()))
        }
        async fn find_partitionings(&self, _: &str, _: &str) -> StoreResult<Vec<OracleDatabasePartitioning>> {
            Err(StoreError::Query("connection refused".to_string()))
        }
        async fn search_current_hosts(
            &self,
            _: bool,
            _: &[String],
            _: &str,
            _: bool,
            _: i64,
            _: i64,
        ) -> StoreResult<Vec<serde_json::Value>> {
            Err(StoreError::Query("connection refused".to_string()))
        }
        async fn get_current_host(&self, _: &str) -> StoreResult<serde_json::Value> {
            Err(StoreError::Query("connection refused".to_string()))
        }
    }

    pub fn service_with(store: Arc<MemoryStore>, templates: Option<Workbook>) -> InventoryService {
        InventoryService::new(
            store.clone(),
            store,
            Arc::new(StaticTemplates(templates)),
            ServiceConfig::default(),
        )
    }

    pub fn memory_store(dump: serde_json::Value) -> Arc<MemoryStore> {
        let dump: InventoryDump = serde_json::from_value(dump).unwrap();
        Arc::new(MemoryStore::new(dump))
    }
}
