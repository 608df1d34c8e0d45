pub mod dump;
pub mod memory;

use crate::model::{
    Agreement, AlertsFilter, HostDataSummary, LmsHostRecord, OracleDatabasePartitioning,
    PgsqlMigrability, SearchHostsFilters,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use dump::{DumpLoader, InventoryDump};
pub use memory::MemoryStore;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the inventory store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Compression error: {0}")]
    Compression(String),
}

impl StoreError {
    /// Stable code handed to API clients
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::HostNotFound(_) => "HOST_NOT_FOUND",
            StoreError::Query(_) => "QUERY",
            StoreError::Io(_) => "IO",
            StoreError::Serialization(_) => "SERIALIZATION",
            StoreError::Compression(_) => "COMPRESSION",
        }
    }
}

/// Document store holding hosts, agreements and database metrics
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Current host summaries matching the filters
    async fn search_host_summaries(&self, filters: &SearchHostsFilters) -> StoreResult<Vec<HostDataSummary>>;

    /// License compliance rows (one per database) matching the filters
    async fn search_lms_hosts(&self, filters: &SearchHostsFilters) -> StoreResult<Vec<LmsHostRecord>>;

    /// Hostnames of the current hosts matching the filters
    async fn search_hostnames(&self, filters: &SearchHostsFilters) -> StoreResult<Vec<String>>;

    /// Most recent snapshot of a host not newer than `older_than`.
    /// With `raw` the stored document is returned untouched.
    async fn get_host(&self, hostname: &str, older_than: DateTime<Utc>, raw: bool) -> StoreResult<serde_json::Value>;

    async fn list_locations(&self, location: &str, environment: &str, older_than: DateTime<Utc>) -> StoreResult<Vec<String>>;

    async fn list_environments(&self, location: &str, environment: &str, older_than: DateTime<Utc>) -> StoreResult<Vec<String>>;

    /// Mark every current snapshot of the host as archived
    async fn archive_host(&self, hostname: &str) -> StoreResult<()>;

    async fn list_agreements(&self) -> StoreResult<Vec<Agreement>>;

    async fn find_psql_migrabilities(&self, hostname: &str, dbname: &str) -> StoreResult<Vec<PgsqlMigrability>>;

    async fn find_partitionings(&self, hostname: &str, dbname: &str) -> StoreResult<Vec<OracleDatabasePartitioning>>;

    /// Keyword search over current hosts; `full` returns whole documents
    async fn search_current_hosts(
        &self,
        full: bool,
        keywords: &[String],
        sort_by: &str,
        sort_desc: bool,
        page: i64,
        page_size: i64,
    ) -> StoreResult<Vec<serde_json::Value>>;

    async fn get_current_host(&self, hostname: &str) -> StoreResult<serde_json::Value>;
}

/// Alerting backend
#[async_trait]
pub trait AlertService: Send + Sync {
    /// Acknowledge every open alert matching the filter, returning how many changed
    async fn ack_alerts(&self, filter: &AlertsFilter) -> StoreResult<u64>;
}
