pub mod agreement;
pub mod alert;
pub mod filters;
pub mod host;
pub mod migrability;

use chrono::{DateTime, Utc};

pub use agreement::{Agreement, AgreementHost};
pub use alert::{Alert, AlertStatus};
pub use filters::{AlertsFilter, GlobalFilter, SearchHostsAsLms, SearchHostsFilters};
pub use host::{ClusterMembershipStatus, HostDataSummary, HostInfo, LmsHostRecord};
pub use migrability::{OracleDatabasePartitioning, PgsqlMigrability};

/// Lower time bound meaning "no newer-than filtering"
pub const MIN_TIME: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;

/// Upper time bound meaning "no older-than filtering"
pub const MAX_TIME: DateTime<Utc> = DateTime::<Utc>::MAX_UTC;
