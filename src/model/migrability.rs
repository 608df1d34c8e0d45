use serde::{Deserialize, Serialize};

/// Count of a construct that does not translate to PostgreSQL as-is
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PgsqlMigrability {
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub count: i64,
}

/// Partitioned segment of an Oracle database
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OracleDatabasePartitioning {
    pub owner: String,
    pub segment_name: String,
    pub partition_name: String,
    pub segment_type: String,
    pub mb: f64,
}
