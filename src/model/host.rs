use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hardware abstraction technology reported for physical machines
pub const BARE_METAL_TECHNOLOGY: &str = "PH";

/// Point-in-time snapshot of a single host as stored in the inventory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostDataSummary {
    pub id: String,
    pub hostname: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub virtualization_node: String,
    #[serde(default)]
    pub agent_version: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub cluster_membership_status: ClusterMembershipStatus,
    pub info: HostInfo,
    /// Database names grouped by technology (e.g. "Oracle/Database")
    #[serde(default)]
    pub databases: HashMap<String, Vec<String>>,
}

impl HostDataSummary {
    /// True when the host runs directly on hardware
    pub fn is_bare_metal(&self) -> bool {
        self.info.hardware_abstraction_technology == BARE_METAL_TECHNOLOGY
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterMembershipStatus {
    pub oracle_clusterware: bool,
    pub veritas_cluster_server: bool,
    pub sun_cluster: bool,
    pub hacmp: bool,
}

/// Hardware and operating system facts collected by the agent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HostInfo {
    pub hostname: String,
    pub cpu_model: String,
    pub cpu_frequency: String,
    pub cpu_sockets: i64,
    pub cpu_cores: i64,
    pub cpu_threads: i64,
    pub threads_per_core: i64,
    pub cores_per_socket: i64,
    pub hardware_abstraction: String,
    pub hardware_abstraction_technology: String,
    pub kernel: String,
    pub kernel_version: String,
    pub os: String,
    pub os_version: String,
    /// Total memory in GiB
    pub memory_total: f64,
    /// Total swap in GiB
    pub swap_total: f64,
}

/// One database row of the license compliance (LMS) projection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LmsHostRecord {
    #[serde(default)]
    pub physical_server_name: String,
    #[serde(default)]
    pub virtual_server_name: String,
    #[serde(default)]
    pub virtualization_technology: String,
    #[serde(default)]
    pub db_instance_name: String,
    #[serde(default)]
    pub pluggable_database_name: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub used_management_packs: String,
    #[serde(default)]
    pub product_version: String,
    #[serde(default)]
    pub product_license_allocated: String,
    #[serde(default)]
    pub license_metric_allocated: String,
    #[serde(default)]
    pub using_license_count: f64,
    #[serde(default)]
    pub processor_model: String,
    #[serde(default)]
    pub processors: i64,
    #[serde(default)]
    pub cores_per_processor: i64,
    #[serde(default)]
    pub physical_cores: i64,
    #[serde(default)]
    pub threads_per_core: i64,
    #[serde(default)]
    pub processor_speed: String,
    #[serde(default)]
    pub operating_system: String,
    pub created_at: DateTime<Utc>,
}

impl LmsHostRecord {
    /// Hostname of the inventory host the row was projected from: the
    /// virtual server, or the physical one for bare metal rows.
    pub fn hostname(&self) -> &str {
        if self.virtual_server_name.is_empty() {
            &self.physical_server_name
        } else {
            &self.virtual_server_name
        }
    }

    /// Hostname used to look up agreements: the physical server, or the
    /// virtual one when no physical server is known.
    pub fn csi_hostname(&self) -> &str {
        if self.physical_server_name.is_empty() {
            &self.virtual_server_name
        } else {
            &self.physical_server_name
        }
    }
}
