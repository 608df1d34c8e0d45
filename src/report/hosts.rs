use super::workbook::{AxisHelper, CellValue, Spreadsheet, WorkbookResult};
use crate::model::HostDataSummary;

pub const SHEET_HOSTS: &str = "Hosts";

/// Label used in place of the "PH" hardware abstraction code
pub const BARE_METAL_LABEL: &str = "Bare metal";

pub const HOSTS_HEADERS: [&str; 18] = [
    "Hostname",
    "Platform",
    "Cluster",
    "Node",
    "Processor Model",
    "Threads",
    "Cores",
    "Socket",
    "Version",
    "Updated",
    "Environment",
    "Databases",
    "Technology",
    "Operating System",
    "Clust",
    "Kernel",
    "Memory",
    "Swap",
];

/// Flat spreadsheet export with one row per host
pub struct HostsReporter;

impl Default for HostsReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HostsReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn generate<S: Spreadsheet>(&self, hosts: &[HostDataSummary]) -> WorkbookResult<S> {
        let mut file = S::with_headers(SHEET_HOSTS, &HOSTS_HEADERS);

        let mut axis_help = AxisHelper::new(1);
        for host in hosts {
            let mut axis = axis_help.new_row();
            let mut set = |value: CellValue| file.set_cell_value(SHEET_HOSTS, axis.next_cell(), value);

            set((&host.hostname).into())?;
            set(platform_label(host).into())?;
            set((&host.cluster).into())?;
            set((&host.virtualization_node).into())?;
            set((&host.info.cpu_model).into())?;
            set(host.info.cpu_threads.into())?;
            set(host.info.cpu_cores.into())?;
            set(host.info.cpu_sockets.into())?;
            set((&host.agent_version).into())?;
            set(host.created_at.into())?;
            set((&host.environment).into())?;

            let (databases, technology) = flatten_databases(host);
            set(databases.into())?;
            set(technology.into())?;

            set((&host.info.os).into())?;
            set(host.cluster_membership_status.oracle_clusterware.into())?;
            set((&host.info.kernel_version).into())?;
            set(host.info.memory_total.into())?;
            set(host.info.swap_total.into())?;
        }

        Ok(file)
    }
}

fn platform_label(host: &HostDataSummary) -> &str {
    if host.is_bare_metal() {
        BARE_METAL_LABEL
    } else {
        &host.info.hardware_abstraction_technology
    }
}

/// Database names and technology names, concatenated in technology order
fn flatten_databases(host: &HostDataSummary) -> (String, String) {
    let mut technologies: Vec<&String> = host.databases.keys().collect();
    technologies.sort();

    let mut databases = String::new();
    let mut technology = String::new();
    for tech in technologies {
        databases.push_str(&host.databases[tech].join(" "));
        technology.push_str(tech);
    }
    (databases, technology)
}
