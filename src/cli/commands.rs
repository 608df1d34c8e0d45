use crate::model::{GlobalFilter, SearchHostsFilters, MAX_TIME};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hostledger",
    about = "Query and reporting layer for IT asset and license inventories",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Inventory dump to query (overrides HOSTLEDGER_DATA_FILE)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Resource directory holding report templates (overrides HOSTLEDGER_RESOURCE_PATH)
    #[arg(long, global = true)]
    pub resources: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search hosts and print the matching records as JSON
    Search {
        /// Shape of the returned records
        #[arg(short, long, default_value = "summary")]
        mode: String,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Generate the license compliance (LMS) workbook
    Lms {
        #[command(flatten)]
        filters: FilterArgs,

        /// Hosts created after this instant are also listed as added
        #[arg(long)]
        newer_than: Option<DateTime<Utc>>,

        /// Output file: .xlsx for a spreadsheet, otherwise the JSON workbook ("-" for stdout)
        #[arg(short, long, default_value = "lms.xlsx")]
        output: PathBuf,
    },

    /// Export hosts as a flat spreadsheet
    Xlsx {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file: .xlsx for a spreadsheet, otherwise the JSON workbook ("-" for stdout)
        #[arg(short, long, default_value = "hosts.xlsx")]
        output: PathBuf,
    },

    /// Show a single host
    Host {
        hostname: String,

        /// Point in time to look at (default: now)
        #[arg(long)]
        older_than: Option<DateTime<Utc>>,

        /// Print the stored document without alerts and history
        #[arg(long)]
        raw: bool,
    },

    /// Keyword search over current hosts
    Current {
        /// Show this host instead of searching
        hostname: Option<String>,

        /// Return whole documents instead of summaries
        #[arg(long)]
        full: bool,

        /// Space separated keywords
        #[arg(long, default_value = "")]
        search: String,

        #[arg(long, default_value = "")]
        sort_by: String,

        #[arg(long)]
        sort_desc: bool,

        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        page: i64,

        #[arg(long)]
        page_size: Option<i64>,
    },

    /// List distinct host locations
    Locations {
        #[command(flatten)]
        global: GlobalArgs,
    },

    /// List distinct host environments
    Environments {
        #[command(flatten)]
        global: GlobalArgs,
    },

    /// Archive a host and acknowledge its alerts
    Archive { hostname: String },

    /// Show PostgreSQL migrability metrics of a database
    Migrability {
        hostname: String,
        dbname: String,

        /// Print only the green/yellow/red classification
        #[arg(long)]
        semaphore: bool,
    },

    /// Show partitioned segments of an Oracle database
    Partitionings { hostname: String, dbname: String },

    /// Show information about hostledger
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Location/environment/time filters shared by every query
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    #[arg(long, default_value = "")]
    pub location: String,

    #[arg(long, default_value = "")]
    pub environment: String,

    /// Ignore snapshots newer than this instant
    #[arg(long)]
    pub older_than: Option<DateTime<Utc>>,
}

impl GlobalArgs {
    pub fn older_than(&self) -> DateTime<Utc> {
        self.older_than.unwrap_or(MAX_TIME)
    }
}

impl From<GlobalArgs> for GlobalFilter {
    fn from(args: GlobalArgs) -> Self {
        let older_than = args.older_than();
        GlobalFilter {
            location: args.location,
            environment: args.environment,
            older_than,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Keyword to search for; repeat for several
    #[arg(long)]
    pub search: Vec<String>,

    #[arg(long, default_value = "")]
    pub sort_by: String,

    #[arg(long)]
    pub sort_desc: bool,

    /// Zero based page number
    #[arg(long)]
    pub page: Option<i64>,

    #[arg(long)]
    pub page_size: Option<i64>,

    #[arg(long, default_value = "")]
    pub hostname: String,

    #[arg(long, default_value = "")]
    pub database: String,

    #[arg(long, default_value = "")]
    pub technology: String,

    #[arg(long, default_value = "")]
    pub hardware_abstraction_technology: String,

    #[arg(long, default_value = "")]
    pub cluster: String,

    #[arg(long, default_value = "")]
    pub virtualization_node: String,

    #[arg(long, default_value = "")]
    pub operating_system: String,

    #[arg(long, default_value = "")]
    pub kernel: String,
}

impl FilterArgs {
    /// Build store filters; `default_page_size` applies when paging without a size
    pub fn into_filters(self, default_page_size: i64) -> SearchHostsFilters {
        let page_size = self.page_size.unwrap_or(default_page_size);
        SearchHostsFilters {
            global_filter: self.global.into(),
            search: self.search,
            sort_by: self.sort_by,
            sort_desc: self.sort_desc,
            page_number: if page_size > 0 { self.page.unwrap_or(0) } else { -1 },
            page_size,
            hostname: self.hostname,
            database: self.database,
            technology: self.technology,
            hardware_abstraction_technology: self.hardware_abstraction_technology,
            cluster: self.cluster,
            virtualization_node: self.virtualization_node,
            operating_system: self.operating_system,
            kernel: self.kernel,
        }
    }
}
