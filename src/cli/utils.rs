use super::commands::LogFormat;
use crate::config::ServiceConfig;
use crate::report::FsTemplateStore;
use crate::service::InventoryService;
use crate::store::{DumpLoader, MemoryStore};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logging(verbose: bool, log_format: LogFormat) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so JSON results on stdout stay pipeable
    let fmt_layer = match log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(false)
            .with_span_list(false)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    // A second init (e.g. in tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

pub fn print_info() {
    println!("Hostledger v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("Authors: {}", env!("CARGO_PKG_AUTHORS"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
    println!();
    println!("Environment:");
    println!("  HOSTLEDGER_RESOURCE_PATH  directory holding templates/ (default: resources)");
    println!("  HOSTLEDGER_DATA_FILE      inventory dump, plain or gzip JSON (default: data/inventory.json)");
    println!("  HOSTLEDGER_PAGE_SIZE      default page size, negative disables paging (default: -1)");
    println!();
    println!("For more information, visit: {}", env!("CARGO_PKG_REPOSITORY"));
}

/// Load configuration from the environment and apply command line overrides
pub fn load_config(data: Option<PathBuf>, resources: Option<PathBuf>) -> Result<ServiceConfig> {
    let mut config = ServiceConfig::from_env().context("Failed to load configuration")?;

    if let Some(data) = data {
        config.data_file = data;
    }
    if let Some(resources) = resources {
        config.resource_file_path = resources;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Service wired to the dump-backed store, plus the store itself so
/// mutating commands can write it back
pub struct Runtime {
    pub service: InventoryService,
    pub store: Arc<MemoryStore>,
    pub data_file: PathBuf,
}

impl Runtime {
    pub fn open(config: ServiceConfig) -> Result<Self> {
        info!("Loading inventory from {}", config.data_file.display());

        let store = Arc::new(
            MemoryStore::from_file(&config.data_file)
                .with_context(|| format!("Failed to load inventory {}", config.data_file.display()))?,
        );
        let templates = Arc::new(FsTemplateStore::new(config.resource_file_path.clone()));
        let data_file = config.data_file.clone();

        let service = InventoryService::new(store.clone(), store.clone(), templates, config);
        Ok(Self {
            service,
            store,
            data_file,
        })
    }

    /// Write the in-memory inventory back to its dump file
    pub async fn persist(&self) -> Result<()> {
        let dump = self.store.snapshot().await;
        DumpLoader::new()
            .with_compression(is_gzip_path(&self.data_file))
            .save(&dump, &self.data_file)
            .with_context(|| format!("Failed to save inventory {}", self.data_file.display()))?;
        Ok(())
    }
}

fn is_gzip_path(path: &Path) -> bool {
    path.extension().map(|ext| ext == "gz").unwrap_or(false)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}
