use anyhow::{Context, Result};
use crate::cli::commands::{FilterArgs, GlobalArgs};
use crate::cli::utils::{print_json, Runtime};
use crate::model::{SearchHostsAsLms, MAX_TIME, MIN_TIME};
use crate::report::save_workbook;
use crate::service::SearchMode;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::info;

pub async fn handle_search_command(runtime: &Runtime, mode: String, filters: FilterArgs) -> Result<()> {
    let mode: SearchMode = mode.parse()?;
    let filters = filters.into_filters(runtime.service.config().default_page_size);

    let result = runtime.service.search_hosts(mode, &filters).await?;
    info!("Found {} records", result.len());

    print_json(&result)
}

pub async fn handle_lms_command(
    runtime: &Runtime,
    filters: FilterArgs,
    newer_than: Option<DateTime<Utc>>,
    output: PathBuf,
) -> Result<()> {
    let filters = SearchHostsAsLms {
        filters: filters.into_filters(runtime.service.config().default_page_size),
        newer_than: newer_than.unwrap_or(MIN_TIME),
    };

    let workbook = runtime.service.search_hosts_as_lms(&filters).await?;
    save_workbook(&workbook, &output)
        .with_context(|| format!("Failed to write LMS report to {}", output.display()))?;

    info!("LMS report written to {}", output.display());
    Ok(())
}

pub async fn handle_xlsx_command(runtime: &Runtime, filters: FilterArgs, output: PathBuf) -> Result<()> {
    let filters = filters.into_filters(runtime.service.config().default_page_size);

    let workbook = runtime.service.search_hosts_as_xlsx(&filters).await?;
    save_workbook(&workbook, &output)
        .with_context(|| format!("Failed to write hosts export to {}", output.display()))?;

    info!("Hosts export written to {}", output.display());
    Ok(())
}

pub async fn handle_host_command(
    runtime: &Runtime,
    hostname: String,
    older_than: Option<DateTime<Utc>>,
    raw: bool,
) -> Result<()> {
    let host = runtime
        .service
        .get_host(&hostname, older_than.unwrap_or(MAX_TIME), raw)
        .await?;
    print_json(&host)
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_current_command(
    runtime: &Runtime,
    hostname: Option<String>,
    full: bool,
    search: String,
    sort_by: String,
    sort_desc: bool,
    page: i64,
    page_size: Option<i64>,
) -> Result<()> {
    if let Some(hostname) = hostname {
        let host = runtime.service.get_current_host(&hostname).await?;
        return print_json(&host);
    }

    let page_size = page_size.unwrap_or(runtime.service.config().default_page_size);
    let hosts = runtime
        .service
        .search_current_hosts(full, &search, &sort_by, sort_desc, page, page_size)
        .await?;

    info!("Found {} current hosts", hosts.len());
    print_json(&hosts)
}

pub async fn handle_locations_command(runtime: &Runtime, global: GlobalArgs) -> Result<()> {
    let locations = runtime
        .service
        .list_locations(&global.location, &global.environment, global.older_than())
        .await?;
    print_json(&locations)
}

pub async fn handle_environments_command(runtime: &Runtime, global: GlobalArgs) -> Result<()> {
    let environments = runtime
        .service
        .list_environments(&global.location, &global.environment, global.older_than())
        .await?;
    print_json(&environments)
}

pub async fn handle_archive_command(runtime: &Runtime, hostname: String) -> Result<()> {
    info!("Archiving host {}", hostname);

    runtime.service.archive_host(&hostname).await?;
    runtime.persist().await?;

    println!("Host {} archived", hostname);
    Ok(())
}
