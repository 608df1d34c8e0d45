use anyhow::Result;
use crate::analyzers::Semaphore;
use crate::cli::utils::{print_json, Runtime};
use colored::*;
use tracing::info;

pub async fn handle_migrability_command(
    runtime: &Runtime,
    hostname: String,
    dbname: String,
    semaphore: bool,
) -> Result<()> {
    if semaphore {
        let result = runtime
            .service
            .get_oracle_psql_migrabilities_semaphore(&hostname, &dbname)
            .await?;
        println!("{}/{}: {}", hostname, dbname, colorize(result));
        return Ok(());
    }

    let metrics = runtime
        .service
        .get_oracle_psql_migrabilities(&hostname, &dbname)
        .await?;
    info!("Found {} migrability metrics for {}/{}", metrics.len(), hostname, dbname);

    print_json(&metrics)
}

pub async fn handle_partitionings_command(runtime: &Runtime, hostname: String, dbname: String) -> Result<()> {
    let partitionings = runtime
        .service
        .get_oracle_database_partitionings(&hostname, &dbname)
        .await?;
    info!("Found {} partitioned segments for {}/{}", partitionings.len(), hostname, dbname);

    print_json(&partitionings)
}

fn colorize(semaphore: Semaphore) -> ColoredString {
    let label = semaphore.to_string();
    match semaphore {
        Semaphore::Green => label.green().bold(),
        Semaphore::Yellow => label.yellow().bold(),
        Semaphore::Red => label.red().bold(),
    }
}
