use anyhow::Result;
use clap::Parser;
use hostledger::cli::commands::{Cli, Commands};
use hostledger::cli::handlers::{
    handle_archive_command, handle_current_command, handle_environments_command, handle_host_command,
    handle_lms_command, handle_locations_command, handle_migrability_command, handle_partitionings_command,
    handle_search_command, handle_xlsx_command,
};
use hostledger::cli::utils::{init_logging, load_config, print_info, Runtime};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format);

    if let Commands::Info = cli.command {
        print_info();
        return Ok(());
    }

    let config = load_config(cli.data, cli.resources)?;
    let runtime = Runtime::open(config)?;

    // Execute command
    match cli.command {
        Commands::Search { mode, filters } => handle_search_command(&runtime, mode, filters).await,

        Commands::Lms { filters, newer_than, output } => {
            handle_lms_command(&runtime, filters, newer_than, output).await
        }

        Commands::Xlsx { filters, output } => handle_xlsx_command(&runtime, filters, output).await,

        Commands::Host { hostname, older_than, raw } => {
            handle_host_command(&runtime, hostname, older_than, raw).await
        }

        Commands::Current {
            hostname,
            full,
            search,
            sort_by,
            sort_desc,
            page,
            page_size,
        } => handle_current_command(&runtime, hostname, full, search, sort_by, sort_desc, page, page_size).await,

        Commands::Locations { global } => handle_locations_command(&runtime, global).await,

        Commands::Environments { global } => handle_environments_command(&runtime, global).await,

        Commands::Archive { hostname } => handle_archive_command(&runtime, hostname).await,

        Commands::Migrability { hostname, dbname, semaphore } => {
            handle_migrability_command(&runtime, hostname, dbname, semaphore).await
        }

        Commands::Partitionings { hostname, dbname } => {
            handle_partitionings_command(&runtime, hostname, dbname).await
        }

        Commands::Info => {
            print_info();
            Ok(())
        }
    }
}
