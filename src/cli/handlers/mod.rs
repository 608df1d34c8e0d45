pub mod hosts;
pub mod migrability;

// Re-export handler functions for convenience
pub use hosts::{
    handle_archive_command, handle_current_command, handle_environments_command, handle_host_command,
    handle_lms_command, handle_locations_command, handle_search_command, handle_xlsx_command,
};
pub use migrability::{handle_migrability_command, handle_partitionings_command};
