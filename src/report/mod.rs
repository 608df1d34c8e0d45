pub mod hosts;
pub mod lms;
pub mod template;
pub mod workbook;
pub mod xlsx;

pub use hosts::HostsReporter;
pub use lms::{CsiIndex, LmsReporter};
pub use template::{FsTemplateStore, TemplateError, TemplateStore, LMS_TEMPLATE};
pub use workbook::{CellAddress, CellValue, Spreadsheet, Workbook, WorkbookError};
pub use xlsx::{save_xlsx, to_xlsx};

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Result type for report output
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while writing a rendered report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Spreadsheet write error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),
}

/// Output format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Json,
}

impl OutputFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => OutputFormat::Xlsx,
            _ => OutputFormat::Json,
        }
    }
}

/// Write a workbook to `output_path`: an Excel file for `.xlsx`, otherwise
/// the JSON document (to stdout for "-")
pub fn save_workbook(workbook: &Workbook, output_path: &Path) -> ReportResult<()> {
    if OutputFormat::for_path(output_path) == OutputFormat::Xlsx {
        save_xlsx(workbook, output_path)?;
        return Ok(());
    }

    let json = serde_json::to_string_pretty(workbook)?;

    if output_path == Path::new("-") || output_path == Path::new("") {
        println!("{}", json);
    } else {
        let mut file = File::create(output_path)?;
        file.write_all(json.as_bytes())?;
    }

    Ok(())
}
