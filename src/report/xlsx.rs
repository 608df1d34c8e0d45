use super::workbook::{CellValue, Workbook};
use rust_xlsxwriter::{Format, XlsxError};
use std::path::Path;
use tracing::debug;

const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Convert a rendered workbook into an Excel document
pub fn to_xlsx(workbook: &Workbook) -> Result<rust_xlsxwriter::Workbook, XlsxError> {
    let mut xlsx = rust_xlsxwriter::Workbook::new();
    let date_format = Format::new().set_num_format(DATE_TIME_FORMAT);

    for (index, sheet) in workbook.sheets().iter().enumerate() {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        if index == workbook.active_sheet() {
            worksheet.set_active(true);
        }

        for (address, value) in &sheet.cells {
            // Addresses are 1-based, the writer is 0-based
            let row = address.row().saturating_sub(1);
            let col = u16::try_from(address.column().saturating_sub(1)).unwrap_or(u16::MAX);
            match value {
                CellValue::Bool(b) => worksheet.write_boolean(row, col, *b)?,
                CellValue::Integer(i) => worksheet.write_number(row, col, *i as f64)?,
                CellValue::Float(f) => worksheet.write_number(row, col, *f)?,
                CellValue::Text(text) => worksheet.write_string(row, col, text)?,
                CellValue::DateTime(date) => {
                    worksheet.write_datetime_with_format(row, col, &date.naive_utc(), &date_format)?
                }
            };
        }
        debug!("Sheet {} written with {} cells", sheet.name, sheet.cells.len());
    }

    Ok(xlsx)
}

/// Write a workbook as an .xlsx file
pub fn save_xlsx(workbook: &Workbook, path: &Path) -> Result<(), XlsxError> {
    to_xlsx(workbook)?.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::workbook::{CellAddress, Spreadsheet};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample() -> Workbook {
        let mut workbook = Workbook::with_headers("Hosts", &["Hostname", "Cores", "Updated"]);
        workbook
            .set_cell_value("Hosts", "A2".parse().unwrap(), "db01".into())
            .unwrap();
        workbook
            .set_cell_value("Hosts", "B2".parse().unwrap(), 8i64.into())
            .unwrap();
        workbook
            .set_cell_value(
                "Hosts",
                "C2".parse().unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap().into(),
            )
            .unwrap();
        workbook
    }

    #[test]
    fn test_save_xlsx_writes_zip_container() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts.xlsx");

        save_xlsx(&sample(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_to_xlsx_buffers_every_sheet() {
        let mut workbook = sample();
        workbook.add_sheet("Hosts_added");
        workbook.set_active_sheet(1).unwrap();

        let buffer = to_xlsx(&workbook).unwrap().save_to_buffer().unwrap();
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_column_past_limit_is_an_error() {
        let mut workbook = Workbook::with_headers("Hosts", &["Hostname"]);
        workbook
            .set_cell_value("Hosts", CellAddress::new(70_000, 1), "x".into())
            .unwrap();

        assert!(to_xlsx(&workbook).is_err());
    }
}
