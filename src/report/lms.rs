use super::workbook::{CellAddress, CellValue, Spreadsheet, WorkbookResult};
use crate::model::{Agreement, LmsHostRecord, SearchHostsAsLms};
use std::collections::HashMap;
use tracing::debug;

/// Sheet receiving every database row
pub const SHEET_DATABASE_EBS_DB_TIER: &str = "Database_&_EBS_DB_Tier";

/// Sheet receiving rows created inside the requested period
pub const SHEET_HOSTS_ADDED: &str = "Hosts_added";

/// First data row in both sheets; the rows above hold the template headers
pub const LMS_HEADER_OFFSET: u32 = 4;

/// Column letters used by the compliance template
mod col {
    pub const PHYSICAL_SERVER_NAME: u32 = 2; // B
    pub const VIRTUAL_SERVER_NAME: u32 = 3; // C
    pub const VIRTUALIZATION_TECHNOLOGY: u32 = 4; // D
    pub const DB_INSTANCE_NAME: u32 = 5; // E
    pub const PLUGGABLE_DATABASE_NAME: u32 = 6; // F
    pub const ENVIRONMENT: u32 = 7; // G
    pub const OPTIONS: u32 = 8; // H
    pub const USED_MANAGEMENT_PACKS: u32 = 9; // I
    pub const PRODUCT_VERSION: u32 = 14; // N
    pub const PRODUCT_LICENSE_ALLOCATED: u32 = 15; // O
    pub const LICENSE_METRIC_ALLOCATED: u32 = 16; // P
    pub const USING_LICENSE_COUNT: u32 = 17; // Q
    pub const CSI: u32 = 18; // R
    pub const PROCESSOR_MODEL: u32 = 29; // AC
    pub const PROCESSORS: u32 = 30; // AD
    pub const CORES_PER_PROCESSOR: u32 = 31; // AE
    pub const PHYSICAL_CORES: u32 = 32; // AF
    pub const THREADS_PER_CORE: u32 = 33; // AG
    pub const PROCESSOR_SPEED: u32 = 34; // AH
    pub const OPERATING_SYSTEM: u32 = 36; // AJ
}

/// Contract identifiers per hostname, built from the agreements once per report
#[derive(Debug, Default)]
pub struct CsiIndex {
    by_hostname: HashMap<String, Vec<String>>,
}

impl CsiIndex {
    pub fn from_agreements(agreements: &[Agreement]) -> Self {
        let mut by_hostname: HashMap<String, Vec<String>> = HashMap::new();
        for agreement in agreements.iter().filter(|a| !a.csi.is_empty()) {
            for host in &agreement.hosts {
                by_hostname
                    .entry(host.hostname.clone())
                    .or_default()
                    .push(agreement.csi.clone());
            }
        }
        Self { by_hostname }
    }

    pub fn get(&self, hostname: &str) -> Option<&[String]> {
        self.by_hostname.get(hostname).map(|csis| csis.as_slice())
    }

    pub fn len(&self) -> usize {
        self.by_hostname.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hostname.is_empty()
    }
}

/// Fills the license compliance template
pub struct LmsReporter<'a> {
    csi_index: &'a CsiIndex,
}

impl<'a> LmsReporter<'a> {
    pub fn new(csi_index: &'a CsiIndex) -> Self {
        Self { csi_index }
    }

    /// Write `records` into the template opened as `book`.
    ///
    /// Without time bounds the "added" sheet is dropped and the main sheet
    /// becomes active; otherwise records created strictly inside the bounds
    /// are repeated there with their own row numbering.
    pub fn render<S: Spreadsheet>(
        &self,
        book: &mut S,
        records: &[LmsHostRecord],
        filters: &SearchHostsAsLms,
    ) -> WorkbookResult<()> {
        let unbounded = filters.is_unbounded();
        if unbounded {
            book.delete_sheet(SHEET_HOSTS_ADDED);
            if let Some(index) = book.sheet_index(SHEET_DATABASE_EBS_DB_TIER) {
                book.set_active_sheet(index)?;
            }
        }

        let mut added_row = LMS_HEADER_OFFSET;
        for (i, record) in records.iter().enumerate() {
            let row = LMS_HEADER_OFFSET + i as u32;
            self.write_record(book, SHEET_DATABASE_EBS_DB_TIER, row, record)?;

            if !unbounded && filters.is_recent(record.created_at) {
                self.write_record(book, SHEET_HOSTS_ADDED, added_row, record)?;
                added_row += 1;
            }
        }

        debug!(
            "Rendered {} LMS rows, {} in {}",
            records.len(),
            added_row - LMS_HEADER_OFFSET,
            SHEET_HOSTS_ADDED
        );
        Ok(())
    }

    fn write_record<S: Spreadsheet>(
        &self,
        book: &mut S,
        sheet: &str,
        row: u32,
        record: &LmsHostRecord,
    ) -> WorkbookResult<()> {
        let mut set = |column: u32, value: CellValue| book.set_cell_value(sheet, CellAddress::new(column, row), value);

        set(col::PHYSICAL_SERVER_NAME, (&record.physical_server_name).into())?;
        set(col::VIRTUAL_SERVER_NAME, (&record.virtual_server_name).into())?;
        set(col::VIRTUALIZATION_TECHNOLOGY, (&record.virtualization_technology).into())?;
        set(col::DB_INSTANCE_NAME, (&record.db_instance_name).into())?;
        set(col::PLUGGABLE_DATABASE_NAME, (&record.pluggable_database_name).into())?;
        set(col::ENVIRONMENT, (&record.environment).into())?;
        set(col::OPTIONS, (&record.options).into())?;
        set(col::USED_MANAGEMENT_PACKS, (&record.used_management_packs).into())?;
        set(col::PRODUCT_VERSION, (&record.product_version).into())?;
        set(col::PRODUCT_LICENSE_ALLOCATED, (&record.product_license_allocated).into())?;
        set(col::LICENSE_METRIC_ALLOCATED, (&record.license_metric_allocated).into())?;
        set(col::USING_LICENSE_COUNT, record.using_license_count.into())?;

        if let Some(csis) = self.csi_index.get(record.csi_hostname()) {
            set(col::CSI, csis.join(", ").into())?;
        }

        set(col::PROCESSOR_MODEL, (&record.processor_model).into())?;
        set(col::PROCESSORS, record.processors.into())?;
        set(col::CORES_PER_PROCESSOR, record.cores_per_processor.into())?;
        set(col::PHYSICAL_CORES, record.physical_cores.into())?;
        set(col::THREADS_PER_CORE, record.threads_per_core.into())?;
        set(col::PROCESSOR_SPEED, (&record.processor_speed).into())?;
        set(col::OPERATING_SYSTEM, (&record.operating_system).into())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AgreementHost, MAX_TIME, MIN_TIME};
    use crate::report::workbook::Workbook;
    use chrono::{DateTime, TimeZone, Utc};

    fn template() -> Workbook {
        let mut book = Workbook::new();
        book.add_sheet(SHEET_DATABASE_EBS_DB_TIER);
        book.add_sheet(SHEET_HOSTS_ADDED);
        book.set_active_sheet(1).unwrap();
        book
    }

    fn record(physical: &str, virtual_name: &str, created_at: DateTime<Utc>) -> LmsHostRecord {
        LmsHostRecord {
            physical_server_name: physical.to_string(),
            virtual_server_name: virtual_name.to_string(),
            virtualization_technology: "VMware".to_string(),
            db_instance_name: "ERP".to_string(),
            pluggable_database_name: String::new(),
            environment: "PROD".to_string(),
            options: "Partitioning".to_string(),
            used_management_packs: "Diagnostics Pack".to_string(),
            product_version: "19".to_string(),
            product_license_allocated: "EE".to_string(),
            license_metric_allocated: "Processor".to_string(),
            using_license_count: 2.5,
            processor_model: "Intel Xeon".to_string(),
            processors: 2,
            cores_per_processor: 8,
            physical_cores: 16,
            threads_per_core: 2,
            processor_speed: "2.40GHz".to_string(),
            operating_system: "Red Hat 8".to_string(),
            created_at,
        }
    }

    fn agreement(csi: &str, hostnames: &[&str]) -> Agreement {
        Agreement {
            id: csi.to_string(),
            agreement_id: String::new(),
            csi: csi.to_string(),
            hosts: hostnames
                .iter()
                .map(|h| AgreementHost { hostname: h.to_string() })
                .collect(),
        }
    }

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_csi_index_joins_and_skips_empty() {
        let index = CsiIndex::from_agreements(&[
            agreement("111", &["esx01"]),
            agreement("", &["esx01"]),
            agreement("222", &["esx01", "vm02"]),
        ]);
        assert_eq!(index.get("esx01"), Some(&["111".to_string(), "222".to_string()][..]));
        assert_eq!(index.get("vm02").map(|c| c.len()), Some(1));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_unbounded_report_drops_added_sheet() {
        let index = CsiIndex::default();
        let mut book = template();
        let filters = SearchHostsAsLms {
            newer_than: MIN_TIME,
            ..Default::default()
        };
        assert_eq!(filters.filters.global_filter.older_than, MAX_TIME);

        LmsReporter::new(&index)
            .render(&mut book, &[record("esx01", "vm01", date(1))], &filters)
            .unwrap();

        assert_eq!(book.sheet_names(), vec![SHEET_DATABASE_EBS_DB_TIER]);
        assert_eq!(book.active_sheet_name(), Some(SHEET_DATABASE_EBS_DB_TIER));
        assert_eq!(book.cell(SHEET_DATABASE_EBS_DB_TIER, "B4"), Some(&"esx01".into()));
    }

    #[test]
    fn test_unbounded_report_without_records_still_drops_added_sheet() {
        let index = CsiIndex::default();
        let mut book = template();
        LmsReporter::new(&index)
            .render(&mut book, &[], &SearchHostsAsLms::default())
            .unwrap();
        assert!(book.sheet(SHEET_HOSTS_ADDED).is_none());
    }

    #[test]
    fn test_all_columns_written_at_header_offset() {
        let index = CsiIndex::from_agreements(&[agreement("6871235", &["esx01"])]);
        let mut book = template();
        LmsReporter::new(&index)
            .render(&mut book, &[record("esx01", "vm01", date(1))], &SearchHostsAsLms::default())
            .unwrap();

        let sheet = SHEET_DATABASE_EBS_DB_TIER;
        assert_eq!(book.cell(sheet, "B4"), Some(&"esx01".into()));
        assert_eq!(book.cell(sheet, "C4"), Some(&"vm01".into()));
        assert_eq!(book.cell(sheet, "D4"), Some(&"VMware".into()));
        assert_eq!(book.cell(sheet, "E4"), Some(&"ERP".into()));
        assert_eq!(book.cell(sheet, "I4"), Some(&"Diagnostics Pack".into()));
        assert_eq!(book.cell(sheet, "N4"), Some(&"19".into()));
        assert_eq!(book.cell(sheet, "Q4"), Some(&CellValue::Float(2.5)));
        assert_eq!(book.cell(sheet, "R4"), Some(&"6871235".into()));
        assert_eq!(book.cell(sheet, "AC4"), Some(&"Intel Xeon".into()));
        assert_eq!(book.cell(sheet, "AD4"), Some(&CellValue::Integer(2)));
        assert_eq!(book.cell(sheet, "AF4"), Some(&CellValue::Integer(16)));
        assert_eq!(book.cell(sheet, "AH4"), Some(&"2.40GHz".into()));
        assert_eq!(book.cell(sheet, "AJ4"), Some(&"Red Hat 8".into()));
        assert_eq!(book.cell(sheet, "B3"), None);
    }

    #[test]
    fn test_csi_falls_back_to_virtual_server_name() {
        let index = CsiIndex::from_agreements(&[agreement("111", &["vm01"]), agreement("222", &["vm01"])]);
        let mut book = template();
        LmsReporter::new(&index)
            .render(&mut book, &[record("", "vm01", date(1))], &SearchHostsAsLms::default())
            .unwrap();

        assert_eq!(book.cell(SHEET_DATABASE_EBS_DB_TIER, "R4"), Some(&"111, 222".into()));
    }

    #[test]
    fn test_host_without_csi_leaves_column_empty() {
        let index = CsiIndex::from_agreements(&[agreement("111", &["other"])]);
        let mut book = template();
        LmsReporter::new(&index)
            .render(&mut book, &[record("esx01", "vm01", date(1))], &SearchHostsAsLms::default())
            .unwrap();

        assert_eq!(book.cell(SHEET_DATABASE_EBS_DB_TIER, "R4"), None);
    }

    #[test]
    fn test_recent_records_are_copied_to_added_sheet() {
        let index = CsiIndex::default();
        let mut book = template();
        let mut filters = SearchHostsAsLms {
            newer_than: date(10),
            ..Default::default()
        };
        filters.filters.global_filter.older_than = date(20);

        let records = vec![
            record("old", "vm01", date(5)),
            record("inside1", "vm02", date(15)),
            record("edge", "vm03", date(20)),
            record("inside2", "vm04", date(11)),
        ];
        LmsReporter::new(&index).render(&mut book, &records, &filters).unwrap();

        assert_eq!(book.sheet_names().len(), 2);
        assert_eq!(book.cell(SHEET_DATABASE_EBS_DB_TIER, "B4"), Some(&"old".into()));
        assert_eq!(book.cell(SHEET_DATABASE_EBS_DB_TIER, "B7"), Some(&"inside2".into()));

        assert_eq!(book.cell(SHEET_HOSTS_ADDED, "B4"), Some(&"inside1".into()));
        assert_eq!(book.cell(SHEET_HOSTS_ADDED, "B5"), Some(&"inside2".into()));
        assert_eq!(book.cell(SHEET_HOSTS_ADDED, "B6"), None);
        assert_eq!(book.active_sheet_name(), Some(SHEET_HOSTS_ADDED));
    }

    #[test]
    fn test_records_are_not_modified() {
        let index = CsiIndex::default();
        let mut book = template();
        let records = vec![record("esx01", "vm01", date(1))];
        let before = records.clone();
        LmsReporter::new(&index)
            .render(&mut book, &records, &SearchHostsAsLms::default())
            .unwrap();
        assert_eq!(records, before);
    }
}
