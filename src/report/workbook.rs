use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Result type for workbook operations
pub type WorkbookResult<T> = Result<T, WorkbookError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkbookError {
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Sheet index {0} out of range")]
    SheetIndexOutOfRange(usize),

    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),
}

/// Cell coordinates; both column and row start at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellAddress {
    row: u32,
    column: u32,
}

impl CellAddress {
    pub fn new(column: u32, row: u32) -> Self {
        Self { row, column }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn column(&self) -> u32 {
        self.column
    }
}

/// Spreadsheet column letters for a 1-based column index (1 -> A, 27 -> AA)
pub fn column_name(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.column), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = WorkbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WorkbookError::InvalidAddress(s.to_string());

        let split = s.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let column = letters
            .to_ascii_uppercase()
            .bytes()
            .try_fold(0u32, |acc, b| acc.checked_mul(26)?.checked_add((b - b'A' + 1) as u32))
            .ok_or_else(invalid)?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self::new(column, row))
    }
}

impl TryFrom<String> for CellAddress {
    type Error = WorkbookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellAddress> for String {
    fn from(address: CellAddress) -> Self {
        address.to_string()
    }
}

/// Value stored in a cell. Plain JSON strings are always text; dates are
/// written as `{"dateTime": "..."}` so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    #[serde(with = "tagged_date_time")]
    DateTime(DateTime<Utc>),
}

mod tagged_date_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    struct Tagged {
        date_time: DateTime<Utc>,
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        Tagged { date_time: *value }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        Tagged::deserialize(deserializer).map(|tagged| tagged.date_time)
    }
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::Text(value.clone())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::DateTime(value)
    }
}

/// Operations report renderers rely on; file formats live behind this seam
pub trait Spreadsheet {
    /// New document with a single sheet whose first row holds `headers`
    fn with_headers(sheet: &str, headers: &[&str]) -> Self
    where
        Self: Sized;

    fn set_cell_value(&mut self, sheet: &str, address: CellAddress, value: CellValue) -> WorkbookResult<()>;

    /// Remove a sheet; unknown names are ignored
    fn delete_sheet(&mut self, name: &str);

    fn sheet_index(&self, name: &str) -> Option<usize>;

    fn set_active_sheet(&mut self, index: usize) -> WorkbookResult<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub name: String,
    #[serde(default)]
    pub cells: BTreeMap<CellAddress, CellValue>,
}

impl Worksheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: BTreeMap::new(),
        }
    }
}

/// In-memory spreadsheet document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    sheets: Vec<Worksheet>,
    #[serde(default)]
    active_sheet: usize,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty sheet and return its index
    pub fn add_sheet(&mut self, name: &str) -> usize {
        self.sheets.push(Worksheet::new(name));
        self.sheets.len() - 1
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn cell(&self, sheet: &str, address: &str) -> Option<&CellValue> {
        let address: CellAddress = address.parse().ok()?;
        self.sheet(sheet)?.cells.get(&address)
    }

    pub fn active_sheet(&self) -> usize {
        self.active_sheet
    }

    pub fn active_sheet_name(&self) -> Option<&str> {
        self.sheets.get(self.active_sheet).map(|s| s.name.as_str())
    }
}

impl Spreadsheet for Workbook {
    fn with_headers(sheet: &str, headers: &[&str]) -> Self {
        let mut workbook = Workbook::new();
        workbook.add_sheet(sheet);
        for (i, header) in headers.iter().enumerate() {
            workbook.sheets[0]
                .cells
                .insert(CellAddress::new(i as u32 + 1, 1), CellValue::from(*header));
        }
        workbook
    }

    fn set_cell_value(&mut self, sheet: &str, address: CellAddress, value: CellValue) -> WorkbookResult<()> {
        let worksheet = self
            .sheets
            .iter_mut()
            .find(|s| s.name == sheet)
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet.to_string()))?;
        worksheet.cells.insert(address, value);
        Ok(())
    }

    fn delete_sheet(&mut self, name: &str) {
        let Some(index) = self.sheet_index(name) else {
            return;
        };
        self.sheets.remove(index);

        if index < self.active_sheet || self.active_sheet >= self.sheets.len() {
            self.active_sheet = self.active_sheet.saturating_sub(1);
        }
    }

    fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    fn set_active_sheet(&mut self, index: usize) -> WorkbookResult<()> {
        if index >= self.sheets.len() {
            return Err(WorkbookError::SheetIndexOutOfRange(index));
        }
        self.active_sheet = index;
        Ok(())
    }
}

/// Hands out consecutive cell addresses, one row at a time
pub struct AxisHelper {
    row: u32,
}

impl AxisHelper {
    /// `header_rows` rows are skipped before the first data row
    pub fn new(header_rows: u32) -> Self {
        Self { row: header_rows }
    }

    pub fn new_row(&mut self) -> RowAxis {
        self.row += 1;
        RowAxis {
            row: self.row,
            column: 0,
        }
    }
}

pub struct RowAxis {
    row: u32,
    column: u32,
}

impl RowAxis {
    pub fn next_cell(&mut self) -> CellAddress {
        self.column += 1;
        CellAddress::new(self.column, self.row)
    }
}
