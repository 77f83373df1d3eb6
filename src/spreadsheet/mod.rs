//! # Spreadsheet Model Module
//!
//! In-memory representation of spreadsheet data exchanged with the sheet
//! service: typed cells, sheets made of a header row and data rows, the JSON
//! interchange model, and the processing criteria that describe which columns
//! each table role must carry.
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub(crate) mod cell;
pub(crate) mod criteria;
pub(crate) mod sheet;

pub use cell::Cell;
pub use criteria::Criteria;
pub use criteria::MandatoryColumns;
pub use criteria::ValidationLimits;
pub use sheet::Row;
pub use sheet::Sheet;

/// Errors raised while building or reshaping sheets.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Raw values did not contain a header row
    #[error("Missing header row")]
    MissingHeaderRow,

    /// A data row carries more cells than the header has columns
    #[error("Row {row} has {width} cells but the header has only {columns} columns")]
    RowTooWide { row: usize, width: usize, columns: usize },

    /// A row or column vector does not fit the sheet shape
    #[error("Expected {columns} cells, found {width}")]
    RowWidthMismatch { width: usize, columns: usize },

    /// A required column is not part of the sheet
    #[error("Missing column '{0}'")]
    MissingColumn(String),

    /// Row index past the end of the sheet
    #[error("Row {0} is out of range")]
    RowOutOfRange(usize),

    /// Joining two sheets would produce the same column twice
    #[error("Columns {0:?} exist in both tables")]
    ColumnConflict(Vec<String>),
}

/// Raw sheet values as exchanged with the sheet service: header row first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetValues {
    /// Header row followed by data rows
    pub values: Vec<Vec<Cell>>,
    /// Set when the processed output carries an `Issues` column
    #[serde(default)]
    pub issues_present: bool,
}

impl SheetValues {
    pub fn new(values: Vec<Vec<Cell>>) -> Self {
        Self {
            values,
            issues_present: false,
        }
    }

    /// Number of rows including the header.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<&Sheet> for SheetValues {
    fn from(sheet: &Sheet) -> Self {
        SheetValues {
            values: sheet.to_values(),
            issues_present: sheet.has_column(crate::schema::column::ISSUES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_values_json() {
        let values: SheetValues =
            serde_json::from_str(r#"{"values": [["Campaign Name", "Budget"], ["A", 100]]}"#).unwrap();
        assert!(!values.issues_present);
        assert_eq!(values.len(), 2);

        let sheet = Sheet::from_values(values.values.clone()).unwrap();
        let rendered = SheetValues::from(&sheet);
        assert_eq!(rendered, values);
        assert_eq!(
            serde_json::to_string(&rendered).unwrap(),
            r#"{"values":[["Campaign Name","Budget"],["A",100]],"issues_present":false}"#
        );
    }
}
