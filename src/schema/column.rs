use crate::error::CampaignSheetError;
use crate::spreadsheet::Cell;
use serde::Deserialize;
use thiserror::Error;

// New campaign sheet
pub const COUNTRY: &str = "Country";
pub const STATION_FROM: &str = "Station From";
pub const STATION_TO: &str = "Station To";
pub const FINAL_URL_FROM: &str = "Final Url From";
pub const FINAL_URL_TO: &str = "Final Url To";
pub const LANGUAGE_CODE: &str = "Language Code";
pub const CATEGORY: &str = "Category";
pub const TICKET_PRICE: &str = "Ticket Price";

// Templates and scaffold
pub const CAMPAIGN_NAME: &str = "Campaign Name";
pub const AD_GROUP_NAME: &str = "Ad Group Name";
pub const MATCH_TYPE: &str = "Match Type";
pub const KEYWORD: &str = "Keyword";
pub const KEYWORD_MATCH_TYPE: &str = "Keyword Match Type";
pub const NEGATIVE: &str = "Negative";
pub const LEVEL: &str = "Level";
pub const TARGET_CATEGORY: &str = "Target Category";
pub const AD_GROUP_CATEGORY: &str = "Ad Group Category";
pub const REAL_CATEGORY: &str = "Real Category";
pub const SEARCH_NETWORK: &str = "Search Network";
pub const GOOGLE_SEARCH_NETWORK: &str = "Google Search Network";
pub const DEFAULT_MAX_CPC: &str = "Default max. CPC";

// Output
pub const FINAL_URL: &str = "Final URL";
pub const PATH_1: &str = "Path 1";
pub const PATH_2: &str = "Path 2";
pub const ISSUES: &str = "Issues";

/// Errors related to column type parsing and cell coercion.
#[derive(Error, Debug)]
pub enum ColumnError {
    #[error("Invalid column type '{0}'")]
    TypeError(String),

    #[error("Invalid value in column '{column}': {message}")]
    CoercionError { column: String, message: String },
}

/// Target types for columns whose cells are coerced after expansion.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum ColumnType {
    /// Boolean values (true/false)
    Boolean,
    /// Double-precision floating point numbers
    Double,
    /// Free text, left as is
    Varchar,
}

impl ColumnType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Double => "double",
            ColumnType::Varchar => "varchar",
        }
    }

    /// Parses a column type from a string representation.
    /// Supports various aliases for each type.
    pub fn parse(name: &str) -> Result<Self, ColumnError> {
        match name.to_ascii_uppercase().as_str() {
            "BOOL" | "BOOLEAN" => Ok(Self::Boolean),
            "FLOAT" | "DOUBLE" | "DECIMAL" | "NUMERIC" => Ok(Self::Double),
            "TEXT" | "STRING" | "VARCHAR" => Ok(Self::Varchar),
            _ => Err(ColumnError::TypeError(name.to_string())),
        }
    }

    /// Converts `cell` to this type. Converting an already converted cell returns it unchanged,
    /// and empty cells stay empty.
    pub fn coerce(&self, column: &str, cell: &Cell) -> Result<Cell, CampaignSheetError> {
        let coerced = match (self, cell) {
            (_, Cell::Empty) => Cell::Empty,
            (ColumnType::Varchar, _) => cell.clone(),
            (ColumnType::Boolean, _) => Cell::Boolean(cell.to_boolean()),
            (ColumnType::Double, _) => Cell::Number(cell.to_double().map_err(|message| ColumnError::CoercionError {
                column: column.to_owned(),
                message,
            })?),
        };
        Ok(coerced)
    }
}

impl TryFrom<String> for ColumnType {
    type Error = ColumnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ColumnType::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_type_parse() {
        assert_eq!(ColumnType::parse("bool").unwrap(), ColumnType::Boolean);
        assert_eq!(ColumnType::parse("Numeric").unwrap(), ColumnType::Double);
        assert_eq!(ColumnType::parse("text").unwrap(), ColumnType::Varchar);
        assert!(ColumnType::parse("date").is_err());
    }

    #[test]
    fn column_type_coerce_is_idempotent() {
        let cells = [
            Cell::Boolean(true),
            Cell::text("FALSE"),
            Cell::text("x"),
            Cell::text(""),
            Cell::Number(0.0),
            Cell::Empty,
        ];
        for cell in &cells {
            let once = ColumnType::Boolean.coerce(SEARCH_NETWORK, cell).unwrap();
            let twice = ColumnType::Boolean.coerce(SEARCH_NETWORK, &once).unwrap();
            assert_eq!(once, twice);
        }

        let once = ColumnType::Double.coerce(DEFAULT_MAX_CPC, &Cell::text("1.2")).unwrap();
        assert_eq!(once, Cell::Number(1.2));
        assert_eq!(ColumnType::Double.coerce(DEFAULT_MAX_CPC, &once).unwrap(), once);
    }

    #[test]
    fn column_type_coerce_rejects_non_numeric() {
        let result = ColumnType::Double.coerce(DEFAULT_MAX_CPC, &Cell::text("cheap"));
        assert!(result.unwrap_err().to_string().contains("Default max. CPC"));
    }
}
