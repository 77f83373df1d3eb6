use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use std::fmt::Display;
use std::hash::Hash;
use std::hash::Hasher;

/// A single spreadsheet cell value.
#[derive(Clone, Debug, Default)]
pub enum Cell {
    /// Missing value (JSON `null`, or a short row padded to the header width)
    #[default]
    Empty,
    /// Textual value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value (true/false)
    Boolean(bool),
}

impl Cell {
    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Returns true if the cell is empty or holds an empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.is_empty(),
            _ => false,
        }
    }

    /// Returns the inner string of a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Number of characters in the rendered value, 0 for blank cells.
    pub fn char_len(&self) -> usize {
        match self {
            Cell::Empty => 0,
            Cell::Text(value) => value.chars().count(),
            _ => self.to_string().chars().count(),
        }
    }

    /// Interprets the cell as a flag.
    /// Text is matched case-insensitively against the usual spreadsheet spellings,
    /// returns None when the value carries no boolean meaning.
    pub fn to_flag(&self) -> Option<bool> {
        match self {
            Cell::Empty => None,
            Cell::Boolean(value) => Some(*value),
            Cell::Number(value) => Some(*value != 0.0),
            Cell::Text(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "y" => Some(true),
                "false" | "0" | "no" | "n" => Some(false),
                _ => None,
            },
        }
    }

    /// Converts the cell to boolean the way a spreadsheet truthiness check does:
    /// recognized flag spellings first, then "non-blank means true".
    pub fn to_boolean(&self) -> bool {
        self.to_flag().unwrap_or(!self.is_blank())
    }

    /// Converts the cell to double-precision floating point.
    pub fn to_double(&self) -> Result<f64, String> {
        match self {
            Cell::Number(value) => Ok(*value),
            Cell::Boolean(value) => Ok(if *value { 1.0 } else { 0.0 }),
            Cell::Text(value) => value
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("parse '{}' to double failed", value)),
            Cell::Empty => Err("parse empty cell to double failed".to_owned()),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(value) => write!(f, "{}", value),
            Cell::Boolean(value) => write!(f, "{}", if *value { "TRUE" } else { "FALSE" }),
            Cell::Number(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Boolean(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

// Numbers compare by bit pattern so that rows can be hashed for deduplication.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Empty, Cell::Empty) => true,
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Number(a), Cell::Number(b)) => a.to_bits() == b.to_bits(),
            (Cell::Boolean(a), Cell::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Empty => (),
            Cell::Text(value) => value.hash(state),
            Cell::Number(value) => value.to_bits().hash(state),
            Cell::Boolean(value) => value.hash(state),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_none(),
            Cell::Text(value) => serializer.serialize_str(value),
            Cell::Boolean(value) => serializer.serialize_bool(*value),
            // Spreadsheet numbers have no integer type; whole values go out as integers.
            Cell::Number(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => {
                serializer.serialize_i64(*value as i64)
            }
            Cell::Number(value) => serializer.serialize_f64(*value),
        }
    }
}

/// Wire representation of a cell, matched in declaration order.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawCell>::deserialize(deserializer)? {
            None => Cell::Empty,
            Some(RawCell::Boolean(value)) => Cell::Boolean(value),
            Some(RawCell::Number(value)) => Cell::Number(value),
            Some(RawCell::Text(value)) => Cell::Text(value),
        })
    }
}
