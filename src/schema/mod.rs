//! Column vocabulary of the campaign sheets: well-known column names, coercion
//! types, and pattern-based column families.
pub mod column;
pub mod family;

pub use column::ColumnError;
pub use column::ColumnType;
pub use family::ColumnFamily;
