//! Column families: groups of columns selected by name pattern, resolved once per sheet.

use crate::spreadsheet::Sheet;
use glob::Pattern;

/// A named group of columns such as all headlines or all sitelink texts.
#[derive(Clone, Debug)]
pub struct ColumnFamily {
    pattern: Pattern,
}

impl ColumnFamily {
    /// Columns whose name starts with `prefix`.
    pub fn prefix(prefix: &str) -> Self {
        Self::from_pattern(&format!("{}*", Pattern::escape(prefix)))
    }

    /// Columns whose name contains `fragment`.
    pub fn containing(fragment: &str) -> Self {
        Self::from_pattern(&format!("*{}*", Pattern::escape(fragment)))
    }

    /// Columns whose name starts with `prefix` and ends with `suffix`.
    pub fn between(prefix: &str, suffix: &str) -> Self {
        Self::from_pattern(&format!("{}*{}", Pattern::escape(prefix), Pattern::escape(suffix)))
    }

    fn from_pattern(pattern: &str) -> Self {
        Self {
            pattern: Pattern::new(pattern).expect("Escaped glob pattern"),
        }
    }

    pub fn matches(&self, column: &str) -> bool {
        self.pattern.matches(column)
    }

    /// Names of the matching columns of `sheet`, in sheet order.
    pub fn resolve<'a>(&self, sheet: &'a Sheet) -> Vec<&'a str> {
        sheet
            .columns()
            .iter()
            .map(String::as_str)
            .filter(|column| self.matches(column))
            .collect()
    }
}

/// Names matching any of `families`, in sheet order, each listed once.
pub fn resolve_any<'a>(families: &[ColumnFamily], sheet: &'a Sheet) -> Vec<&'a str> {
    sheet
        .columns()
        .iter()
        .map(String::as_str)
        .filter(|column| families.iter().any(|family| family.matches(column)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::Cell;

    fn header(columns: &[&str]) -> Sheet {
        Sheet::from_values(vec![columns.iter().map(|column| Cell::text(*column)).collect()]).unwrap()
    }

    #[test]
    fn family_prefix() {
        let sheet = header(&["Include Location 1", "Country", "Include Location 2", "Exclude Location 1"]);
        assert_eq!(
            ColumnFamily::prefix("Include Location").resolve(&sheet),
            vec!["Include Location 1", "Include Location 2"]
        );
    }

    #[test]
    fn family_containing_and_between() {
        let sheet = header(&["Headline 1", "Long Headline", "Sitelink 1 Text", "Sitelink 1 Final URL", "Description Line 1"]);
        assert_eq!(ColumnFamily::containing("Headline").resolve(&sheet), vec!["Headline 1", "Long Headline"]);
        assert_eq!(ColumnFamily::between("Sitelink", "Text").resolve(&sheet), vec!["Sitelink 1 Text"]);
    }

    #[test]
    fn family_escapes_special_characters() {
        let sheet = header(&["Price [EUR]", "Price E"]);
        assert_eq!(ColumnFamily::prefix("Price [EUR]").resolve(&sheet), vec!["Price [EUR]"]);
    }

    #[test]
    fn family_resolve_any_keeps_sheet_order() {
        let sheet = header(&["Sitelink 1 Text", "Include Location 1", "Country"]);
        let families = [ColumnFamily::prefix("Include Location"), ColumnFamily::prefix("Sitelink")];
        assert_eq!(resolve_any(&families, &sheet), vec!["Sitelink 1 Text", "Include Location 1"]);
    }
}
