use crate::error::CampaignSheetError;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::SpreadsheetError;
use std::cmp::Ordering;
use std::collections::HashSet;

static EMPTY_CELL: Cell = Cell::Empty;

/// A header row plus data rows; every data row is exactly as wide as the header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sheet {
    /// Column names in display order
    columns: Vec<String>,
    /// Data rows, one cell per column
    rows: Vec<Vec<Cell>>,
}

/// Borrowed view of one data row, addressed by column name.
#[derive(Copy, Clone, Debug)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    /// Returns the cell under `column`, or an empty cell when the column is absent.
    pub fn get(&self, column: &str) -> &'a Cell {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|index| &self.cells[index])
            .unwrap_or(&EMPTY_CELL)
    }

    /// Returns the cell under `column` rendered as text.
    pub fn text(&self, column: &str) -> String {
        self.get(column).to_string()
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }

    pub fn columns(&self) -> &'a [String] {
        self.columns
    }
}

impl Sheet {
    /// Creates an empty sheet with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a sheet from raw values where the first row is the header.
    /// Short rows are padded with empty cells, since spreadsheet APIs drop trailing blanks.
    pub fn from_values(values: Vec<Vec<Cell>>) -> Result<Self, CampaignSheetError> {
        let mut values = values.into_iter();
        let header = values.next().ok_or(SpreadsheetError::MissingHeaderRow)?;
        let columns: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();
        let mut sheet = Sheet::new(columns);
        for (index, mut row) in values.enumerate() {
            if row.len() > sheet.columns.len() {
                Err(SpreadsheetError::RowTooWide {
                    row: index + 2,
                    width: row.len(),
                    columns: sheet.columns.len(),
                })?;
            }
            row.resize(sheet.columns.len(), Cell::Empty);
            sheet.rows.push(row);
        }
        Ok(sheet)
    }

    /// Renders the sheet back to raw values, header first.
    pub fn to_values(&self) -> Vec<Vec<Cell>> {
        let header = self.columns.iter().map(|name| Cell::text(name.as_str())).collect();
        std::iter::once(header).chain(self.rows.iter().cloned()).collect()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with the given name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Column names that occur more than once, in first-repeat order.
    pub fn duplicate_columns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for name in &self.columns {
            if !seen.insert(name.as_str()) && !duplicates.contains(&name.as_str()) {
                duplicates.push(name.as_str());
            }
        }
        duplicates
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    /// Appends a data row; its width must match the header.
    pub fn push_row(&mut self, cells: Vec<Cell>) -> Result<(), CampaignSheetError> {
        if cells.len() != self.columns.len() {
            Err(SpreadsheetError::RowWidthMismatch {
                width: cells.len(),
                columns: self.columns.len(),
            })?;
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Returns the cell at (`row`, `column`), or None if either is absent.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|cells| &cells[index])
    }

    /// Replaces the cell at (`row`, `column`). Missing targets are reported.
    pub fn set(&mut self, row: usize, column: &str, value: Cell) -> Result<(), CampaignSheetError> {
        let index = self
            .column_index(column)
            .ok_or_else(|| SpreadsheetError::MissingColumn(column.to_owned()))?;
        let cells = self
            .rows
            .get_mut(row)
            .ok_or(SpreadsheetError::RowOutOfRange(row))?;
        cells[index] = value;
        Ok(())
    }

    /// Appends a column filled with `value` unless it already exists; returns its index.
    pub fn ensure_column(&mut self, column: &str, value: Cell) -> usize {
        if let Some(index) = self.column_index(column) {
            return index;
        }
        self.columns.push(column.to_owned());
        for cells in &mut self.rows {
            cells.push(value.clone());
        }
        self.columns.len() - 1
    }

    /// Inserts a column at `index`; `cells` is padded or cut to one cell per data row.
    pub fn insert_column(&mut self, index: usize, column: &str, mut cells: Vec<Cell>) {
        cells.resize(self.rows.len(), Cell::Empty);
        let index = index.min(self.columns.len());
        self.columns.insert(index, column.to_owned());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.insert(index, cell);
        }
    }

    /// Removes every listed column that is present; absent names are ignored.
    pub fn drop_columns(&mut self, columns: &[&str]) {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|name| !columns.contains(&name.as_str()))
            .collect();
        if keep.iter().all(|keep| *keep) {
            return;
        }
        let mut flags = keep.iter();
        self.columns.retain(|_| *flags.next().unwrap_or(&true));
        for cells in &mut self.rows {
            let mut flags = keep.iter();
            cells.retain(|_| *flags.next().unwrap_or(&true));
        }
    }

    /// Applies `f` to every cell of `column`; a no-op when the column is absent.
    pub fn map_column<F>(&mut self, column: &str, mut f: F) -> Result<(), CampaignSheetError>
    where
        F: FnMut(&Cell) -> Result<Cell, CampaignSheetError>,
    {
        if let Some(index) = self.column_index(column) {
            for cells in &mut self.rows {
                cells[index] = f(&cells[index])?;
            }
        }
        Ok(())
    }

    /// Uppercases the text cells of `column`.
    pub fn uppercase_column(&mut self, column: &str) {
        if let Some(index) = self.column_index(column) {
            for cells in &mut self.rows {
                if let Cell::Text(value) = &mut cells[index] {
                    *value = value.to_uppercase();
                }
            }
        }
    }

    /// Keeps only the rows the predicate accepts, in their original order.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(Row<'_>) -> bool,
    {
        let columns = &self.columns;
        self.rows.retain(|cells| {
            keep(Row {
                columns,
                cells: cells.as_slice(),
            })
        });
    }

    /// Drops rows equal to an earlier row, keeping first occurrences.
    pub fn dedup_rows(&mut self) {
        let mut seen = HashSet::new();
        let rows = std::mem::take(&mut self.rows);
        for cells in rows {
            if !seen.contains(&cells) {
                seen.insert(cells.clone());
                self.rows.push(cells);
            }
        }
    }

    /// Stable ascending sort on the listed columns; empty cells sort last.
    pub fn sort_by_columns(&mut self, columns: &[&str]) {
        let indexes: Vec<usize> = columns
            .iter()
            .filter_map(|column| self.column_index(column))
            .collect();
        self.rows.sort_by(|a, b| {
            indexes
                .iter()
                .map(|index| compare_cells(&a[*index], &b[*index]))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Inner join on equal `on` columns. The result holds this sheet's columns followed by
    /// the other sheet's non-key columns, rows ordered by this sheet, then the other.
    pub fn inner_join(&self, other: &Sheet, on: &[&str]) -> Result<Sheet, CampaignSheetError> {
        let mut left_keys = Vec::with_capacity(on.len());
        let mut right_keys = Vec::with_capacity(on.len());
        for key in on {
            left_keys.push(self.column_index(key).ok_or_else(|| SpreadsheetError::MissingColumn(key.to_string()))?);
            right_keys.push(other.column_index(key).ok_or_else(|| SpreadsheetError::MissingColumn(key.to_string()))?);
        }
        let right_columns: Vec<usize> = (0..other.columns.len())
            .filter(|index| !right_keys.contains(index))
            .collect();
        let conflicts: Vec<String> = right_columns
            .iter()
            .map(|index| &other.columns[*index])
            .filter(|name| self.has_column(name))
            .cloned()
            .collect();
        if !conflicts.is_empty() {
            Err(SpreadsheetError::ColumnConflict(conflicts))?;
        }

        let mut columns = self.columns.clone();
        columns.extend(right_columns.iter().map(|index| other.columns[*index].clone()));
        let mut joined = Sheet::new(columns);
        for left in &self.rows {
            for right in &other.rows {
                let matched = left_keys
                    .iter()
                    .zip(&right_keys)
                    .all(|(l, r)| left[*l] == right[*r]);
                if matched {
                    let mut cells = left.clone();
                    cells.extend(right_columns.iter().map(|index| right[*index].clone()));
                    joined.rows.push(cells);
                }
            }
        }
        Ok(joined)
    }
}

/// Orders cells for sorting: values first, empty cells last.
fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    match (a, b) {
        (Cell::Empty, Cell::Empty) => Ordering::Equal,
        (Cell::Empty, _) => Ordering::Greater,
        (_, Cell::Empty) => Ordering::Less,
        (Cell::Number(a), Cell::Number(b)) => a.total_cmp(b),
        (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
