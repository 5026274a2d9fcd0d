//! Header-to-column binding
//!
//! Each record field is described by an ordered [`ColumnSpec`]. A field
//! binds to the left-most header cell that contains one of its labels (or
//! equals one of its exact labels) and contains none of its exclusions.
//! Fields with no matching header read as empty.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::grid::{parse_cell_date, Cell, Grid, EMPTY_CELL};

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub field: &'static str,
    /// Substrings, any of which identifies the column.
    pub labels: &'static [&'static str],
    /// Whole header texts that identify the column.
    pub exact: &'static [&'static str],
    /// Substrings that disqualify an otherwise matching header.
    pub exclude: &'static [&'static str],
}

impl ColumnSpec {
    pub const fn new(field: &'static str, labels: &'static [&'static str]) -> Self {
        Self {
            field,
            labels,
            exact: &[],
            exclude: &[],
        }
    }

    pub const fn exact(mut self, exact: &'static [&'static str]) -> Self {
        self.exact = exact;
        self
    }

    pub const fn excluding(mut self, exclude: &'static [&'static str]) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn matches(&self, header: &str) -> bool {
        if self.exclude.iter().any(|label| header.contains(label)) {
            return false;
        }
        self.labels.iter().any(|label| header.contains(label))
            || self.exact.iter().any(|label| header == *label)
    }
}

/// Field name to column index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnBinding {
    columns: BTreeMap<&'static str, usize>,
}

impl ColumnBinding {
    pub fn column(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn cell<'a>(&self, row: &'a [Cell], field: &str) -> &'a Cell {
        self.column(field)
            .and_then(|column| row.get(column))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// Bind every spec to its left-most matching header cell.
pub fn bind_columns(header: &[Cell], specs: &[ColumnSpec]) -> ColumnBinding {
    let texts: Vec<String> = header
        .iter()
        .map(|cell| cell.as_text().unwrap_or_default())
        .collect();

    let columns = specs
        .iter()
        .filter_map(|spec| {
            texts
                .iter()
                .position(|text| spec.matches(text))
                .map(|column| (spec.field, column))
        })
        .collect();

    ColumnBinding { columns }
}

/// One data row seen through a column binding.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    /// Index of the row in the grid.
    pub index: usize,
    cells: &'a [Cell],
    binding: &'a ColumnBinding,
}

impl<'a> RowView<'a> {
    pub fn new(index: usize, cells: &'a [Cell], binding: &'a ColumnBinding) -> Self {
        Self {
            index,
            cells,
            binding,
        }
    }

    pub fn cell(&self, field: &str) -> &'a Cell {
        self.binding.cell(self.cells, field)
    }

    pub fn text(&self, field: &str) -> Option<String> {
        self.cell(field).as_text()
    }

    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        parse_cell_date(self.cell(field))
    }

    /// Positive count; zero and unparsable cells read as `None`.
    pub fn count(&self, field: &str) -> Option<u32> {
        self.cell(field).as_u32().filter(|n| *n > 0)
    }
}

/// Map the rows below `header_row` into records.
///
/// A row is kept only when at least one of the `keys` fields has a value;
/// other rows are skipped entirely.
pub fn map_rows<T>(
    grid: &Grid,
    header_row: usize,
    specs: &[ColumnSpec],
    keys: &[&str],
    mut build: impl FnMut(&RowView<'_>) -> T,
) -> Vec<T> {
    let Some(header) = grid.get(header_row) else {
        return Vec::new();
    };
    let binding = bind_columns(header, specs);

    grid.iter()
        .enumerate()
        .skip(header_row + 1)
        .map(|(index, cells)| RowView::new(index, cells, &binding))
        .filter(|row| keys.iter().any(|key| !row.cell(key).is_empty()))
        .map(|row| build(&row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(labels: &[&str]) -> Vec<Cell> {
        labels.iter().map(|label| Cell::text(*label)).collect()
    }

    #[test]
    fn test_left_most_column_wins() {
        let specs = [ColumnSpec::new("name", &["姓名"])];
        let binding = bind_columns(&header(&["序号", "罪犯姓名", "家属姓名"]), &specs);
        assert_eq!(binding.column("name"), Some(1));
    }

    #[test]
    fn test_exact_and_excluded_labels() {
        let specs = [
            ColumnSpec::new("name", &["罪犯姓名"]).exact(&["姓名"]),
            ColumnSpec::new("original_term", &["原判刑期"]).excluding(&["起日", "止日"]),
        ];
        let binding = bind_columns(
            &header(&["家属姓名", "姓名", "原判刑期起日", "原判刑期"]),
            &specs,
        );
        assert_eq!(binding.column("name"), Some(1));
        assert_eq!(binding.column("original_term"), Some(3));
    }

    #[test]
    fn test_missing_field_reads_empty() {
        let binding = bind_columns(&header(&["序号"]), &[ColumnSpec::new("name", &["姓名"])]);
        assert!(binding.is_empty());
        assert_eq!(binding.cell(&[Cell::text("x")], "name"), &Cell::Empty);
    }

    #[test]
    fn test_rows_without_key_are_skipped() {
        let grid = vec![
            header(&["罪犯编号", "姓名"]),
            vec![Cell::text("3201"), Cell::text("张三")],
            vec![Cell::Empty, Cell::text("李四")],
            vec![Cell::text("  "), Cell::text("王五")],
            vec![Cell::Number(3202.0)],
        ];
        let specs = [
            ColumnSpec::new("prisoner_id", &["罪犯编号"]),
            ColumnSpec::new("name", &["姓名"]),
        ];

        let rows = map_rows(&grid, 0, &specs, &["prisoner_id"], |row| {
            (row.index, row.text("prisoner_id"), row.text("name"))
        });
        assert_eq!(
            rows,
            vec![
                (1, Some("3201".to_string()), Some("张三".to_string())),
                (4, Some("3202".to_string()), None),
            ]
        );
    }
}
