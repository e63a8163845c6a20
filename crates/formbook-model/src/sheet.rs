use crate::{CellValue, RowMap};

static EMPTY: CellValue = CellValue::Empty;

/// A named table: one header row followed by positional data rows.
///
/// Column position is the only binding between a header name and a row's cells. Rows may be
/// shorter than the header (missing cells read as empty); appends are always normalized to the
/// header width.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sheet {
    name: String,
    header: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, header: Vec<String>) -> Self {
        Self {
            name: name.into(),
            header,
            rows: Vec::new(),
        }
    }

    /// Rebuild a sheet read from disk. Trailing empty cells are dropped from each row.
    pub fn from_parts(
        name: impl Into<String>,
        header: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        let rows = rows
            .into_iter()
            .map(|mut row| {
                while row.last().is_some_and(CellValue::is_empty) {
                    row.pop();
                }
                row
            })
            .collect();
        Self {
            name: name.into(),
            header,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub(crate) fn set_header(&mut self, header: Vec<String>) {
        self.header = header;
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first header whose trimmed text equals `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name)
    }

    /// Append one row aligned to the header: extra values are dropped, missing ones padded
    /// empty. Returns the 0-based data row index.
    pub fn append_row(&mut self, mut values: Vec<CellValue>) -> usize {
        values.resize(self.header.len(), CellValue::Empty);
        self.rows.push(values);
        self.rows.len() - 1
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Overwrite one cell, padding a short row as needed. Out-of-range rows are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        let Some(cells) = self.rows.get_mut(row) else {
            return;
        };
        if cells.len() <= col {
            if value.is_empty() {
                return;
            }
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }

    /// Delete a column from the header and from every row, shifting later columns left.
    ///
    /// Returns the removed header name, or `None` if `col` is past the header.
    pub fn remove_column(&mut self, col: usize) -> Option<String> {
        if col >= self.header.len() {
            return None;
        }
        let removed = self.header.remove(col);
        for row in &mut self.rows {
            if col < row.len() {
                row.remove(col);
            }
        }
        Some(removed)
    }

    pub fn row_map(&self, row: usize) -> Option<RowMap> {
        self.rows
            .get(row)
            .map(|cells| RowMap::from_header(&self.header, cells))
    }

    pub fn last_row_map(&self) -> Option<RowMap> {
        self.row_map(self.rows.len().checked_sub(1)?)
    }

    /// Consume the sheet, yielding its rows as header-keyed maps in append order.
    pub fn into_row_maps(self) -> impl Iterator<Item = RowMap> {
        let header = self.header;
        self.rows
            .into_iter()
            .map(move |cells| RowMap::from_header(&header, &cells))
    }
}
