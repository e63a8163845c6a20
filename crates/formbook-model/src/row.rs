use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::CellValue;

/// One data row keyed by its sheet's header names, in header order.
///
/// Every positional cell gets a key: blank header names are keyed by their column letter
/// (`"D"`), and a repeated header name is keyed as `"Name (D)"` so no cell is shadowed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowMap {
    entries: Vec<(String, CellValue)>,
}

impl RowMap {
    /// Zip a header with a row. Missing trailing cells read as empty; cells past the header are
    /// ignored.
    pub fn from_header(header: &[String], row: &[CellValue]) -> Self {
        let mut entries: Vec<(String, CellValue)> = Vec::with_capacity(header.len());
        for (col, name) in header.iter().enumerate() {
            let name = name.trim();
            let key = if name.is_empty() {
                column_letter(col)
            } else if entries.iter().any(|(k, _)| k == name) {
                format!("{name} ({})", column_letter(col))
            } else {
                name.to_string()
            };
            entries.push((key, row.get(col).cloned().unwrap_or_default()));
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Text of a cell, or `None` when the key is missing or the cell is empty.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            CellValue::Empty => None,
            other => Some(other.to_string()),
        }
    }
}

impl Serialize for RowMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, &value.to_json())?;
        }
        map.end()
    }
}

/// A1-style column letters for a 0-based column index (`0` → `A`, `26` → `AA`).
pub fn column_letter(col: usize) -> String {
    let mut n = col + 1;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}
