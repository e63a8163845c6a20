use std::collections::BTreeMap;

use crate::sheet_name::{sheet_name_eq_case_insensitive, validate_sheet_name, SheetNameError};
use crate::Sheet;

/// Schema version implied for a sheet that has no entry in the marker sheet.
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// An in-memory workbook: ordered sheets plus per-sheet schema versions.
///
/// The schema versions are persisted in a reserved hidden sheet by the codec; they never appear
/// in [`Document::sheets`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    sheets: Vec<Sheet>,
    schema_versions: BTreeMap<String, u32>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(Sheet::name)
    }

    /// Look up a sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name() == name)
    }

    /// Consume the document, keeping only the sheet called `name`.
    pub fn into_sheet(self, name: &str) -> Option<Sheet> {
        self.sheets.into_iter().find(|s| s.name() == name)
    }

    /// Append a sheet, rejecting invalid names and names that collide (case-insensitively) with
    /// an existing sheet.
    pub fn add_sheet(&mut self, sheet: Sheet) -> Result<&mut Sheet, SheetNameError> {
        validate_sheet_name(sheet.name())?;
        if self
            .sheets
            .iter()
            .any(|s| sheet_name_eq_case_insensitive(s.name(), sheet.name()))
        {
            return Err(SheetNameError::Duplicate(sheet.name().to_string()));
        }
        self.sheets.push(sheet);
        let last = self.sheets.len() - 1;
        Ok(&mut self.sheets[last])
    }

    /// Return the sheet called `name`, creating it with `header` as its first row if absent.
    ///
    /// The boolean is `true` when the sheet was created, or when it existed with an empty first
    /// row and `header` was written into it. Otherwise an existing sheet keeps its own header
    /// even when it differs from `header`.
    pub fn ensure_sheet(
        &mut self,
        name: &str,
        header: &[&str],
    ) -> Result<(&mut Sheet, bool), SheetNameError> {
        let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
        if let Some(idx) = self.sheets.iter().position(|s| s.name() == name) {
            let sheet = &mut self.sheets[idx];
            let filled = sheet.header().is_empty() && !header.is_empty();
            if filled {
                sheet.set_header(header);
            }
            return Ok((sheet, filled));
        }
        let sheet = self.add_sheet(Sheet::new(name, header))?;
        Ok((sheet, true))
    }

    /// Schema version recorded for `sheet`, [`LEGACY_SCHEMA_VERSION`] if none.
    pub fn schema_version(&self, sheet: &str) -> u32 {
        self.schema_versions
            .get(sheet)
            .copied()
            .unwrap_or(LEGACY_SCHEMA_VERSION)
    }

    pub fn set_schema_version(&mut self, sheet: &str, version: u32) {
        self.schema_versions.insert(sheet.to_string(), version);
    }

    pub fn schema_versions(&self) -> &BTreeMap<String, u32> {
        &self.schema_versions
    }
}
