use formbook_model::{Document, Sheet};
use formbook_store::FORMS;

use crate::dates::normalize_date_cell;
use crate::error::MigrateError;
use crate::migration::Migration;

pub const DATE_COLUMN: &str = "Date";
pub const LEGACY_COLUMN: &str = "General Text Input";

/// What a transform did to its sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    DatesNormalized {
        cells_updated: usize,
    },
    ColumnRemoved {
        column: String,
        /// Schema version the sheet is now at.
        version: u32,
        /// 0-based position the column occupied.
        position: usize,
        headers_before: Vec<String>,
        headers_after: Vec<String>,
    },
    /// The sheet has no legacy column to remove.
    NoLegacyColumn { headers: Vec<String> },
    /// The schema marker already records the target version.
    AlreadyMigrated { version: u32, headers: Vec<String> },
}

impl Outcome {
    /// Whether the document was modified and needs writing back.
    pub fn changed(&self) -> bool {
        match self {
            Outcome::DatesNormalized { cells_updated } => *cells_updated > 0,
            Outcome::ColumnRemoved { .. } => true,
            Outcome::NoLegacyColumn { .. } | Outcome::AlreadyMigrated { .. } => false,
        }
    }

    /// New schema version to record for the sheet, if the transform bumped it.
    pub fn schema_version(&self) -> Option<u32> {
        match self {
            Outcome::ColumnRemoved { version, .. } => Some(*version),
            _ => None,
        }
    }
}

/// Coerce every cell of the `Date` column of the form sheet to a date-only value.
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizeDates;

impl Migration for NormalizeDates {
    fn name(&self) -> &'static str {
        "normalize dates"
    }

    fn select_sheet(&self, doc: &Document) -> Option<String> {
        doc.sheet(FORMS.sheet).map(|s| s.name().to_string())
    }

    fn expected_sheet(&self) -> &'static str {
        FORMS.sheet
    }

    fn transform(&self, sheet: &mut Sheet, _schema_version: u32) -> Result<Outcome, MigrateError> {
        let col = sheet
            .column_index(DATE_COLUMN)
            .ok_or_else(|| MigrateError::MissingColumn {
                sheet: sheet.name().to_string(),
                column: DATE_COLUMN.to_string(),
            })?;

        let mut cells_updated = 0;
        for row in 0..sheet.row_count() {
            if let Some(value) = normalize_date_cell(sheet.cell(row, col)) {
                sheet.set_cell(row, col, value);
                cells_updated += 1;
            }
        }
        Ok(Outcome::DatesNormalized { cells_updated })
    }
}

/// Drop the legacy `General Text Input` column from the form sheet and record schema version 2.
///
/// Falls back to the first sheet when the form sheet is missing.
#[derive(Clone, Copy, Debug, Default)]
pub struct RemoveLegacyColumn;

impl Migration for RemoveLegacyColumn {
    fn name(&self) -> &'static str {
        "remove legacy column"
    }

    fn select_sheet(&self, doc: &Document) -> Option<String> {
        doc.sheet(FORMS.sheet)
            .or_else(|| doc.sheets().first())
            .map(|s| s.name().to_string())
    }

    fn expected_sheet(&self) -> &'static str {
        FORMS.sheet
    }

    fn transform(&self, sheet: &mut Sheet, schema_version: u32) -> Result<Outcome, MigrateError> {
        let headers_before = sheet.header().to_vec();

        if schema_version >= FORMS.version {
            return Ok(Outcome::AlreadyMigrated {
                version: schema_version,
                headers: headers_before,
            });
        }

        let Some(position) = sheet.column_index(LEGACY_COLUMN) else {
            return Ok(Outcome::NoLegacyColumn {
                headers: headers_before,
            });
        };
        let column = sheet.remove_column(position).unwrap_or_default();
        let headers_after = sheet.header().to_vec();

        Ok(Outcome::ColumnRemoved {
            column,
            version: FORMS.version,
            position,
            headers_before,
            headers_after,
        })
    }
}
