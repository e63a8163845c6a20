//! Offline schema migrations for formbook workbooks.
//!
//! Every run follows the same stages (see [`Stage`]): load and locate the sheet, copy the file to
//! a timestamped backup, transform, write back if anything changed, report. Nothing is mutated
//! unless the backup copy succeeded.

mod dates;
mod error;
mod migration;
mod policies;

pub use dates::{normalize_date_cell, parse_day_month_year, parse_general_date};
pub use error::MigrateError;
pub use migration::{backup_path_at, run, run_at, Migration, Report, Stage};
pub use policies::{NormalizeDates, Outcome, RemoveLegacyColumn, DATE_COLUMN, LEGACY_COLUMN};
