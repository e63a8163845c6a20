//! `formbook-model` defines the in-memory shape of a formbook document.
//!
//! A [`Document`] is an ordered list of [`Sheet`]s. Each sheet is a header row plus positional
//! data rows of [`CellValue`]s; [`RowMap`] is the header-keyed view handed to readers. The crate
//! has no I/O: the `.xlsx` codec and the store build on top of it.

mod date_system;
mod document;
mod row;
mod sheet;
mod sheet_name;
mod value;

pub use date_system::{datetime_to_excel_serial, excel_serial_to_datetime};
pub use document::{Document, LEGACY_SCHEMA_VERSION};
pub use row::{column_letter, RowMap};
pub use sheet::Sheet;
pub use sheet_name::{
    sheet_name_eq_case_insensitive, validate_sheet_name, SheetNameError, MAX_SHEET_NAME_LEN,
    SCHEMA_SHEET_NAME,
};
pub use value::{CellValue, JsonScalar};
