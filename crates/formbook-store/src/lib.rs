//! Spreadsheet-backed record store.
//!
//! [`WorkbookStore`] is one load → mutate → persist cycle over an `.xlsx` file.
//! [`XlsxTableStore`] implements the [`TableStore`] seam on top of it, serializing those cycles
//! behind an in-process lock. [`FormService`] is the request-handler layer: typed records in,
//! serde response bodies out.

mod config;
mod error;
mod records;
mod service;
mod table;
mod workbook;

pub use config::{
    StoreConfig, DEFAULT_COMPANY_FILE, DEFAULT_FORM_FILE, ENV_COMPANY_FILE, ENV_DATA_DIR,
    ENV_FORM_FILE,
};
pub use error::{Result, StoreError};
pub use records::{CompanyRecord, FormRecord, COMPANIES, FORMS};
pub use service::{
    Ack, FormService, Identity, LastEntry, Profile, ProfileUser, Rejection, Status,
};
pub use table::{Rows, TableSchema, TableStore, XlsxTableStore};
pub use workbook::WorkbookStore;
