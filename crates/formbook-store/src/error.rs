use std::path::PathBuf;

use formbook_model::SheetNameError;
use formbook_xlsx::{ReadError, SaveError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("workbook `{path}` is not a readable xlsx file: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: ReadError,
    },
    #[error("permission denied for workbook `{path}`: {source}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read workbook `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("sheet `{sheet}` of `{path}` has no data rows")]
    NotFound { path: PathBuf, sheet: String },
    #[error("invalid sheet name: {0}")]
    SheetName(#[from] SheetNameError),
    #[error("failed to save workbook `{path}`: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: SaveError,
    },
}

impl StoreError {
    /// True for failures that mean "there is nothing to read here" rather than a broken store.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
