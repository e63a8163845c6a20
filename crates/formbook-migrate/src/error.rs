use std::path::PathBuf;

use formbook_xlsx::{ReadError, SaveError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("workbook `{path}` not found")]
    FileNotFound { path: PathBuf },
    #[error("failed to read workbook `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("workbook `{path}` is not a readable xlsx file: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: ReadError,
    },
    #[error("worksheet `{sheet}` not found in `{path}`")]
    SheetNotFound { path: PathBuf, sheet: String },
    #[error("`{column}` column not found in worksheet `{sheet}`")]
    MissingColumn { sheet: String, column: String },
    #[error("failed to back up `{path}` to `{backup}`: {source}")]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write migrated workbook `{path}`: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: SaveError,
    },
}
