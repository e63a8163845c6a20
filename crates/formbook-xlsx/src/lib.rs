//! `.xlsx` codec for formbook [`Document`](formbook_model::Document)s.
//!
//! Reading goes through `calamine`, writing through `rust_xlsxwriter`. Saving to disk is atomic:
//! the workbook is serialized to memory first and then swapped into place with
//! [`formbook_fs::atomic_write_bytes`].

mod read;
mod write;

pub use read::{load_from_bytes, load_from_path, ReadError};
pub use write::{save_to_path, write_to_bytes, SaveError, WriteError};
