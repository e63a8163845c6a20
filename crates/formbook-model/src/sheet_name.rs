use thiserror::Error;
use unicode_normalization::UnicodeNormalization as _;

/// Maximum sheet name length accepted by Excel.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Name of the hidden sheet that records per-sheet schema versions.
pub const SCHEMA_SHEET_NAME: &str = "_schema";

const INVALID_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SheetNameError {
    #[error("sheet name cannot be empty")]
    Empty,
    #[error("sheet name `{0}` is longer than 31 characters")]
    TooLong(String),
    #[error("sheet name `{name}` contains invalid character `{ch}`")]
    InvalidChar { name: String, ch: char },
    #[error("sheet name `{0}` is reserved")]
    Reserved(String),
    #[error("sheet name `{0}` conflicts with an existing sheet")]
    Duplicate(String),
}

/// Validate a user-facing sheet name.
pub fn validate_sheet_name(name: &str) -> Result<(), SheetNameError> {
    if name.trim().is_empty() {
        return Err(SheetNameError::Empty);
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(SheetNameError::TooLong(name.to_string()));
    }
    if let Some(ch) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(SheetNameError::InvalidChar {
            name: name.to_string(),
            ch,
        });
    }
    if sheet_name_eq_case_insensitive(name, SCHEMA_SHEET_NAME) {
        return Err(SheetNameError::Reserved(name.to_string()));
    }
    Ok(())
}

/// Excel compares sheet names case-insensitively across Unicode, not ASCII.
///
/// Approximated by NFKC-normalizing both inputs and applying Unicode uppercasing.
pub fn sheet_name_eq_case_insensitive(a: &str, b: &str) -> bool {
    a.nfkc()
        .flat_map(|c| c.to_uppercase())
        .eq(b.nfkc().flat_map(|c| c.to_uppercase()))
}
