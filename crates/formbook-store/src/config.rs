use std::path::PathBuf;

use serde::Deserialize;

pub const ENV_DATA_DIR: &str = "FORMBOOK_DATA_DIR";
pub const ENV_COMPANY_FILE: &str = "FORMBOOK_COMPANY_FILE";
pub const ENV_FORM_FILE: &str = "FORMBOOK_FORM_FILE";

pub const DEFAULT_COMPANY_FILE: &str = "defined.xlsx";
pub const DEFAULT_FORM_FILE: &str = "saved_texts.xlsx";

/// Where the two workbooks live.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub company_file: PathBuf,
    pub form_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            company_file: PathBuf::from(DEFAULT_COMPANY_FILE),
            form_file: PathBuf::from(DEFAULT_FORM_FILE),
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `FORMBOOK_DATA_DIR`, `FORMBOOK_COMPANY_FILE` and
    /// `FORMBOOK_FORM_FILE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        if let Some(dir) = set(ENV_DATA_DIR) {
            config.data_dir = dir;
        }
        if let Some(file) = set(ENV_COMPANY_FILE) {
            config.company_file = file;
        }
        if let Some(file) = set(ENV_FORM_FILE) {
            config.form_file = file;
        }
        config
    }

    pub fn company_path(&self) -> PathBuf {
        self.data_dir.join(&self.company_file)
    }

    pub fn form_path(&self) -> PathBuf {
        self.data_dir.join(&self.form_file)
    }
}
