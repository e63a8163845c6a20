use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use formbook_model::{Document, Sheet};

use crate::error::MigrateError;
use crate::policies::Outcome;

/// Steps of one migration run, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Load,
    Backup,
    Transform,
    Write,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Load => "load",
            Stage::Backup => "backup",
            Stage::Transform => "transform",
            Stage::Write => "write",
            Stage::Report => "report",
        })
    }
}

/// One rewrite policy applied by [`run`].
pub trait Migration {
    /// Human-readable name used in logs.
    fn name(&self) -> &'static str;

    /// The sheet this migration rewrites, if `doc` has one.
    fn select_sheet(&self, doc: &Document) -> Option<String>;

    /// Sheet name reported when [`Migration::select_sheet`] finds nothing.
    fn expected_sheet(&self) -> &'static str;

    /// Rewrite `sheet` in place. `schema_version` is the version currently recorded for it.
    fn transform(&self, sheet: &mut Sheet, schema_version: u32) -> Result<Outcome, MigrateError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub source: PathBuf,
    pub backup: PathBuf,
    pub sheet: String,
    pub outcome: Outcome,
    /// Whether the source file was rewritten.
    pub written: bool,
}

/// Run `migration` against the workbook at `path`, stamping the backup with the current time.
pub fn run(path: impl AsRef<Path>, migration: &dyn Migration) -> Result<Report, MigrateError> {
    run_at(path, migration, Utc::now())
}

/// Run `migration` against the workbook at `path`, stamping the backup with `now`.
///
/// The file is parsed and the target sheet located before anything is touched; then a
/// timestamped copy is taken next to it; only after the copy succeeds is the sheet transformed
/// and, if anything changed, the file atomically replaced.
pub fn run_at(
    path: impl AsRef<Path>,
    migration: &dyn Migration,
    now: DateTime<Utc>,
) -> Result<Report, MigrateError> {
    let path = path.as_ref();

    log::info!("{}: {} ({})", Stage::Load, path.display(), migration.name());
    let mut doc = load(path)?;
    let sheet_not_found = || MigrateError::SheetNotFound {
        path: path.to_path_buf(),
        sheet: migration.expected_sheet().to_string(),
    };
    let sheet = migration.select_sheet(&doc).ok_or_else(sheet_not_found)?;

    let backup = backup(path, now)?;

    log::info!("{}: sheet `{sheet}`", Stage::Transform);
    let version = doc.schema_version(&sheet);
    let target = doc.sheet_mut(&sheet).ok_or_else(sheet_not_found)?;
    let outcome = migration.transform(target, version)?;
    if let Some(version) = outcome.schema_version() {
        doc.set_schema_version(&sheet, version);
    }

    let written = outcome.changed();
    if written {
        log::info!("{}: {}", Stage::Write, path.display());
        formbook_xlsx::save_to_path(&doc, path).map_err(|source| MigrateError::Save {
            path: path.to_path_buf(),
            source,
        })?;
    } else {
        log::info!("{}: nothing changed, leaving {} as is", Stage::Write, path.display());
    }

    log::info!("{}: {outcome:?}", Stage::Report);
    Ok(Report {
        source: path.to_path_buf(),
        backup,
        sheet,
        outcome,
        written,
    })
}

fn load(path: &Path) -> Result<Document, MigrateError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => MigrateError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => MigrateError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    formbook_xlsx::load_from_bytes(&bytes).map_err(|source| MigrateError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Where [`run_at`] copies `path` before a run started at `now`.
pub fn backup_path_at(path: impl AsRef<Path>, now: DateTime<Utc>) -> PathBuf {
    let stamp = now.format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string();
    formbook_fs::backup_path(path, &stamp)
}

fn backup(path: &Path, now: DateTime<Utc>) -> Result<PathBuf, MigrateError> {
    let backup = backup_path_at(path, now);
    log::info!("{}: {} -> {}", Stage::Backup, path.display(), backup.display());
    formbook_fs::backup_copy(path, &backup).map_err(|source| MigrateError::Backup {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source,
    })?;
    Ok(backup)
}
