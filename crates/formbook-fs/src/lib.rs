//! Filesystem helpers shared by the store and the migrators.
//!
//! Documents are always rewritten whole, so every save goes through [`atomic_write`]:
//! - write to a temp file in the destination directory (no cross-device renames)
//! - flush + `sync_all`
//! - rename into place, replacing the previous file
//!
//! Migrations additionally take a [`backup_copy`] of the document first. Backups are never
//! overwritten and never deleted by this crate.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Failure of [`atomic_write`]: either the filesystem or the caller's writer.
#[derive(Debug, Error)]
pub enum AtomicWriteError<E> {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialize error: {0}")]
    Writer(#[source] E),
}

/// Directory that holds `path`.
///
/// `Path::parent` returns `Some("")` for bare relative names like `saved_texts.xlsx`; those live
/// in the current directory.
pub fn parent_dir_or_dot(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Atomically replace `dest` with whatever `write_fn` writes into a temp file.
///
/// Parent directories are created if needed. If `write_fn` fails, or any step before the rename
/// fails, `dest` is left untouched and the temp file is removed.
pub fn atomic_write<T, E>(
    dest: impl AsRef<Path>,
    write_fn: impl FnOnce(&mut File) -> Result<T, E>,
) -> Result<T, AtomicWriteError<E>> {
    let dest = dest.as_ref();
    let dir = parent_dir_or_dot(dest);
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    let out = write_fn(tmp.as_file_mut()).map_err(AtomicWriteError::Writer)?;

    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;

    persist_replacing(tmp, dest)?;

    // The file is already in place; a failed directory sync is not a failed write.
    let _ = sync_parent_dir(dest);

    Ok(out)
}

/// Atomically replace `dest` with `bytes`.
pub fn atomic_write_bytes(dest: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    atomic_write(dest, |file| file.write_all(bytes)).map_err(|err| match err {
        AtomicWriteError::Io(err) => err,
        AtomicWriteError::Writer(err) => err,
    })
}

fn persist_replacing(tmp: NamedTempFile, dest: &Path) -> io::Result<()> {
    match tmp.persist(dest) {
        Ok(_) => Ok(()),
        Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
            // Some filesystems refuse to rename over an existing file.
            let _ = fs::remove_file(dest);
            err.file.persist(dest).map(|_| ()).map_err(|e| e.error)
        }
        Err(err) => Err(err.error),
    }
}

fn sync_parent_dir(path: &Path) -> io::Result<()> {
    // Opening a directory as a file is not supported everywhere; callers treat this as
    // best-effort.
    File::open(parent_dir_or_dot(path))?.sync_all()
}

/// Sibling path used for a backup of `source` taken at `stamp`.
///
/// `saved_texts.xlsx` + `2024-03-05T10-20-30-000Z` becomes
/// `saved_texts.backup.2024-03-05T10-20-30-000Z.xlsx`.
pub fn backup_path(source: impl AsRef<Path>, stamp: &str) -> PathBuf {
    let source = source.as_ref();
    let dir = parent_dir_or_dot(source);
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match source.extension() {
        Some(ext) => format!("{stem}.backup.{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}.backup.{stamp}"),
    };
    dir.join(name)
}

/// Copy `source` to `dest` byte-for-byte and sync it to disk.
///
/// Fails with [`io::ErrorKind::AlreadyExists`] instead of overwriting an existing `dest`; a
/// partially written copy is removed before the error is returned.
pub fn backup_copy(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> io::Result<u64> {
    let source = source.as_ref();
    let dest = dest.as_ref();

    let mut input = File::open(source)?;
    let mut output = OpenOptions::new().write(true).create_new(true).open(dest)?;

    let copied = io::copy(&mut input, &mut output).and_then(|n| {
        output.sync_all()?;
        Ok(n)
    });
    if copied.is_err() {
        drop(output);
        let _ = fs::remove_file(dest);
    }
    copied
}
