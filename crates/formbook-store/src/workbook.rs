use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use formbook_model::{CellValue, Document, Sheet};
use formbook_xlsx::SaveError;

use crate::error::{Result, StoreError};
use crate::table::TableSchema;

/// One on-disk workbook loaded fully into memory.
///
/// A `WorkbookStore` is a single load → mutate → persist cycle; it does no locking of its own.
/// [`crate::XlsxTableStore`] wraps it with the lock that serializes those cycles.
#[derive(Debug)]
pub struct WorkbookStore {
    path: PathBuf,
    doc: Document,
    exists: bool,
}

impl WorkbookStore {
    /// Load `path`, or start an empty document if the file does not exist yet.
    ///
    /// A file that exists but cannot be parsed is reported as [`StoreError::Corrupt`] and is
    /// never replaced by an empty document.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("{} does not exist yet; starting an empty workbook", path.display());
                return Ok(Self {
                    path,
                    doc: Document::new(),
                    exists: false,
                });
            }
            Err(source) if source.kind() == ErrorKind::PermissionDenied => {
                return Err(StoreError::PermissionDenied { path, source });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let doc = match formbook_xlsx::load_from_bytes(&bytes) {
            Ok(doc) => doc,
            Err(source) => return Err(StoreError::Corrupt { path, source }),
        };
        log::debug!(
            "loaded {} ({} bytes, {} sheets)",
            path.display(),
            bytes.len(),
            doc.sheets().len()
        );
        Ok(Self {
            path,
            doc,
            exists: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file existed on disk when it was opened.
    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Return the sheet named by `schema`, creating it with the schema header if absent.
    ///
    /// A sheet that exists but has an empty first row gets the schema header written into it,
    /// and counts as created. A newly created sheet also gets the schema version recorded in the
    /// marker sheet. Any other existing sheet is returned as-is, whatever its header. The boolean
    /// is `true` on creation.
    pub fn ensure_sheet(&mut self, schema: &TableSchema) -> Result<(&mut Sheet, bool)> {
        let (_, created) = self.doc.ensure_sheet(schema.sheet, schema.header)?;
        if created {
            self.doc.set_schema_version(schema.sheet, schema.version);
            log::info!(
                "creating sheet `{}` (schema v{}) in {}",
                schema.sheet,
                schema.version,
                self.path.display()
            );
        }
        let (sheet, _) = self.doc.ensure_sheet(schema.sheet, schema.header)?;
        Ok((sheet, created))
    }

    /// Append one row to the schema's sheet (creating it first if needed) and return its
    /// 0-based data row index. Does not persist.
    pub fn append(&mut self, schema: &TableSchema, values: Vec<CellValue>) -> Result<usize> {
        let (sheet, _) = self.ensure_sheet(schema)?;
        Ok(sheet.append_row(values))
    }

    /// Atomically replace the file on disk with the in-memory document.
    pub fn persist(&mut self) -> Result<()> {
        formbook_xlsx::save_to_path(&self.doc, &self.path).map_err(|source| match source {
            SaveError::Io { source, .. } if source.kind() == ErrorKind::PermissionDenied => {
                StoreError::PermissionDenied {
                    path: self.path.clone(),
                    source,
                }
            }
            source => StoreError::Save {
                path: self.path.clone(),
                source,
            },
        })?;
        self.exists = true;
        Ok(())
    }
}
