use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use formbook_model::{CellValue, RowMap};

use crate::error::{Result, StoreError};
use crate::workbook::WorkbookStore;

/// Name, header and current schema version of one logical table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSchema {
    pub sheet: &'static str,
    pub header: &'static [&'static str],
    pub version: u32,
}

/// An ordered table with a header schema, persisted somewhere.
///
/// Every call is a complete round trip against the backing storage: nothing is cached between
/// calls, so rows appended by one call are visible to the next.
pub trait TableStore: Send + Sync {
    /// Create the table with its header if it does not exist. Returns `true` on creation.
    fn ensure_table(&self, schema: &TableSchema) -> Result<bool>;

    /// Append one row aligned to the table's stored header and persist it. Returns the 0-based
    /// data row index.
    fn append(&self, schema: &TableSchema, values: Vec<CellValue>) -> Result<usize>;

    /// All data rows in append order. A missing table reads as empty.
    fn list_rows(&self, sheet: &str) -> Result<Rows>;

    /// The most recently appended row, or [`StoreError::NotFound`] if there is none.
    fn last_row(&self, sheet: &str) -> Result<RowMap>;
}

/// Header-keyed rows of one sheet, oldest first.
pub struct Rows {
    inner: Box<dyn Iterator<Item = RowMap> + Send>,
    remaining: usize,
}

impl Rows {
    pub fn empty() -> Self {
        Self {
            inner: Box::new(std::iter::empty()),
            remaining: 0,
        }
    }

    fn from_sheet(sheet: formbook_model::Sheet) -> Self {
        let remaining = sheet.row_count();
        Self {
            inner: Box::new(sheet.into_row_maps()),
            remaining,
        }
    }
}

impl Iterator for Rows {
    type Item = RowMap;

    fn next(&mut self) -> Option<RowMap> {
        let row = self.inner.next()?;
        self.remaining -= 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Rows {}

impl fmt::Debug for Rows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rows")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

/// [`TableStore`] over a single `.xlsx` file.
///
/// Clones share one lock, held across each whole load → mutate → write cycle, so concurrent
/// callers in one process never lose each other's appends. Other processes writing the same
/// file are not coordinated with.
#[derive(Clone, Debug)]
pub struct XlsxTableStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl XlsxTableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file for reading. `None` means the file does not exist yet.
    fn load(&self) -> Result<Option<WorkbookStore>> {
        let book = WorkbookStore::open(&self.path)?;
        Ok(book.exists().then_some(book))
    }
}

impl TableStore for XlsxTableStore {
    fn ensure_table(&self, schema: &TableSchema) -> Result<bool> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        let mut book = WorkbookStore::open(&self.path)?;
        let (_, created) = book.ensure_sheet(schema)?;
        if created {
            book.persist()?;
        }
        Ok(created)
    }

    fn append(&self, schema: &TableSchema, values: Vec<CellValue>) -> Result<usize> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        let mut book = WorkbookStore::open(&self.path)?;
        let row = book.append(schema, values)?;
        book.persist()?;
        log::debug!(
            "appended row {} to `{}` in {}",
            row + 1,
            schema.sheet,
            self.path.display()
        );
        Ok(row)
    }

    fn list_rows(&self, sheet: &str) -> Result<Rows> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        let Some(book) = self.load()? else {
            return Ok(Rows::empty());
        };
        Ok(book
            .into_document()
            .into_sheet(sheet)
            .map(Rows::from_sheet)
            .unwrap_or_else(Rows::empty))
    }

    fn last_row(&self, sheet: &str) -> Result<RowMap> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        let not_found = || StoreError::NotFound {
            path: self.path.clone(),
            sheet: sheet.to_string(),
        };
        let book = self.load()?.ok_or_else(not_found)?;
        book.document()
            .sheet(sheet)
            .and_then(|s| s.last_row_map())
            .ok_or_else(not_found)
    }
}
