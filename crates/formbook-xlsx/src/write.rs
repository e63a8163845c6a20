use std::path::{Path, PathBuf};

use formbook_model::{
    datetime_to_excel_serial, CellValue, Document, Sheet, SCHEMA_SHEET_NAME,
};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;

const DATE_FORMAT: &str = "dd-mm-yyyy";
const DATETIME_FORMAT: &str = "dd-mm-yyyy hh:mm:ss";

/// Excel's hard grid limits.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("xlsx serialization failed: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("sheet `{sheet}` does not fit in an xlsx worksheet ({rows} rows x {cols} columns)")]
    TooLarge {
        sheet: String,
        rows: usize,
        cols: usize,
    },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("failed to replace `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Serialize a [`Document`] into `.xlsx` bytes.
///
/// Dates are written as 1900-system serial numbers carrying a `dd-mm-yyyy` display format (with
/// a time component when the value is not midnight). Schema versions, if any, go into a hidden
/// marker sheet after the data sheets.
pub fn write_to_bytes(doc: &Document) -> Result<Vec<u8>, WriteError> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    for sheet in doc.sheets() {
        check_bounds(sheet)?;
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name())?;

        for (col, name) in sheet.header().iter().enumerate() {
            if !name.is_empty() {
                worksheet.write_string(0, col as u16, name)?;
            }
        }
        for (row, cells) in sheet.rows().iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                write_cell(
                    worksheet,
                    row as u32 + 1,
                    col as u16,
                    cell,
                    &date_format,
                    &datetime_format,
                )?;
            }
        }
    }

    if !doc.is_empty() && !doc.schema_versions().is_empty() {
        let marker = workbook.add_worksheet();
        marker.set_name(SCHEMA_SHEET_NAME)?;
        marker.write_string(0, 0, "Sheet")?;
        marker.write_string(0, 1, "Version")?;
        for (idx, (sheet, version)) in doc.schema_versions().iter().enumerate() {
            let row = idx as u32 + 1;
            marker.write_string(row, 0, sheet)?;
            marker.write_number(row, 1, *version)?;
        }
        marker.set_hidden(true);
    }

    Ok(workbook.save_to_buffer()?)
}

/// Serialize `doc` and atomically replace `path` with the result.
///
/// The bytes are fully produced before the destination is touched, so a serialization failure
/// leaves any existing file as it was.
pub fn save_to_path(doc: &Document, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    let bytes = write_to_bytes(doc)?;
    formbook_fs::atomic_write_bytes(path, &bytes).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn check_bounds(sheet: &Sheet) -> Result<(), WriteError> {
    let rows = sheet.row_count() + 1;
    let cols = sheet
        .rows()
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(sheet.width()))
        .max()
        .unwrap_or(0);
    if rows > MAX_ROWS || cols > MAX_COLS {
        return Err(WriteError::TooLarge {
            sheet: sheet.name().to_string(),
            rows,
            cols,
        });
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    date_format: &Format,
    datetime_format: &Format,
) -> Result<(), XlsxError> {
    match cell {
        CellValue::Empty => {}
        CellValue::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        CellValue::Boolean(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::Date(dt) => match datetime_to_excel_serial(*dt) {
            Some(serial) => {
                let format = if serial.fract() == 0.0 {
                    date_format
                } else {
                    datetime_format
                };
                worksheet.write_number_with_format(row, col, serial, format)?;
            }
            // Before the 1900 epoch: no serial exists.
            None => {
                worksheet.write_string(row, col, cell.to_string())?;
            }
        },
    }
    Ok(())
}
