use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use formbook_model::{excel_serial_to_datetime, CellValue, Document, Sheet, SCHEMA_SHEET_NAME};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a readable xlsx workbook: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error("invalid sheet `{sheet}`: {source}")]
    InvalidSheet {
        sheet: String,
        #[source]
        source: formbook_model::SheetNameError,
    },
}

/// Read a whole `.xlsx` file into a [`Document`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Document, ReadError> {
    let bytes = std::fs::read(path)?;
    load_from_bytes(&bytes)
}

/// Read an in-memory `.xlsx` package into a [`Document`].
///
/// Row 1 of every sheet becomes its header (cells read as trimmed text); later rows become data
/// rows. Date-formatted numeric cells are read back as [`CellValue::Date`]. The reserved
/// schema-marker sheet is folded into the document's schema versions instead of its sheets.
pub fn load_from_bytes(bytes: &[u8]) -> Result<Document, ReadError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let mut doc = Document::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let (header, rows) = grid_from_range(&range);

        if name == SCHEMA_SHEET_NAME {
            read_schema_versions(&mut doc, &rows);
            continue;
        }

        let sheet = Sheet::from_parts(name.clone(), header, rows);
        doc.add_sheet(sheet)
            .map_err(|source| ReadError::InvalidSheet { sheet: name, source })?;
    }

    Ok(doc)
}

/// Split a worksheet range into (header, data rows) using absolute sheet coordinates.
///
/// Data rows with no non-empty cell are skipped.
fn grid_from_range(range: &Range<Data>) -> (Vec<String>, Vec<Vec<CellValue>>) {
    let (Some((start_row, start_col)), Some((end_row, _))) = (range.start(), range.end()) else {
        return (Vec::new(), Vec::new());
    };

    let mut grid: Vec<Vec<CellValue>> = vec![Vec::new(); end_row as usize + 1];
    for (row, col, cell) in range.cells() {
        let value = interpret_cell(cell);
        if value.is_empty() {
            continue;
        }
        let row = start_row as usize + row;
        let col = start_col as usize + col;
        let cells = &mut grid[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }

    let mut rows = grid.into_iter();
    let header = rows
        .next()
        .unwrap_or_default()
        .into_iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    (header, rows.filter(|cells| !cells.is_empty()).collect())
}

fn interpret_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) if dt.is_datetime() => excel_serial_to_datetime(dt.as_f64())
            .map(CellValue::Date)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(e.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn read_schema_versions(doc: &mut Document, rows: &[Vec<CellValue>]) {
    for row in rows {
        let Some(sheet) = row.first().and_then(CellValue::as_str) else {
            continue;
        };
        let version = match row.get(1) {
            Some(CellValue::Number(n)) if *n >= 1.0 => *n as u32,
            Some(CellValue::String(s)) => match s.trim().parse::<u32>() {
                Ok(v) if v >= 1 => v,
                _ => continue,
            },
            _ => continue,
        };
        doc.set_schema_version(sheet, version);
    }
}
