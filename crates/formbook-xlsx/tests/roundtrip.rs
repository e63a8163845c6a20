use std::io::Cursor;

use calamine::{Reader, SheetVisible, Xlsx};
use chrono::NaiveDate;
use formbook_model::{CellValue, Document, Sheet};
use formbook_xlsx::{load_from_bytes, load_from_path, save_to_path, write_to_bytes, ReadError};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{Format, Workbook};

fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn document_survives_save_and_reload() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
    let stamp = date.and_hms_opt(9, 30, 15).expect("valid time");

    let mut doc = Document::new();
    let sheet = doc
        .add_sheet(Sheet::new("User Details", header(&["Timestamp", "Date", "Count", "Ok"])))
        .expect("add sheet");
    sheet.append_row(vec![
        CellValue::Date(stamp),
        CellValue::date_only(date),
        CellValue::Number(3.0),
        CellValue::Boolean(true),
    ]);
    sheet.append_row(vec![CellValue::from("text only")]);
    doc.add_sheet(Sheet::new("Companies", header(&["CompanyName"])))
        .expect("add sheet");

    let bytes = write_to_bytes(&doc).expect("write");
    let back = load_from_bytes(&bytes).expect("read");

    assert_eq!(back.sheet_names().collect::<Vec<_>>(), vec!["User Details", "Companies"]);
    let sheet = back.sheet("User Details").expect("sheet");
    assert_eq!(sheet.header(), ["Timestamp", "Date", "Count", "Ok"]);
    assert_eq!(
        sheet.rows()[0],
        vec![
            CellValue::Date(stamp),
            CellValue::date_only(date),
            CellValue::Number(3.0),
            CellValue::Boolean(true),
        ]
    );
    assert_eq!(sheet.rows()[1], vec![CellValue::from("text only")]);
    assert_eq!(back.sheet("Companies").expect("sheet").row_count(), 0);
}

#[test]
fn schema_versions_live_in_a_hidden_sheet() {
    let mut doc = Document::new();
    doc.add_sheet(Sheet::new("User Details", header(&["Timestamp"])))
        .expect("add sheet");
    doc.set_schema_version("User Details", 2);

    let bytes = write_to_bytes(&doc).expect("write");

    let mut raw: Xlsx<_> = Xlsx::new(Cursor::new(bytes.as_slice())).expect("open");
    let marker = raw
        .sheets_metadata()
        .iter()
        .find(|s| s.name == "_schema")
        .expect("marker sheet");
    assert_eq!(marker.visible, SheetVisible::Hidden);

    let back = load_from_bytes(&bytes).expect("read");
    assert_eq!(back.sheet_names().collect::<Vec<_>>(), vec!["User Details"]);
    assert_eq!(back.schema_version("User Details"), 2);
}

#[test]
fn foreign_workbook_cells_are_interpreted() {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Data").expect("name");
    worksheet.write_string(0, 0, "  Date ").expect("write");
    worksheet.write_number(0, 1, 2024).expect("write");
    worksheet.write_string(0, 3, "Tail").expect("write");
    worksheet
        .write_number_with_format(1, 0, 45356.0, &date_format)
        .expect("write");
    worksheet.write_number(1, 1, 7).expect("write");
    let bytes = workbook.save_to_buffer().expect("save");

    let doc = load_from_bytes(&bytes).expect("read");
    let sheet = doc.sheet("Data").expect("sheet");
    assert_eq!(sheet.header(), ["Date", "2024", "", "Tail"]);
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
    assert_eq!(
        sheet.rows()[0],
        vec![CellValue::date_only(date), CellValue::Number(7.0)]
    );
}

#[test]
fn blank_rows_between_records_are_skipped() {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Companies").expect("name");
    worksheet.write_string(0, 0, "CompanyName").expect("write");
    worksheet.write_string(1, 0, "Acme").expect("write");
    worksheet.write_string(2, 0, "").expect("write");
    worksheet.write_string(3, 0, "Globex").expect("write");
    worksheet.write_string(5, 0, "Initech").expect("write");
    let bytes = workbook.save_to_buffer().expect("save");

    let doc = load_from_bytes(&bytes).expect("read");
    let sheet = doc.sheet("Companies").expect("sheet");
    assert_eq!(
        sheet.rows(),
        [
            vec![CellValue::from("Acme")],
            vec![CellValue::from("Globex")],
            vec![CellValue::from("Initech")],
        ]
    );
}

#[test]
fn dates_before_the_epoch_are_kept_as_text() {
    let old = NaiveDate::from_ymd_opt(1850, 1, 2).expect("valid date");
    let mut doc = Document::new();
    doc.add_sheet(Sheet::new("Old", header(&["Date"])))
        .expect("add sheet")
        .append_row(vec![CellValue::date_only(old)]);

    let back = load_from_bytes(&write_to_bytes(&doc).expect("write")).expect("read");
    assert_eq!(
        back.sheet("Old").expect("sheet").rows()[0],
        vec![CellValue::from("1850-01-02")]
    );
}

#[test]
fn corrupt_bytes_are_reported() {
    let err = load_from_bytes(b"PK\x03\x04 not really a zip").expect_err("corrupt input");
    assert!(matches!(err, ReadError::Xlsx(_)), "got {err:?}");
}

#[test]
fn save_to_path_replaces_existing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("saved_texts.xlsx");
    std::fs::write(&path, b"stale").expect("seed file");

    let mut doc = Document::new();
    doc.add_sheet(Sheet::new("User Details", header(&["Timestamp"])))
        .expect("add sheet");
    save_to_path(&doc, &path).expect("save");

    let back = load_from_path(&path).expect("reload");
    assert_eq!(back.sheet_names().collect::<Vec<_>>(), vec!["User Details"]);

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(Result::ok)
        .map(|e| e.file_name())
        .collect();
    assert_eq!(leftovers.len(), 1, "temp files left behind: {leftovers:?}");
}
