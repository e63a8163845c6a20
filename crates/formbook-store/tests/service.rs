use chrono::{TimeZone, Utc};
use formbook_store::{
    CompanyRecord, FormRecord, FormService, Identity, Status, StoreConfig, TableStore,
    XlsxTableStore,
};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use serde_json::json;

fn service(dir: &std::path::Path) -> FormService {
    let config = StoreConfig {
        data_dir: dir.to_path_buf(),
        ..StoreConfig::default()
    };
    FormService::from_config(&config)
}

fn caller() -> Identity {
    Identity {
        display_name: "Asha Rao".to_string(),
        emails: vec!["asha@example.com".to_string()],
    }
}

fn company(name: &str) -> CompanyRecord {
    CompanyRecord {
        company_name: Some(name.to_string()),
        reg_no: Some(format!("REG-{name}")),
        ..Default::default()
    }
}

#[test]
fn companies_round_trip_through_the_workbook() {
    let dir = tempfile::tempdir().expect("temp dir");
    let svc = service(dir.path());
    assert!(svc.list_companies().is_empty());

    let ack = svc.add_company(&company("Acme")).expect("add");
    assert_eq!(
        serde_json::to_value(&ack).expect("json"),
        json!({"success": true, "message": "Company Added"})
    );
    svc.add_company(&company("Globex")).expect("add");

    let listed = svc.list_companies();
    assert_eq!(listed, vec![company("Acme"), company("Globex")]);
    assert!(dir.path().join("defined.xlsx").exists());
}

#[test]
fn blank_company_name_is_rejected_without_writing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let svc = service(dir.path());

    for record in [CompanyRecord::default(), company("  ")] {
        let rejection = svc.add_company(&record).expect_err("validation");
        assert_eq!(rejection.status, Status::BadRequest);
        assert_eq!(rejection.status.http_code(), 400);
        assert_eq!(
            serde_json::to_value(&rejection).expect("json"),
            json!({"message": "Company name required"})
        );
    }
    assert!(!dir.path().join("defined.xlsx").exists());
}

#[test]
fn company_added_to_a_headerless_sheet_is_kept() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut workbook = Workbook::new();
    workbook
        .add_worksheet()
        .set_name("Companies")
        .expect("sheet name");
    workbook
        .save(dir.path().join("defined.xlsx"))
        .expect("save fixture");
    let svc = service(dir.path());

    let ack = svc.add_company(&company("Acme")).expect("add");
    assert_eq!(ack.message, "Company Added");
    assert_eq!(svc.list_companies(), vec![company("Acme")]);

    let doc = formbook_xlsx::load_from_path(dir.path().join("defined.xlsx")).expect("reload");
    let sheet = doc.sheet("Companies").expect("sheet");
    assert_eq!(sheet.header()[0], "CompanyName");
    assert_eq!(sheet.width(), 7);
}

#[test]
fn blank_rows_do_not_list_as_companies() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Companies").expect("sheet name");
    worksheet.write_string(0, 0, "CompanyName").expect("header");
    worksheet.write_string(1, 0, "Acme").expect("row");
    worksheet.write_string(3, 0, "Globex").expect("row");
    workbook
        .save(dir.path().join("defined.xlsx"))
        .expect("save fixture");
    let svc = service(dir.path());

    let names: Vec<Option<String>> = svc
        .list_companies()
        .into_iter()
        .map(|c| c.company_name)
        .collect();
    assert_eq!(
        names,
        vec![Some("Acme".to_string()), Some("Globex".to_string())]
    );
}

#[test]
fn corrupt_company_file_lists_as_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("defined.xlsx");
    std::fs::write(&path, b"garbage").expect("seed");
    let svc = service(dir.path());

    assert!(svc.list_companies().is_empty());
    let rejection = svc.add_company(&company("Acme")).expect_err("store failure");
    assert_eq!(rejection.status, Status::Failed);
    assert_eq!(std::fs::read(&path).expect("read back"), b"garbage");
}

#[test]
fn unauthorized_submission_appends_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let svc = service(dir.path());

    let rejection = svc
        .submit_form(None, &FormRecord::default())
        .expect_err("unauthorized");
    assert_eq!(rejection.status, Status::Unauthorized);
    assert_eq!(rejection.message, "Unauthorized");
    assert!(!dir.path().join("saved_texts.xlsx").exists());
    assert_eq!(
        serde_json::to_value(svc.last_form_entry()).expect("json"),
        json!({"success": false})
    );
}

#[test]
fn submitted_form_is_the_last_entry() {
    let dir = tempfile::tempdir().expect("temp dir");
    let svc = service(dir.path());
    let id = caller();
    let now = Utc
        .with_ymd_and_hms(2024, 3, 5, 10, 20, 30)
        .single()
        .expect("valid timestamp");

    let first: FormRecord = serde_json::from_value(json!({
        "User Email": "asha@example.com",
        "Date": "5/3/2024",
        "Company Name A": "Acme",
    }))
    .expect("deserialize");
    let second: FormRecord = serde_json::from_value(json!({
        "User Email": "asha@example.com",
        "Date": "6/3/2024",
        "Company Name A": "Globex",
        "Partner/Proprietor": "Partner",
    }))
    .expect("deserialize");

    let ack = svc.submit_form_at(Some(&id), &first, now).expect("submit");
    assert_eq!(ack.message, "Saved successfully");
    svc.submit_form_at(Some(&id), &second, now).expect("submit");

    let entry = serde_json::to_value(svc.last_form_entry()).expect("json");
    assert_eq!(entry["success"], json!(true));
    assert_eq!(entry["row"]["Timestamp"], json!("2024-03-05T10:20:30.000Z"));
    assert_eq!(entry["row"]["Company Name A"], json!("Globex"));
    assert_eq!(entry["row"]["Partner/Proprietor"], json!("Partner"));
    assert_eq!(entry["row"]["LLPIN"], json!(null));

    let store = XlsxTableStore::new(dir.path().join("saved_texts.xlsx"));
    assert_eq!(store.list_rows("User Details").expect("list").len(), 2);
}

#[test]
fn profile_requires_a_caller() {
    let dir = tempfile::tempdir().expect("temp dir");
    let svc = service(dir.path());

    let profile = svc.profile(Some(&caller())).expect("profile");
    assert_eq!(
        serde_json::to_value(&profile).expect("json"),
        json!({"user": {"displayName": "Asha Rao", "email": "asha@example.com"}})
    );

    let anonymous_email = Identity {
        display_name: "No Mail".to_string(),
        emails: Vec::new(),
    };
    let profile = svc.profile(Some(&anonymous_email)).expect("profile");
    assert_eq!(profile.user.email, "N/A");

    let rejection = svc.profile(None).expect_err("unauthorized");
    assert_eq!(rejection.status.http_code(), 401);
}
