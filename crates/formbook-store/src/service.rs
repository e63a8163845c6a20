//! Request handlers for the form service.
//!
//! Transport and authentication live outside this crate: the caller passes in the already
//! authenticated [`Identity`] (or `None`) and maps [`Status`] onto its own protocol.

use chrono::{DateTime, SecondsFormat, Utc};
use formbook_model::RowMap;
use serde::Serialize;

use crate::config::StoreConfig;
use crate::records::{CompanyRecord, FormRecord, COMPANIES, FORMS};
use crate::table::{TableStore, XlsxTableStore};

/// The authenticated caller of a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    pub display_name: String,
    pub emails: Vec<String>,
}

/// Outcome classification of a handled request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Status {
    Ok,
    BadRequest,
    Unauthorized,
    Failed,
}

impl Status {
    pub fn http_code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::Unauthorized => 401,
            Status::Failed => 500,
        }
    }
}

/// A refused request. Serializes as `{ "message": ... }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Rejection {
    #[serde(skip)]
    pub status: Status,
    pub message: String,
}

impl Rejection {
    fn new(status: Status, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self::new(Status::Unauthorized, "Unauthorized")
    }
}

/// Successful write acknowledgement: `{ "success": true, "message": ... }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

impl Ack {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

/// `{ "success": true, "row": {...} }` or `{ "success": false }`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LastEntry {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<RowMap>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub user: ProfileUser,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProfileUser {
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub email: String,
}

pub struct FormService {
    companies: Box<dyn TableStore>,
    forms: Box<dyn TableStore>,
}

impl FormService {
    pub fn new(companies: Box<dyn TableStore>, forms: Box<dyn TableStore>) -> Self {
        Self { companies, forms }
    }

    /// Service over the two `.xlsx` files named by `config`.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(
            Box::new(XlsxTableStore::new(config.company_path())),
            Box::new(XlsxTableStore::new(config.form_path())),
        )
    }

    /// Every stored company, oldest first. An unavailable store lists as empty.
    pub fn list_companies(&self) -> Vec<CompanyRecord> {
        match self.companies.list_rows(COMPANIES.sheet) {
            Ok(rows) => rows.map(|row| CompanyRecord::from_row(&row)).collect(),
            Err(err) => {
                log::warn!("listing companies failed, serving an empty list: {err}");
                Vec::new()
            }
        }
    }

    pub fn add_company(&self, record: &CompanyRecord) -> Result<Ack, Rejection> {
        if record.name().is_none() {
            return Err(Rejection::new(Status::BadRequest, "Company name required"));
        }
        match self.companies.append(&COMPANIES, record.to_cells()) {
            Ok(_) => Ok(Ack::ok("Company Added")),
            Err(err) => {
                log::error!("adding company failed: {err}");
                Err(Rejection::new(Status::Failed, "Failed to add company"))
            }
        }
    }

    pub fn submit_form(
        &self,
        caller: Option<&Identity>,
        record: &FormRecord,
    ) -> Result<Ack, Rejection> {
        self.submit_form_at(caller, record, Utc::now())
    }

    /// [`FormService::submit_form`] with an explicit server timestamp.
    pub fn submit_form_at(
        &self,
        caller: Option<&Identity>,
        record: &FormRecord,
        now: DateTime<Utc>,
    ) -> Result<Ack, Rejection> {
        if caller.is_none() {
            return Err(Rejection::unauthorized());
        }
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        match self.forms.append(&FORMS, record.to_cells(&timestamp)) {
            Ok(_) => Ok(Ack::ok("Saved successfully")),
            Err(err) => {
                log::error!("saving form failed: {err}");
                Err(Rejection::new(Status::Failed, "Failed to save"))
            }
        }
    }

    pub fn last_form_entry(&self) -> LastEntry {
        match self.forms.last_row(FORMS.sheet) {
            Ok(row) => LastEntry {
                success: true,
                row: Some(row),
            },
            Err(err) => {
                if !err.is_not_found() {
                    log::warn!("reading last form entry failed: {err}");
                }
                LastEntry {
                    success: false,
                    row: None,
                }
            }
        }
    }

    pub fn profile(&self, caller: Option<&Identity>) -> Result<Profile, Rejection> {
        let identity = caller.ok_or_else(Rejection::unauthorized)?;
        Ok(Profile {
            user: ProfileUser {
                display_name: identity.display_name.clone(),
                email: identity
                    .emails
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "N/A".to_string()),
            },
        })
    }
}
