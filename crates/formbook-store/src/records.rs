use formbook_model::{CellValue, RowMap};
use serde::{Deserialize, Serialize};

use crate::table::TableSchema;

/// Reference table of companies, stored in `defined.xlsx`.
pub const COMPANIES: TableSchema = TableSchema {
    sheet: "Companies",
    header: &[
        "CompanyName",
        "RegNo",
        "Address",
        "CAFirmName",
        "CAName",
        "MemberRegNo",
        "PartnerProprietor",
    ],
    version: 1,
};

/// Append-only log of submitted forms, stored in `saved_texts.xlsx`.
///
/// Version 2 is the layout without the legacy `General Text Input` column.
pub const FORMS: TableSchema = TableSchema {
    sheet: "User Details",
    header: &[
        "Timestamp",
        "User Email",
        "Date",
        "Company Name A",
        "LLPIN",
        "Address A",
        "Company Name B",
        "CIN",
        "Address B",
        "CA Firm Name",
        "CA Name",
        "Member Reg No",
        "Partner/Proprietor",
    ],
    version: 2,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "CompanyName", default)]
    pub company_name: Option<String>,
    #[serde(rename = "RegNo", default)]
    pub reg_no: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "CAFirmName", default)]
    pub ca_firm_name: Option<String>,
    #[serde(rename = "CAName", default)]
    pub ca_name: Option<String>,
    #[serde(rename = "MemberRegNo", default)]
    pub member_reg_no: Option<String>,
    #[serde(rename = "PartnerProprietor", default)]
    pub partner_proprietor: Option<String>,
}

impl CompanyRecord {
    /// The company name with surrounding whitespace removed, if it is not blank.
    pub fn name(&self) -> Option<&str> {
        self.company_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn to_cells(&self) -> Vec<CellValue> {
        [
            &self.company_name,
            &self.reg_no,
            &self.address,
            &self.ca_firm_name,
            &self.ca_name,
            &self.member_reg_no,
            &self.partner_proprietor,
        ]
        .into_iter()
        .map(|field| CellValue::from_optional_text(field.as_deref()))
        .collect()
    }

    /// Read a stored row by column position, whatever its header says.
    pub fn from_row(row: &RowMap) -> Self {
        let mut cells = positional_text(row);
        let mut next = || cells.next().flatten();
        Self {
            company_name: next(),
            reg_no: next(),
            address: next(),
            ca_firm_name: next(),
            ca_name: next(),
            member_reg_no: next(),
            partner_proprietor: next(),
        }
    }
}

/// One form submission as sent by the client. The timestamp is assigned by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    #[serde(rename = "User Email", default)]
    pub user_email: Option<String>,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Company Name A", default)]
    pub company_name_a: Option<String>,
    #[serde(rename = "LLPIN", default)]
    pub llpin: Option<String>,
    #[serde(rename = "Address A", default)]
    pub address_a: Option<String>,
    #[serde(rename = "Company Name B", default)]
    pub company_name_b: Option<String>,
    #[serde(rename = "CIN", default)]
    pub cin: Option<String>,
    #[serde(rename = "Address B", default)]
    pub address_b: Option<String>,
    #[serde(rename = "CA Firm Name", default)]
    pub ca_firm_name: Option<String>,
    #[serde(rename = "CA Name", default)]
    pub ca_name: Option<String>,
    #[serde(rename = "Member Reg No", default)]
    pub member_reg_no: Option<String>,
    #[serde(rename = "Partner/Proprietor", default)]
    pub partner_proprietor: Option<String>,
}

impl FormRecord {
    /// Cells for a new row: the timestamp followed by every field in header order.
    pub fn to_cells(&self, timestamp: &str) -> Vec<CellValue> {
        let fields = [
            &self.user_email,
            &self.date,
            &self.company_name_a,
            &self.llpin,
            &self.address_a,
            &self.company_name_b,
            &self.cin,
            &self.address_b,
            &self.ca_firm_name,
            &self.ca_name,
            &self.member_reg_no,
            &self.partner_proprietor,
        ];
        std::iter::once(CellValue::from(timestamp))
            .chain(
                fields
                    .into_iter()
                    .map(|field| CellValue::from_optional_text(field.as_deref())),
            )
            .collect()
    }
}

fn positional_text(row: &RowMap) -> impl Iterator<Item = Option<String>> + '_ {
    row.iter()
        .map(|(_, value)| (!value.is_empty()).then(|| value.to_string()))
        .chain(std::iter::repeat(None))
}
