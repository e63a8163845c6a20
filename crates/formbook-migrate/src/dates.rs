use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use formbook_model::CellValue;
use regex::Regex;

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%B %d %Y", "%d %B %Y", "%d %B, %Y"];

fn day_month_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})$").expect("valid regex")
    })
}

/// The date-only value `cell` should hold, or `None` when it should be left as it is.
///
/// Date cells are truncated to midnight (returning `None` if they already are). Text cells are
/// parsed with [`parse_general_date`] and then [`parse_day_month_year`]. Empty, numeric and
/// boolean cells, and text that parses as neither, are left alone.
pub fn normalize_date_cell(cell: &CellValue) -> Option<CellValue> {
    match cell {
        CellValue::Date(dt) if dt.time() == NaiveTime::MIN => None,
        CellValue::Date(dt) => Some(CellValue::date_only(dt.date())),
        CellValue::String(s) => {
            let s = s.trim();
            parse_general_date(s)
                .or_else(|| parse_day_month_year(s))
                .map(CellValue::date_only)
        }
        CellValue::Empty | CellValue::Number(_) | CellValue::Boolean(_) => None,
    }
}

/// Calendar date of an RFC 3339 / ISO-8601, RFC 2822 or month-name date string.
///
/// Zone-qualified values keep the date as written, without conversion. Purely numeric
/// `d/m/y`-style strings are rejected here; see [`parse_day_month_year`].
pub fn parse_general_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() || day_month_year_re().is_match(s) {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_local().date());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

/// `day/month/year` or `day-month-year`, with two-digit years read as `20YY`.
///
/// Impossible calendar dates such as `31/2/2024` yield `None`.
pub fn parse_day_month_year(s: &str) -> Option<NaiveDate> {
    let caps = day_month_year_re().captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let mut year: i32 = caps[3].parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}
