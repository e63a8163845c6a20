use chrono::{Duration, NaiveDate, NaiveDateTime};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Serial 60 is 1900-02-29 in the Excel 1900 date system, a day that never existed (the Lotus
/// 1-2-3 leap year bug). Serials below it are one day off from the modern epoch.
const LOTUS_LEAP_DAY: f64 = 60.0;

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("1899-12-30 is a valid date")
}

fn first_after_leap_bug() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1900, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("1900-03-01 is a valid date")
}

/// Convert a date-time to an Excel 1900-system serial number.
///
/// Returns `None` for dates before 1900-01-01, which Excel cannot represent.
pub fn datetime_to_excel_serial(dt: NaiveDateTime) -> Option<f64> {
    let delta = dt - epoch();
    let mut serial = delta.num_milliseconds() as f64 / (SECONDS_PER_DAY * 1000.0);
    if dt < first_after_leap_bug() {
        serial -= 1.0;
    }
    (serial >= 1.0).then_some(serial)
}

/// Convert an Excel 1900-system serial number to a date-time, rounded to the millisecond.
///
/// Returns `None` for serials outside Excel's range and for the phantom 1900-02-29.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..2_958_466.0).contains(&serial) {
        return None;
    }
    if serial.trunc() == LOTUS_LEAP_DAY {
        return None;
    }
    let adjusted = if serial < LOTUS_LEAP_DAY {
        serial + 1.0
    } else {
        serial
    };
    let millis = (adjusted * SECONDS_PER_DAY * 1000.0).round() as i64;
    epoch().checked_add_signed(Duration::milliseconds(millis))
}
