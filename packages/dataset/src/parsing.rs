//! Date and number coercion shared by the loader and the filter engine.

use chrono::{NaiveDate, NaiveDateTime};

/// Format of the date fields submitted by the filter form.
///
/// Parsing with it also accepts unpadded month and day fields (`2020-1-1`).
/// Formatting with it always pads.
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Datetime layouts accepted in the dataset's `date` column besides a plain
/// `YYYY-MM-DD` date. The time of day is discarded.
const RECORD_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parses a `YYYY-MM-DD` form date. Single-digit months and days are
/// accepted; anything with a time component or another field order is not.
#[must_use]
pub fn parse_form_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), FORM_DATE_FORMAT).ok()
}

/// Parses a dataset `date` cell, accepting a plain date or a datetime.
#[must_use]
pub fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(date) = parse_form_date(s) {
        return Some(date);
    }
    RECORD_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Parses a finite float. Returns `None` for blanks, garbage, `NaN` and
/// infinities.
#[must_use]
pub fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
