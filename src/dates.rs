//! Ledger date handling.
//!
//! Entries and activities keep their dates as `D/M/YY` text (no zero padding,
//! two-digit year). Everything that needs ordering parses that text back into a
//! [`Date`]; the text form only exists at the storage and wire boundary.

use std::cmp::Ordering;

use lazy_static::lazy_static;
use regex::Regex;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

use crate::error::ApiError;

const LEDGER_DATE: &[FormatItem<'static>] =
    format_description!("[day padding:none]/[month padding:none]/[year repr:last_two]");
const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const STAMP: &[FormatItem<'static>] = format_description!(
    "[hour repr:12 padding:none]:[minute] [period] - [day padding:none]/[month padding:none]/[year repr:last_two]"
);
const USER_STAMP: &[FormatItem<'static>] = format_description!(
    "[day padding:none]/[month padding:none]/[year repr:last_two] [hour repr:12 padding:none]:[minute] [period]"
);

lazy_static! {
    static ref LEDGER_PARTS_RE: Regex = Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2})$").unwrap();
}

/// Current wall-clock time, local if the offset can be determined.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn render_ledger_date(date: Date) -> String {
    // LEDGER_DATE only uses components every Date has
    date.format(LEDGER_DATE).unwrap_or_default()
}

/// `h:mm AM/PM - D/M/YY`, used for entry and activity timestamps.
pub fn render_stamp(at: OffsetDateTime) -> String {
    at.format(STAMP).unwrap_or_default()
}

/// `D/M/YY h:mm AM/PM`, used for user and registration code records.
pub fn render_user_stamp(at: OffsetDateTime) -> String {
    at.format(USER_STAMP).unwrap_or_default()
}

/// Converts a client supplied `YYYY-MM-DD` date into ledger text.
pub fn ledger_date_from_iso(input: &str) -> Result<String, ApiError> {
    let date = Date::parse(input.trim(), ISO_DATE)
        .map_err(|_| ApiError::Validation(format!("Invalid date '{input}', expected YYYY-MM-DD")))?;
    Ok(render_ledger_date(date))
}

/// Zero-pads the `D/M/YY` parts into `20YY-MM-DD`.
pub fn iso_from_ledger(raw: &str) -> Option<String> {
    let caps = LEDGER_PARTS_RE.captures(raw.trim())?;
    Some(format!("20{}-{:0>2}-{:0>2}", &caps[3], &caps[2], &caps[1]))
}

pub fn parse_ledger_date(raw: &str) -> Option<Date> {
    let iso = iso_from_ledger(raw)?;
    Date::parse(&iso, ISO_DATE).ok()
}

/// Latest calendar date first; unparsable dates sort after every valid one.
pub fn chronological_desc(a: &str, b: &str) -> Ordering {
    match (parse_ledger_date(a), parse_ledger_date(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending byte order on the raw text, so `9/3/24` sorts before `10/3/24`.
pub fn lexicographic_desc(a: &str, b: &str) -> Ordering {
    b.cmp(a)
}

/// Parses a month path segment. `"09"` is accepted and normalized to 9.
pub fn parse_month(raw: &str) -> Result<u8, ApiError> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| ApiError::Validation("Month is required and should be between 1 and 12".into()))
}

/// Matches raw ledger dates whose month text is exactly the unpadded `month`.
///
/// Stored text `1/9/24` matches month 9, stored text `1/09/24` does not.
pub fn month_matcher(month: u8) -> Result<Regex, ApiError> {
    // month is a plain integer, nothing to escape
    Regex::new(&format!(r"^\d{{1,2}}/{month}/\d{{2}}")).map_err(|e| ApiError::Internal(e.into()))
}
