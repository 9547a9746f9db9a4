use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Shown wherever a date is missing or cannot be read.
pub const DATE_PLACEHOLDER: &str = "---";

/// Average month length used when converting elapsed days into months.
pub const DAYS_PER_MONTH: f64 = 30.44;

pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn to_localized(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

// Splits `text` on `sep` into exactly three all-digit parts of the given widths
fn split_digits(text: &str, sep: char, widths: [usize; 3]) -> Option<[u32; 3]> {
    let mut parts = text.split(sep);
    let mut out = [0u32; 3];
    for (slot, width) in out.iter_mut().zip(widths) {
        let part = parts.next()?;
        if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

/// Parses strict `DD/MM/YYYY` text.
///
/// Impossible calendar dates such as `31/04/2024` are rejected instead of
/// rolling over into the following month.
pub fn parse_localized(text: &str) -> Option<NaiveDate> {
    let [day, month, year] = split_digits(text.trim(), '/', [2, 2, 4])?;
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// Parses strict `YYYY-MM-DD` text.
pub fn parse_iso(text: &str) -> Option<NaiveDate> {
    let [year, month, day] = split_digits(text.trim(), '-', [4, 2, 2])?;
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// Parses either supported format. ISO timestamps are read by their date part.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.contains('/') {
        return parse_localized(text);
    }
    let date_part = text.split_once('T').map_or(text, |(date, _)| date);
    parse_iso(date_part)
}

pub fn normalize_to_iso(text: &str) -> Option<String> {
    parse_date(text).map(to_iso)
}

/// Anything that may carry a calendar date.
pub trait AsDate {
    fn as_date(&self) -> Option<NaiveDate>;
}

impl AsDate for NaiveDate {
    fn as_date(&self) -> Option<NaiveDate> {
        Some(*self)
    }
}

impl AsDate for str {
    fn as_date(&self) -> Option<NaiveDate> {
        parse_date(self)
    }
}

impl AsDate for String {
    fn as_date(&self) -> Option<NaiveDate> {
        parse_date(self)
    }
}

impl<T: AsDate> AsDate for Option<T> {
    fn as_date(&self) -> Option<NaiveDate> {
        self.as_ref().and_then(AsDate::as_date)
    }
}

/// Formats a date, or text in either supported format, as `DD/MM/YYYY`.
pub fn format_localized<T: AsDate + ?Sized>(value: &T) -> String {
    value
        .as_date()
        .map(to_localized)
        .unwrap_or_else(|| DATE_PLACEHOLDER.to_string())
}

fn week_start_date(today: NaiveDate) -> NaiveDate {
    today - Duration::days(today.weekday().num_days_from_sunday() as i64)
}

fn month_start_date(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

fn month_end_date(today: NaiveDate) -> NaiveDate {
    month_start_date(today)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(today)
}

pub fn week_start(today: NaiveDate) -> String {
    to_iso(week_start_date(today))
}

pub fn week_end(today: NaiveDate) -> String {
    to_iso(week_start_date(today) + Duration::days(6))
}

pub fn month_start(today: NaiveDate) -> String {
    to_iso(month_start_date(today))
}

pub fn month_end(today: NaiveDate) -> String {
    to_iso(month_end_date(today))
}

pub fn year_start(today: NaiveDate) -> String {
    format!("{:04}-01-01", today.year())
}

pub fn year_end(today: NaiveDate) -> String {
    format!("{:04}-12-31", today.year())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    /// Inclusive ISO bounds of the period containing `today`.
    pub fn bounds(self, today: NaiveDate) -> (String, String) {
        match self {
            Period::Week => (week_start(today), week_end(today)),
            Period::Month => (month_start(today), month_end(today)),
            Period::Year => (year_start(today), year_end(today)),
        }
    }
}

/// Inclusive on both bounds. Relies on ISO dates sorting lexicographically.
pub fn is_within_range(date_text: &str, start_iso: &str, end_iso: &str) -> bool {
    match normalize_to_iso(date_text) {
        Some(iso) => iso.as_str() >= start_iso && iso.as_str() <= end_iso,
        None => false,
    }
}

pub fn months_between_ceil(from: NaiveDate, to: NaiveDate) -> u32 {
    let days = (to - from).num_days().unsigned_abs() as f64;
    (days / DAYS_PER_MONTH).ceil() as u32
}

/// Steps back `months` calendar months, clamping to the end of shorter months.
pub fn subtract_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_to_iso_pads_fields() {
        assert_eq!(to_iso(ymd(2024, 3, 5)), "2024-03-05");
    }

    #[test]
    fn test_parse_localized_valid() {
        assert_eq!(parse_localized("15/02/2024"), Some(ymd(2024, 2, 15)));
        assert_eq!(parse_localized("29/02/2024"), Some(ymd(2024, 2, 29)));
    }

    #[test]
    fn test_parse_localized_rejects_overflowing_day() {
        assert_eq!(parse_localized("31/04/2024"), None);
        assert_eq!(parse_localized("29/02/2023"), None);
        assert_eq!(parse_localized("00/01/2024"), None);
        assert_eq!(parse_localized("10/13/2024"), None);
    }

    #[test]
    fn test_parse_localized_rejects_bad_format() {
        assert_eq!(parse_localized("1/2/2024"), None);
        assert_eq!(parse_localized("2024-02-15"), None);
        assert_eq!(parse_localized("15/02/2024/1"), None);
        assert_eq!(parse_localized("aa/bb/cccc"), None);
        assert_eq!(parse_localized(""), None);
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_iso("2024-01-10"), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_iso("2024-1-10"), None);
        assert_eq!(parse_iso("2024-02-30"), None);
        assert_eq!(parse_iso("10/01/2024"), None);
    }

    #[test]
    fn test_parse_date_accepts_both_formats_and_timestamps() {
        assert_eq!(parse_date("10/01/2024"), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_date("2024-01-10"), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_date("2024-01-10T08:30:00Z"), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_date("ontem"), None);
    }

    #[test]
    fn test_localized_round_trip() {
        for text in ["01/01/2024", "31/12/1999", "29/02/2028", "15/07/2023"] {
            let date = parse_localized(text).unwrap();
            assert_eq!(format_localized(&date), text);
        }
    }

    #[test]
    fn test_iso_round_trip() {
        for text in ["2024-01-01", "1999-12-31", "2028-02-29"] {
            assert_eq!(to_iso(parse_iso(text).unwrap()), text);
        }
    }

    #[test]
    fn test_format_localized_inputs() {
        assert_eq!(format_localized("2024-02-15"), "15/02/2024");
        assert_eq!(format_localized("15/02/2024"), "15/02/2024");
        assert_eq!(format_localized(&ymd(2024, 2, 15)), "15/02/2024");
        assert_eq!(format_localized("garbage"), DATE_PLACEHOLDER);
        assert_eq!(format_localized(&None::<String>), DATE_PLACEHOLDER);
        assert_eq!(
            format_localized(&Some("2024-02-15".to_string())),
            "15/02/2024"
        );
    }

    #[test]
    fn test_week_bounds_anchor_on_sunday() {
        // Wednesday
        let today = ymd(2024, 5, 15);
        assert_eq!(week_start(today), "2024-05-12");
        assert_eq!(week_end(today), "2024-05-18");

        let sunday = ymd(2024, 5, 12);
        assert_eq!(week_start(sunday), "2024-05-12");
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_start(ymd(2024, 2, 10)), "2024-02-01");
        assert_eq!(month_end(ymd(2024, 2, 10)), "2024-02-29");
        assert_eq!(month_end(ymd(2023, 12, 25)), "2023-12-31");
        assert_eq!(month_end(ymd(2024, 4, 30)), "2024-04-30");
    }

    #[test]
    fn test_year_bounds() {
        assert_eq!(year_start(ymd(2024, 6, 1)), "2024-01-01");
        assert_eq!(year_end(ymd(2024, 6, 1)), "2024-12-31");
    }

    #[test]
    fn test_period_bounds() {
        let today = ymd(2024, 5, 15);
        assert_eq!(
            Period::Month.bounds(today),
            ("2024-05-01".to_string(), "2024-05-31".to_string())
        );
        assert_eq!(
            Period::Week.bounds(today),
            ("2024-05-12".to_string(), "2024-05-18".to_string())
        );
    }

    #[test]
    fn test_is_within_range_inclusive() {
        assert!(is_within_range("2024-05-01", "2024-05-01", "2024-05-31"));
        assert!(is_within_range("2024-05-31", "2024-05-01", "2024-05-31"));
        assert!(is_within_range("15/05/2024", "2024-05-01", "2024-05-31"));
        assert!(!is_within_range("2024-06-01", "2024-05-01", "2024-05-31"));
        assert!(!is_within_range("30/04/2024", "2024-05-01", "2024-05-31"));
    }

    #[test]
    fn test_is_within_range_unparseable() {
        assert!(!is_within_range("", "2024-05-01", "2024-05-31"));
        assert!(!is_within_range("maio", "2024-05-01", "2024-05-31"));
    }

    #[test]
    fn test_months_between_ceil() {
        assert_eq!(months_between_ceil(ymd(2024, 1, 10), ymd(2024, 2, 15)), 2);
        assert_eq!(months_between_ceil(ymd(2024, 1, 10), ymd(2024, 1, 10)), 0);
        assert_eq!(months_between_ceil(ymd(2024, 1, 1), ymd(2024, 1, 20)), 1);
        assert_eq!(months_between_ceil(ymd(2024, 2, 15), ymd(2024, 1, 10)), 2);
    }

    #[test]
    fn test_subtract_months_clamps() {
        assert_eq!(subtract_months(ymd(2024, 2, 15), 4), ymd(2023, 10, 15));
        assert_eq!(subtract_months(ymd(2024, 5, 31), 3), ymd(2024, 2, 29));
    }
}
