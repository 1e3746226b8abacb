use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Layout of listing-page dates, e.g. "January 2, 2006"
pub const DATE_FORMAT: &str = "%B %d, %Y";

/// Parses an article date into midnight UTC of that day
///
/// Returns `None` for anything that does not follow [`DATE_FORMAT`]. The
/// month must be spelled out in full; chrono's `%B` alone would also take
/// "Jan" or "Sep".
pub fn parse_article_date(date: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();
    let day = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;

    let month = date.split_whitespace().next()?;
    if !month.eq_ignore_ascii_case(&day.format("%B").to_string()) {
        return None;
    }

    Some(day.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Checks whether `date` lies within `num_days` days before `now`
///
/// The boundary is inclusive. Unparsable dates are never within any window,
/// so a malformed date ends pagination instead of letting stale pages through.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use doc_harvest::article::is_within_timeframe;
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
/// assert!(is_within_timeframe("January 1, 2024", 7, now));
/// assert!(!is_within_timeframe("not a date", 7, now));
/// ```
pub fn is_within_timeframe(date: &str, num_days: u32, now: DateTime<Utc>) -> bool {
    match parse_article_date(date) {
        Some(published) => now - published <= Duration::days(i64::from(num_days)),
        None => false,
    }
}
