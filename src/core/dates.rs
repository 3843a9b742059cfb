//! Event date normalization
//!
//! GBIF `eventDate` values range from a bare year to full ISO intervals. Ordering
//! in the crawler compares normalized strings, so every value is reduced to
//! `YYYY-MM-DD` where possible. No calendar validation happens here.

/// Normalize a raw GBIF event date
///
/// - a time-of-day part after a space or `T` is dropped
/// - an interval `start/end` keeps its start
/// - `/` between short components is read as a date separator
/// - missing month and day default to `01`
///
/// Text that is not a date is passed through best-effort.
///
/// ```
/// use lastseen::core::dates::clean_date;
///
/// assert_eq!(clean_date("1999"), "1999-01-01");
/// assert_eq!(clean_date("1999-05"), "1999-05-01");
/// assert_eq!(clean_date("1999-05-03T10:00:00"), "1999-05-03");
/// assert_eq!(clean_date("1999/05/03"), "1999-05-03");
/// assert_eq!(clean_date(""), "");
/// ```
pub fn clean_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let date = split_slashes(raw);
    let date = date.split(' ').next().unwrap_or_default();
    let date = date.split('T').next().unwrap_or_default();

    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [year] => format!("{year}-01-01"),
        [year, month] => format!("{year}-{month}-01"),
        [year, month, day, ..] => format!("{year}-{month}-{day}"),
        [] => String::new(),
    }
}

/// `1999/05/03` becomes `1999-05-03`; `2019-01-01/2020-12-31` keeps its start
fn split_slashes(raw: &str) -> String {
    if !raw.contains('/') {
        return raw.to_string();
    }

    let mut pieces = raw.split('/');
    let first = pieces.next().unwrap_or_default();
    let rest: Vec<&str> = pieces.collect();

    let is_separator = !first.contains('-')
        && rest
            .iter()
            .all(|p| (1..=2).contains(&p.len()) && p.chars().all(|c| c.is_ascii_digit()));

    if is_separator {
        std::iter::once(first)
            .chain(rest)
            .collect::<Vec<_>>()
            .join("-")
    } else {
        first.to_string()
    }
}
