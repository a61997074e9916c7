use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accepted input formats, tried in priority order. The first format that
/// parses the full string wins.
const DATE_FORMATS: [&str; 7] = [
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y-%m-%d",
    "%d %b %Y",
    "%d %B %Y",
    // "8-Apr-25" style
    "%d-%b-%y",
    "%d-%b-%Y",
];

/// Chronological (start, end) pair of display date strings for one bill set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Normalizes a heterogeneous date string to `DD/MM/YYYY`.
///
/// If no exact format matches but the string still starts with
/// "number separator number separator 2-4 digit number", it is returned
/// unnormalized rather than discarded. Returns `None` when nothing
/// resembles a date; the caller must treat the bill as dateless, not fail it.
pub fn normalize(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date.format("%d/%m/%Y").to_string());
        }
    }

    // Best-effort passthrough for date-shaped strings the formats missed.
    if starts_with_date_shape(raw) {
        return Some(raw.to_string());
    }

    None
}

/// Checks for a leading "1-2 digits, separator, 1-2 digits, separator,
/// 2-4 digits" shape, with `/`, `-` or `.` as separators.
fn starts_with_date_shape(s: &str) -> bool {
    read_date_components(s).is_some()
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '-' || c == '.'
}

/// Takes up to `max` leading ASCII digits, returning them and the rest.
fn take_digits(s: &str, max: usize) -> Option<(&str, &str)> {
    let n = s
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count()
        .min(max);
    if n == 0 {
        None
    } else {
        Some((&s[..n], &s[n..]))
    }
}

fn take_separator(s: &str) -> Option<&str> {
    let mut chars = s.chars();
    if is_separator(chars.next()?) {
        Some(chars.as_str())
    } else {
        None
    }
}

/// Reads leading (day, month, year) components from a date-shaped string.
/// Two-digit years resolve into 2000-2099.
fn read_date_components(s: &str) -> Option<(u32, u32, i32)> {
    let (day, rest) = take_digits(s, 2)?;
    let rest = take_separator(rest)?;
    let (month, rest) = take_digits(rest, 2)?;
    let rest = take_separator(rest)?;
    let (year, _) = take_digits(rest, 4)?;
    if year.len() < 2 {
        return None;
    }

    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let mut year: i32 = year.parse().ok()?;
    if year < 100 {
        year += 2000;
    }

    Some((day, month, year))
}

/// Derives the chronological sort key for a normalized date string.
///
/// `DD/MM/YYYY` strings do not order correctly lexically, so min/max over a
/// bill set must go through this key. Passthrough strings get a best-effort
/// component read; strings with no derivable key are excluded from range
/// computation.
pub(crate) fn sort_key(normalized: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(normalized, "%d/%m/%Y") {
        return Some(date);
    }

    let (day, month, year) = read_date_components(normalized)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalizes every raw date in a bill set and computes the chronological
/// (min, max) range. Unparseable dates drop out silently; `None` when the
/// set has no parsable dates at all.
pub fn collect_range<S: AsRef<str>>(raw_dates: &[S]) -> Option<DateRange> {
    let mut keyed: Vec<(NaiveDate, String)> = Vec::new();
    for raw in raw_dates {
        if let Some(display) = normalize(raw.as_ref()) {
            if let Some(key) = sort_key(&display) {
                keyed.push((key, display));
            }
        }
    }

    let start = keyed.iter().min_by_key(|(key, _)| *key)?.1.clone();
    let end = keyed.iter().max_by_key(|(key, _)| *key)?.1.clone();

    Some(DateRange { start, end })
}

/// Compares the purchase and sales ranges. Both present and differing in
/// either endpoint produces a single advisory warning naming both ranges;
/// it never blocks analysis. Nothing to compare when either side is absent.
pub fn validate_ranges(
    purchase: Option<&DateRange>,
    sales: Option<&DateRange>,
) -> Option<String> {
    let (p, s) = (purchase?, sales?);

    if p.start != s.start || p.end != s.end {
        return Some(format!(
            "DATE MISMATCH WARNING: Purchase bills are from {} to {}, \
             but Sales bills are from {} to {}. For accurate inventory \
             analysis, ensure both bill sets cover the same date range.",
            p.start, p.end, s.start, s.end
        ));
    }

    None
}
