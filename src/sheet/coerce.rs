use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters stripped before numeric parsing: currency marks, thousands
/// separators and any whitespace.
static AMOUNT_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[₹,\s]").expect("amount noise pattern should parse"));

/// Parse a currency-formatted cell into an amount.
///
/// `"₹1,234.5"` → `1234.5`. Empty, unparsable or non-finite input coerces
/// to `0.0`; spreadsheet cells are expected to be unclean, so this never
/// fails and never produces `NaN`.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned = AMOUNT_NOISE.replace_all(raw, "");
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Parse a numeric grid cell, guarding against the 1899/1900 spreadsheet
/// epoch artifact.
///
/// Sources occasionally serialize empty duration cells as dates near the
/// spreadsheet epoch (`30-12-1899`, `1900-01-01 05:30`). Those are a
/// formatting defect, not a quantity, and coerce to `0.0`.
pub fn parse_cell_number(raw: &str) -> f64 {
    if raw.contains('-') && (raw.contains("1899") || raw.contains("1900")) {
        return 0.0;
    }
    parse_amount(raw)
}

/// Parse a `DD/MM/YYYY` cell, optionally followed by a time component,
/// into an ISO `YYYY-MM-DD` string.
///
/// Returns `""` for anything malformed: wrong field count, non-numeric
/// fields, or a day/month combination that is not a real calendar date.
pub fn parse_dmy_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    // Drop a trailing time component ("17/06/2025 18:30:00").
    let date_part = trimmed.split_whitespace().next().unwrap_or_default();

    let mut fields = date_part.split('/');
    let (day, month, year) = match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(d), Some(m), Some(y), None) => (d, m, y),
        _ => return String::new(),
    };
    let (Ok(day), Ok(month), Ok(year)) = (day.parse::<u32>(), month.parse::<u32>(), year.parse::<i32>())
    else {
        return String::new();
    };

    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}
