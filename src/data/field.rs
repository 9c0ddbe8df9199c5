use chrono::{Datelike, NaiveDate};

use super::error::FieldParseError;

/// Release dates in the source table are written `DD-MM-YYYY`.
pub const RELEASE_DATE_FORMAT: &str = "%d-%m-%Y";

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

pub fn parse_release_date(text: &str) -> Result<NaiveDate, FieldParseError> {
    NaiveDate::parse_from_str(text.trim(), RELEASE_DATE_FORMAT).map_err(|_| {
        FieldParseError::Date {
            value: text.to_string(),
        }
    })
}

/// `"YYYY-MM"` key used to group records by release month.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// First day of the calendar month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Parse a non-negative integer count. Integral floats such as `"1500.0"`
/// are accepted because spreadsheet exports often write counts that way.
pub fn parse_count(text: &str) -> Result<u64, FieldParseError> {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        return Ok(n);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(count_from_f64)
        .ok_or_else(|| FieldParseError::Number {
            value: text.to_string(),
            kind: "copy count",
        })
}

pub fn count_from_f64(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then_some(value as u64)
}

/// Parse a finite decimal (review scores).
pub fn parse_score(text: &str) -> Result<f64, FieldParseError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FieldParseError::Number {
            value: text.to_string(),
            kind: "review score",
        })
}

/// Parse a non-negative finite decimal (prices).
pub fn parse_price(text: &str) -> Result<f64, FieldParseError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .and_then(price_from_f64)
        .ok_or_else(|| FieldParseError::Number {
            value: text.to_string(),
            kind: "price",
        })
}

pub fn price_from_f64(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_month_year() {
        let date = parse_release_date("15-03-2024").expect("date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(month_key(date), "2024-03");
        assert_eq!(month_start(date), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn rejects_other_date_shapes() {
        assert!(matches!(
            parse_release_date("not-a-date"),
            Err(FieldParseError::Date { .. })
        ));
        // ISO order is not the source format.
        assert!(parse_release_date("2024-03-15").is_err());
        assert!(parse_release_date("31-02-2024").is_err());
    }

    #[test]
    fn counts_accept_integral_floats_only() {
        assert_eq!(parse_count(" 1500 "), Ok(1500));
        assert_eq!(parse_count("2500000.0"), Ok(2_500_000));
        assert!(parse_count("12.5").is_err());
        assert!(parse_count("-3").is_err());
        assert!(parse_count("").is_err());
    }

    #[test]
    fn prices_must_be_non_negative() {
        assert_eq!(parse_price("19.99"), Ok(19.99));
        assert_eq!(parse_price("0"), Ok(0.0));
        assert!(parse_price("-1").is_err());
        assert!(parse_price("NaN").is_err());
    }

    #[test]
    fn scores_reject_non_finite() {
        assert_eq!(parse_score("87"), Ok(87.0));
        assert!(parse_score("inf").is_err());
        assert!(parse_score("n/a").is_err());
    }
}
