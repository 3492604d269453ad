//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a 0-5 rating with one decimal.
///
/// Usage in templates: `{{ card.rating|rating }}`
#[askama::filter_fn]
pub fn rating(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_rating(value.to_string()))
}

fn format_rating(text: String) -> String {
    text.parse::<f64>().map_or(text, |v| format!("{v:.1}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating("4.66".to_string()), "4.7");
        assert_eq!(format_rating("5".to_string()), "5.0");
        assert_eq!(format_rating("n/a".to_string()), "n/a");
    }
}
