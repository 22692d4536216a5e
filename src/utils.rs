//! Helpers for the free-text fields of plan records.
//!
//! Ranges arrive as `"min-max"` with currency symbols, thousands separators
//! or units mixed in (`"₹25,00,000-₹5,00,00,000"`, `"10 - 40 years"`). The
//! helpers here never fail: unparsable input falls back to fixed placeholder
//! values so a single malformed plan does not block a comparison.

/// Fallback for a missing or unparsable lower bound.
pub const DEFAULT_RANGE_MIN: i64 = 0;

/// Fallback for a missing or unparsable policy term upper bound.
pub const DEFAULT_TERM_MAX: i64 = 100;

/// Parses a token after dropping every non-digit character.
pub fn parse_digits(token: &str) -> Option<i64> {
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// The numeric value of the `index`-th `-` separated token, if any.
pub fn range_token(range: Option<&str>, index: usize) -> Option<i64> {
    range?.split('-').nth(index).and_then(parse_digits)
}

/// Policy term bounds as `(min, max)`, defaulting to `(0, 100)`.
pub fn term_bounds(range: Option<&str>) -> (i64, i64) {
    (
        range_token(range, 0).unwrap_or(DEFAULT_RANGE_MIN),
        range_token(range, 1).unwrap_or(DEFAULT_TERM_MAX),
    )
}

/// Lower bound of a single-value range such as sum assured or premium.
pub fn range_floor(range: Option<&str>) -> i64 {
    range_token(range, 0).unwrap_or(DEFAULT_RANGE_MIN)
}

/// Splits comma-joined rider text into individual riders.
///
/// Riders are not trimmed: `"Life Cover, Disability"` yields
/// `["Life Cover", " Disability"]`. Absent or empty text yields no riders.
pub fn split_riders(riders: Option<&str>) -> Vec<String> {
    match riders {
        Some(text) if !text.is_empty() => text.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_bounds() {
        assert_eq!(term_bounds(Some("8-65")), (8, 65));
        assert_eq!(term_bounds(Some("10 - 40 years")), (10, 40));
        assert_eq!(term_bounds(Some("N/A")), (0, 100));
        assert_eq!(term_bounds(None), (0, 100));
        // no upper bound given
        assert_eq!(term_bounds(Some("25")), (25, 100));
    }

    #[test]
    fn test_range_floor_strips_currency() {
        assert_eq!(range_floor(Some("₹25,00,000-₹5,00,00,000")), 2_500_000);
        assert_eq!(range_floor(Some("$8,000 - $25,000")), 8_000);
        assert_eq!(range_floor(Some("On request")), 0);
        assert_eq!(range_floor(Some("")), 0);
        assert_eq!(range_floor(None), 0);
    }

    #[test]
    fn test_parse_digits_overflow_falls_back() {
        assert_eq!(parse_digits("99999999999999999999999"), None);
        assert_eq!(range_floor(Some("99999999999999999999999-1")), 0);
    }

    #[test]
    fn test_split_riders() {
        assert_eq!(
            split_riders(Some("Life Cover, Disability")),
            vec!["Life Cover".to_string(), " Disability".to_string()]
        );
        assert_eq!(split_riders(Some("Waiver")), vec!["Waiver".to_string()]);
        assert!(split_riders(Some("")).is_empty());
        assert!(split_riders(None).is_empty());
    }
}
