use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Number (optional decimal) + optional whitespace + unit text
    /// Examples: "10 lbs", "2.5 gal", "12ea", "1 fl. oz."
    static ref QUANTITY_PATTERN: Regex =
        Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)\s*([a-zA-Z#][a-zA-Z#.\s]*)$").unwrap();
}

/// Check if a string looks like "<quantity> <unit>"
pub fn looks_like_quantity_string(s: &str) -> bool {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return false;
    }

    QUANTITY_PATTERN.is_match(trimmed)
}

/// Split "10 lbs" into (10.0, "lbs"). The unit text is returned as typed.
pub fn split_quantity_and_unit(s: &str) -> Option<(f64, String)> {
    let captures = QUANTITY_PATTERN.captures(s.trim())?;
    let quantity = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let unit = captures.get(2)?.as_str().trim().to_string();
    Some((quantity, unit))
}
