//! Validation of the user-entered fact count

use crate::error::ValidationError;
use crate::types::RequestedCount;

/// Parse a raw input string into a [`RequestedCount`]
///
/// Surrounding whitespace is ignored, then an optional sign and the leading
/// run of ASCII digits are read as a base-10 integer; anything after the
/// digits is ignored, so `"3.5"` reads as 3. The value must then be in
/// `[1, 10]`. Input with no leading digits, a negative value or one too large
/// for `u32` yields a [`ValidationError`] carrying the raw input.
///
/// # Examples
///
/// ```
/// use cat_facts::validate::parse_requested_count;
///
/// assert_eq!(parse_requested_count("3").unwrap().get(), 3);
/// assert_eq!(parse_requested_count("2abc").unwrap().get(), 2);
/// assert!(parse_requested_count("11").is_err());
/// assert!(parse_requested_count("abc").is_err());
/// ```
pub fn parse_requested_count(raw: &str) -> Result<RequestedCount, ValidationError> {
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];

    // No digits at all, or a value below the range (including "-0")
    if digits.is_empty() || negative {
        return Err(ValidationError::new(raw));
    }

    // Too many digits for u32 is simply out of range
    let parsed: u32 = digits.parse().map_err(|_| ValidationError::new(raw))?;

    RequestedCount::try_from(parsed).map_err(|_| ValidationError::new(raw))
}
