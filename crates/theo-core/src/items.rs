//! # Item Expression Parsing
//!
//! Sales staff enter item numbers as free-form text: a comma-separated mix
//! of plain counts and inclusive ranges.
//!
//! ```text
//! "40"       → 40 items
//! "1,2,3"    → 6 items  (sum of single counts)
//! "1-5"      → 5 items  (inclusive range)
//! "1-5,10"   → 15 items (range plus a single count)
//! ```
//!
//! Invalid tokens never fail the whole expression; they contribute zero.
//! A typo in one token must not block the rest of the order form.

/// Parses an item expression and returns the total item count.
///
/// ## Rules
/// - Tokens are comma-separated and trimmed.
/// - A token containing `-` is an inclusive range `a-b`, contributing
///   `b - a + 1` when both endpoints parse and `a <= b`; otherwise 0.
/// - Any other token is a single non-negative integer, contributing its
///   value when it parses; otherwise 0.
/// - The empty expression contributes 0.
/// - Counts saturate at `u64::MAX` instead of overflowing, so no
///   expression, however absurd, can panic the order form.
///
/// Pure and side-effect-free: same input always yields the same count.
///
/// ## Example
/// ```rust
/// use theo_core::items::parse_item_count;
///
/// assert_eq!(parse_item_count("1-5,10"), 15);
/// assert_eq!(parse_item_count("5-1"), 0); // inverted range ignored
/// ```
pub fn parse_item_count(expression: &str) -> u64 {
    expression
        .split(',')
        .map(|token| token_count(token.trim()))
        .fold(0u64, u64::saturating_add)
}

/// Count contributed by a single trimmed token.
fn token_count(token: &str) -> u64 {
    if token.contains('-') {
        range_count(token)
    } else {
        token.parse::<u64>().unwrap_or(0)
    }
}

/// Count contributed by a range token `a-b`.
///
/// Strict: exactly two fragments, both must parse, and the range must not
/// be inverted. Anything else is ignored rather than rejected.
fn range_count(token: &str) -> u64 {
    let Some((start, end)) = token.split_once('-') else {
        return 0;
    };
    if end.contains('-') {
        return 0;
    }

    match (start.trim().parse::<u64>(), end.trim().parse::<u64>()) {
        // `b - a` cannot overflow here; `+ 1` can, on `0-u64::MAX`.
        (Ok(a), Ok(b)) if a <= b => (b - a).saturating_add(1),
        _ => 0,
    }
}
