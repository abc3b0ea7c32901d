//! Listing and search helpers for contacts and sync history.
//!
//! Lives in `core` so both the repository layer and the HTTP layer clamp
//! and escape user input the same way.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default page size for contact listings.
pub const DEFAULT_CONTACT_LIMIT: i64 = 50;

/// Maximum page size for contact listings.
pub const MAX_CONTACT_LIMIT: i64 = 500;

/// Default page size for sync run history.
pub const DEFAULT_RUN_HISTORY_LIMIT: i64 = 20;

/// Maximum page size for sync run history.
pub const MAX_RUN_HISTORY_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Query builder helpers
// ---------------------------------------------------------------------------

/// Turn free-text user input into an `ILIKE` pattern.
///
/// Trims the input, escapes the `LIKE` metacharacters (`\`, `%`, `_`) and
/// wraps the result in `%...%`. Returns `None` for blank input so callers
/// can skip the filter entirely.
pub fn contains_pattern(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(trimmed.len() + 2);
    pattern.push('%');
    for c in trimmed.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- contains_pattern ----------------------------------------------------

    #[test]
    fn pattern_wraps_plain_text() {
        assert_eq!(contains_pattern("john").as_deref(), Some("%john%"));
    }

    #[test]
    fn pattern_trims_whitespace() {
        assert_eq!(contains_pattern("  Doe ").as_deref(), Some("%Doe%"));
    }

    #[test]
    fn pattern_is_none_for_blank_input() {
        assert_eq!(contains_pattern(""), None);
        assert_eq!(contains_pattern("   "), None);
    }

    #[test]
    fn pattern_escapes_like_metacharacters() {
        assert_eq!(
            contains_pattern("50%_off\\").as_deref(),
            Some("%50\\%\\_off\\\\%")
        );
    }

    // -- clamp_limit ---------------------------------------------------------

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(1_000), DEFAULT_CONTACT_LIMIT, MAX_CONTACT_LIMIT), 500);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(-5), 20, 100), 1);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
    }

    // -- clamp_offset --------------------------------------------------------

    #[test]
    fn clamp_offset_defaults_to_zero() {
        assert_eq!(clamp_offset(None), 0);
    }

    #[test]
    fn clamp_offset_floors_negative() {
        assert_eq!(clamp_offset(Some(-10)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }
}
