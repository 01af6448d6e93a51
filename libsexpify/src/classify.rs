//! Classify string scalars into the renderings the encoder knows.
//!
//! Checks run in a fixed order: ISO date, placeholder, symbolic
//! identifier, then plain string.

/// How a string scalar should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind<'a> {
    /// `YYYY-MM-DD`, split into its digit groups.
    Date {
        year: &'a str,
        month: &'a str,
        day: &'a str,
    },
    /// Contains an unresolved `{{ ... }}` template token.
    Placeholder,
    /// Compact alphanumeric code with at least one digit, e.g. `A4786`.
    Symbol,
    /// Anything else.
    Plain,
}

/// Classify a string scalar.
pub fn classify(s: &str) -> ScalarKind<'_> {
    if is_iso_date(s) {
        return ScalarKind::Date {
            year: &s[0..4],
            month: &s[5..7],
            day: &s[8..10],
        };
    }
    if is_placeholder(s) {
        return ScalarKind::Placeholder;
    }
    if is_symbolic_identifier(s) {
        return ScalarKind::Symbol;
    }
    ScalarKind::Plain
}

/// Check whether a string is exactly `YYYY-MM-DD` (ASCII digits).
pub fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

/// Check whether a string carries both `{{` and `}}`.
pub fn is_placeholder(s: &str) -> bool {
    s.contains("{{") && s.contains("}}")
}

/// Check whether a string is `[A-Za-z0-9_]+` with at least one digit.
pub fn is_symbolic_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && s.chars().any(|c| c.is_ascii_digit())
}
