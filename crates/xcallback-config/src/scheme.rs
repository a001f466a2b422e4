//! URL scheme syntax shared by configuration validation and the codec.

/// Returns `true` when `scheme` matches `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
///
/// # Example
///
/// ```ignore
/// assert!(xcallback_config::is_valid_scheme("notes"));
/// assert!(!xcallback_config::is_valid_scheme("9lives"));
/// ```
#[must_use]
pub fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
