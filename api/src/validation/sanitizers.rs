//! Input sanitization functions
//!
//! Applied before validation so that rules see normalized text.

/// Trim leading and trailing whitespace from a string
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Trim an optional field in place.
///
/// An empty result stays `Some("")`: an explicitly blank field must still be
/// reported as missing rather than silently dropped.
pub fn trim_in_place(value: &mut Option<String>) {
    if let Some(ref mut s) = value {
        if s.len() != s.trim().len() {
            *s = trim(s);
        }
    }
}
