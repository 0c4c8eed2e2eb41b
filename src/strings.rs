//! String helpers

const DEFAULT_SUFFIX: &str = "...";

/// Cap `s` to `length` characters, ending with `...` when truncated
///
/// ```
/// use corekit::strings::capped_string;
///
/// assert_eq!(capped_string("This is a long string", 10), "This is...");
/// ```
pub fn capped_string(s: &str, length: usize) -> String {
    capped_string_with(s, length, DEFAULT_SUFFIX)
}

/// Cap `s` to `length` characters, ending with `suffix` when truncated
///
/// When the suffix does not fit, the string is cut to `length` without it.
pub fn capped_string_with(s: &str, length: usize, suffix: &str) -> String {
    if s.chars().count() <= length {
        return s.to_string();
    }
    let suffix_length = suffix.chars().count();
    if length <= suffix_length {
        return s.chars().take(length).collect();
    }
    let mut capped: String = s.chars().take(length - suffix_length).collect();
    capped.push_str(suffix);
    capped
}

/// Parse a decimal integer, or return `fallback`
pub fn atoi(value: &str, fallback: i64) -> i64 {
    value.parse().unwrap_or(fallback)
}
