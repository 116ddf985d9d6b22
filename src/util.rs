/// Returns true if `s` ends with `suffix`, comparing ASCII
/// case-insensitively. Safe on non-ASCII input: a suffix boundary that
/// falls inside a multi-byte character is simply not a match.
pub fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    match s.len().checked_sub(suffix.len()) {
        Some(start) => match s.get(start..) {
            Some(tail) => tail.eq_ignore_ascii_case(suffix),
            None => false,
        },
        None => false,
    }
}
