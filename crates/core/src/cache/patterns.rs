//! Glob matching for cache key patterns.
//!
//! Only the `*` wildcard is supported. It matches any sequence of characters,
//! including the empty one. This is the subset of Redis `SCAN MATCH` syntax
//! that the key builders in [`super::keys`] produce.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use bookcache_core::cache::pattern_matches;
///
/// assert!(pattern_matches("author:12", "author:12"));
/// assert!(pattern_matches("authors:*", "authors:0:10"));
/// assert!(pattern_matches("*:0:10", "books:0:10"));
/// assert!(!pattern_matches("authors:*", "author:12"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let mut segments = pattern.split('*');

    // `split` always yields at least one segment.
    let head = segments.next().unwrap_or_default();
    let Some(mut rest) = key.strip_prefix(head) else {
        return false;
    };

    let tail: Vec<&str> = segments.collect();
    let Some((last, middle)) = tail.split_last() else {
        // No wildcard at all: exact match.
        return rest.is_empty();
    };

    for segment in middle.iter().filter(|s| !s.is_empty()) {
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}
