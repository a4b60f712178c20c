/// Canonicalizes raw user input before any lookup or cache access:
/// the result is both the cache key and the substring-match basis for
/// ranking. Never fails; may return an empty string, which the caller
/// rejects via its minimum-length check.
pub fn normalize_query(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | ',' | '.' | '-')
        })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
