/// Trims, lowercases and clamps a raw query to at most `max_chars` characters.
pub fn normalize_query(raw: &str, max_chars: usize) -> String {
    let lowered = raw.trim().to_lowercase();
    match lowered.char_indices().nth(max_chars) {
        Some((cut, _)) => lowered[..cut].to_string(),
        None => lowered,
    }
}

/// Long queries skip the tiered search and take the title/sku fallback.
pub fn is_long_query(normalized: &str, threshold: usize) -> bool {
    normalized.chars().count() > threshold
}
