//! MAC address syntax validation.
//!
//! A MAC is accepted as six hex octet pairs separated by `:` or `-`,
//! case-insensitive, mixed separators allowed. Separator style and case are
//! preserved in storage; cross-registry comparisons use [`key`].

/// Strip embedded ASCII whitespace from a MAC string.
///
/// The only normalization applied before validation and storage; separator
/// style is left as given.
pub fn normalize(mac: &str) -> String {
    mac.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// True iff `mac` is six `:`- or `-`-delimited hex octet pairs.
pub fn is_valid(mac: &str) -> bool {
    let bytes = mac.as_bytes();
    if bytes.len() != 17 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i % 3 {
        2 => *b == b':' || *b == b'-',
        _ => b.is_ascii_hexdigit(),
    })
}

/// Comparison key for a MAC: lowercased hex digits, separators dropped.
///
/// `AA:BB:CC:DD:EE:FF` and `aa-bb-cc-dd-ee-ff` map to the same key, so the
/// engine can match observed MACs against stored rows regardless of how
/// either side was written.
pub fn key(mac: &str) -> String {
    mac.chars()
        .filter(|c| c.is_ascii_hexdigit())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
