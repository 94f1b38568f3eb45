//! Italian locale numeric parsing for the production export.
//!
//! Amounts arrive as strings like `"1.234,56"`: period as thousands
//! separator, comma as decimal separator. Market/segment exports use plain
//! numbers and do not go through here.

/// Parse a locale-formatted amount. Empty or whitespace-only input counts
/// as an explicit zero; `None` means the string was genuinely malformed and
/// the caller should apply the zero fallback (and count the loss).
pub fn parse_locale_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    let normalized = trimmed.replace('.', "").replace(',', ".");
    normalized.parse::<f64>().ok()
}

/// Lenient form of [`parse_locale_number`]: malformed input degrades to
/// zero instead of failing the record.
pub fn parse_locale_number_or_zero(raw: &str) -> f64 {
    parse_locale_number(raw).unwrap_or(0.0)
}
