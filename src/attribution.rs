//! Hotel attribution from filename signals.
//!
//! The exports carry no hotel identifier in their content, so the filename
//! is the only signal. Matching is substring-based on the upper-cased
//! filename, exact hotel names before aliases, and always resolves to a
//! value: `Hotel::Unknown` rather than no attribution.

use tracing::debug;

use crate::config::IngestConfig;
use crate::constants::HOTEL_NAMES;
use crate::record::Hotel;

/// Resolve the hotel a file belongs to. Priority order:
/// 1. exact hotel name anywhere in the upper-cased filename,
/// 2. alias patterns in fixed order (built-ins, then config extras),
/// 3. the explicit unknown sentinel.
pub fn attribute_hotel(filename: &str, config: &IngestConfig) -> Hotel {
    let upper = filename.to_uppercase();

    for name in HOTEL_NAMES {
        if upper.contains(name) {
            if let Some(hotel) = Hotel::from_name(name) {
                return hotel;
            }
        }
    }

    for (pattern, hotel) in config.alias_rules() {
        if upper.contains(&pattern) {
            debug!(filename, %hotel, alias = %pattern, "hotel resolved via alias");
            return hotel;
        }
    }

    debug!(filename, "no hotel signal in filename");
    Hotel::Unknown
}
