//! Structural format detection for CondGes exports.
//!
//! Classification is total: every well-formed document maps to exactly one
//! variant, and anything without a known marker is `Unrecognized` (zero
//! records, never an error).

use serde::Serialize;
use tracing::debug;

use crate::config::IngestConfig;
use crate::constants::{BREAKDOWN_MARKER, DETAIL_CODE_ATTR, DETAIL_ELEMENT, PRODUCTION_MARKER};
use crate::xml::XmlElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    Production,
    Market,
    Segment,
    Unrecognized,
}

impl std::fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SchemaVariant::Production => "production",
            SchemaVariant::Market => "market",
            SchemaVariant::Segment => "segment",
            SchemaVariant::Unrecognized => "unrecognized",
        };
        f.write_str(label)
    }
}

/// Classify a normalized document tree by its structural markers.
///
/// The market-vs-segment split looks at the identifying code of the first
/// detail row only; the whole document is assumed uniform. The extractor
/// flags documents that violate that assumption without reclassifying them.
pub fn detect(root: &XmlElement, config: &IngestConfig) -> SchemaVariant {
    if root.find_named(PRODUCTION_MARKER).is_some() {
        return SchemaVariant::Production;
    }

    if root.find_named(BREAKDOWN_MARKER).is_some() {
        let channels = config.market_channels();
        let first_code = root
            .find_named(DETAIL_ELEMENT)
            .and_then(|detail| detail.attr(DETAIL_CODE_ATTR))
            .unwrap_or("");
        let variant = if channels.contains(first_code) {
            SchemaVariant::Market
        } else {
            SchemaVariant::Segment
        };
        debug!(first_code, %variant, "classified breakdown document");
        return variant;
    }

    SchemaVariant::Unrecognized
}
