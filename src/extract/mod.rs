//! Per-variant record extractors.
//!
//! One document is one variant; the detector picks which extractor runs.
//! Extractors absorb dirty data locally (zero fallbacks, dropped day
//! records) and report every such loss through the counters they are given.

pub mod market_segment;
pub mod production;

pub use market_segment::extract_breakdown;
pub use production::extract_production;
