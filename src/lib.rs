//! Ingestion and normalization core for CondGes hotel PMS exports.
//!
//! Heterogeneous XML export files (daily production, sales-channel and
//! customer-segment breakdowns) are classified, extracted, attributed to a
//! hotel, and merged into one schema-heterogeneous [`dataset::Dataset`].
//! Rendering, roll-up arithmetic and persistence are external concerns.

pub mod attribution;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod detect;
pub mod error;
pub mod extract;
pub mod logging;
pub mod metrics;
pub mod numeric;
pub mod pipeline;
pub mod record;
pub mod xml;
