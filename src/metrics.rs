//! Ingest metrics
//!
//! Counters for batch throughput and for the lenient-degradation paths
//! (dropped days, numeric fallbacks) that would otherwise be silent.
//! Recorded through the `metrics` facade; installing an exporter is the
//! embedding application's concern.

pub fn document_processed(variant: &str) {
    ::metrics::counter!("condges_ingest_documents_processed").increment(1);
    ::metrics::counter!("condges_ingest_documents_by_variant", "variant" => variant.to_string())
        .increment(1);
}

pub fn structural_error() {
    ::metrics::counter!("condges_ingest_structural_errors").increment(1);
}

pub fn unrecognized_document() {
    ::metrics::counter!("condges_ingest_unrecognized_documents").increment(1);
}

pub fn records_extracted(count: u64) {
    ::metrics::counter!("condges_ingest_records_extracted").increment(count);
}

/// A production day element lacked a usable date and its record was dropped.
pub fn dropped_missing_date() {
    ::metrics::counter!("condges_ingest_records_dropped_missing_date").increment(1);
}

/// A numeric field failed to coerce and degraded to zero.
pub fn numeric_fallback() {
    ::metrics::counter!("condges_ingest_numeric_fallbacks").increment(1);
}

/// A breakdown document mixed channel and non-channel codes; classification
/// keeps the first-row heuristic but the inconsistency is worth surfacing.
pub fn mixed_code_document() {
    ::metrics::counter!("condges_ingest_mixed_code_documents").increment(1);
}
