//! The per-document pipeline and the batch driver.
//!
//! `ingest_document` is a pure function from (bytes, filename) to attributed
//! records; callers that want caching can key one on a content hash outside
//! this crate. The batch driver owns the accumulating dataset, logs
//! structural failures per file, and never lets one bad document abort the
//! rest.

use tracing::{error, info};

use crate::attribution::attribute_hotel;
use crate::config::IngestConfig;
use crate::dataset::{Dataset, DocumentOutcome, LossCounters};
use crate::detect::{detect, SchemaVariant};
use crate::error::Result;
use crate::extract::{extract_breakdown, extract_production};
use crate::metrics;
use crate::record::{DatasetRecord, Record};
use crate::xml;

/// One export file as submitted for ingestion. The filename feeds hotel
/// attribution only; structure comes exclusively from the content bytes.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub content: Vec<u8>,
    pub filename: String,
}

impl RawDocument {
    pub fn new(content: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            content,
            filename: filename.into(),
        }
    }
}

/// Parse, detect, extract and attribute a single document.
///
/// Returns `Err` only for structural failures (content is not well-formed
/// XML); every other degradation is absorbed into the outcome's counters.
pub fn ingest_document(
    content: &[u8],
    filename: &str,
    config: &IngestConfig,
) -> Result<DocumentOutcome> {
    let root = xml::parse_document(content)?;
    let variant = detect(&root, config);
    let hotel = attribute_hotel(filename, config);

    let mut losses = LossCounters {
        documents_processed: 1,
        ..Default::default()
    };

    let records: Vec<DatasetRecord> = match variant {
        SchemaVariant::Production => extract_production(&root, &mut losses)
            .into_iter()
            .map(|r| DatasetRecord::new(hotel, Record::Production(r)))
            .collect(),
        SchemaVariant::Market => extract_breakdown(&root, config, &mut losses)
            .into_iter()
            .map(|r| DatasetRecord::new(hotel, Record::Market(r)))
            .collect(),
        SchemaVariant::Segment => extract_breakdown(&root, config, &mut losses)
            .into_iter()
            .map(|r| DatasetRecord::new(hotel, Record::Segment(r)))
            .collect(),
        SchemaVariant::Unrecognized => {
            info!(filename, "no known schema marker, document contributes nothing");
            losses.unrecognized_documents += 1;
            metrics::unrecognized_document();
            Vec::new()
        }
    };

    losses.records_extracted = records.len() as u64;
    metrics::document_processed(&variant.to_string());
    metrics::records_extracted(records.len() as u64);
    info!(filename, %variant, %hotel, records = records.len(), "document ingested");

    Ok(DocumentOutcome {
        filename: filename.to_string(),
        variant,
        records,
        losses,
    })
}

/// Ingest an ordered batch into one dataset. Submission order is preserved
/// in the merged records; structural failures are logged with the filename,
/// counted, and skipped.
pub fn ingest_batch(
    documents: impl IntoIterator<Item = RawDocument>,
    config: &IngestConfig,
) -> Dataset {
    let mut dataset = Dataset::new();

    for document in documents {
        match ingest_document(&document.content, &document.filename, config) {
            Ok(outcome) => dataset.merge(outcome),
            Err(e) => {
                error!(filename = %document.filename, error = %e, "skipping unparseable document");
                dataset.losses.documents_processed += 1;
                dataset.losses.structural_errors += 1;
                metrics::structural_error();
            }
        }
    }

    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Hotel;

    const PRODUCTION_DOC: &[u8] = br#"<Report>
        <matrix1_Data Data="2025-07-01">
            <matrix1_Codiceaddebito Codiceaddebito="Camere"><Cell Importo="30"/></matrix1_Codiceaddebito>
            <matrix1_Codiceaddebito Codiceaddebito="Tot. Gen."><Cell Importo="1.500,00"/></matrix1_Codiceaddebito>
        </matrix1_Data>
        <matrix1_Data Data="2025-07-02"/>
        <matrix1_Data Data="2025-07-03"/>
        <matrix1_Data/>
    </Report>"#;

    const SEGMENT_DOC: &[u8] = br#"<Report>
        <table1_Group3 Data="7-25"><Detail textbox36="INLE" textbox37="12" textbox39="1080"/></table1_Group3>
        <table1_Group3 Data="8-25"><Detail textbox36="GRLE" textbox37="7" textbox39="630"/></table1_Group3>
    </Report>"#;

    #[test]
    fn end_to_end_batch_over_mixed_variants() {
        let config = IngestConfig::default();
        let dataset = ingest_batch(
            vec![
                RawDocument::new(PRODUCTION_DOC.to_vec(), "produzione_HP_2025.xml"),
                RawDocument::new(SEGMENT_DOC.to_vec(), "segmenti_CVM.xml"),
            ],
            &config,
        );

        // 3 valid days + 2 periods; the dateless day is dropped and counted.
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.losses.dropped_missing_date, 1);
        assert_eq!(dataset.losses.records_extracted, 5);

        let first = &dataset.records[0];
        assert_eq!(first.hotel, Hotel::Panorama);
        match &first.record {
            Record::Production(p) => assert_eq!(p.total_amount, 1500.0),
            other => panic!("expected production record, got {other:?}"),
        }

        let last = &dataset.records[4];
        assert_eq!(last.hotel, Hotel::Cvm);
        assert!(matches!(last.record, Record::Segment(_)));
        assert_eq!((last.year, last.month), (2025, 8));
    }

    #[test]
    fn structural_failures_skip_the_document_not_the_batch() {
        let config = IngestConfig::default();
        let dataset = ingest_batch(
            vec![
                RawDocument::new(b"definitely not xml".to_vec(), "broken.xml"),
                RawDocument::new(SEGMENT_DOC.to_vec(), "segmenti_CVM.xml"),
            ],
            &config,
        );

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.losses.structural_errors, 1);
        assert_eq!(dataset.losses.documents_processed, 2);
    }

    #[test]
    fn unrecognized_documents_contribute_zero_records() {
        let config = IngestConfig::default();
        let outcome =
            ingest_document(b"<Ledger><Row a=\"1\"/></Ledger>", "conto.xml", &config).unwrap();
        assert_eq!(outcome.variant, SchemaVariant::Unrecognized);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.losses.unrecognized_documents, 1);
    }

    #[test]
    fn missing_hotel_signal_resolves_to_unknown_not_an_error() {
        let config = IngestConfig::default();
        let outcome = ingest_document(SEGMENT_DOC, "export.xml", &config).unwrap();
        assert_eq!(outcome.records[0].hotel, Hotel::Unknown);
        // Period attribution is independent of the filename signal.
        assert_eq!(outcome.records[0].year, 2025);
    }
}
