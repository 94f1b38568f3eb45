//! The merged, schema-heterogeneous dataset and its tabular view.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::detect::SchemaVariant;
use crate::error::Result;
use crate::record::{DatasetRecord, Record};

/// Counts for every lenient-degradation path. Carried on the dataset so
/// callers can see undercounting without installing a metrics recorder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LossCounters {
    pub documents_processed: u64,
    pub structural_errors: u64,
    pub unrecognized_documents: u64,
    pub records_extracted: u64,
    pub dropped_missing_date: u64,
    pub numeric_fallbacks: u64,
    pub mixed_code_documents: u64,
}

impl LossCounters {
    pub fn absorb(&mut self, other: &LossCounters) {
        self.documents_processed += other.documents_processed;
        self.structural_errors += other.structural_errors;
        self.unrecognized_documents += other.unrecognized_documents;
        self.records_extracted += other.records_extracted;
        self.dropped_missing_date += other.dropped_missing_date;
        self.numeric_fallbacks += other.numeric_fallbacks;
        self.mixed_code_documents += other.mixed_code_documents;
    }
}

/// Everything one document contributed to the batch: its attributed records
/// in extraction order, the detected variant, and its local loss counts.
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    pub filename: String,
    pub variant: SchemaVariant,
    pub records: Vec<DatasetRecord>,
    pub losses: LossCounters,
}

/// Ordered concatenation of every record extracted across a batch.
///
/// Insertion order is document submission order, then extraction order
/// within each document; nothing downstream depends on it beyond
/// reproducibility.
#[derive(Debug, Default, Serialize)]
pub struct Dataset {
    pub records: Vec<DatasetRecord>,
    pub losses: LossCounters,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fold one document's contribution into the dataset. An unrecognized
    /// or failed document arrives here as an empty outcome; its counters
    /// still accumulate.
    pub fn merge(&mut self, outcome: DocumentOutcome) {
        self.records.extend(outcome.records);
        self.losses.absorb(&outcome.losses);
    }

    /// Column names of the tabular view: the union of every record's field
    /// set, in a fixed canonical order, with dynamic revenue codes exported
    /// as sorted `ricavo_<code>` columns at the end.
    pub fn columns(&self) -> Vec<String> {
        let has_production = self
            .records
            .iter()
            .any(|r| matches!(r.record, Record::Production(_)));
        let has_breakdown = self
            .records
            .iter()
            .any(|r| matches!(r.record, Record::Market(_) | Record::Segment(_)));
        let has_market = self
            .records
            .iter()
            .any(|r| matches!(r.record, Record::Market(_)));
        let has_segment = self
            .records
            .iter()
            .any(|r| matches!(r.record, Record::Segment(_)));

        let mut columns: Vec<String> = ["hotel", "tipo", "anno", "mese"]
            .iter()
            .map(|c| (*c).to_string())
            .collect();
        if has_production {
            columns.extend(["giorno", "data"].iter().map(|c| (*c).to_string()));
        }
        if has_production || has_breakdown {
            columns.push("camere".to_string());
        }
        if has_production {
            columns.extend(["adulti", "totale"].iter().map(|c| (*c).to_string()));
        }
        if has_breakdown {
            columns.extend(
                ["periodo", "notti", "importo", "tariffa_media"]
                    .iter()
                    .map(|c| (*c).to_string()),
            );
        }
        if has_market {
            columns.push("canale".to_string());
        }
        if has_segment {
            columns.push("segmento".to_string());
        }

        let revenue_columns: BTreeSet<String> = self
            .records
            .iter()
            .filter_map(|r| match &r.record {
                Record::Production(p) => Some(p.revenue.keys()),
                _ => None,
            })
            .flatten()
            .map(|code| format!("ricavo_{code}"))
            .collect();
        columns.extend(revenue_columns);
        columns
    }

    /// Rows of the tabular view. Every row carries every column of
    /// [`Dataset::columns`], with `null` marking fields that do not apply
    /// to the row's variant.
    pub fn rows(&self) -> Vec<Map<String, Value>> {
        let columns = self.columns();
        self.records
            .iter()
            .map(|record| {
                let mut row = Map::new();
                for column in &columns {
                    row.insert(column.clone(), Value::Null);
                }
                row.insert("hotel".to_string(), json!(record.hotel.as_str()));
                row.insert("tipo".to_string(), json!(record.record.type_label()));
                row.insert("anno".to_string(), json!(record.year));
                row.insert("mese".to_string(), json!(record.month));
                match &record.record {
                    Record::Production(p) => {
                        row.insert("giorno".to_string(), json!(record.day));
                        row.insert("data".to_string(), json!(p.date.to_string()));
                        row.insert("camere".to_string(), json!(p.rooms_sold));
                        row.insert("adulti".to_string(), json!(p.adults));
                        row.insert("totale".to_string(), json!(p.total_amount));
                        for (code, amount) in &p.revenue {
                            row.insert(format!("ricavo_{code}"), json!(amount));
                        }
                    }
                    Record::Market(b) | Record::Segment(b) => {
                        row.insert("periodo".to_string(), json!(b.period));
                        row.insert("camere".to_string(), json!(b.rooms));
                        row.insert("notti".to_string(), json!(b.nights));
                        row.insert("importo".to_string(), json!(b.amount));
                        row.insert("tariffa_media".to_string(), json!(b.average_rate));
                        let column = match &record.record {
                            Record::Market(_) => "canale",
                            _ => "segmento",
                        };
                        row.insert(column.to_string(), json!(b.code));
                    }
                }
                row
            })
            .collect()
    }

    /// Write the tabular view as CSV: header row from [`Dataset::columns`],
    /// null markers rendered as empty cells.
    pub fn write_csv<W: std::io::Write>(&self, out: W) -> Result<()> {
        let columns = self.columns();
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(&columns)?;
        for row in self.rows() {
            let cells: Vec<String> = columns
                .iter()
                .map(|column| match &row[column.as_str()] {
                    Value::Null => String::new(),
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            writer.write_record(&cells)?;
        }
        writer.flush()?;
        Ok(())
    }
}
