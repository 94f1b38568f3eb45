use anyhow::Result;
use std::fs;

use condges_ingest::config::IngestConfig;
use condges_ingest::pipeline::{ingest_batch, ingest_document, RawDocument};
use condges_ingest::record::{Hotel, Record};
use serde_json::Value;
use tempfile::tempdir;

const PRODUCTION_HP: &str = r#"<Report xmlns="http://schemas.example.com/reporting">
    <matrix1_Data Data="2025-07-01">
        <matrix1_Codiceaddebito Codiceaddebito="Camere"><Cell Importo="38"/></matrix1_Codiceaddebito>
        <matrix1_Codiceaddebito Codiceaddebito="Adulti"><Cell Importo="71"/></matrix1_Codiceaddebito>
        <matrix1_Codiceaddebito Codiceaddebito="Tot. Gen."><Cell Importo="1.500,00"/></matrix1_Codiceaddebito>
        <matrix1_Codiceaddebito Codiceaddebito="BAR"><Cell Importo="210,40"/></matrix1_Codiceaddebito>
    </matrix1_Data>
    <matrix1_Data Data="2025-07-02">
        <matrix1_Codiceaddebito Codiceaddebito="Camere"><Cell Importo="41"/></matrix1_Codiceaddebito>
        <matrix1_Codiceaddebito Codiceaddebito="Tot. Gen."><Cell Importo="4.820,16"/></matrix1_Codiceaddebito>
    </matrix1_Data>
    <matrix1_Data Data="2025-07-03">
        <matrix1_Codiceaddebito Codiceaddebito="Camere"><Cell Importo="35"/></matrix1_Codiceaddebito>
        <matrix1_Codiceaddebito Codiceaddebito="Tot. Gen."><Cell Importo="3.990,00"/></matrix1_Codiceaddebito>
    </matrix1_Data>
    <matrix1_Data>
        <matrix1_Codiceaddebito Codiceaddebito="Camere"><Cell Importo="99"/></matrix1_Codiceaddebito>
    </matrix1_Data>
</Report>"#;

const SEGMENTS_CVM: &str = r#"<Report>
    <table1_Group3 Data="7-25">
        <Detail textbox36="INLE" textbox37="120" textbox38="260" textbox39="21500" textbox40="82.7"/>
    </table1_Group3>
    <table1_Group3 Data="8-25">
        <Detail textbox36="GRLE" textbox37="64" textbox38="140" textbox39="10200" textbox40="72.8"/>
    </table1_Group3>
</Report>"#;

#[test]
fn end_to_end_mixed_batch() -> Result<()> {
    let config = IngestConfig::default();
    let dataset = ingest_batch(
        vec![
            RawDocument::new(PRODUCTION_HP.as_bytes().to_vec(), "produzione_HP_luglio.xml"),
            RawDocument::new(SEGMENTS_CVM.as_bytes().to_vec(), "segmenti_CVM_2025.xml"),
        ],
        &config,
    );

    // 3 valid production days + 2 segment periods; the dateless day is
    // dropped, counted, and does not disturb its siblings.
    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.losses.dropped_missing_date, 1);

    for record in &dataset.records[..3] {
        assert_eq!(record.hotel, Hotel::Panorama);
        assert!(matches!(record.record, Record::Production(_)));
    }
    match &dataset.records[0].record {
        Record::Production(p) => {
            assert_eq!(p.total_amount, 1500.0);
            assert_eq!(p.revenue.get("bar"), Some(&210.40));
        }
        other => panic!("expected production record, got {other:?}"),
    }

    for record in &dataset.records[3..] {
        assert_eq!(record.hotel, Hotel::Cvm);
        assert!(matches!(record.record, Record::Segment(_)));
    }

    // The tabular view keeps the variants apart: segment rows carry a
    // segmento value and no canale column exists at all.
    let columns = dataset.columns();
    assert!(columns.contains(&"segmento".to_string()));
    assert!(!columns.contains(&"canale".to_string()));

    let rows = dataset.rows();
    assert_eq!(rows[3]["segmento"], Value::String("INLE".to_string()));
    assert_eq!(rows[3]["totale"], Value::Null);
    assert_eq!(rows[0]["totale"], serde_json::json!(1500.0));
    Ok(())
}

#[test]
fn batch_from_files_on_disk() -> Result<()> {
    let dir = tempdir()?;
    let production_path = dir.path().join("produzione_ANGELINA.xml");
    let noise_path = dir.path().join("fattura.xml");
    fs::write(&production_path, PRODUCTION_HP)?;
    fs::write(&noise_path, "<Fattura><Riga importo=\"10\"/></Fattura>")?;

    let config = IngestConfig::default();
    let documents: Vec<RawDocument> = [&production_path, &noise_path]
        .iter()
        .map(|path| {
            Ok(RawDocument::new(
                fs::read(path)?,
                path.file_name().unwrap().to_string_lossy().into_owned(),
            ))
        })
        .collect::<Result<_>>()?;

    let dataset = ingest_batch(documents, &config);

    // The unrecognized invoice contributes nothing but is counted.
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.losses.unrecognized_documents, 1);
    assert!(dataset.records.iter().all(|r| r.hotel == Hotel::Angelina));
    Ok(())
}

#[test]
fn attribution_and_period_fallbacks_keep_records() -> Result<()> {
    let config = IngestConfig::default();

    // No hotel token in the filename, unparseable period string.
    let doc = r#"<Report>
        <table1_Group3 Data="estate 2025">
            <Detail textbox36="OTA" textbox37="10" textbox39="900"/>
        </table1_Group3>
    </Report>"#;
    let outcome = ingest_document(doc.as_bytes(), "export.xml", &config)?;

    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(record.hotel, Hotel::Unknown);
    assert_eq!(record.year, 0);
    assert_eq!(record.month, 0);
    assert!(matches!(record.record, Record::Market(_)));
    Ok(())
}
