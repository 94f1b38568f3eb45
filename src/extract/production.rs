//! Extractor for the daily production (occupancy/revenue) export.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::constants::{
    AMOUNT_ATTR, CELL_ELEMENT, CHARGE_CODE_ATTR, CHARGE_ELEMENT, CODE_ADULTS, CODE_ROOMS,
    CODE_TOTAL, DATE_ATTR, PRODUCTION_MARKER,
};
use crate::dataset::LossCounters;
use crate::metrics;
use crate::numeric::parse_locale_number;
use crate::record::ProductionRecord;
use crate::xml::XmlElement;

// Date layouts seen in the wild across the PMS export versions.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y", "%d-%m-%Y"];

fn parse_export_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw.trim(), format).ok())
}

/// Pull one record per day element. A day without a parseable date cannot
/// be attributed and is dropped (counted); its siblings are unaffected.
pub fn extract_production(root: &XmlElement, losses: &mut LossCounters) -> Vec<ProductionRecord> {
    let mut records = Vec::new();

    for day in root.descendants_named(PRODUCTION_MARKER) {
        let date_raw = day.attr(DATE_ATTR).unwrap_or("");
        let Some(date) = parse_export_date(date_raw) else {
            warn!(date = date_raw, "production day without usable date, record dropped");
            losses.dropped_missing_date += 1;
            metrics::dropped_missing_date();
            continue;
        };

        let mut record = ProductionRecord {
            date,
            rooms_sold: 0,
            adults: 0,
            total_amount: 0.0,
            revenue: BTreeMap::new(),
        };

        for charge in day.descendants_named(CHARGE_ELEMENT) {
            let code = charge.attr(CHARGE_CODE_ATTR).unwrap_or("");
            let amount_raw = charge
                .find_named(CELL_ELEMENT)
                .and_then(|cell| cell.attr(AMOUNT_ATTR))
                .unwrap_or("0");
            let value = match parse_locale_number(amount_raw) {
                Some(value) => value,
                None => {
                    warn!(code, amount = amount_raw, "unparseable amount, degrading to zero");
                    losses.numeric_fallbacks += 1;
                    metrics::numeric_fallback();
                    0.0
                }
            };

            match code {
                CODE_ROOMS => record.rooms_sold = value as i64,
                CODE_ADULTS => record.adults = value as i64,
                CODE_TOTAL => record.total_amount = value,
                // Arbitrary revenue codes are only worth a column when they
                // actually billed something.
                _ if !code.is_empty() && value != 0.0 => {
                    record.revenue.insert(code.to_lowercase(), value);
                }
                _ => {}
            }
        }

        records.push(record);
    }

    debug!(count = records.len(), "extracted production records");
    records
}
