//! Extractor for the market (sales channel) and segment (customer segment)
//! breakdown exports. Both share one structure; only the meaning of the
//! detail code differs.

use tracing::{debug, warn};

use crate::config::IngestConfig;
use crate::constants::{
    BREAKDOWN_MARKER, DATE_ATTR, DETAIL_AMOUNT_ATTR, DETAIL_CODE_ATTR, DETAIL_ELEMENT,
    DETAIL_NIGHTS_ATTR, DETAIL_RATE_ATTR, DETAIL_ROOMS_ATTR, PERIOD_YEAR_BASE,
};
use crate::dataset::LossCounters;
use crate::metrics;
use crate::record::BreakdownRecord;
use crate::xml::XmlElement;

/// Numeric detail attributes are plain-format, unlike production amounts.
/// Missing or malformed values default to zero; only malformed ones count
/// as a fallback.
fn coerce_numeric(element: &XmlElement, attr: &str, losses: &mut LossCounters) -> f64 {
    match element.attr(attr) {
        None => 0.0,
        Some(raw) if raw.trim().is_empty() => 0.0,
        Some(raw) => raw.trim().parse::<f64>().unwrap_or_else(|_| {
            warn!(attr, value = raw, "unparseable detail value, degrading to zero");
            losses.numeric_fallbacks += 1;
            metrics::numeric_fallback();
            0.0
        }),
    }
}

/// `"7-25"` style month-year periods, two-digit year offset from 2000.
/// Anything else stays unparsed and falls back to sentinel attribution.
fn parse_period(period: &str) -> Option<(u32, i32)> {
    let (month_raw, year_raw) = period.split_once('-')?;
    let month: u32 = month_raw.trim().parse().ok()?;
    let year: i32 = year_raw.trim().parse().ok()?;
    Some((month, PERIOD_YEAR_BASE + year))
}

/// Pull one record per detail row, one group element per reporting period.
pub fn extract_breakdown(
    root: &XmlElement,
    config: &IngestConfig,
    losses: &mut LossCounters,
) -> Vec<BreakdownRecord> {
    let mut records = Vec::new();

    for group in root.descendants_named(BREAKDOWN_MARKER) {
        let period = group.attr(DATE_ATTR).unwrap_or("").to_string();
        let parsed_period = parse_period(&period);

        for detail in group.descendants_named(DETAIL_ELEMENT) {
            let code = detail.attr(DETAIL_CODE_ATTR).unwrap_or("").to_string();
            records.push(BreakdownRecord {
                rooms: coerce_numeric(detail, DETAIL_ROOMS_ATTR, losses),
                nights: coerce_numeric(detail, DETAIL_NIGHTS_ATTR, losses),
                amount: coerce_numeric(detail, DETAIL_AMOUNT_ATTR, losses),
                average_rate: coerce_numeric(detail, DETAIL_RATE_ATTR, losses),
                month: parsed_period.map(|(month, _)| month),
                year: parsed_period.map(|(_, year)| year),
                period: period.clone(),
                code,
            });
        }
    }

    // The Market/Segment split was decided from the first detail row only.
    // A document mixing channel and non-channel codes breaks that
    // assumption; flag it but keep the classification.
    let channels = config.market_channels();
    let channel_rows = records.iter().filter(|r| channels.contains(&r.code)).count();
    if channel_rows > 0 && channel_rows < records.len() {
        warn!(
            channel_rows,
            total_rows = records.len(),
            "breakdown document mixes channel and non-channel codes"
        );
        losses.mixed_code_documents += 1;
        metrics::mixed_code_document();
    }

    debug!(count = records.len(), "extracted breakdown records");
    records
}
