//! Record shapes extracted from the PMS exports.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::constants::{UNKNOWN_DAY, UNKNOWN_MONTH, UNKNOWN_YEAR};

/// The hotels the filename attributor can resolve. `Unknown` is a real
/// value, not an absence: every dataset record carries a hotel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Hotel {
    Panorama,
    Cvm,
    Angelina,
    Unknown,
}

impl Hotel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hotel::Panorama => "PANORAMA",
            Hotel::Cvm => "CVM",
            Hotel::Angelina => "ANGELINA",
            Hotel::Unknown => crate::constants::UNKNOWN_HOTEL,
        }
    }

    /// Resolve an upper-cased hotel name to its enum value.
    pub fn from_name(name: &str) -> Option<Hotel> {
        match name {
            "PANORAMA" => Some(Hotel::Panorama),
            "CVM" => Some(Hotel::Cvm),
            "ANGELINA" => Some(Hotel::Angelina),
            _ => None,
        }
    }
}

impl std::fmt::Display for Hotel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of the production (occupancy/revenue) export.
///
/// The three fixed charge codes land in dedicated fields; every other
/// non-zero charge code goes into `revenue`, keyed by the lower-cased code.
/// Zero-valued dynamic codes are dropped so the sparse field set stays
/// bounded by what the documents actually bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionRecord {
    pub date: NaiveDate,
    pub rooms_sold: i64,
    pub adults: i64,
    pub total_amount: f64,
    pub revenue: BTreeMap<String, f64>,
}

/// One channel or segment row of the market/segment export.
///
/// `month`/`year` are filled when the `month-year` period string parsed;
/// otherwise attribution falls back to the unknown-period sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRecord {
    pub period: String,
    pub code: String,
    pub rooms: f64,
    pub amount: f64,
    pub nights: f64,
    pub average_rate: f64,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Tagged union over the extracted record shapes. One document yields
/// records of exactly one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Production(ProductionRecord),
    Market(BreakdownRecord),
    Segment(BreakdownRecord),
}

impl Record {
    /// The `tipo` label the downstream tabular consumers group on.
    pub fn type_label(&self) -> &'static str {
        match self {
            Record::Production(_) => "produzione",
            Record::Market(_) => "mercato",
            Record::Segment(_) => "segmento",
        }
    }
}

/// A fully attributed record as it sits in the merged dataset. Hotel, year
/// and month are always present, sentinel-valued when unresolvable, so
/// downstream group-bys never hit a missing key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRecord {
    pub hotel: Hotel,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(flatten)]
    pub record: Record,
}

impl DatasetRecord {
    /// Attach calendar attributes from whatever the extractor produced:
    /// production records carry a full date, breakdown records at best a
    /// parsed period, and anything else keeps the sentinels.
    pub fn new(hotel: Hotel, record: Record) -> Self {
        let (year, month, day) = match &record {
            Record::Production(p) => (p.date.year(), p.date.month(), p.date.day()),
            Record::Market(b) | Record::Segment(b) => (
                b.year.unwrap_or(UNKNOWN_YEAR),
                b.month.unwrap_or(UNKNOWN_MONTH),
                UNKNOWN_DAY,
            ),
        };
        Self {
            hotel,
            year,
            month,
            day,
            record,
        }
    }
}
