/// Structural markers and attribute names used by the CondGes PMS exports,
/// plus the closed vocabularies for attribution and sub-classification.
/// These constants define the mapping between export structure and our records.

// Schema markers (matched case-insensitively on namespace-stripped local names)
pub const PRODUCTION_MARKER: &str = "matrix1_Data";
pub const BREAKDOWN_MARKER: &str = "table1_Group3";

// Production format elements/attributes
pub const CHARGE_ELEMENT: &str = "matrix1_Codiceaddebito";
pub const CELL_ELEMENT: &str = "Cell";
pub const DATE_ATTR: &str = "Data";
pub const CHARGE_CODE_ATTR: &str = "Codiceaddebito";
pub const AMOUNT_ATTR: &str = "Importo";

// Fixed charge codes routed to dedicated record fields; every other
// non-zero code lands in the dynamic revenue mapping.
pub const CODE_ROOMS: &str = "Camere";
pub const CODE_ADULTS: &str = "Adulti";
pub const CODE_TOTAL: &str = "Tot. Gen.";

// Market/segment format elements/attributes
pub const DETAIL_ELEMENT: &str = "Detail";
pub const DETAIL_CODE_ATTR: &str = "textbox36";
pub const DETAIL_ROOMS_ATTR: &str = "textbox37";
pub const DETAIL_NIGHTS_ATTR: &str = "textbox38";
pub const DETAIL_AMOUNT_ATTR: &str = "textbox39";
pub const DETAIL_RATE_ATTR: &str = "textbox40";

/// Sales-channel codes that identify a market (channel) breakdown.
/// Any other code in the first detail row means a customer-segment breakdown.
pub const MARKET_CHANNELS: [&str; 8] = [
    "OTA", "DIR", "GRM", "ADV", "TO", "SITOWEB", "WAIN", "TUIUK",
];

/// Hotels recognized by filename attribution, in match-priority order.
pub const HOTEL_NAMES: [&str; 3] = ["PANORAMA", "CVM", "ANGELINA"];

/// Fallback filename aliases, checked in this order after exact name matches.
pub const HOTEL_ALIASES: [(&str, &str); 5] = [
    ("HP", "PANORAMA"),
    ("PANORAMA", "PANORAMA"),
    ("HOTELP", "PANORAMA"),
    ("CVM", "CVM"),
    ("ANGELINA", "ANGELINA"),
];

/// Sentinel emitted when filename attribution fails.
pub const UNKNOWN_HOTEL: &str = "UNKNOWN";

/// Sentinel year/month/day for records whose period could not be resolved.
/// Kept as explicit zeros so every group-by over the dataset stays total.
pub const UNKNOWN_YEAR: i32 = 0;
pub const UNKNOWN_MONTH: u32 = 0;
pub const UNKNOWN_DAY: u32 = 0;

/// Two-digit period years are offsets from this base ("07-25" is July 2025).
pub const PERIOD_YEAR_BASE: i32 = 2000;
