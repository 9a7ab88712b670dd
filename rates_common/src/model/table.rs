//! Rate-sheet tables found in the source document.
//!
//! Each table keeps its markup verbatim for downstream rendering, a
//! classification derived from keyword presence and the plain text of its
//! cells row by row.
use serde::{Deserialize, Serialize};

/// Closed set of table classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableClass {
    /// Wholesale (RTGS settlement) rates.
    Rtgs,
    /// Retail rates.
    Retail,
    /// No known keyword present.
    Unknown,
}

/// One table of the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Classification from keyword presence in the markup.
    pub classification: TableClass,
    /// Outer markup of the table, unmodified.
    #[serde(rename = "html")]
    pub raw_markup: String,
    /// Normalised cell text, one inner vector per row.
    pub rows: Vec<Vec<String>>,
}
