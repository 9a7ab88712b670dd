//! Complete extraction result.
//!
//! A `Snapshot` is built once per successful extraction and never mutated
//! afterwards; the cache shares it behind an `Arc` and replaces it wholesale on
//! the next success.
use serde::{Deserialize, Serialize};

use crate::model::{MovementEntry, QuoteBox, TableEntry};

/// Spot quotes. A `None` box means its label was not found in the document.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotQuotes {
    pub gold: Option<QuoteBox>,
    pub silver: Option<QuoteBox>,
    pub inr: Option<QuoteBox>,
}

/// Current futures contract quotes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureQuotes {
    pub gold: Option<QuoteBox>,
    pub silver: Option<QuoteBox>,
}

/// Next-period contract quotes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextQuotes {
    pub gold: Option<QuoteBox>,
    pub silver: Option<QuoteBox>,
}

/// One immutable extraction result.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub spots: SpotQuotes,
    pub futures: FutureQuotes,
    pub next: NextQuotes,
    /// Tables in document order.
    pub tables: Vec<TableEntry>,
    /// Movement markers in document order.
    pub movement: Vec<MovementEntry>,
}

impl Snapshot {
    /// Number of labeled boxes that were found in the document.
    pub fn boxes_found(&self) -> usize {
        [
            &self.spots.gold,
            &self.spots.silver,
            &self.spots.inr,
            &self.futures.gold,
            &self.futures.silver,
            &self.next.gold,
            &self.next.silver,
        ]
        .iter()
        .filter(|quote| quote.is_some())
        .count()
    }
}
