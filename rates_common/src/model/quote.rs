//! Labeled value block.
//!
//! A `QuoteBox` holds up to four numeric strings taken in source order from the
//! region of the document around a label such as `GOLD SPOT`. Values stay as the
//! strings the source printed (`"1,234.50"` is not reformatted); a missing value
//! is `None`, never zero.
//!
//! Binding is purely positional. When the source omits a leading value the
//! remaining ones shift left (an absent bid makes the ask land in `bid`). This is
//! a known limitation of the source layout and is not corrected here.
use serde::{Deserialize, Serialize};

/// Bid/ask/high/low quote of one labeled block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteBox {
    /// First value token of the block.
    pub bid: Option<String>,
    /// Second value token of the block.
    pub ask: Option<String>,
    /// Third value token of the block.
    pub high: Option<String>,
    /// Fourth value token of the block.
    pub low: Option<String>,
}

impl QuoteBox {
    /// Bind the first four tokens to bid/ask/high/low; missing trailing tokens stay `None`.
    /// Tokens past the fourth are ignored.
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut tokens = tokens.into_iter();
        QuoteBox {
            bid: tokens.next(),
            ask: tokens.next(),
            high: tokens.next(),
            low: tokens.next(),
        }
    }

    /// `true` when the block was found but held no value at all.
    pub fn is_empty(&self) -> bool {
        self.bid.is_none() && self.ask.is_none() && self.high.is_none() && self.low.is_none()
    }
}
