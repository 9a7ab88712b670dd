//! Data model produced by one extraction.
//!
//! - `quote` — `QuoteBox`, the four positional values of a labeled block.
//! - `table` — classified rate-sheet tables (`TableEntry`, `TableClass`).
//! - `movement` — price movement markers (`MovementEntry`, `Direction`).
//! - `snapshot` — the immutable `Snapshot` grouping all of the above.

pub mod movement;
pub mod quote;
pub mod snapshot;
pub mod table;

pub use movement::{Direction, MovementEntry};
pub use quote::QuoteBox;
pub use snapshot::{FutureQuotes, NextQuotes, Snapshot, SpotQuotes};
pub use table::{TableClass, TableEntry};
