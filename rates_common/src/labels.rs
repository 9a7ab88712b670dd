//! Labels of the value blocks read from the source document.

use strum_macros::{Display, EnumIter, EnumString};

/// Case-sensitive label of a value block, as printed by the source.
///
/// The `Display` form is the exact substring searched for in the document.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Display, EnumString, EnumIter, Hash, Eq, PartialEq)]
pub enum BoxLabel {
    #[strum(serialize = "GOLD SPOT")]
    GoldSpot,
    #[strum(serialize = "SILVER SPOT")]
    SilverSpot,
    #[strum(serialize = "INR SPOT")]
    InrSpot,
    #[strum(serialize = "GOLD FUTURE")]
    GoldFuture,
    #[strum(serialize = "SILVER FUTURE")]
    SilverFuture,
    #[strum(serialize = "GOLD NEXT")]
    GoldNext,
    #[strum(serialize = "SILVER NEXT")]
    SilverNext,
}
