//! Open position snapshot.

use serde::{Deserialize, Serialize};

use super::money::{Amount, Price};
use super::types::Direction;

/// A position snapshot on a derivatives venue.
///
/// Spot backends have no position concept and return
/// [`Error::Unsupported`](crate::error::Error::Unsupported) from
/// position queries instead of fabricating empty snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Venue-native symbol.
    pub symbol: String,
    /// Long or short.
    pub direction: Direction,
    /// Position size (always positive; the sign lives in `direction`).
    pub amount: Amount,
    /// Average entry price.
    pub entry_price: Price,
}
