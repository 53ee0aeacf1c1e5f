//! Trade executions and public tape prints.

use serde::{Deserialize, Serialize};

use super::money::{Amount, Price};
use super::types::Direction;

/// One execution or one public tape print. Immutable once constructed.
///
/// For tape prints `direction` is the taker side: if the resting order that
/// was hit was a sell (maker-sell), the observed direction is `Sell`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Venue-assigned trade ID.
    pub id: String,
    pub direction: Direction,
    pub price: Price,
    pub amount: Amount,
    /// Venue timestamp, milliseconds since epoch.
    pub timestamp: i64,
    /// Venue-native symbol.
    pub symbol: String,
}
