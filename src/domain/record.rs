//! Candle (kline) records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{Amount, Price};

/// One OHLCV candle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Venue-native symbol.
    pub symbol: String,
    /// Candle open time.
    pub timestamp: DateTime<Utc>,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Amount,
}
