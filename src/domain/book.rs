//! Order book snapshot types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{Amount, Price};

/// A single price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    pub amount: Amount,
}

impl PriceLevel {
    #[must_use]
    pub const fn new(price: Price, amount: Amount) -> Self {
        Self { price, amount }
    }
}

/// A full depth snapshot for one symbol.
///
/// Asks are ascending by price, bids descending. Snapshots are replaced
/// wholesale on each fetch; this crate never patches a book incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
    pub time: DateTime<Utc>,
}

impl OrderBook {
    /// Best ask (lowest sell price).
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Best bid (highest buy price).
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn best_levels_are_the_first_entries() {
        let book = OrderBook {
            asks: vec![
                PriceLevel::new(dec!(100.1), dec!(1)),
                PriceLevel::new(dec!(100.2), dec!(2)),
            ],
            bids: vec![
                PriceLevel::new(dec!(100.0), dec!(3)),
                PriceLevel::new(dec!(99.9), dec!(4)),
            ],
            time: Utc::now(),
        };

        assert_eq!(book.best_ask().unwrap().price, dec!(100.1));
        assert_eq!(book.best_bid().unwrap().price, dec!(100.0));
    }

    #[test]
    fn empty_book_has_no_best_levels() {
        let book = OrderBook {
            asks: Vec::new(),
            bids: Vec::new(),
            time: Utc::now(),
        };

        assert!(book.best_ask().is_none());
        assert!(book.best_bid().is_none());
    }
}
