//! Account balance for a single currency.

use serde::{Deserialize, Serialize};

use super::money::Amount;

/// Balance of one currency on one venue.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Balance {
    /// Total equity: available plus locked in open orders.
    pub equity: Amount,
    /// Freely usable amount.
    pub available: Amount,
}

impl Balance {
    /// Amount locked in open orders.
    #[must_use]
    pub fn locked(&self) -> Amount {
        self.equity - self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn locked_is_equity_minus_available() {
        let balance = Balance {
            equity: dec!(100),
            available: dec!(70),
        };
        assert_eq!(balance.locked(), dec!(30));
    }
}
