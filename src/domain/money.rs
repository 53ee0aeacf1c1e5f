//! Monetary types for price and quantity representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Quantity/volume represented as a Decimal for precision.
pub type Amount = Decimal;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_and_amount_are_decimal() {
        let price: Price = dec!(10000.50);
        let amount: Amount = dec!(0.01);

        assert_eq!(price * amount, dec!(100.0050));
    }
}
