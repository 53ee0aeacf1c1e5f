//! Binance spot ↔ canonical translation.
//!
//! Every status, type, side, and time-in-force value the venue can emit maps
//! to a canonical value here. Vendor values with no canonical counterpart
//! fall back conservatively (`Created` for statuses, `Limit` for order
//! types, GTC for time-in-force), and each fallback logs a warning so an
//! integration gap shows up in the logs instead of silently passing as a
//! wrong-but-plausible value.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;

use super::dto::{CancelAck, OrderAck, OrderDetail, TradeFrame};
use crate::domain::{Direction, Order, OrderStatus, OrderType, TimeInForce, Trade};
use crate::error::{Error, Result};

/// Parse a vendor decimal string field.
#[allow(clippy::result_large_err)]
pub(crate) fn dec(field: &'static str, raw: &str) -> Result<Decimal> {
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(raw).map_err(|_| Error::Parse(format!("{field}: bad decimal '{raw}'")))
}

fn millis(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Enumeration mappings
// ---------------------------------------------------------------------------

/// Map a vendor order status. Total: unknown values (including
/// `PENDING_CANCEL`, which the canonical model has no state for) fall back
/// to `Created`.
#[must_use]
pub fn status_from_vendor(status: &str) -> OrderStatus {
    match status {
        "NEW" => OrderStatus::New,
        "PARTIALLY_FILLED" => OrderStatus::PartiallyFilled,
        "FILLED" => OrderStatus::Filled,
        "CANCELED" => OrderStatus::Cancelled,
        "REJECTED" => OrderStatus::Rejected,
        "EXPIRED" | "EXPIRED_IN_MATCH" => OrderStatus::Cancelled,
        other => {
            warn!(vendor_status = %other, "unmapped order status, treating as Created");
            OrderStatus::Created
        }
    }
}

/// Map a vendor order type.
///
/// Capability limitation: vendor-only types (`LIMIT_MAKER`, `TAKE_PROFIT`,
/// `TAKE_PROFIT_LIMIT`, ...) have no canonical counterpart and collapse to
/// `Limit`, the nearest supported type, not an equivalent one.
#[must_use]
pub fn order_type_from_vendor(order_type: &str) -> OrderType {
    match order_type {
        "LIMIT" => OrderType::Limit,
        "MARKET" => OrderType::Market,
        "STOP_LOSS_LIMIT" => OrderType::StopLimit,
        "STOP_LOSS" => OrderType::StopMarket,
        other => {
            warn!(vendor_type = %other, "unmapped order type, treating as Limit");
            OrderType::Limit
        }
    }
}

/// Vendor token for a canonical order type. Inverse of
/// [`order_type_from_vendor`] for every type this venue natively supports.
#[must_use]
pub const fn order_type_to_vendor(order_type: OrderType) -> &'static str {
    match order_type {
        OrderType::Limit => "LIMIT",
        OrderType::Market => "MARKET",
        OrderType::StopLimit => "STOP_LOSS_LIMIT",
        OrderType::StopMarket => "STOP_LOSS",
    }
}

#[must_use]
pub fn direction_from_side(side: &str) -> Direction {
    match side {
        "BUY" => Direction::Buy,
        "SELL" => Direction::Sell,
        other => {
            warn!(vendor_side = %other, "unmapped side, treating as Buy");
            Direction::Buy
        }
    }
}

#[must_use]
pub const fn direction_to_side(direction: Direction) -> &'static str {
    match direction {
        Direction::Buy => "BUY",
        Direction::Sell => "SELL",
    }
}

/// Taker direction of a tape print from the maker flag.
///
/// When the resting order that was hit was the buyer (`is_buyer_maker`),
/// the aggressor sold: the observed trade direction is `Sell`.
#[must_use]
pub const fn direction_from_maker(is_buyer_maker: bool) -> Direction {
    if is_buyer_maker {
        Direction::Sell
    } else {
        Direction::Buy
    }
}

/// Recognized values map exactly; anything else silently defaults to GTC.
/// The default is documented venue behavior, not an error.
#[must_use]
pub fn time_in_force_from_vendor(tif: &str) -> TimeInForce {
    match tif {
        "GTC" => TimeInForce::GoodTillCancel,
        "FOK" => TimeInForce::FillOrKill,
        "IOC" => TimeInForce::ImmediateOrCancel,
        _ => TimeInForce::GoodTillCancel,
    }
}

#[must_use]
pub const fn time_in_force_to_vendor(tif: TimeInForce) -> &'static str {
    match tif {
        TimeInForce::GoodTillCancel => "GTC",
        TimeInForce::FillOrKill => "FOK",
        TimeInForce::ImmediateOrCancel => "IOC",
    }
}

// ---------------------------------------------------------------------------
// Derived numerics
// ---------------------------------------------------------------------------

/// Average fill price from cumulative quote turnover and executed quantity.
///
/// Zero executed quantity yields the defined no-fill value `0`, never a
/// division fault.
#[must_use]
pub fn average_fill_price(cumulative_quote: Decimal, executed: Decimal) -> Decimal {
    if executed.is_zero() {
        Decimal::ZERO
    } else {
        cumulative_quote / executed
    }
}

/// Filled fraction of an order; zero total amount yields `0`.
#[must_use]
pub fn fill_ratio(filled: Decimal, amount: Decimal) -> Decimal {
    if amount.is_zero() {
        Decimal::ZERO
    } else {
        filled / amount
    }
}

// ---------------------------------------------------------------------------
// Order assembly
// ---------------------------------------------------------------------------

/// Canonical order from a place-order acknowledgement.
#[allow(clippy::result_large_err)]
pub fn order_from_ack(ack: &OrderAck) -> Result<Order> {
    let executed = dec("executedQty", &ack.executed_qty)?;
    let cumulative_quote = dec("cummulativeQuoteQty", &ack.cummulative_quote_qty)?;
    let transact_time = millis(ack.transact_time);

    Ok(Order {
        id: ack.order_id.to_string(),
        client_order_id: ack.client_order_id.clone(),
        symbol: ack.symbol.clone(),
        price: dec("price", &ack.price)?,
        stop_price: Decimal::ZERO,
        amount: dec("origQty", &ack.orig_qty)?,
        filled_amount: executed,
        avg_price: average_fill_price(cumulative_quote, executed),
        direction: direction_from_side(&ack.side),
        order_type: order_type_from_vendor(&ack.order_type),
        status: status_from_vendor(&ack.status),
        create_time: transact_time,
        update_time: transact_time,
    })
}

/// Canonical order from a query/open-orders row.
#[allow(clippy::result_large_err)]
pub fn order_from_detail(detail: &OrderDetail) -> Result<Order> {
    let executed = dec("executedQty", &detail.executed_qty)?;
    let cumulative_quote = dec("cummulativeQuoteQty", &detail.cummulative_quote_qty)?;

    Ok(Order {
        id: detail.order_id.to_string(),
        client_order_id: detail.client_order_id.clone(),
        symbol: detail.symbol.clone(),
        price: dec("price", &detail.price)?,
        stop_price: dec("stopPrice", &detail.stop_price)?,
        amount: dec("origQty", &detail.orig_qty)?,
        filled_amount: executed,
        avg_price: average_fill_price(cumulative_quote, executed),
        direction: direction_from_side(&detail.side),
        order_type: order_type_from_vendor(&detail.order_type),
        status: status_from_vendor(&detail.status),
        create_time: millis(detail.time),
        update_time: millis(detail.update_time),
    })
}

/// Canonical order from a cancel acknowledgement.
///
/// The venue omits timestamps here; both times are left at the epoch
/// default and the next query refreshes them.
#[allow(clippy::result_large_err)]
pub fn order_from_cancel(ack: &CancelAck) -> Result<Order> {
    let executed = dec("executedQty", &ack.executed_qty)?;
    let cumulative_quote = dec("cummulativeQuoteQty", &ack.cummulative_quote_qty)?;

    Ok(Order {
        id: ack.order_id.to_string(),
        client_order_id: ack.client_order_id.clone(),
        symbol: ack.symbol.clone(),
        price: dec("price", &ack.price)?,
        stop_price: Decimal::ZERO,
        amount: dec("origQty", &ack.orig_qty)?,
        filled_amount: executed,
        avg_price: average_fill_price(cumulative_quote, executed),
        direction: direction_from_side(&ack.side),
        order_type: order_type_from_vendor(&ack.order_type),
        status: status_from_vendor(&ack.status),
        create_time: DateTime::<Utc>::default(),
        update_time: DateTime::<Utc>::default(),
    })
}

/// Canonical trade from one `@trade` push frame.
#[allow(clippy::result_large_err)]
pub fn trade_from_frame(frame: &TradeFrame) -> Result<Trade> {
    Ok(Trade {
        id: frame.trade_id.to_string(),
        direction: direction_from_maker(frame.is_buyer_maker),
        price: dec("p", &frame.price)?,
        amount: dec("q", &frame.quantity)?,
        timestamp: frame.trade_time,
        symbol: frame.symbol.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec as d;

    #[test]
    fn every_documented_vendor_status_maps() {
        let cases = [
            ("NEW", OrderStatus::New),
            ("PARTIALLY_FILLED", OrderStatus::PartiallyFilled),
            ("FILLED", OrderStatus::Filled),
            ("CANCELED", OrderStatus::Cancelled),
            ("REJECTED", OrderStatus::Rejected),
            ("EXPIRED", OrderStatus::Cancelled),
            ("EXPIRED_IN_MATCH", OrderStatus::Cancelled),
        ];
        for (vendor, canonical) in cases {
            assert_eq!(status_from_vendor(vendor), canonical, "{vendor}");
        }
    }

    #[test]
    fn unknown_status_falls_back_to_created() {
        assert_eq!(status_from_vendor("PENDING_CANCEL"), OrderStatus::Created);
        assert_eq!(status_from_vendor(""), OrderStatus::Created);
        assert_eq!(status_from_vendor("SOMETHING_NEW"), OrderStatus::Created);
    }

    #[test]
    fn order_type_round_trips_for_supported_types() {
        for order_type in [
            OrderType::Limit,
            OrderType::Market,
            OrderType::StopLimit,
            OrderType::StopMarket,
        ] {
            assert_eq!(
                order_type_from_vendor(order_type_to_vendor(order_type)),
                order_type
            );
        }
    }

    #[test]
    fn vendor_only_types_collapse_to_limit() {
        assert_eq!(order_type_from_vendor("LIMIT_MAKER"), OrderType::Limit);
        assert_eq!(order_type_from_vendor("TAKE_PROFIT"), OrderType::Limit);
        assert_eq!(
            order_type_from_vendor("TRAILING_STOP_MARKET"),
            OrderType::Limit
        );
    }

    #[test]
    fn maker_sell_convention() {
        // Resting buyer hit => aggressor sold.
        assert_eq!(direction_from_maker(true), Direction::Sell);
        assert_eq!(direction_from_maker(false), Direction::Buy);
    }

    #[test]
    fn time_in_force_defaults_to_gtc_for_unrecognized_input() {
        assert_eq!(time_in_force_from_vendor("GTC"), TimeInForce::GoodTillCancel);
        assert_eq!(time_in_force_from_vendor("FOK"), TimeInForce::FillOrKill);
        assert_eq!(
            time_in_force_from_vendor("IOC"),
            TimeInForce::ImmediateOrCancel
        );
        assert_eq!(
            time_in_force_from_vendor("POST_ONLY"),
            TimeInForce::GoodTillCancel
        );
        assert_eq!(time_in_force_from_vendor(""), TimeInForce::GoodTillCancel);
    }

    #[test]
    fn average_fill_price_guards_zero_executed() {
        assert_eq!(average_fill_price(d!(0), d!(0)), d!(0));
        assert_eq!(average_fill_price(d!(100.50), d!(0)), d!(0));
        assert_eq!(average_fill_price(d!(201), d!(2)), d!(100.5));
    }

    #[test]
    fn fill_ratio_guards_zero_amount() {
        assert_eq!(fill_ratio(d!(0), d!(0)), d!(0));
        assert_eq!(fill_ratio(d!(1), d!(4)), d!(0.25));
    }

    #[test]
    fn ack_with_no_fills_has_zero_avg_price() {
        let ack = OrderAck {
            symbol: "BTCUSDT".into(),
            order_id: 42,
            client_order_id: "tag".into(),
            transact_time: 1_700_000_000_000,
            price: "10000".into(),
            orig_qty: "0.01".into(),
            executed_qty: "0".into(),
            cummulative_quote_qty: "0".into(),
            status: "NEW".into(),
            time_in_force: "GTC".into(),
            order_type: "LIMIT".into(),
            side: "BUY".into(),
        };

        let order = order_from_ack(&ack).unwrap();
        assert_eq!(order.id, "42");
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.filled_amount, d!(0));
        assert_eq!(order.avg_price, d!(0));
        assert_eq!(order.direction, Direction::Buy);
    }

    #[test]
    fn detail_computes_avg_price_from_quote_turnover() {
        let detail = OrderDetail {
            symbol: "BTCUSDT".into(),
            order_id: 7,
            client_order_id: String::new(),
            price: "10000".into(),
            orig_qty: "0.02".into(),
            executed_qty: "0.01".into(),
            cummulative_quote_qty: "100.5".into(),
            status: "PARTIALLY_FILLED".into(),
            time_in_force: "GTC".into(),
            order_type: "LIMIT".into(),
            side: "SELL".into(),
            stop_price: "0".into(),
            time: 1_700_000_000_000,
            update_time: 1_700_000_060_000,
        };

        let order = order_from_detail(&detail).unwrap();
        assert_eq!(order.avg_price, d!(10050));
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        assert_eq!(order.direction, Direction::Sell);
        assert!(order.update_time > order.create_time);
    }

    #[test]
    fn trade_frame_decodes_with_maker_sell_sign() {
        let frame = TradeFrame {
            event_type: "trade".into(),
            event_time: 1,
            symbol: "BTCUSDT".into(),
            trade_id: 9,
            price: "100.5".into(),
            quantity: "2".into(),
            trade_time: 1_700_000_000_000,
            is_buyer_maker: true,
        };

        let trade = trade_from_frame(&frame).unwrap();
        assert_eq!(trade.direction, Direction::Sell);
        assert_eq!(trade.price, d!(100.5));
        assert_eq!(trade.amount, d!(2));
    }

    #[test]
    fn bad_decimal_is_a_parse_error_not_a_zero() {
        let err = dec("price", "not-a-number").unwrap_err();
        assert!(matches!(err, crate::error::Error::Parse(_)));
        // Empty strings are the venue's way of omitting a field.
        assert_eq!(dec("price", "").unwrap(), d!(0));
    }
}
