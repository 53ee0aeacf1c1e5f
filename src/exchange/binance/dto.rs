//! Binance spot wire types.
//!
//! Numeric fields arrive as strings and stay strings here; parsing into
//! [`Decimal`](rust_decimal::Decimal) happens in [`convert`](super::convert)
//! so a bad field is a diagnosable parse error, not a silent zero.

use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// REST responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTimeResponse {
    pub server_time: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub balances: Vec<AssetBalance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

/// Depth snapshot; levels are `[price, quantity]` string pairs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthResponse {
    #[serde(default)]
    pub last_update_id: i64,
    pub bids: Vec<(String, String)>,
    pub asks: Vec<(String, String)>,
}

/// One kline as the venue serves it: a positional mixed-type array.
#[derive(Debug, Clone, Deserialize)]
pub struct KlineRow(
    /// Open time (ms).
    pub i64,
    /// Open.
    pub String,
    /// High.
    pub String,
    /// Low.
    pub String,
    /// Close.
    pub String,
    /// Volume.
    pub String,
    /// Close time (ms).
    pub i64,
    /// Quote asset volume.
    pub String,
    /// Trade count.
    pub i64,
    /// Taker buy base volume.
    pub String,
    /// Taker buy quote volume.
    pub String,
    /// Unused legacy field.
    pub String,
);

/// Acknowledgement of a newly placed order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub symbol: String,
    pub order_id: i64,
    pub client_order_id: String,
    pub transact_time: i64,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub orig_qty: String,
    #[serde(default)]
    pub executed_qty: String,
    #[serde(default)]
    pub cummulative_quote_qty: String,
    pub status: String,
    #[serde(default)]
    pub time_in_force: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: String,
}

/// An order as returned by query/open-orders endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub symbol: String,
    pub order_id: i64,
    pub client_order_id: String,
    pub price: String,
    pub orig_qty: String,
    pub executed_qty: String,
    pub cummulative_quote_qty: String,
    pub status: String,
    #[serde(default)]
    pub time_in_force: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: String,
    #[serde(default)]
    pub stop_price: String,
    pub time: i64,
    pub update_time: i64,
}

/// Acknowledgement of a cancel request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAck {
    pub symbol: String,
    pub order_id: i64,
    pub client_order_id: String,
    pub price: String,
    pub orig_qty: String,
    pub executed_qty: String,
    #[serde(default)]
    pub cummulative_quote_qty: String,
    pub status: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: String,
}

/// Venue-reported API error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub msg: String,
}

// ---------------------------------------------------------------------------
// REST request
// ---------------------------------------------------------------------------

/// Parameters for the create-order endpoint, already translated to vendor
/// vocabulary.
#[derive(Debug, Clone)]
pub struct NewOrderRequest {
    pub symbol: String,
    pub side: &'static str,
    pub order_type: &'static str,
    pub quantity: Decimal,
    /// Omitted for market orders.
    pub price: Option<Decimal>,
    /// Required by the venue for stop variants.
    pub stop_price: Option<Decimal>,
    /// Omitted for market orders.
    pub time_in_force: Option<&'static str>,
    pub client_order_id: String,
}

// ---------------------------------------------------------------------------
// Push frames
// ---------------------------------------------------------------------------

/// One `<symbol>@trade` event.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeFrame {
    #[serde(rename = "e")]
    pub event_type: String,
    #[serde(rename = "E")]
    pub event_time: i64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "t")]
    pub trade_id: i64,
    #[serde(rename = "p")]
    pub price: String,
    #[serde(rename = "q")]
    pub quantity: String,
    #[serde(rename = "T")]
    pub trade_time: i64,
    /// True when the resting (maker) order was the buyer.
    #[serde(rename = "m")]
    pub is_buyer_maker: bool,
}

/// Reply to a live SUBSCRIBE/UNSUBSCRIBE request.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeAck {
    pub result: Option<serde_json::Value>,
    pub id: i64,
}
