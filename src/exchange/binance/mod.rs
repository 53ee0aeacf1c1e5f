//! Binance spot backend.
//!
//! Normalizes the venue's REST and push vocabulary into the canonical
//! domain: [`convert`] owns the enumeration tables and derived numerics,
//! [`rest`] the signed HTTP seam, [`stream`] the trade-tape socket. The
//! adapter itself is wiring plus input validation.

pub mod convert;
pub mod dto;
mod rest;
mod stream;

pub use rest::{RestClient, SpotTransport};
pub use stream::{decode_trade_frame, TradeStream};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::config::Credentials;
use crate::domain::{
    Balance, Direction, KlinePeriod, Order, OrderBook, OrderType, PlaceOrderOptions, Position,
    PriceLevel, Record,
};
use crate::error::{Error, Result};
use crate::exchange::{
    BackoffConfig, Deadline, DepthTiers, EventBus, Exchange, OrderCallback, PositionCallback,
    SessionHandle, StreamEvent, StreamingSession, Topic, TradeCallback,
};

/// Depth sizes the venue serves.
const DEPTH_TIERS: &[u32] = &[5, 10, 20, 50, 100, 500, 1000];

/// Venue interval token for a canonical period.
///
/// The venue has no native weekly interval, so a one-week request goes out
/// as its `"7d"` token; everything else passes through unchanged.
#[must_use]
pub fn venue_period(period: KlinePeriod) -> &'static str {
    match period {
        KlinePeriod::Week1 => "7d",
        other => other.as_str(),
    }
}

/// Binance spot adapter.
///
/// Construction fixes the instance's credentials, network (testnet or
/// mainnet), and event bus; two instances pointed at different networks
/// coexist without shared state.
pub struct BinanceSpot {
    transport: Arc<dyn SpotTransport>,
    credentials: Credentials,
    bus: Arc<EventBus>,
    depth_tiers: DepthTiers,
    backoff: BackoffConfig,
}

impl BinanceSpot {
    /// Adapter over the production REST transport.
    #[allow(clippy::result_large_err)]
    pub fn new(credentials: Credentials) -> Result<Self> {
        let transport = Arc::new(RestClient::new(credentials.clone())?);
        Ok(Self::with_transport(transport, credentials))
    }

    /// Adapter over any transport; the seam tests inject mocks through.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn SpotTransport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            bus: Arc::new(EventBus::new()),
            depth_tiers: DepthTiers::new(DEPTH_TIERS).expect("static tier table is ascending"),
            backoff: BackoffConfig::default(),
        }
    }

    /// Override reconnection backoff (defaults are production-sane).
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// This instance's event bus.
    #[must_use]
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// The venue's depth tier table.
    #[must_use]
    pub fn depth_tiers(&self) -> &DepthTiers {
        &self.depth_tiers
    }

    #[allow(clippy::result_large_err)]
    fn validate_symbol(symbol: &str) -> Result<()> {
        if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
            return Err(Error::validation("symbol", format!("'{symbol}'")));
        }
        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn parse_order_id(id: &str) -> Result<i64> {
        id.parse::<i64>()
            .map_err(|_| Error::validation("order_id", format!("'{id}' is not numeric")))
    }
}

#[async_trait]
impl Exchange for BinanceSpot {
    fn name(&self) -> &'static str {
        "binance-spot"
    }

    async fn server_time(&self, deadline: Deadline) -> Result<i64> {
        self.transport.server_time(deadline).await
    }

    async fn balance(&self, currency: &str, deadline: Deadline) -> Result<Balance> {
        if currency.is_empty() {
            return Err(Error::validation("currency", "empty"));
        }
        self.credentials.validate_for_private_calls()?;

        let account = self.transport.account(deadline).await?;
        let mut balance = Balance::default();
        for asset in &account.balances {
            if asset.asset == currency {
                let free = convert::dec("free", &asset.free)?;
                let locked = convert::dec("locked", &asset.locked)?;
                balance.equity = free + locked;
                balance.available = free;
                break;
            }
        }
        Ok(balance)
    }

    async fn order_book(&self, symbol: &str, depth: u32, deadline: Deadline) -> Result<OrderBook> {
        Self::validate_symbol(symbol)?;
        if depth == 0 {
            return Err(Error::validation("depth", "must be at least 1"));
        }

        let tier = self.depth_tiers.resolve(depth);
        let response = self.transport.depth(symbol, tier, deadline).await?;

        let mut asks = Vec::with_capacity(response.asks.len());
        for (price, amount) in &response.asks {
            asks.push(PriceLevel::new(
                convert::dec("ask price", price)?,
                convert::dec("ask amount", amount)?,
            ));
        }
        let mut bids = Vec::with_capacity(response.bids.len());
        for (price, amount) in &response.bids {
            bids.push(PriceLevel::new(
                convert::dec("bid price", price)?,
                convert::dec("bid amount", amount)?,
            ));
        }

        Ok(OrderBook {
            asks,
            bids,
            time: Utc::now(),
        })
    }

    async fn records(
        &self,
        symbol: &str,
        period: KlinePeriod,
        from: i64,
        until: i64,
        limit: u32,
        deadline: Deadline,
    ) -> Result<Vec<Record>> {
        Self::validate_symbol(symbol)?;
        if limit == 0 {
            return Err(Error::validation("limit", "must be at least 1"));
        }

        let from_ms = (from > 0).then(|| from * 1000);
        let until_ms = (until > 0).then(|| until * 1000);
        let rows = self
            .transport
            .klines(symbol, venue_period(period), from_ms, until_ms, limit, deadline)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(Record {
                symbol: symbol.to_string(),
                timestamp: chrono::DateTime::<Utc>::from_timestamp_millis(row.0)
                    .unwrap_or_default(),
                open: convert::dec("open", &row.1)?,
                high: convert::dec("high", &row.2)?,
                low: convert::dec("low", &row.3)?,
                close: convert::dec("close", &row.4)?,
                volume: convert::dec("volume", &row.5)?,
            });
        }
        Ok(records)
    }

    async fn place_order(
        &self,
        symbol: &str,
        direction: Direction,
        order_type: OrderType,
        price: Decimal,
        size: Decimal,
        options: PlaceOrderOptions,
        deadline: Deadline,
    ) -> Result<Order> {
        Self::validate_symbol(symbol)?;
        if size <= Decimal::ZERO {
            return Err(Error::validation("size", "must be positive"));
        }
        let is_stop = matches!(order_type, OrderType::StopLimit | OrderType::StopMarket);
        if is_stop && options.stop_price.is_none() {
            return Err(Error::validation(
                "stop_price",
                "required for stop order types",
            ));
        }
        if matches!(order_type, OrderType::Limit | OrderType::StopLimit)
            && price <= Decimal::ZERO
        {
            return Err(Error::validation("price", "must be positive for limit types"));
        }
        self.credentials.validate_for_private_calls()?;

        let is_market = order_type == OrderType::Market;
        let request = dto::NewOrderRequest {
            symbol: symbol.to_string(),
            side: convert::direction_to_side(direction),
            order_type: convert::order_type_to_vendor(order_type),
            quantity: size,
            price: (!is_market && price > Decimal::ZERO).then_some(price),
            stop_price: options.stop_price.filter(|_| is_stop),
            time_in_force: (!is_market).then(|| {
                convert::time_in_force_to_vendor(options.time_in_force.unwrap_or_default())
            }),
            client_order_id: options.client_order_id_or_random(),
        };

        // One shot: an ambiguous failure here is surfaced, never retried.
        let ack = self.transport.create_order(&request, deadline).await?;
        convert::order_from_ack(&ack)
    }

    async fn open_orders(&self, symbol: &str, deadline: Deadline) -> Result<Vec<Order>> {
        Self::validate_symbol(symbol)?;
        self.credentials.validate_for_private_calls()?;

        let details = self.transport.open_orders(symbol, deadline).await?;
        details.iter().map(convert::order_from_detail).collect()
    }

    async fn order(&self, symbol: &str, id: &str, deadline: Deadline) -> Result<Order> {
        Self::validate_symbol(symbol)?;
        let order_id = Self::parse_order_id(id)?;
        self.credentials.validate_for_private_calls()?;

        let detail = self.transport.query_order(symbol, order_id, deadline).await?;
        convert::order_from_detail(&detail)
    }

    async fn cancel_order(&self, symbol: &str, id: &str, deadline: Deadline) -> Result<Order> {
        Self::validate_symbol(symbol)?;
        let order_id = Self::parse_order_id(id)?;
        self.credentials.validate_for_private_calls()?;

        let ack = self.transport.cancel_order(symbol, order_id, deadline).await?;
        convert::order_from_cancel(&ack)
    }

    async fn cancel_all_orders(&self, symbol: &str, deadline: Deadline) -> Result<()> {
        Self::validate_symbol(symbol)?;
        self.credentials.validate_for_private_calls()?;

        self.transport.cancel_open_orders(symbol, deadline).await
    }

    async fn positions(&self, _symbol: &str, _deadline: Deadline) -> Result<Vec<Position>> {
        // Spot accounts have balances, not positions.
        Err(Error::Unsupported("positions"))
    }

    async fn subscribe_trades(
        &self,
        market: &str,
        callback: TradeCallback,
    ) -> Result<SessionHandle> {
        Self::validate_symbol(market)?;

        self.bus.subscribe(Topic::Trades, move |event| {
            if let StreamEvent::Trades(trades) = event {
                callback(trades);
            }
        });

        let stream = TradeStream::new(self.credentials.testnet);
        Ok(StreamingSession::spawn(
            stream,
            market,
            Topic::Trades,
            Box::new(decode_trade_frame),
            Arc::clone(&self.bus),
            self.backoff.clone(),
        ))
    }

    async fn subscribe_orders(
        &self,
        _market: &str,
        _callback: OrderCallback,
    ) -> Result<SessionHandle> {
        Err(Error::Unsupported("order streaming"))
    }

    async fn subscribe_positions(
        &self,
        _market: &str,
        _callback: PositionCallback,
    ) -> Result<SessionHandle> {
        Err(Error::Unsupported("position streaming"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_period_translates_to_venue_token() {
        assert_eq!(venue_period(KlinePeriod::Week1), "7d");
        assert_eq!(venue_period(KlinePeriod::Min1), "1m");
        assert_eq!(venue_period(KlinePeriod::Month1), "1M");
    }

    #[test]
    fn symbol_validation_rejects_empty_and_whitespace() {
        assert!(BinanceSpot::validate_symbol("BTCUSDT").is_ok());
        assert!(BinanceSpot::validate_symbol("").is_err());
        assert!(BinanceSpot::validate_symbol("BTC USDT").is_err());
    }

    #[test]
    fn order_id_must_be_numeric() {
        assert_eq!(BinanceSpot::parse_order_id("42").unwrap(), 42);
        assert!(BinanceSpot::parse_order_id("abc").is_err());
    }
}
