//! Exchange abstraction layer.
//!
//! ## Adding a New Venue
//!
//! 1. Create a module under `exchange/<name>/`
//! 2. Write the vendor wire DTOs and a translator from them into the
//!    canonical [`domain`](crate::domain) types; every status/type/side the
//!    venue can emit must map somewhere, with a logged fallback for the rest
//! 3. Declare the venue's [`DepthTiers`] and kline-period lookup
//! 4. Implement [`Exchange`], returning [`Error::Unsupported`] for
//!    capabilities the venue lacks instead of faking empty results
//!
//! REST calls are one synchronous round trip each. Read-only calls are
//! idempotent and safe to issue concurrently; `place_order`/`cancel_order`
//! are not idempotent and are never retried by this crate: on an ambiguous
//! failure (timeout with unknown outcome) the error surfaces to the caller,
//! who owns the reconciliation.
//!
//! [`Error::Unsupported`]: crate::error::Error::Unsupported

pub mod binance;
mod depth;
mod events;
mod session;

pub use depth::DepthTiers;
pub use events::{EventBus, EventCallback, StreamEvent, Topic};
pub use session::{BackoffConfig, FrameDecoder, FrameStream, SessionHandle, StreamFrame, StreamingSession};

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{
    Balance, Direction, KlinePeriod, Order, OrderBook, OrderType, PlaceOrderOptions, Position,
    Record, Trade,
};
use crate::error::Result;

/// Caller-supplied deadline for one REST round trip, propagated to the
/// transport layer. `None` means the core enforces no timeout.
pub type Deadline = Option<Duration>;

/// Callback receiving batches of public trades.
pub type TradeCallback = Box<dyn Fn(&[Trade]) + Send + Sync>;
/// Callback receiving batches of private order updates.
pub type OrderCallback = Box<dyn Fn(&[Order]) + Send + Sync>;
/// Callback receiving batches of position updates.
pub type PositionCallback = Box<dyn Fn(&[Position]) + Send + Sync>;

/// The aggregate contract a venue backend implements.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Venue identifier for logging.
    fn name(&self) -> &'static str;

    /// Venue server time, milliseconds since epoch.
    async fn server_time(&self, deadline: Deadline) -> Result<i64>;

    /// Balance of one currency.
    async fn balance(&self, currency: &str, deadline: Deadline) -> Result<Balance>;

    /// Depth snapshot; `depth` is resolved to the venue's nearest supported
    /// tier before the call goes out.
    async fn order_book(&self, symbol: &str, depth: u32, deadline: Deadline) -> Result<OrderBook>;

    /// Candles in `[from, until]` (seconds since epoch; zero means open
    /// ended), newest capped at `limit`.
    async fn records(
        &self,
        symbol: &str,
        period: KlinePeriod,
        from: i64,
        until: i64,
        limit: u32,
        deadline: Deadline,
    ) -> Result<Vec<Record>>;

    /// Place an order. At-most-once: never retried internally.
    #[allow(clippy::too_many_arguments)]
    async fn place_order(
        &self,
        symbol: &str,
        direction: Direction,
        order_type: OrderType,
        price: Decimal,
        size: Decimal,
        options: PlaceOrderOptions,
        deadline: Deadline,
    ) -> Result<Order>;

    /// All open orders for a symbol.
    async fn open_orders(&self, symbol: &str, deadline: Deadline) -> Result<Vec<Order>>;

    /// One order by venue-assigned ID.
    async fn order(&self, symbol: &str, id: &str, deadline: Deadline) -> Result<Order>;

    /// Cancel one order. At-most-once: never retried internally.
    async fn cancel_order(&self, symbol: &str, id: &str, deadline: Deadline) -> Result<Order>;

    /// Cancel every open order for a symbol.
    async fn cancel_all_orders(&self, symbol: &str, deadline: Deadline) -> Result<()>;

    /// Open positions (derivatives venues only).
    async fn positions(&self, symbol: &str, deadline: Deadline) -> Result<Vec<Position>>;

    /// Stream the public trade tape for `market` into `callback`.
    ///
    /// Each call creates a fresh [`StreamingSession`]; stop it through the
    /// returned handle.
    async fn subscribe_trades(&self, market: &str, callback: TradeCallback)
        -> Result<SessionHandle>;

    /// Stream private order updates for `market` into `callback`.
    async fn subscribe_orders(&self, market: &str, callback: OrderCallback)
        -> Result<SessionHandle>;

    /// Stream position updates for `market` into `callback`.
    async fn subscribe_positions(
        &self,
        market: &str,
        callback: PositionCallback,
    ) -> Result<SessionHandle>;
}
