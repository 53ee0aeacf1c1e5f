//! Canonical order representation and place-order options.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{Amount, Price};
use super::types::{Direction, OrderStatus, OrderType, TimeInForce};

/// A single order, normalized from whatever the venue returned.
///
/// Created by a place-order call or a refresh/query; mutated only by
/// subsequent queries or streamed order-update events via [`Order::absorb`].
/// `filled_amount` and `avg_price` are derived summaries of the order's
/// constituent fills; `avg_price` is `Decimal::ZERO` whenever nothing has
/// filled, never a division artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Venue-assigned order ID.
    pub id: String,
    /// Caller-supplied idempotency tag, if any.
    pub client_order_id: String,
    /// Venue-native symbol (e.g. `"BTCUSDT"`).
    pub symbol: String,
    /// Limit price (zero for market orders).
    pub price: Price,
    /// Trigger price for stop variants (zero otherwise).
    pub stop_price: Price,
    /// Original order quantity.
    pub amount: Amount,
    /// Cumulative filled quantity.
    pub filled_amount: Amount,
    /// Average fill price over all fills; zero when unfilled.
    pub avg_price: Price,
    pub direction: Direction,
    pub order_type: OrderType,
    pub status: OrderStatus,
    /// Venue creation time.
    pub create_time: DateTime<Utc>,
    /// Venue last-update time.
    pub update_time: DateTime<Utc>,
}

impl Order {
    /// Whether the order can still change (not in a terminal status).
    #[must_use]
    pub const fn is_working(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Merge a fresher snapshot of the same order into this one.
    ///
    /// Returns `false` and leaves `self` untouched if this order already
    /// reached a terminal status, or if the update is for a different order.
    pub fn absorb(&mut self, update: Order) -> bool {
        if self.status.is_terminal() || update.id != self.id {
            return false;
        }
        *self = update;
        true
    }
}

/// Optional parameters recognized by [`Exchange::place_order`].
///
/// [`Exchange::place_order`]: crate::exchange::Exchange::place_order
#[derive(Debug, Clone, Default)]
pub struct PlaceOrderOptions {
    /// Trigger price for stop order types.
    pub stop_price: Option<Price>,
    /// Overrides the venue default (GTC) when set.
    pub time_in_force: Option<TimeInForce>,
    /// Mark the order as closing-only.
    pub reduce_only: bool,
    /// Caller-supplied idempotency tag.
    pub client_order_id: Option<String>,
}

impl PlaceOrderOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stop_price(mut self, price: Price) -> Self {
        self.stop_price = Some(price);
        self
    }

    #[must_use]
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }

    #[must_use]
    pub fn with_reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = reduce_only;
        self
    }

    #[must_use]
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    /// Client order ID to send, generating a fresh tag when the caller did
    /// not supply one.
    #[must_use]
    pub fn client_order_id_or_random(&self) -> String {
        self.client_order_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string())
    }
}
