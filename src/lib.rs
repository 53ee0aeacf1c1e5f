//! Omnex: one canonical trading interface over incompatible exchange APIs.
//!
//! The hard part of talking to N venues is not the HTTP. It is that every
//! venue speaks its own dialect of order types, statuses, sides,
//! time-in-force values, depth tiers, and kline intervals. This crate pins
//! one canonical domain model and makes each venue backend translate into
//! and out of it, so strategy code never sees vendor vocabulary.
//!
//! # Modules
//!
//! - [`domain`] - Canonical types: orders, trades, books, balances, candles
//! - [`error`] - Error taxonomy (transport vs validation vs unsupported)
//! - [`exchange`] - The [`Exchange`](exchange::Exchange) trait, depth tiers,
//!   event bus, streaming sessions, and the Binance spot backend
//! - [`config`] - Settings file loading and per-adapter credentials
//!
//! # Example
//!
//! ```no_run
//! use omnex::config::Credentials;
//! use omnex::domain::{Direction, OrderType, PlaceOrderOptions};
//! use omnex::exchange::{binance::BinanceSpot, Exchange};
//! use rust_decimal_macros::dec;
//!
//! # async fn run() -> omnex::error::Result<()> {
//! let venue = BinanceSpot::new(Credentials {
//!     access_key: "...".into(),
//!     secret_key: "...".into(),
//!     testnet: true,
//!     proxy_url: None,
//! })?;
//!
//! let order = venue
//!     .place_order(
//!         "BTCUSDT",
//!         Direction::Buy,
//!         OrderType::Limit,
//!         dec!(10000),
//!         dec!(0.01),
//!         PlaceOrderOptions::new(),
//!         Some(std::time::Duration::from_secs(5)),
//!     )
//!     .await?;
//! println!("{} -> {:?}", order.id, order.status);
//! # Ok(())
//! # }
//! ```
//!
//! # Streaming
//!
//! Push streams deliver typed events through a per-adapter
//! [`EventBus`](exchange::EventBus): subscribing registers a callback and
//! spawns a [`StreamingSession`](exchange::StreamingSession) that decodes
//! raw frames, reconnects with backoff, and stops only when told to.

pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;

#[cfg(feature = "testkit")]
pub mod testkit;
