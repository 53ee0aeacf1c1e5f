//! Shared enumerations for the canonical model.
//!
//! These are the fixed points every venue translator maps into and out of.
//! Adding a variant here means every adapter's mapping tables must be
//! revisited, so the sets are deliberately small.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Side of an order or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Buy / long side.
    Buy,
    /// Sell / short side.
    Sell,
}

impl Direction {
    /// The opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

/// Canonical order types.
///
/// Venue-only variants with no counterpart here (trailing stops, iceberg
/// orders, ...) are mapped by adapters to the nearest supported type; see the
/// per-venue translator for what gets collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Resting order at a limit price.
    Limit,
    /// Immediate execution at the best available price.
    Market,
    /// Limit order armed when the stop price trades.
    StopLimit,
    /// Market order armed when the stop price trades.
    StopMarket,
}

/// Canonical order lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Submitted but not yet acknowledged by the venue.
    ///
    /// Also the conservative fallback for vendor statuses with no canonical
    /// mapping: an unknown value is treated as "not yet confirmed" rather
    /// than failing the enclosing call.
    Created,
    /// Acknowledged and resting, nothing filled.
    New,
    /// Some quantity filled, remainder still working.
    PartiallyFilled,
    /// Fully filled.
    Filled,
    /// Cancelled by the caller or expired by the venue.
    Cancelled,
    /// Rejected by the venue.
    Rejected,
}

impl OrderStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Filled | Self::Cancelled | Self::Rejected)
    }
}

/// Time-in-force of a resting order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till cancelled (the default everywhere).
    #[default]
    GoodTillCancel,
    /// Fill completely or cancel.
    FillOrKill,
    /// Fill what is immediately available, cancel the rest.
    ImmediateOrCancel,
}

/// Canonical candle intervals.
///
/// Each adapter owns a lookup from these to its venue's interval tokens;
/// most venues accept the canonical token unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlinePeriod {
    Min1,
    Min3,
    Min5,
    Min15,
    Min30,
    Hour1,
    Hour2,
    Hour4,
    Hour6,
    Hour8,
    Hour12,
    Day1,
    Day3,
    Week1,
    Month1,
}

impl KlinePeriod {
    /// Canonical interval token (`"1m"`, `"1h"`, `"1w"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Min1 => "1m",
            Self::Min3 => "3m",
            Self::Min5 => "5m",
            Self::Min15 => "15m",
            Self::Min30 => "30m",
            Self::Hour1 => "1h",
            Self::Hour2 => "2h",
            Self::Hour4 => "4h",
            Self::Hour6 => "6h",
            Self::Hour8 => "8h",
            Self::Hour12 => "12h",
            Self::Day1 => "1d",
            Self::Day3 => "3d",
            Self::Week1 => "1w",
            Self::Month1 => "1M",
        }
    }
}

impl fmt::Display for KlinePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KlinePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Self::Min1),
            "3m" => Ok(Self::Min3),
            "5m" => Ok(Self::Min5),
            "15m" => Ok(Self::Min15),
            "30m" => Ok(Self::Min30),
            "1h" => Ok(Self::Hour1),
            "2h" => Ok(Self::Hour2),
            "4h" => Ok(Self::Hour4),
            "6h" => Ok(Self::Hour6),
            "8h" => Ok(Self::Hour8),
            "12h" => Ok(Self::Hour12),
            "1d" => Ok(Self::Day1),
            "3d" => Ok(Self::Day3),
            "1w" => Ok(Self::Week1),
            "1M" => Ok(Self::Month1),
            other => Err(format!("unknown kline period '{other}'")),
        }
    }
}
