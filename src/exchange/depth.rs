//! Order-book depth tier resolution.
//!
//! Venues only serve a fixed menu of depth sizes. Callers ask for whatever
//! depth they want; the adapter resolves it to the smallest tier the venue
//! actually supports that covers the request.

use crate::error::{Error, Result};

/// The ascending set of depth sizes one venue natively supports.
#[derive(Debug, Clone)]
pub struct DepthTiers {
    tiers: Vec<u32>,
}

impl DepthTiers {
    /// Build a tier set. Fails unless `tiers` is non-empty and strictly
    /// ascending.
    #[allow(clippy::result_large_err)]
    pub fn new(tiers: &[u32]) -> Result<Self> {
        if tiers.is_empty() {
            return Err(Error::validation("depth_tiers", "empty tier set"));
        }
        if tiers.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::validation(
                "depth_tiers",
                "tier set must be strictly ascending",
            ));
        }
        Ok(Self {
            tiers: tiers.to_vec(),
        })
    }

    /// Smallest supported tier `>= requested`, clamped to the largest tier.
    #[must_use]
    pub fn resolve(&self, requested: u32) -> u32 {
        self.tiers
            .iter()
            .copied()
            .find(|&tier| tier >= requested)
            .unwrap_or_else(|| self.max())
    }

    /// The largest supported tier.
    #[must_use]
    pub fn max(&self) -> u32 {
        *self.tiers.last().expect("tier set is non-empty")
    }
}
