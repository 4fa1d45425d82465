use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SwapError;
use crate::ledger::models::Asset;

/// Row status under which settled swaps are persisted
pub const COMPLETED_STATUS: &str = "completed";

/// Which party reveals the settlement secret first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapSide {
    /// Secret holder
    Ask,
    /// Secret seeker
    Bid,
}

/// The two symmetric protocol variants share one state shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapProtocol {
    Atomic,
    Submarine,
}

/// One leg of a swap: an asset and the quantity given up or received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapLeg {
    pub asset: Asset,
    pub quantity: Decimal,
}

impl SwapLeg {
    pub fn new(asset: Asset, quantity: Decimal) -> Self {
        Self { asset, quantity }
    }

    /// Convert to the asset's smallest unit (sats, wei, ...)
    ///
    /// Rejects anything that is not a non-negative integral smallest-unit
    /// value; this runs before any network call.
    pub fn smallest_units(&self) -> Result<u64, SwapError> {
        to_smallest_units(self.quantity, self.asset.decimals).ok_or_else(|| {
            SwapError::InvalidQuantity {
                symbol: self.asset.symbol.clone(),
                quantity: self.quantity,
            }
        })
    }
}

pub(crate) fn to_smallest_units(quantity: Decimal, decimals: u8) -> Option<u64> {
    if quantity.is_sign_negative() {
        return None;
    }
    let factor = Decimal::from(10i64.checked_pow(u32::from(decimals))?);
    let shifted = quantity.checked_mul(factor)?;
    if !shifted.fract().is_zero() {
        return None;
    }
    shifted.to_u64()
}

/// Lifecycle of one swap order
///
/// Terminal: `SwapSucceeded`, `SwapError`, `Cancelled`. A failed or
/// cancelled order is discarded; a fresh one starts over from `Start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapState {
    Start,
    PublishOrder,
    MatchingOrder,
    OrderMatched,
    Swapping,
    SwapSucceeded,
    SwapError(String),
    Cancelled,
}

impl SwapState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SwapState::SwapSucceeded | SwapState::SwapError(_) | SwapState::Cancelled
        )
    }
}

/// The durable artifact of a settled swap
///
/// The `SwapOrder` itself is discarded on completion; this row is what the
/// reconciliation engine reads to build the synthetic feed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSwap {
    pub id: String,
    pub status: String,
    pub base_asset: Asset,
    pub base_quantity: Decimal,
    pub quote_asset: Asset,
    pub quote_quantity: Decimal,
    pub completed_at: DateTime<Utc>,
}

impl CompletedSwap {
    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED_STATUS
    }
}
