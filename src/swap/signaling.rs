use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SwapError;
use crate::swap::models::{SwapProtocol, SwapSide};

/// Order submission payload, already reduced to smallest units
///
/// `request_id` is generated client-side so a submission can be correlated
/// with the service's response and retried idempotently by the transport;
/// the order id itself is assigned by the matching process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderRequest {
    pub request_id: Uuid,
    pub side: SwapSide,
    pub protocol: SwapProtocol,
    pub base_units: u64,
    pub quote_units: u64,
}

/// Events emitted by the swap-signaling service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalingEvent {
    Matched { order_id: String },
    Completed { order_id: String },
    Error { reason: String },
}

/// External pub/sub client coordinating a swap with the counterparty
///
/// Transport, retries, and the cryptographic escrow mechanics all live
/// behind this trait; the order state machine only sequences the calls.
#[async_trait]
pub trait SignalingClient: Send + Sync {
    async fn connect(&self) -> Result<(), SwapError>;

    fn is_connected(&self) -> bool;

    /// Publish an order; returns the id assigned by the matching process.
    async fn submit_limit_order(&self, request: LimitOrderRequest) -> Result<String, SwapError>;

    /// Release an unmatched order from the counterparty match pool.
    async fn cancel_limit_order(&self, order_id: &str) -> Result<(), SwapError>;

    /// Establish the escrow lock on both legs.
    async fn open(&self, order_id: &str) -> Result<(), SwapError>;

    /// Reveal/exchange the settlement secret and finalize both legs.
    async fn commit(&self, order_id: &str) -> Result<(), SwapError>;

    /// Next event from the service; `None` once the stream is closed.
    async fn next_event(&self) -> Option<SignalingEvent>;

    /// Idempotent; safe to call on an already-closed connection.
    async fn close(&self);
}
