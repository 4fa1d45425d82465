use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{info, warn};

use crate::error::SwapError;
use crate::swap::models::{SwapLeg, SwapProtocol, SwapSide, SwapState};
use crate::swap::signaling::{LimitOrderRequest, SignalingClient, SignalingEvent};
use crate::swap::watchdog::{Watchdog, DEFAULT_SWAP_TIMEOUT_TICKS};

/// One swap order's lifecycle, from quote submission to settlement
///
/// `Start -> PublishOrder -> MatchingOrder -> OrderMatched -> Swapping ->
/// {SwapSucceeded | SwapError(reason)}`, with `Cancelled` reachable up to
/// `MatchingOrder`. The watchdog carries no timeout pressure while waiting
/// for a counterparty; it is armed the instant `Swapping` is entered.
pub struct SwapOrder {
    client: Arc<dyn SignalingClient>,
    protocol: SwapProtocol,
    side: SwapSide,
    base: SwapLeg,
    quote: SwapLeg,
    id: Option<String>,
    state: SwapState,
    watchdog: Watchdog,
    timeout_ticks: u32,
}

impl SwapOrder {
    /// Validate quantities, connect, and publish the order.
    ///
    /// Returns the order in `MatchingOrder` once the signaling service has
    /// accepted it and assigned an id. Malformed quantities are rejected
    /// before any network call. Must not be called again for the same
    /// logical order; a failed submission is restarted from scratch.
    pub async fn submit_limit_order(
        client: Arc<dyn SignalingClient>,
        protocol: SwapProtocol,
        side: SwapSide,
        base: SwapLeg,
        quote: SwapLeg,
    ) -> Result<Self, SwapError> {
        let base_units = base.smallest_units()?;
        let quote_units = quote.smallest_units()?;

        let mut order = Self {
            client,
            protocol,
            side,
            base,
            quote,
            id: None,
            state: SwapState::Start,
            watchdog: Watchdog::default(),
            timeout_ticks: DEFAULT_SWAP_TIMEOUT_TICKS,
        };

        order.state = SwapState::PublishOrder;
        if order.client.connect().await.is_err() {
            order.state = SwapState::SwapError(SwapError::ConnectionFailed.to_string());
            return Err(SwapError::ConnectionFailed);
        }

        let request = LimitOrderRequest {
            request_id: uuid::Uuid::new_v4(),
            side,
            protocol,
            base_units,
            quote_units,
        };
        match order.client.submit_limit_order(request).await {
            Ok(id) => {
                info!(order_id = %id, "limit order published, waiting for match");
                order.id = Some(id);
                order.state = SwapState::MatchingOrder;
                Ok(order)
            }
            Err(e) => {
                order.client.close().await;
                order.state = SwapState::SwapError(e.to_string());
                Err(e)
            }
        }
    }

    /// Override the settlement budget (ticks at 1 tick/second).
    pub fn with_timeout_ticks(mut self, ticks: u32) -> Self {
        self.timeout_ticks = ticks;
        self
    }

    pub fn state(&self) -> &SwapState {
        &self.state
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn side(&self) -> SwapSide {
        self.side
    }

    pub fn protocol(&self) -> SwapProtocol {
        self.protocol
    }

    pub fn base(&self) -> &SwapLeg {
        &self.base
    }

    pub fn quote(&self) -> &SwapLeg {
        &self.quote
    }

    pub fn watchdog_remaining(&self) -> Option<u32> {
        self.watchdog.remaining()
    }

    fn is_own_order(&self, order_id: &str) -> bool {
        self.id.as_deref() == Some(order_id)
    }

    /// Apply one event from the signaling service.
    pub async fn handle_event(&mut self, event: SignalingEvent) {
        match event {
            SignalingEvent::Matched { order_id } => {
                if self.state == SwapState::MatchingOrder && self.is_own_order(&order_id) {
                    info!(order_id = %order_id, "counterparty matched, settlement begins");
                    self.state = SwapState::OrderMatched;
                    // Settlement begins immediately once matched; the
                    // watchdog budget starts counting here, not before.
                    self.state = SwapState::Swapping;
                    self.watchdog.arm(self.timeout_ticks);
                }
            }
            SignalingEvent::Completed { order_id } => {
                if self.state == SwapState::Swapping && self.is_own_order(&order_id) {
                    info!(order_id = %order_id, "swap settled");
                    self.watchdog.stop();
                    self.client.close().await;
                    self.state = SwapState::SwapSucceeded;
                }
            }
            SignalingEvent::Error { reason } => {
                if !self.state.is_terminal() {
                    warn!(%reason, "signaling service reported swap failure");
                    self.watchdog.stop();
                    self.client.close().await;
                    self.state = SwapState::SwapError(reason);
                }
            }
        }
    }

    /// Advance the watchdog one tick; exhausting the budget while still in
    /// `Swapping` forces the timeout transition.
    pub async fn tick(&mut self) {
        if self.watchdog.tick() && self.state == SwapState::Swapping {
            warn!(order_id = ?self.id, "settlement watchdog expired");
            self.client.close().await;
            self.state = SwapState::SwapError(SwapError::Timeout.to_string());
        }
    }

    /// Establish the escrow lock on both legs.
    pub async fn open(&mut self) -> Result<(), SwapError> {
        if !matches!(self.state, SwapState::OrderMatched | SwapState::Swapping) {
            return Err(SwapError::InvalidState("open before order matched"));
        }
        let id = self
            .id
            .clone()
            .ok_or(SwapError::InvalidState("open without an order id"))?;
        if let Err(e) = self.client.open(&id).await {
            let failure = SwapError::EscrowOpen(e.to_string());
            self.fail(&failure).await;
            return Err(failure);
        }
        Ok(())
    }

    /// Reveal the settlement secret and finalize both legs.
    pub async fn commit(&mut self) -> Result<(), SwapError> {
        if self.state != SwapState::Swapping {
            return Err(SwapError::InvalidState("commit before settlement began"));
        }
        let id = self
            .id
            .clone()
            .ok_or(SwapError::InvalidState("commit without an order id"))?;
        if let Err(e) = self.client.commit(&id).await {
            let failure = SwapError::Commit(e.to_string());
            self.fail(&failure).await;
            return Err(failure);
        }
        Ok(())
    }

    /// Withdraw the order before settlement begins.
    ///
    /// Rejected once `Swapping` is entered, and rejected on an order that
    /// is already terminal.
    pub async fn cancel_order(&mut self) -> Result<(), SwapError> {
        match self.state {
            SwapState::Start | SwapState::PublishOrder | SwapState::MatchingOrder => {
                if let Some(id) = self.id.clone() {
                    if let Err(e) = self.client.cancel_limit_order(&id).await {
                        warn!(order_id = %id, error = %e, "cancel notification failed");
                    }
                }
                if self.client.is_connected() {
                    self.client.close().await;
                }
                self.watchdog.stop();
                self.state = SwapState::Cancelled;
                Ok(())
            }
            _ => Err(SwapError::InvalidState("cancel after settlement began")),
        }
    }

    async fn fail(&mut self, failure: &SwapError) {
        self.watchdog.stop();
        self.client.close().await;
        self.state = SwapState::SwapError(failure.to_string());
    }

    /// Pump signaling events and 1 s watchdog ticks until terminal.
    pub async fn drive(&mut self) -> SwapState {
        let mut ticker = interval(Duration::from_secs(1));
        while !self.state.is_terminal() {
            let client = self.client.clone();
            tokio::select! {
                event = client.next_event() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        let failure = SwapError::Signaling("event stream closed".to_string());
                        self.fail(&failure).await;
                    }
                },
                _ = ticker.tick() => self.tick().await,
            }
        }
        self.state.clone()
    }
}
