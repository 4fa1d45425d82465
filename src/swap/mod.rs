pub mod bridge;
pub mod models;
pub mod order;
pub mod signaling;
pub mod watchdog;

pub use models::{
    CompletedSwap, SwapLeg, SwapProtocol, SwapSide, SwapState, COMPLETED_STATUS,
};
pub use order::SwapOrder;
pub use signaling::{LimitOrderRequest, SignalingClient, SignalingEvent};
pub use watchdog::{Watchdog, DEFAULT_SWAP_TIMEOUT_TICKS};
