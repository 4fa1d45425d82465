pub mod queue;

use serde::{Deserialize, Serialize};

use crate::ledger::models::RecordSource;

pub use queue::EventQueue;

/// Notification pushed by background ledger watchers
///
/// The queue itself treats these as opaque; semantics belong to whoever
/// recomputes the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletEvent {
    PaymentReceived { source: RecordSource, id: String },
    PaymentConfirmed { source: RecordSource, id: String },
    BalanceChanged { source: RecordSource },
}

/// The queue wired between adapter watchers and the reconciliation layer
pub type PendingEventQueue = EventQueue<WalletEvent>;
