//! Core of a multi-asset personal wallet spanning Bitcoin on-chain,
//! Ethereum on-chain, and Lightning.
//!
//! Two subsystems sit at the center: the reconciliation engine, which
//! merges the three ledgers' independent histories into one deduplicated
//! feed while hiding the internal legs of completed atomic swaps, and the
//! swap order state machine, which coordinates a trustless cross-layer
//! exchange through an external signaling service. Chain adapters, key
//! management, persistence engines, and all rendering live outside this
//! crate, behind the traits in [`adapters`], [`store`], [`price`], and
//! [`swap::signaling`].

pub mod adapters;
pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
pub mod price;
pub mod reconcile;
pub mod store;
pub mod swap;

pub use config::Config;
pub use error::{SwapError, WalletError, WalletResult};
pub use events::{PendingEventQueue, WalletEvent};
pub use ledger::models::{
    Asset, Counterparties, RecordKey, RecordKind, RecordSource, SettlementLayer,
    UnifiedTransactionRecord, UserData,
};
pub use reconcile::{ReconcileEngine, SortDirection, SortField, TypeFilter};
pub use swap::{
    CompletedSwap, SwapLeg, SwapOrder, SwapProtocol, SwapSide, SwapState,
    DEFAULT_SWAP_TIMEOUT_TICKS,
};
