pub mod memory;

use async_trait::async_trait;

use crate::error::WalletResult;
use crate::ledger::models::{RecordKey, UserData};
use crate::swap::models::CompletedSwap;

pub use memory::{MemoryAnnotationStore, MemorySwapStore};

/// Keyed read of persisted swap rows by status
///
/// The persistence engine behind this is external; implementations here
/// only define the contract the reconciliation engine depends on.
#[async_trait]
pub trait CompletedSwapStore: Send + Sync {
    async fn swaps_by_status(&self, status: &str) -> WalletResult<Vec<CompletedSwap>>;

    async fn insert_swap(&self, swap: CompletedSwap) -> WalletResult<()>;
}

/// Per-record annotation store, keyed by `(source, id)`
///
/// Writes are scoped to one key at a time; no cross-key transactions.
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    async fn annotation(&self, key: &RecordKey) -> WalletResult<Option<UserData>>;

    async fn put_annotation(&self, key: RecordKey, data: UserData) -> WalletResult<()>;
}
