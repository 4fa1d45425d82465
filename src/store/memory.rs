use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::WalletResult;
use crate::ledger::models::{RecordKey, UserData};
use crate::store::{AnnotationStore, CompletedSwapStore};
use crate::swap::models::CompletedSwap;

/// In-memory swap store; the reference implementation used in tests and
/// single-process wallets.
#[derive(Default)]
pub struct MemorySwapStore {
    rows: RwLock<HashMap<String, CompletedSwap>>,
}

impl MemorySwapStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompletedSwapStore for MemorySwapStore {
    async fn swaps_by_status(&self, status: &str) -> WalletResult<Vec<CompletedSwap>> {
        let mut swaps: Vec<CompletedSwap> = self
            .rows
            .read()
            .values()
            .filter(|swap| swap.status == status)
            .cloned()
            .collect();
        // Stable output order regardless of map iteration.
        swaps.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(swaps)
    }

    async fn insert_swap(&self, swap: CompletedSwap) -> WalletResult<()> {
        self.rows.write().insert(swap.id.clone(), swap);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAnnotationStore {
    rows: RwLock<HashMap<RecordKey, UserData>>,
}

impl MemoryAnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnnotationStore for MemoryAnnotationStore {
    async fn annotation(&self, key: &RecordKey) -> WalletResult<Option<UserData>> {
        Ok(self.rows.read().get(key).cloned())
    }

    async fn put_annotation(&self, key: RecordKey, data: UserData) -> WalletResult<()> {
        self.rows.write().insert(key, data);
        Ok(())
    }
}
