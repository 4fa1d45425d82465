use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::WalletResult;
use crate::ledger::models::{Asset, RecordSource, UnifiedTransactionRecord};

/// One raw ledger entry as reported by a wallet adapter
///
/// `recipient` and `memo` exist only so reconciliation can recognize the
/// on-chain and off-chain legs of a completed swap; they carry the EVM
/// to-address and the Lightning memo respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub record: UnifiedTransactionRecord,
    pub recipient: Option<String>,
    pub memo: Option<String>,
}

impl RawRecord {
    pub fn new(record: UnifiedTransactionRecord) -> Self {
        Self {
            record,
            recipient: None,
            memo: None,
        }
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// One (coin, chain) wallet held by the user
///
/// Adapters own all chain-specific querying (UTXOs, RPC nodes, Lightning
/// channels); this core only reads their normalized record streams.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn asset(&self) -> Asset;

    fn source(&self) -> RecordSource;

    /// Full normalized transaction history for this wallet
    async fn raw_records(&self) -> WalletResult<Vec<RawRecord>>;

    async fn is_available(&self) -> WalletResult<bool> {
        Ok(true)
    }
}
