use crate::ledger::models::{
    Counterparties, RecordKind, RecordSource, UnifiedTransactionRecord, UserData,
};
use crate::swap::models::CompletedSwap;

/// Build the synthetic feed record for a persisted completed swap
///
/// Total for any well-formed `CompletedSwap`; the reconciliation engine
/// shows this single record in place of the swap's two chain-specific legs.
pub fn synthetic_record(swap: &CompletedSwap) -> UnifiedTransactionRecord {
    UnifiedTransactionRecord {
        id: swap.id.clone(),
        kind: RecordKind::Swapped {
            base: swap.base_asset.clone(),
            quote: swap.quote_asset.clone(),
        },
        timestamp: Some(swap.completed_at.timestamp()),
        block_height: None,
        counterparties: Counterparties {
            from: Some(swap.base_asset.layer.counterparty_label().to_string()),
            to: Some(swap.quote_asset.layer.counterparty_label().to_string()),
        },
        amount: Some(swap.base_quantity),
        fee: None,
        source: RecordSource::Swap,
        settlement_proof: None,
        counterparty_node_id: None,
        user_data: UserData::default(),
    }
}
