pub mod models;

pub use models::{
    Asset, Counterparties, RecordKey, RecordKind, RecordSource, SettlementLayer,
    UnifiedTransactionRecord, UserData,
};
