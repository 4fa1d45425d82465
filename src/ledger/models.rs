use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settlement layer a raw transaction record originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementLayer {
    BitcoinOnChain,
    EthereumOnChain,
    Lightning,
}

impl SettlementLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementLayer::BitcoinOnChain => "bitcoin",
            SettlementLayer::EthereumOnChain => "ethereum",
            SettlementLayer::Lightning => "lightning",
        }
    }

    /// Human label used as a synthetic counterparty on swap legs
    pub fn counterparty_label(&self) -> &'static str {
        match self {
            SettlementLayer::BitcoinOnChain => "Bitcoin",
            SettlementLayer::EthereumOnChain => "Ethereum",
            SettlementLayer::Lightning => "Lightning",
        }
    }
}

impl fmt::Display for SettlementLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Origin of a record in the reconciled feed
///
/// `(source, id)` is the globally unique key for every feed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    BitcoinOnChain,
    EthereumOnChain,
    Lightning,
    Swap,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSource::BitcoinOnChain => "bitcoin_onchain",
            RecordSource::EthereumOnChain => "ethereum_onchain",
            RecordSource::Lightning => "lightning",
            RecordSource::Swap => "swap",
        }
    }
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<SettlementLayer> for RecordSource {
    fn from(layer: SettlementLayer) -> Self {
        match layer {
            SettlementLayer::BitcoinOnChain => RecordSource::BitcoinOnChain,
            SettlementLayer::EthereumOnChain => RecordSource::EthereumOnChain,
            SettlementLayer::Lightning => RecordSource::Lightning,
        }
    }
}

/// Asset held on one settlement layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub layer: SettlementLayer,
    /// Decimal shift to the asset's smallest unit (sats, wei, ...)
    pub decimals: u8,
    /// Token contract address, ERC-20 only
    pub contract: Option<String>,
}

impl Asset {
    pub fn btc() -> Self {
        Self {
            symbol: "BTC".to_string(),
            layer: SettlementLayer::BitcoinOnChain,
            decimals: 8,
            contract: None,
        }
    }

    pub fn eth() -> Self {
        Self {
            symbol: "ETH".to_string(),
            layer: SettlementLayer::EthereumOnChain,
            decimals: 18,
            contract: None,
        }
    }

    /// BTC held in Lightning channels rather than on-chain
    pub fn lightning_btc() -> Self {
        Self {
            symbol: "BTC".to_string(),
            layer: SettlementLayer::Lightning,
            decimals: 8,
            contract: None,
        }
    }

    pub fn erc20(symbol: impl Into<String>, contract: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            layer: SettlementLayer::EthereumOnChain,
            decimals,
            contract: Some(contract.into()),
        }
    }
}

/// Direction and asset(s) of a feed record
///
/// The amount on a record is always non-negative; direction comes from
/// this tag, never from the sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Sent(Asset),
    Received(Asset),
    Swapped { base: Asset, quote: Asset },
    Unknown,
}

impl RecordKind {
    /// Asset whose quantity is the record's principal amount
    pub fn principal_asset(&self) -> Option<&Asset> {
        match self {
            RecordKind::Sent(asset) | RecordKind::Received(asset) => Some(asset),
            RecordKind::Swapped { base, .. } => Some(base),
            RecordKind::Unknown => None,
        }
    }

    /// Discriminant used by the coin sort, which only compares within
    /// matching variants
    pub fn variant_tag(&self) -> u8 {
        match self {
            RecordKind::Sent(_) => 0,
            RecordKind::Received(_) => 1,
            RecordKind::Swapped { .. } => 2,
            RecordKind::Unknown => 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparties {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Mutable per-record annotation block, keyed by `(source, id)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub note: String,
    pub labels: Vec<String>,
    /// Fiat price at the time of the transaction, for value display
    pub fiat_price: Option<Decimal>,
}

/// Lookup key for the annotation store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub source: RecordSource,
    pub id: String,
}

impl RecordKey {
    pub fn new(source: RecordSource, id: impl Into<String>) -> Self {
        Self {
            source,
            id: id.into(),
        }
    }
}

/// The common entity every adapter-specific record is normalized into
///
/// Immutable value object apart from `user_data`; reconciliation only ever
/// includes, excludes, or replaces whole records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedTransactionRecord {
    /// Chain txid, Lightning payment id, or swap id - unique within `source`
    pub id: String,
    pub kind: RecordKind,
    /// Epoch seconds; absence means unconfirmed/pending
    pub timestamp: Option<i64>,
    /// Present only for on-chain sources once confirmed
    pub block_height: Option<u64>,
    pub counterparties: Counterparties,
    /// Non-negative magnitude in display-unit convention
    pub amount: Option<Decimal>,
    pub fee: Option<Decimal>,
    pub source: RecordSource,
    /// Lightning preimage once settled
    pub settlement_proof: Option<String>,
    pub counterparty_node_id: Option<String>,
    pub user_data: UserData,
}

impl UnifiedTransactionRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.source, self.id.clone())
    }

    pub fn is_confirmed(&self) -> bool {
        self.timestamp.is_some()
    }

    /// Principal amount used by the amount sort; missing amounts count as zero
    pub fn principal_amount(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    /// `kind` and `source` must agree: `Swapped` appears iff `source == Swap`
    pub fn is_kind_consistent(&self) -> bool {
        matches!(self.kind, RecordKind::Swapped { .. }) == (self.source == RecordSource::Swap)
    }
}
