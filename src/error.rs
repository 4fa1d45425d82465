use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level error type for the wallet core
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Adapter error: {0}")]
    Adapter(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Swap error: {0}")]
    Swap(#[from] SwapError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Swap protocol errors
///
/// Terminal swap states carry the rendered reason string of one of these
/// variants, so UI layers can show it directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("connection failed")]
    ConnectionFailed,

    #[error("Swap timeout")]
    Timeout,

    #[error("signaling error: {0}")]
    Signaling(String),

    #[error("escrow open failed: {0}")]
    EscrowOpen(String),

    #[error("commit failed: {0}")]
    Commit(String),

    #[error("quantity {quantity} does not convert to whole {symbol} base units")]
    InvalidQuantity { symbol: String, quantity: Decimal },

    #[error("invalid order state: {0}")]
    InvalidState(&'static str),
}

impl From<anyhow::Error> for WalletError {
    fn from(error: anyhow::Error) -> Self {
        WalletError::Internal(format!("Error converting: {:?}", error))
    }
}

impl From<rust_decimal::Error> for WalletError {
    fn from(error: rust_decimal::Error) -> Self {
        WalletError::InvalidInput(format!("Decimal conversion error: {:?}", error))
    }
}

/// Result type alias for the wallet core
pub type WalletResult<T> = Result<T, WalletError>;
