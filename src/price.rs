use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Fiat price feed used when attaching `user_data` for display
///
/// Not required for correctness of reconciliation; an unavailable feed
/// just leaves `fiat_price` empty.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fiat_price(&self, symbol: &str) -> Option<Decimal>;
}

/// Fixed price table, for tests and offline operation
#[derive(Default)]
pub struct StaticPriceSource {
    prices: HashMap<String, Decimal>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, symbol: impl Into<String>, price: Decimal) -> Self {
        self.prices.insert(symbol.into(), price);
        self
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn fiat_price(&self, symbol: &str) -> Option<Decimal> {
        self.prices.get(symbol).copied()
    }
}
