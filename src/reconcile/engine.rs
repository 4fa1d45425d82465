use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::adapters::registry::AdapterRegistry;
use crate::adapters::traits::RawRecord;
use crate::config::Config;
use crate::ledger::models::{RecordKey, RecordSource, UnifiedTransactionRecord, UserData};
use crate::price::PriceSource;
use crate::reconcile::feed::{
    apply_filter, apply_sort, search_records, FeedSettings, SortDirection, SortField, TypeFilter,
};
use crate::store::{AnnotationStore, CompletedSwapStore};
use crate::swap::bridge::synthetic_record;
use crate::swap::models::COMPLETED_STATUS;

/// Produces the single ordered, deduplicated activity feed from N
/// independent raw sources plus the completed-swap store.
///
/// Recompute is eventually consistent with respect to raw ledger updates:
/// a pass may race a new adapter event, and the next pass (triggered by
/// that event's notification) converges.
pub struct ReconcileEngine {
    adapters: Arc<AdapterRegistry>,
    swaps: Arc<dyn CompletedSwapStore>,
    annotations: Arc<dyn AnnotationStore>,
    prices: Arc<dyn PriceSource>,
    /// Known on-chain swap-contract address for the active network
    swap_contract_address: String,
    settings: RwLock<FeedSettings>,
    feed: RwLock<Vec<UnifiedTransactionRecord>>,
}

impl ReconcileEngine {
    pub fn new(
        adapters: Arc<AdapterRegistry>,
        swaps: Arc<dyn CompletedSwapStore>,
        annotations: Arc<dyn AnnotationStore>,
        prices: Arc<dyn PriceSource>,
        swap_contract_address: impl Into<String>,
    ) -> Self {
        Self {
            adapters,
            swaps,
            annotations,
            prices,
            swap_contract_address: swap_contract_address.into(),
            settings: RwLock::new(FeedSettings::default()),
            feed: RwLock::new(Vec::new()),
        }
    }

    /// Wire the engine from loaded configuration; the suppression rule
    /// uses the configured swap-contract address.
    pub fn from_config(
        adapters: Arc<AdapterRegistry>,
        swaps: Arc<dyn CompletedSwapStore>,
        annotations: Arc<dyn AnnotationStore>,
        prices: Arc<dyn PriceSource>,
        config: &Config,
    ) -> Self {
        Self::new(
            adapters,
            swaps,
            annotations,
            prices,
            config.swap_contract_address.clone(),
        )
    }

    pub fn set_filter(&self, filter: TypeFilter) {
        self.settings.write().filter = filter;
    }

    pub fn set_sort(&self, field: SortField, direction: SortDirection) {
        let mut settings = self.settings.write();
        settings.sort_field = field;
        settings.direction = direction;
    }

    pub fn settings(&self) -> FeedSettings {
        *self.settings.read()
    }

    /// Recompute and publish the reconciled feed.
    ///
    /// Any single source failing to produce data degrades to "empty for
    /// this pass"; reconciliation never fails wholesale. Pure computation
    /// apart from the source fetches and the published output.
    pub async fn recompute(&self) -> Vec<UnifiedTransactionRecord> {
        // Completed swaps become synthetic records; their ids and base
        // quantities drive leg suppression below.
        let completed = match self.swaps.swaps_by_status(COMPLETED_STATUS).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "swap store unavailable, treating as empty");
                Vec::new()
            }
        };
        let swap_ids: HashSet<String> = completed.iter().map(|s| s.id.clone()).collect();
        let swap_amounts: HashSet<Decimal> =
            completed.iter().map(|s| s.base_quantity).collect();
        let mut merged: Vec<UnifiedTransactionRecord> =
            completed.iter().map(synthetic_record).collect();

        // One raw stream per active (coin, chain) wallet, fetched in
        // parallel.
        let adapters = self.adapters.active().await;
        let fetches = adapters.iter().map(|adapter| adapter.raw_records());
        let results = futures::future::join_all(fetches).await;

        let mut seen: HashSet<RecordKey> = merged.iter().map(|r| r.key()).collect();
        for (adapter, result) in adapters.iter().zip(results) {
            let raw_records = match result {
                Ok(records) => records,
                Err(e) => {
                    warn!(
                        adapter = adapter.name(),
                        error = %e,
                        "adapter unavailable, treating source as empty for this pass"
                    );
                    continue;
                }
            };
            for raw in raw_records {
                if self.is_swap_leg(&raw, &swap_ids, &swap_amounts) {
                    debug!(
                        source = %raw.record.source,
                        id = %raw.record.id,
                        "suppressing swap leg"
                    );
                    continue;
                }
                // Malformed records never reach the published feed: `kind`
                // and `source` must agree and amounts carry no sign.
                if !raw.record.is_kind_consistent()
                    || raw.record.amount.is_some_and(|amount| amount.is_sign_negative())
                {
                    warn!(
                        adapter = adapter.name(),
                        id = %raw.record.id,
                        "dropping malformed record"
                    );
                    continue;
                }
                if seen.insert(raw.record.key()) {
                    merged.push(raw.record);
                }
            }
        }

        for record in &mut merged {
            record.user_data = self.user_data_for(record).await;
        }

        let settings = self.settings();
        apply_filter(&mut merged, settings.filter);
        apply_sort(&mut merged, settings.sort_field, settings.direction);

        info!(records = merged.len(), "reconciled feed published");
        *self.feed.write() = merged.clone();
        merged
    }

    /// A raw EVM record is a swap leg iff it pays the swap contract an
    /// amount matching a completed swap's base quantity; a raw Lightning
    /// record is one iff its memo is exactly a completed swap's id.
    fn is_swap_leg(
        &self,
        raw: &RawRecord,
        swap_ids: &HashSet<String>,
        swap_amounts: &HashSet<Decimal>,
    ) -> bool {
        match raw.record.source {
            RecordSource::EthereumOnChain => {
                raw.recipient.as_deref() == Some(self.swap_contract_address.as_str())
                    && raw
                        .record
                        .amount
                        .is_some_and(|amount| swap_amounts.contains(&amount))
            }
            RecordSource::Lightning => raw
                .memo
                .as_deref()
                .is_some_and(|memo| swap_ids.contains(memo)),
            _ => false,
        }
    }

    async fn user_data_for(&self, record: &UnifiedTransactionRecord) -> UserData {
        let key = record.key();
        match self.annotations.annotation(&key).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                // No stored annotation: empty notes/labels, price taken
                // from context at read time.
                let fiat_price = match record.kind.principal_asset() {
                    Some(asset) => self.prices.fiat_price(&asset.symbol).await,
                    None => None,
                };
                UserData {
                    fiat_price,
                    ..UserData::default()
                }
            }
            Err(e) => {
                warn!(source = %key.source, id = %key.id, error = %e, "annotation store unavailable");
                UserData::default()
            }
        }
    }

    /// Case-insensitive search over the last published feed.
    pub fn search(&self, text: &str) -> Vec<UnifiedTransactionRecord> {
        let feed = self.feed.read();
        search_records(&feed, text).into_iter().cloned().collect()
    }

    /// Last published feed, without recomputing.
    pub fn current_feed(&self) -> Vec<UnifiedTransactionRecord> {
        self.feed.read().clone()
    }
}
