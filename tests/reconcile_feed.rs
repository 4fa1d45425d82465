use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use ledgerfuse::adapters::{AdapterRegistry, RawRecord, WalletAdapter};
use ledgerfuse::events::PendingEventQueue;
use ledgerfuse::price::StaticPriceSource;
use ledgerfuse::store::{AnnotationStore, CompletedSwapStore, MemoryAnnotationStore, MemorySwapStore};
use ledgerfuse::swap::models::COMPLETED_STATUS;
use ledgerfuse::{
    Asset, CompletedSwap, Config, Counterparties, RecordKey, RecordKind, RecordSource,
    ReconcileEngine, SortDirection, SortField, TypeFilter, UnifiedTransactionRecord, UserData,
    WalletError, WalletEvent,
};

const SWAP_CONTRACT: &str = "0xswapcontract";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

fn record(
    id: &str,
    kind: RecordKind,
    source: RecordSource,
    timestamp: Option<i64>,
    amount: Option<Decimal>,
) -> UnifiedTransactionRecord {
    UnifiedTransactionRecord {
        id: id.to_string(),
        kind,
        timestamp,
        block_height: None,
        counterparties: Counterparties::default(),
        amount,
        fee: None,
        source,
        settlement_proof: None,
        counterparty_node_id: None,
        user_data: UserData::default(),
    }
}

struct MockAdapter {
    name: &'static str,
    asset: Asset,
    source: RecordSource,
    records: Vec<RawRecord>,
    fail: bool,
}

#[async_trait]
impl WalletAdapter for MockAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn asset(&self) -> Asset {
        self.asset.clone()
    }

    fn source(&self) -> RecordSource {
        self.source
    }

    async fn raw_records(&self) -> Result<Vec<RawRecord>, WalletError> {
        if self.fail {
            return Err(WalletError::Adapter("rpc node unreachable".to_string()));
        }
        Ok(self.records.clone())
    }
}

fn completed_swap(id: &str, base_quantity: Decimal) -> CompletedSwap {
    CompletedSwap {
        id: id.to_string(),
        status: COMPLETED_STATUS.to_string(),
        base_asset: Asset::lightning_btc(),
        base_quantity,
        quote_asset: Asset::eth(),
        quote_quantity: dec!(0.01),
        completed_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

struct Fixture {
    registry: AdapterRegistry,
    swaps: Arc<MemorySwapStore>,
    annotations: Arc<MemoryAnnotationStore>,
}

impl Fixture {
    fn new() -> Self {
        init_tracing();
        Self {
            registry: AdapterRegistry::new(),
            swaps: Arc::new(MemorySwapStore::new()),
            annotations: Arc::new(MemoryAnnotationStore::new()),
        }
    }

    fn engine(self) -> ReconcileEngine {
        let prices = Arc::new(
            StaticPriceSource::new()
                .with_price("BTC", dec!(64000))
                .with_price("ETH", dec!(3000)),
        );
        ReconcileEngine::new(
            Arc::new(self.registry),
            self.swaps,
            self.annotations,
            prices,
            SWAP_CONTRACT,
        )
    }
}

/// Both legs of swap "abc" vanish, replaced by the single synthetic swap
/// record; unrelated records pass through.
#[tokio::test]
async fn swap_legs_are_suppressed_and_replaced_by_one_synthetic_record() {
    let mut fx = Fixture::new();
    fx.swaps
        .insert_swap(completed_swap("abc", dec!(50000)))
        .await
        .unwrap();

    let evm_leg = RawRecord::new(record(
        "0xevmleg",
        RecordKind::Sent(Asset::eth()),
        RecordSource::EthereumOnChain,
        Some(1_709_294_000),
        Some(dec!(50000)),
    ))
    .with_recipient(SWAP_CONTRACT);
    let ln_leg = RawRecord::new(record(
        "lnpay-7",
        RecordKind::Sent(Asset::lightning_btc()),
        RecordSource::Lightning,
        Some(1_709_294_100),
        Some(dec!(50000)),
    ))
    .with_memo("abc");
    let unrelated = RawRecord::new(record(
        "btc-receive",
        RecordKind::Received(Asset::btc()),
        RecordSource::BitcoinOnChain,
        Some(1_709_200_000),
        Some(dec!(10000)),
    ));

    fx.registry.register(Arc::new(MockAdapter {
        name: "eth",
        asset: Asset::eth(),
        source: RecordSource::EthereumOnChain,
        records: vec![evm_leg],
        fail: false,
    }));
    fx.registry.register(Arc::new(MockAdapter {
        name: "lightning",
        asset: Asset::lightning_btc(),
        source: RecordSource::Lightning,
        records: vec![ln_leg],
        fail: false,
    }));
    fx.registry.register(Arc::new(MockAdapter {
        name: "btc",
        asset: Asset::btc(),
        source: RecordSource::BitcoinOnChain,
        records: vec![unrelated],
        fail: false,
    }));

    let feed = fx.engine().recompute().await;

    assert_eq!(feed.len(), 2);
    let keys: HashSet<(RecordSource, &str)> = feed
        .iter()
        .map(|r| (r.source, r.id.as_str()))
        .collect();
    assert!(keys.contains(&(RecordSource::Swap, "abc")));
    assert!(keys.contains(&(RecordSource::BitcoinOnChain, "btc-receive")));

    // Invariants over the published feed.
    assert_eq!(keys.len(), feed.len(), "(source, id) must be unique");
    for r in &feed {
        assert!(r.is_kind_consistent());
        assert!(r.principal_amount() >= Decimal::ZERO);
    }
}

/// An EVM payment to the swap contract whose amount matches no completed
/// swap, or to another address, is a real transfer and must survive.
#[tokio::test]
async fn non_matching_evm_payments_are_not_suppressed() {
    let mut fx = Fixture::new();
    fx.swaps
        .insert_swap(completed_swap("abc", dec!(50000)))
        .await
        .unwrap();

    let wrong_amount = RawRecord::new(record(
        "0xother-amount",
        RecordKind::Sent(Asset::eth()),
        RecordSource::EthereumOnChain,
        Some(1),
        Some(dec!(123)),
    ))
    .with_recipient(SWAP_CONTRACT);
    let wrong_recipient = RawRecord::new(record(
        "0xother-recipient",
        RecordKind::Sent(Asset::eth()),
        RecordSource::EthereumOnChain,
        Some(2),
        Some(dec!(50000)),
    ))
    .with_recipient("0xsomeoneelse");
    let ln_other_memo = RawRecord::new(record(
        "lnpay-9",
        RecordKind::Received(Asset::lightning_btc()),
        RecordSource::Lightning,
        Some(3),
        Some(dec!(5)),
    ))
    .with_memo("not-a-swap-id");

    fx.registry.register(Arc::new(MockAdapter {
        name: "eth",
        asset: Asset::eth(),
        source: RecordSource::EthereumOnChain,
        records: vec![wrong_amount, wrong_recipient],
        fail: false,
    }));
    fx.registry.register(Arc::new(MockAdapter {
        name: "lightning",
        asset: Asset::lightning_btc(),
        source: RecordSource::Lightning,
        records: vec![ln_other_memo],
        fail: false,
    }));

    let feed = fx.engine().recompute().await;
    // Synthetic swap + all three raw records.
    assert_eq!(feed.len(), 4);
}

/// The engine takes its swap-contract address from loaded configuration.
#[tokio::test]
async fn engine_built_from_config_suppresses_with_its_contract_address() {
    let mut fx = Fixture::new();
    fx.swaps
        .insert_swap(completed_swap("abc", dec!(50000)))
        .await
        .unwrap();
    fx.registry.register(Arc::new(MockAdapter {
        name: "eth",
        asset: Asset::eth(),
        source: RecordSource::EthereumOnChain,
        records: vec![RawRecord::new(record(
            "0xevmleg",
            RecordKind::Sent(Asset::eth()),
            RecordSource::EthereumOnChain,
            Some(1),
            Some(dec!(50000)),
        ))
        .with_recipient(SWAP_CONTRACT)],
        fail: false,
    }));

    let config = Config {
        swap_contract_address: SWAP_CONTRACT.to_string(),
        swap_timeout_ticks: 180,
        network: "mainnet".to_string(),
    };
    let engine = ReconcileEngine::from_config(
        Arc::new(fx.registry),
        fx.swaps,
        fx.annotations,
        Arc::new(StaticPriceSource::new()),
        &config,
    );

    let feed = engine.recompute().await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].source, RecordSource::Swap);
}

#[tokio::test]
async fn failing_source_degrades_to_empty_instead_of_failing_recompute() {
    let mut fx = Fixture::new();
    fx.registry.register(Arc::new(MockAdapter {
        name: "eth",
        asset: Asset::eth(),
        source: RecordSource::EthereumOnChain,
        records: Vec::new(),
        fail: true,
    }));
    fx.registry.register(Arc::new(MockAdapter {
        name: "btc",
        asset: Asset::btc(),
        source: RecordSource::BitcoinOnChain,
        records: vec![RawRecord::new(record(
            "btc-1",
            RecordKind::Received(Asset::btc()),
            RecordSource::BitcoinOnChain,
            Some(10),
            Some(dec!(1)),
        ))],
        fail: false,
    }));

    let feed = fx.engine().recompute().await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, "btc-1");
}

/// An adapter emitting a record whose kind/source disagree, or whose
/// amount carries a sign, must not poison the published feed.
#[tokio::test]
async fn malformed_adapter_records_are_dropped_from_the_feed() {
    let mut fx = Fixture::new();

    let inconsistent = record(
        "bad-kind",
        RecordKind::Swapped {
            base: Asset::lightning_btc(),
            quote: Asset::eth(),
        },
        RecordSource::EthereumOnChain,
        Some(1),
        Some(dec!(1)),
    );
    let negative = record(
        "bad-amount",
        RecordKind::Sent(Asset::eth()),
        RecordSource::EthereumOnChain,
        Some(2),
        Some(dec!(-3)),
    );
    let good = record(
        "good",
        RecordKind::Received(Asset::eth()),
        RecordSource::EthereumOnChain,
        Some(3),
        Some(dec!(3)),
    );

    fx.registry.register(Arc::new(MockAdapter {
        name: "eth",
        asset: Asset::eth(),
        source: RecordSource::EthereumOnChain,
        records: vec![
            RawRecord::new(inconsistent),
            RawRecord::new(negative),
            RawRecord::new(good),
        ],
        fail: false,
    }));

    let feed = fx.engine().recompute().await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, "good");
}

#[tokio::test]
async fn annotations_attach_by_key_and_prices_fill_the_gaps() {
    let mut fx = Fixture::new();
    fx.registry.register(Arc::new(MockAdapter {
        name: "btc",
        asset: Asset::btc(),
        source: RecordSource::BitcoinOnChain,
        records: vec![
            RawRecord::new(record(
                "noted",
                RecordKind::Received(Asset::btc()),
                RecordSource::BitcoinOnChain,
                Some(10),
                Some(dec!(1)),
            )),
            RawRecord::new(record(
                "fresh",
                RecordKind::Received(Asset::btc()),
                RecordSource::BitcoinOnChain,
                Some(20),
                Some(dec!(2)),
            )),
        ],
        fail: false,
    }));
    fx.annotations
        .put_annotation(
            RecordKey::new(RecordSource::BitcoinOnChain, "noted"),
            UserData {
                note: "salary".to_string(),
                labels: vec!["income".to_string()],
                fiat_price: Some(dec!(59000)),
            },
        )
        .await
        .unwrap();

    let engine = fx.engine();
    let feed = engine.recompute().await;

    let noted = feed.iter().find(|r| r.id == "noted").unwrap();
    assert_eq!(noted.user_data.note, "salary");
    assert_eq!(noted.user_data.fiat_price, Some(dec!(59000)));

    let fresh = feed.iter().find(|r| r.id == "fresh").unwrap();
    assert!(fresh.user_data.note.is_empty());
    assert_eq!(fresh.user_data.fiat_price, Some(dec!(64000)));

    // Search runs over the published feed and sees annotation text.
    assert_eq!(engine.search("salary").len(), 1);
    assert_eq!(engine.search("income").len(), 1);
    assert!(engine.search("groceries").is_empty());
}

#[tokio::test]
async fn filter_and_sort_apply_to_the_published_feed() {
    let mut fx = Fixture::new();
    fx.swaps
        .insert_swap(completed_swap("s1", dec!(777)))
        .await
        .unwrap();
    fx.registry.register(Arc::new(MockAdapter {
        name: "btc",
        asset: Asset::btc(),
        source: RecordSource::BitcoinOnChain,
        records: vec![
            RawRecord::new(record(
                "pending-receive",
                RecordKind::Received(Asset::btc()),
                RecordSource::BitcoinOnChain,
                None,
                Some(dec!(3)),
            )),
            RawRecord::new(record(
                "old-send",
                RecordKind::Sent(Asset::btc()),
                RecordSource::BitcoinOnChain,
                Some(1),
                Some(dec!(9)),
            )),
        ],
        fail: false,
    }));
    let engine = fx.engine();

    // Default sort: date descending, unconfirmed first.
    let feed = engine.recompute().await;
    assert_eq!(feed.first().unwrap().id, "pending-receive");

    engine.set_sort(SortField::Date, SortDirection::Ascending);
    let feed = engine.recompute().await;
    assert_eq!(feed.last().unwrap().id, "pending-receive");

    engine.set_sort(SortField::Amount, SortDirection::Descending);
    let feed = engine.recompute().await;
    assert_eq!(feed.first().unwrap().id, "s1");

    engine.set_filter(TypeFilter::Swap);
    let feed = engine.recompute().await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].source, RecordSource::Swap);

    engine.set_filter(TypeFilter::Failed);
    assert!(engine.recompute().await.is_empty());
}

/// Watchers push into the queue; whoever waits on it recomputes. Events
/// pushed before the consumer attached are still drainable.
#[tokio::test]
async fn queue_notification_triggers_a_recompute() {
    let mut fx = Fixture::new();
    fx.registry.register(Arc::new(MockAdapter {
        name: "lightning",
        asset: Asset::lightning_btc(),
        source: RecordSource::Lightning,
        records: vec![RawRecord::new({
            let mut r = record(
                "lnpay-1",
                RecordKind::Received(Asset::lightning_btc()),
                RecordSource::Lightning,
                Some(50),
                Some(dec!(0.0002)),
            );
            r.settlement_proof = Some(hex::encode([7u8; 32]));
            r
        })],
        fail: false,
    }));
    let engine = Arc::new(fx.engine());
    let queue = Arc::new(PendingEventQueue::new());

    let waiter = {
        let engine = engine.clone();
        let queue = queue.clone();
        tokio::spawn(async move {
            queue.wait_for_next().await;
            engine.recompute().await
        })
    };
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    queue.push(WalletEvent::PaymentReceived {
        source: RecordSource::Lightning,
        id: "lnpay-1".to_string(),
    });

    let feed = waiter.await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(
        feed[0].settlement_proof.as_deref(),
        Some(hex::encode([7u8; 32]).as_str())
    );
    assert_eq!(
        queue.drain(),
        vec![WalletEvent::PaymentReceived {
            source: RecordSource::Lightning,
            id: "lnpay-1".to_string(),
        }]
    );
}
