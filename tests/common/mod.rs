//! In-memory chain client doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::rpc::types::{Log, TransactionRequest};
use async_trait::async_trait;
use shared_wallet::config::TxSettings;
use shared_wallet::core::ChainError;
use shared_wallet::domain::{EventKind, EventRecord, TransactionInfo, TransactionReceipt, TransactionSink};
use shared_wallet::infrastructure::ethereum::{ChainClient, GasSettings, LogSubscription};
use shared_wallet::modules::EventSink;
use tokio::sync::{mpsc, oneshot};

pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
// anvil account #0
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub fn contract_address() -> Address {
    CONTRACT.parse().unwrap()
}

pub fn settings() -> TxSettings {
    TxSettings {
        private_key: DEV_KEY.to_string(),
        contract: CONTRACT.to_string(),
        gas: GasSettings {
            gas_limit: 300_000,
            gas_price: 1_000_000_000,
            value: U256::ZERO,
        },
    }
}

/// Push side of one stubbed log subscription.
pub struct LogFeed {
    pub logs: mpsc::Sender<Log>,
    error: Option<oneshot::Sender<ChainError>>,
}

/// Scripted node: fixed code, balances and call results, receipts with a
/// configurable status, and log subscriptions driven from the test.
pub struct StubChainClient {
    code: Mutex<HashMap<Address, Bytes>>,
    balances: Mutex<HashMap<Address, U256>>,
    call_results: Mutex<HashMap<[u8; 4], Bytes>>,
    receipt_success: AtomicBool,
    created_contract: Mutex<Option<Address>>,
    feeds: Mutex<HashMap<EventKind, LogFeed>>,
    pub raw_sent: Mutex<Vec<Bytes>>,
    pub calls: AtomicUsize,
    pub nonce_queries: AtomicUsize,
}

impl StubChainClient {
    /// A node with the shared wallet deployed at `CONTRACT`.
    pub fn new() -> Self {
        let stub = Self {
            code: Mutex::new(HashMap::new()),
            balances: Mutex::new(HashMap::new()),
            call_results: Mutex::new(HashMap::new()),
            receipt_success: AtomicBool::new(true),
            created_contract: Mutex::new(None),
            feeds: Mutex::new(HashMap::new()),
            raw_sent: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            nonce_queries: AtomicUsize::new(0),
        };
        stub.with_code(contract_address())
    }

    pub fn with_code(self, address: Address) -> Self {
        self.code
            .lock()
            .unwrap()
            .insert(address, Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]));
        self
    }

    pub fn without_code(self, address: Address) -> Self {
        self.code.lock().unwrap().remove(&address);
        self
    }

    pub fn with_balance(self, address: Address, wei: U256) -> Self {
        self.balances.lock().unwrap().insert(address, wei);
        self
    }

    pub fn with_call_result(self, selector: [u8; 4], output: Vec<u8>) -> Self {
        self.call_results
            .lock()
            .unwrap()
            .insert(selector, Bytes::from(output));
        self
    }

    pub fn with_receipt_success(self, success: bool) -> Self {
        self.receipt_success.store(success, Ordering::SeqCst);
        self
    }

    pub fn with_created_contract(self, address: Address) -> Self {
        *self.created_contract.lock().unwrap() = Some(address);
        self
    }

    pub fn sent_count(&self) -> usize {
        self.raw_sent.lock().unwrap().len()
    }

    pub fn subscribed(&self) -> usize {
        self.feeds.lock().unwrap().len()
    }

    /// Wait until `count` subscriptions are open.
    pub async fn wait_subscribed(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.subscribed() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("subscriptions were not opened");
    }

    pub fn log_sender(&self, kind: EventKind) -> mpsc::Sender<Log> {
        self.feeds.lock().unwrap()[&kind].logs.clone()
    }

    /// Report a terminal subscription failure for `kind`.
    pub fn fail(&self, kind: EventKind, reason: &str) {
        let sender = self
            .feeds
            .lock()
            .unwrap()
            .get_mut(&kind)
            .and_then(|feed| feed.error.take())
            .expect("no open subscription");
        let _ = sender.send(ChainError::Subscription(reason.to_string()));
    }

    /// True once the watcher owning `kind` dropped its subscription.
    pub fn feed_closed(&self, kind: EventKind) -> bool {
        self.feeds.lock().unwrap()[&kind].logs.is_closed()
    }
}

#[async_trait]
impl ChainClient for StubChainClient {
    async fn balance_at(&self, address: Address) -> Result<U256, ChainError> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError> {
        Ok(self
            .code
            .lock()
            .unwrap()
            .get(&address)
            .cloned()
            .unwrap_or_default())
    }

    async fn pending_nonce(&self, _address: Address) -> Result<u64, ChainError> {
        Ok(self.nonce_queries.fetch_add(1, Ordering::SeqCst) as u64)
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(31337)
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let input = request.input.input().cloned().unwrap_or_default();
        let selector: [u8; 4] = input
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| ChainError::Rpc("missing selector".into()))?;
        self.call_results
            .lock()
            .unwrap()
            .get(&selector)
            .cloned()
            .ok_or_else(|| ChainError::Rpc("execution reverted".into()))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, ChainError> {
        let hash = keccak256(&raw);
        self.raw_sent.lock().unwrap().push(raw);
        Ok(hash)
    }

    async fn wait_mined(&self, tx_hash: B256) -> Result<TransactionReceipt, ChainError> {
        Ok(TransactionReceipt {
            tx_hash,
            status: self.receipt_success.load(Ordering::SeqCst),
            block_number: Some(1),
            gas_used: 21_000,
            gas_price: 1_000_000_000,
            contract_address: *self.created_contract.lock().unwrap(),
        })
    }

    async fn subscribe_logs(
        &self,
        _contract: Address,
        event: EventKind,
    ) -> Result<LogSubscription, ChainError> {
        let (log_tx, log_rx) = mpsc::channel(16);
        let (err_tx, err_rx) = oneshot::channel();
        self.feeds.lock().unwrap().insert(
            event,
            LogFeed {
                logs: log_tx,
                error: Some(err_tx),
            },
        );
        Ok(LogSubscription::new(log_rx, err_rx))
    }

    fn endpoint_name(&self) -> String {
        "stub".to_string()
    }
}

/// Panics on any node access.
pub struct UnreachableClient;

#[async_trait]
impl ChainClient for UnreachableClient {
    async fn balance_at(&self, _: Address) -> Result<U256, ChainError> {
        panic!("network touched: balance_at")
    }

    async fn code_at(&self, _: Address) -> Result<Bytes, ChainError> {
        panic!("network touched: code_at")
    }

    async fn pending_nonce(&self, _: Address) -> Result<u64, ChainError> {
        panic!("network touched: pending_nonce")
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        panic!("network touched: chain_id")
    }

    async fn call(&self, _: TransactionRequest) -> Result<Bytes, ChainError> {
        panic!("network touched: call")
    }

    async fn send_raw_transaction(&self, _: Bytes) -> Result<B256, ChainError> {
        panic!("network touched: send_raw_transaction")
    }

    async fn wait_mined(&self, _: B256) -> Result<TransactionReceipt, ChainError> {
        panic!("network touched: wait_mined")
    }

    async fn subscribe_logs(&self, _: Address, _: EventKind) -> Result<LogSubscription, ChainError> {
        panic!("network touched: subscribe_logs")
    }

    fn endpoint_name(&self) -> String {
        "unreachable".to_string()
    }
}

/// Keeps every confirmed transaction.
#[derive(Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<TransactionInfo>>,
}

impl TransactionSink for RecordingSink {
    fn record(&self, info: TransactionInfo) {
        self.records.lock().unwrap().push(info);
    }
}

/// Keeps every emitted event.
#[derive(Default)]
pub struct CollectingSink {
    pub events: Mutex<Vec<EventRecord>>,
}

impl CollectingSink {
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub async fn wait_for(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("events were not emitted");
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, record: &EventRecord) -> std::io::Result<()> {
        self.events.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Fails every emit, like stdout after the reader went away.
pub struct ClosedSink;

impl EventSink for ClosedSink {
    fn emit(&self, _: &EventRecord) -> std::io::Result<()> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }
}
