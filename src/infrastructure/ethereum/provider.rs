//! Chain node abstraction and its Alloy implementation
//!
//! `ChainClient` is the narrow surface the gateway, signer and monitor depend
//! on. The Alloy implementation wraps a type-erased provider so HTTP and
//! WebSocket endpoints share one code path.

use std::time::Duration;

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::pubsub::Subscription;
use alloy::rpc::types::{Filter, Log, TransactionRequest};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::ChainError;
use crate::domain::{EventKind, TransactionReceipt};

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
}

impl ProviderConfig {
    /// Pick the transport from the URL scheme.
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        if url.starts_with("ws://") || url.starts_with("wss://") {
            ProviderConfig::WebSocket(url.to_string())
        } else {
            ProviderConfig::Http(url.to_string())
        }
    }

    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
        }
    }

    /// Check if this is a WebSocket endpoint
    pub fn is_websocket(&self) -> bool {
        matches!(self, ProviderConfig::WebSocket(_))
    }
}

/// A live log subscription for a single event kind.
///
/// Logs arrive on `logs`; a terminal failure arrives on `error`. Dropping the
/// subscription aborts the forwarding task and runs the teardown hook, which
/// for node subscriptions sends `eth_unsubscribe`.
pub struct LogSubscription {
    pub logs: mpsc::Receiver<Log>,
    pub error: oneshot::Receiver<ChainError>,
    forwarder: Option<JoinHandle<()>>,
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl LogSubscription {
    pub fn new(logs: mpsc::Receiver<Log>, error: oneshot::Receiver<ChainError>) -> Self {
        Self {
            logs,
            error,
            forwarder: None,
            teardown: None,
        }
    }

    /// Tie a forwarding task to this subscription so it is aborted on drop.
    pub fn with_forwarder(mut self, forwarder: JoinHandle<()>) -> Self {
        self.forwarder = Some(forwarder);
        self
    }

    /// Run `teardown` once when the subscription is dropped.
    pub fn with_teardown(mut self, teardown: impl FnOnce() + Send + 'static) -> Self {
        self.teardown = Some(Box::new(teardown));
        self
    }
}

impl Drop for LogSubscription {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

/// Source of raw logs for a forwarding task.
#[async_trait::async_trait]
trait LogSource: Send {
    async fn recv(&mut self) -> Result<Log, RecvError>;
}

#[async_trait::async_trait]
impl LogSource for Subscription<Log> {
    async fn recv(&mut self) -> Result<Log, RecvError> {
        Subscription::recv(self).await
    }
}

#[async_trait::async_trait]
impl LogSource for broadcast::Receiver<Log> {
    async fn recv(&mut self) -> Result<Log, RecvError> {
        broadcast::Receiver::recv(self).await
    }
}

/// Move logs from `source` to `logs` until either side closes.
///
/// A source closed by the node is reported on `error`. Lagging only skips logs.
async fn forward_logs<S: LogSource>(
    mut source: S,
    event: EventKind,
    logs: mpsc::Sender<Log>,
    error: oneshot::Sender<ChainError>,
) {
    loop {
        match source.recv().await {
            Ok(log) => {
                if logs.send(log).await.is_err() {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(%event, skipped, "log subscription lagged");
            }
            Err(RecvError::Closed) => {
                let _ = error.send(ChainError::Subscription(format!(
                    "{event}: subscription closed by node"
                )));
                break;
            }
        }
    }
}

/// Chain node operations used by the wallet.
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync + 'static {
    /// Native balance of an account, in wei
    async fn balance_at(&self, address: Address) -> Result<U256, ChainError>;

    /// Deployed bytecode at an address (empty for plain accounts)
    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError>;

    /// Nonce including pending transactions
    async fn pending_nonce(&self, address: Address) -> Result<u64, ChainError>;

    async fn chain_id(&self) -> Result<u64, ChainError>;

    /// Execute a read-only call (eth_call)
    async fn call(&self, request: TransactionRequest) -> Result<Bytes, ChainError>;

    /// Submit a signed, EIP-2718 encoded transaction
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, ChainError>;

    /// Block until the transaction is mined and return its receipt
    async fn wait_mined(&self, tx_hash: B256) -> Result<TransactionReceipt, ChainError>;

    /// Subscribe to logs of one event kind emitted by `contract`
    async fn subscribe_logs(
        &self,
        contract: Address,
        event: EventKind,
    ) -> Result<LogSubscription, ChainError>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

/// `ChainClient` backed by an Alloy provider.
pub struct AlloyChainClient {
    provider: DynProvider<Ethereum>,
    endpoint: String,
}

impl std::fmt::Debug for AlloyChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyChainClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Dial the node described by `config`, giving up after `timeout`.
pub async fn connect(
    config: ProviderConfig,
    timeout: Duration,
) -> Result<AlloyChainClient, ChainError> {
    let endpoint = config.display();
    debug!(%endpoint, websocket = config.is_websocket(), "dialing node");
    let dial = ProviderBuilder::new().connect(&endpoint);
    let provider = tokio::time::timeout(timeout, dial)
        .await
        .map_err(|_| ChainError::Connect(format!("timed out dialing {endpoint}")))?
        .map_err(|e| ChainError::Connect(format!("{endpoint}: {e}")))?;
    Ok(AlloyChainClient {
        provider: provider.erased(),
        endpoint,
    })
}

fn rpc_error(err: impl std::fmt::Display) -> ChainError {
    ChainError::Rpc(err.to_string())
}

#[async_trait::async_trait]
impl ChainClient for AlloyChainClient {
    async fn balance_at(&self, address: Address) -> Result<U256, ChainError> {
        self.provider.get_balance(address).await.map_err(rpc_error)
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError> {
        self.provider.get_code_at(address).await.map_err(rpc_error)
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64, ChainError> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(rpc_error)
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.provider.get_chain_id().await.map_err(rpc_error)
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes, ChainError> {
        self.provider.call(request).await.map_err(rpc_error)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, ChainError> {
        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(rpc_error)?;
        Ok(*pending.tx_hash())
    }

    async fn wait_mined(&self, tx_hash: B256) -> Result<TransactionReceipt, ChainError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(rpc_error)?;
        Ok(receipt.into())
    }

    async fn subscribe_logs(
        &self,
        contract: Address,
        event: EventKind,
    ) -> Result<LogSubscription, ChainError> {
        let filter = Filter::new()
            .address(contract)
            .event_signature(event.signature_hash());
        let subscription = self
            .provider
            .subscribe_logs(&filter)
            .await
            .map_err(|e| ChainError::Subscription(format!("{event}: {e}")))?;
        let id = *subscription.local_id();
        let root = self.provider.root().clone();

        let (log_tx, log_rx) = mpsc::channel(100);
        let (err_tx, err_rx) = oneshot::channel();
        let forwarder = tokio::spawn(forward_logs(subscription, event, log_tx, err_tx));

        Ok(LogSubscription::new(log_rx, err_rx)
            .with_forwarder(forwarder)
            .with_teardown(move || match root.unsubscribe(id) {
                Ok(()) => debug!(%event, %id, "log subscription released"),
                Err(err) => warn!(%event, %id, %err, "failed to release log subscription"),
            }))
    }

    fn endpoint_name(&self) -> String {
        self.endpoint.clone()
    }
}
