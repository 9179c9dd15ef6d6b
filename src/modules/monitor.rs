//! Concurrent event monitor
//!
//! One watcher task per event kind, all joined under a single cancellation
//! domain. The first watcher error cancels its siblings and is returned;
//! external cancellation makes every watcher exit cleanly.

use std::io::{self, Write};
use std::sync::Arc;

use alloy::primitives::Address;
use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::core::{Result, WalletError};
use crate::domain::{EventKind, EventRecord};
use crate::infrastructure::ethereum::{validate_contract_address, ChainClient};

/// Destination of decoded events.
///
/// An error ends the watcher that produced the record.
pub trait EventSink: Send + Sync {
    fn emit(&self, record: &EventRecord) -> io::Result<()>;
}

/// Writes each record as one JSON line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn emit(&self, record: &EventRecord) -> io::Result<()> {
        write_json_line(&mut io::stdout().lock(), record)
    }
}

fn write_json_line(out: &mut impl Write, record: &EventRecord) -> io::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Resolves once `rx` observes `true`. Never resolves if the sender is gone.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

pub struct EventMonitor {
    client: Arc<dyn ChainClient>,
    sink: Arc<dyn EventSink>,
}

impl EventMonitor {
    pub fn new(client: Arc<dyn ChainClient>, sink: Arc<dyn EventSink>) -> Self {
        Self { client, sink }
    }

    /// Watch every event of `contract` until `shutdown` turns `true` or a
    /// watcher fails.
    ///
    /// Returns `Ok(())` on external cancellation, otherwise the first watcher
    /// error. All watchers have exited and released their subscriptions by
    /// the time this returns.
    pub async fn start(&self, contract: &str, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let address = validate_contract_address(self.client.as_ref(), contract).await?;
        info!(%address, endpoint = %self.client.endpoint_name(), "start monitoring");

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let mut watchers = JoinSet::new();
        for kind in EventKind::ALL {
            watchers.spawn(watch_events(
                self.client.clone(),
                address,
                kind,
                self.sink.clone(),
                cancel_rx.clone(),
            ));
        }
        drop(cancel_rx);

        let mut first_error: Option<WalletError> = None;
        let mut shutdown_seen = false;
        loop {
            tokio::select! {
                _ = cancelled(&mut shutdown), if !shutdown_seen => {
                    shutdown_seen = true;
                    info!("shutdown requested, stopping watchers");
                    cancel_tx.send_replace(true);
                }
                joined = watchers.join_next() => {
                    let Some(joined) = joined else { break };
                    let outcome = joined.unwrap_or_else(|err| {
                        Err(WalletError::Subscription(format!("watcher aborted: {err}")))
                    });
                    if let Err(err) = outcome {
                        if first_error.is_none() {
                            error!(%err, "watcher failed, cancelling the others");
                            cancel_tx.send_replace(true);
                            first_error = Some(err);
                        } else {
                            debug!(%err, "additional watcher error");
                        }
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                info!("monitoring stopped");
                Ok(())
            }
        }
    }
}

/// Decode and emit logs of one event kind until cancelled or failed.
async fn watch_events(
    client: Arc<dyn ChainClient>,
    contract: Address,
    kind: EventKind,
    sink: Arc<dyn EventSink>,
    mut cancel: watch::Receiver<bool>,
) -> Result<()> {
    let mut subscription = tokio::select! {
        _ = cancelled(&mut cancel) => return Ok(()),
        subscribed = client.subscribe_logs(contract, kind) => {
            subscribed.map_err(|e| WalletError::Subscription(e.to_string()))?
        }
    };
    debug!(%kind, "watcher subscribed");

    loop {
        tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => {
                debug!(%kind, "watcher cancelled");
                return Ok(());
            }
            failure = &mut subscription.error => {
                let reason = match failure {
                    Ok(err) => err.to_string(),
                    Err(_) => "subscription dropped".to_string(),
                };
                return Err(WalletError::Subscription(format!("{kind}: {reason}")));
            }
            log = subscription.logs.recv() => {
                let Some(log) = log else {
                    return Err(WalletError::Subscription(format!("{kind}: log stream closed")));
                };
                let record = EventRecord::decode(kind, &log, Utc::now()).map_err(|e| {
                    WalletError::Subscription(format!("{kind}: undecodable log: {e}"))
                })?;
                sink.emit(&record).map_err(|e| {
                    WalletError::Subscription(format!("{kind}: emitting event: {e}"))
                })?;
            }
        }
    }
}
