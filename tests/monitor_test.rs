//! Event monitor: emission, external cancellation and fail-fast

mod common;

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Log as PrimitiveLog};
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use common::{ClosedSink, CollectingSink, StubChainClient, CONTRACT};
use shared_wallet::core::{to_smallest_unit, WalletError};
use shared_wallet::domain::{EventKind, EventRecord};
use shared_wallet::infrastructure::ethereum::{ChainClient, SharedWallet};
use shared_wallet::modules::{EventMonitor, EventSink};
use tokio::sync::watch;

fn log_of<E: SolEvent>(event: &E, block: u64) -> Log {
    Log {
        inner: PrimitiveLog {
            address: common::contract_address(),
            data: event.encode_log_data(),
        },
        block_number: Some(block),
        ..Default::default()
    }
}

fn start_monitor(
    stub: Arc<StubChainClient>,
    sink: Arc<dyn EventSink>,
) -> (
    watch::Sender<bool>,
    tokio::task::JoinHandle<shared_wallet::core::Result<()>>,
) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let client: Arc<dyn ChainClient> = stub;
    let monitor = EventMonitor::new(client, sink);
    let handle = tokio::spawn(async move { monitor.start(CONTRACT, shutdown_rx).await });
    (shutdown_tx, handle)
}

#[tokio::test]
async fn emits_decoded_events_then_stops_on_cancel() {
    let stub = Arc::new(StubChainClient::new());
    let sink = Arc::new(CollectingSink::default());
    let (shutdown, handle) = start_monitor(stub.clone(), sink.clone());

    stub.wait_subscribed(4).await;
    let from = Address::repeat_byte(0x01);
    stub.log_sender(EventKind::MoneyReceived)
        .send(log_of(
            &SharedWallet::MoneyReceived {
                from,
                amount: to_smallest_unit(3),
            },
            8,
        ))
        .await
        .unwrap();
    sink.wait_for(1).await;

    shutdown.send_replace(true);
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("monitor did not stop")
        .unwrap();
    assert!(result.is_ok());

    for kind in EventKind::ALL {
        assert!(stub.feed_closed(kind), "{kind} subscription still open");
    }
    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        EventRecord::MoneyReceived { sender, block_number: Some(8), .. } if sender == from
    ));
}

#[tokio::test]
async fn first_subscription_error_stops_every_watcher() {
    let stub = Arc::new(StubChainClient::new());
    let sink = Arc::new(CollectingSink::default());
    let (_shutdown, handle) = start_monitor(stub.clone(), sink.clone());

    stub.wait_subscribed(4).await;
    stub.fail(EventKind::MoneySent, "node went away");

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("monitor did not stop")
        .unwrap();
    match result {
        Err(WalletError::Subscription(msg)) => {
            assert!(msg.contains("MoneySent"), "{msg}");
            assert!(msg.contains("node went away"), "{msg}");
        }
        other => panic!("unexpected result {other:?}"),
    }

    for kind in EventKind::ALL {
        assert!(stub.feed_closed(kind), "{kind} subscription still open");
    }
    let late = stub
        .log_sender(EventKind::OwnershipTransferred)
        .send(log_of(
            &SharedWallet::OwnershipTransferred {
                previousOwner: Address::ZERO,
                newOwner: Address::repeat_byte(0x02),
            },
            9,
        ))
        .await;
    assert!(late.is_err());
    assert_eq!(sink.len(), 0);
}

#[tokio::test]
async fn undecodable_log_is_a_subscription_error() {
    let stub = Arc::new(StubChainClient::new());
    let sink = Arc::new(CollectingSink::default());
    let (_shutdown, handle) = start_monitor(stub.clone(), sink.clone());

    stub.wait_subscribed(4).await;
    // an OwnershipTransferred log delivered on the MoneySent subscription
    stub.log_sender(EventKind::MoneySent)
        .send(log_of(
            &SharedWallet::OwnershipTransferred {
                previousOwner: Address::ZERO,
                newOwner: Address::repeat_byte(0x03),
            },
            2,
        ))
        .await
        .unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("monitor did not stop")
        .unwrap();
    assert!(matches!(result, Err(WalletError::Subscription(_))));
    assert_eq!(sink.len(), 0);
}

#[tokio::test]
async fn refuses_address_without_code() {
    let stub = Arc::new(StubChainClient::new().without_code(common::contract_address()));
    let sink = Arc::new(CollectingSink::default());
    let (_shutdown, handle) = start_monitor(stub.clone(), sink);

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(WalletError::InvalidContractAddress(_))));
    assert_eq!(stub.subscribed(), 0);
}

#[tokio::test]
async fn failed_output_stops_monitoring() {
    let stub = Arc::new(StubChainClient::new());
    let (_shutdown, handle) = start_monitor(stub.clone(), Arc::new(ClosedSink));

    stub.wait_subscribed(4).await;
    stub.log_sender(EventKind::MoneySent)
        .send(log_of(
            &SharedWallet::MoneySent {
                beneficiary: Address::repeat_byte(0x04),
                amount: to_smallest_unit(1),
            },
            5,
        ))
        .await
        .unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("monitor did not stop")
        .unwrap();
    match result {
        Err(WalletError::Subscription(msg)) => assert!(msg.contains("MoneySent"), "{msg}"),
        other => panic!("unexpected result {other:?}"),
    }
    for kind in EventKind::ALL {
        assert!(stub.feed_closed(kind), "{kind} subscription still open");
    }
}
