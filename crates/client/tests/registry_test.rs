//! Tests for client caching and per-call option composition.
//!
//! # Test Strategy
//!
//! 1. **Caching**: one client per identity, shared across tasks and per-call options
//! 2. **Failures**: configuration, identity and connection errors, retry after failure
//! 3. **Targeting**: endpoints, org filters and timeouts reaching the transport

mod common;

use client::{CallOptions, ClientError, ClientRegistry, ConnectorSpec, TransactionDispatcher, TransactionRequest};
use common::{MemoryConnector, CHAINCODE, CHANNEL};
use corelib::Identity;
use std::sync::Arc;
use std::time::Duration;
use targeting::Targets;

fn spec(user: &str) -> ConnectorSpec {
    ConnectorSpec::new("test-network", Identity::parse(user), CHANNEL)
}

// ============================================================================
// Caching Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_get_or_create_builds_once() {
    // Test that 16 concurrent callers for one identity share a single build
    let (registry, connector) = common::registry();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.get_or_create(&spec("User1@org1")).await })
        })
        .collect();

    let mut clients = Vec::new();
    for handle in handles {
        clients.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(connector.sessions(), 1);
    assert_eq!(registry.len(), 1);
    for client in &clients[1..] {
        assert!(Arc::ptr_eq(&clients[0], client));
    }
}

#[tokio::test]
async fn test_per_call_fields_do_not_split_cache() {
    // Test that timeout and endpoints never create a second client, the org flag does
    let (registry, connector) = common::registry();

    let first = registry.get_or_create(&spec("User1")).await.unwrap();
    let second = registry
        .get_or_create(
            &spec("User1")
                .with_timeout_millis(2000)
                .with_endpoints(vec!["peer0.org2.example.com".into()]),
        )
        .await
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let org_only = registry
        .get_or_create(&spec("User1").with_user_org_only(true))
        .await
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &org_only));
    assert!(first.filter().is_none());
    assert!(org_only.filter().is_some());

    assert_eq!(connector.sessions(), 2);
    assert!(registry.get(&spec("User1").key()).is_some());
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_uninitialized_network_is_a_configuration_error() {
    // Test that requests before initialization never reach the connector
    let connector = Arc::new(MemoryConnector::default());
    let registry = ClientRegistry::new(connector.clone());

    let err = registry.get_or_create(&spec("User1")).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Configuration(corelib::Error::Uninitialized)
    ));
    assert_eq!(connector.sessions(), 0);
}

#[tokio::test]
async fn test_empty_user_is_an_identity_error() {
    // Test that a blank user name is rejected before connecting
    let (registry, connector) = common::registry();

    let err = registry.get_or_create(&spec("  @org1")).await.unwrap_err();
    assert!(matches!(err, ClientError::Identity(_)));
    assert_eq!(err.to_string(), "user name is not specified");
    assert_eq!(connector.sessions(), 0);
}

#[tokio::test]
async fn test_failed_session_can_be_retried() {
    // Test that a refused session is attempted again on the next call
    let (registry, connector) = common::registry();

    for _ in 0..2 {
        let err = registry.get_or_create(&spec("Unknown")).await.unwrap_err();
        assert!(matches!(err, ClientError::Connection { .. }));
    }
    assert_eq!(connector.sessions(), 2);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_unknown_channel_is_a_connection_error() {
    // Test that binding an unknown channel names the channel in the error
    let (registry, _connector) = common::registry();

    let spec = ConnectorSpec::new("test-network", Identity::parse("User1"), "otherchannel");
    let err = registry.get_or_create(&spec).await.unwrap_err();
    assert!(err.to_string().contains("otherchannel"));
}

// ============================================================================
// Targeting Tests
// ============================================================================

#[tokio::test]
async fn test_explicit_endpoint_beats_org_filter() {
    // Test that named endpoints override the cached org filter
    let (registry, connector) = common::registry();
    let dispatcher = TransactionDispatcher::default();
    let spec = spec("User1@org2")
        .with_user_org_only(true)
        .with_endpoints(vec!["peer0.org1.example.com".into()]);
    let client = registry.get_or_create(&spec).await.unwrap();

    let options = dispatcher.request_options(&client, &spec.call_options());
    assert_eq!(options.targets.endpoints().unwrap(), ["peer0.org1.example.com".to_string()]);

    let request = TransactionRequest::new(CHAINCODE, "InitLedger");
    let result = dispatcher.invoke(&client, &request, &spec.call_options()).await;
    assert!(result.is_success());
    assert_eq!(connector.calls()[0].peers, ["peer0.org1.example.com"]);
}

#[tokio::test]
async fn test_org_filter_applies_without_endpoints() {
    // Test that the org filter alone narrows the call to that org's peers
    let (registry, connector) = common::registry();
    let dispatcher = TransactionDispatcher::default();
    let spec = spec("User1@org2").with_user_org_only(true);
    let client = registry.get_or_create(&spec).await.unwrap();

    let options = dispatcher.request_options(&client, &spec.call_options());
    assert!(matches!(options.targets, Targets::Filter(_)));
    assert_eq!(options.timeout, None);

    let request = TransactionRequest::new(CHAINCODE, "InitLedger");
    dispatcher.invoke(&client, &request, &spec.call_options()).await;
    assert_eq!(connector.calls()[0].peers, ["peer0.org2.example.com"]);
}

#[tokio::test]
async fn test_unrestricted_call_with_timeout() {
    // Test that an open call carries its timeout and the default retry policy
    let (registry, connector) = common::registry();
    let dispatcher = TransactionDispatcher::default();
    let client = registry.get_or_create(&spec("User1")).await.unwrap();

    let call = CallOptions {
        timeout_millis: 1500,
        endpoints: Vec::new(),
    };
    let request = TransactionRequest::new(CHAINCODE, "InitLedger");
    dispatcher.invoke(&client, &request, &call).await;

    let recorded = &connector.calls()[0];
    assert!(!recorded.options.targets.is_restricted());
    assert_eq!(recorded.options.timeout, Some(Duration::from_millis(1500)));
    assert_eq!(recorded.options.retry.attempts, 5);
    assert_eq!(recorded.peers.len(), 2);
}

#[tokio::test]
async fn test_transport_failure_reports_sentinel_status() {
    // Test that a transport error becomes a failed result with the sentinel status
    let (registry, _connector) = common::registry();
    let dispatcher = TransactionDispatcher::default();
    let client = registry.get_or_create(&spec("User1")).await.unwrap();

    let call = CallOptions {
        timeout_millis: 0,
        endpoints: vec!["peer9.example.com:7051".into()],
    };
    let request = TransactionRequest::new(CHAINCODE, "ReadAsset").with_args(["asset1"]);
    let result = dispatcher.query(&client, &request, &call).await;
    assert_eq!(result.status, client::FAILURE_STATUS);
    assert!(result.payload.is_empty());
    assert!(matches!(result.error, Some(ClientError::Transaction { .. })));
}
