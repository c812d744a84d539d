mod helpers;

use ferrous_probe_application::ports::{DnsExchangePort, ExchangeRequest};
use ferrous_probe_domain::{DnsTarget, DomainError, RecordType};
use ferrous_probe_infrastructure::TransportExchanger;
use helpers::{MockBehavior, MockDnsServer};
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::RData;
use std::sync::Arc;
use std::time::Duration;

fn request(target: &str, record_type: RecordType, timeout: Duration) -> ExchangeRequest {
    ExchangeRequest {
        target: target.parse::<DnsTarget>().unwrap(),
        domain: Arc::from("example.com"),
        record_type,
        tls_insecure: false,
        timeout,
    }
}

#[tokio::test]
async fn test_udp_exchange_returns_answer() {
    let server = MockDnsServer::start(MockBehavior::Answer).await.unwrap();

    let message = TransportExchanger::new()
        .exchange(&request(&server.udp_target(), RecordType::A, Duration::from_secs(2)))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(message.response_code(), ResponseCode::NoError);
    assert_eq!(message.answers().len(), 1);
    match message.answers()[0].data() {
        RData::A(a) => assert_eq!(a.0, helpers::dns_server_mock_answer()),
        other => panic!("unexpected rdata {:?}", other),
    }
    assert_eq!(server.udp_queries(), 1);
    assert_eq!(server.tcp_queries(), 0);
}

#[tokio::test]
async fn test_tcp_exchange_returns_answer() {
    let server = MockDnsServer::start(MockBehavior::Answer).await.unwrap();

    let message = TransportExchanger::new()
        .exchange(&request(&server.tcp_target(), RecordType::A, Duration::from_secs(2)))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(message.answers().len(), 1);
    assert_eq!(server.tcp_queries(), 1);
    assert_eq!(server.udp_queries(), 0);
}

#[tokio::test]
async fn test_nxdomain_is_a_response() {
    let server = MockDnsServer::start(MockBehavior::NxDomain).await.unwrap();

    let message = TransportExchanger::new()
        .exchange(&request(&server.udp_target(), RecordType::A, Duration::from_secs(2)))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(message.response_code(), ResponseCode::NXDomain);
    assert!(message.answers().is_empty());
}

#[tokio::test]
async fn test_truncated_udp_falls_back_to_tcp() {
    let server = MockDnsServer::start(MockBehavior::Truncate).await.unwrap();

    let message = TransportExchanger::new()
        .exchange(&request(&server.udp_target(), RecordType::A, Duration::from_secs(2)))
        .await
        .unwrap()
        .unwrap();

    assert!(!message.truncated());
    assert_eq!(message.answers().len(), 1);
    assert_eq!(server.udp_queries(), 1);
    assert_eq!(server.tcp_queries(), 1);
}

#[tokio::test]
async fn test_mismatched_id_is_rejected() {
    let server = MockDnsServer::start(MockBehavior::WrongId).await.unwrap();

    let err = TransportExchanger::new()
        .exchange(&request(&server.udp_target(), RecordType::A, Duration::from_secs(2)))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidDnsResponse(_)));
}

#[tokio::test]
async fn test_garbage_is_rejected() {
    let server = MockDnsServer::start(MockBehavior::Garbage).await.unwrap();

    let err = TransportExchanger::new()
        .exchange(&request(&server.udp_target(), RecordType::A, Duration::from_secs(2)))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidDnsResponse(_)));
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let server = MockDnsServer::start(MockBehavior::Silent).await.unwrap();

    let err = TransportExchanger::new()
        .exchange(&request(&server.udp_target(), RecordType::A, Duration::from_millis(100)))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::TransportTimeout { .. }));
    assert!(err.is_transport_error());
}
