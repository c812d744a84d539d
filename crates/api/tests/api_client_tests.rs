mod helpers;

use ferrous_probe_api::dto::{DnsLookupRequest, ReverseLookupRequest};
use ferrous_probe_api::{ApiClient, ClientError};
use ferrous_probe_domain::{DnsServer, TaskState};
use helpers::{create_test_app, default_targets};
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let app = create_test_app(default_targets());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn poll(client: &ApiClient, task_id: &str) -> ferrous_probe_api::dto::TaskStatusResponse {
    for _ in 0..100 {
        let status = client.get_task_status(task_id).await.unwrap();
        if status.task_status.is_terminal() {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task {} never completed", task_id);
}

#[tokio::test]
async fn test_client_submits_and_polls() {
    let base = spawn_server().await;
    let client = ApiClient::new(&base, Duration::from_secs(5), false).unwrap();

    let task_id = client
        .enqueue_lookup(&DnsLookupRequest {
            domain: "example.com".to_string(),
            qtype: "A".to_string(),
            dns_servers: vec![DnsServer::new("tcp://1.0.0.1")],
            tls_insecure_skip_verify: false,
        })
        .await
        .unwrap();
    assert_eq!(task_id.len(), 32);

    let status = poll(&client, &task_id).await;
    assert_eq!(status.task_status, TaskState::Success);
    let result = status.task_result.unwrap();
    assert_eq!(result.succeeded(), 1);
    assert!(result.details.contains_key("tcp://1.0.0.1:53"));
}

#[tokio::test]
async fn test_client_reverse_lookup() {
    let base = spawn_server().await;
    let client = ApiClient::new(&base, Duration::from_secs(5), false).unwrap();

    let task_id = client
        .enqueue_reverse_lookup(&ReverseLookupRequest {
            reverse_ip: "1.2.3.4".to_string(),
            dns_servers: vec![],
            tls_insecure_skip_verify: false,
        })
        .await
        .unwrap();

    let status = poll(&client, &task_id).await;
    let outcome = &status.task_result.unwrap().details["udp://9.9.9.9:53"];
    assert_eq!(outcome.name.as_deref(), Some("4.3.2.1.in-addr.arpa"));
}

#[tokio::test]
async fn test_client_surfaces_api_errors() {
    let base = spawn_server().await;
    let client = ApiClient::new(&base, Duration::from_secs(5), false).unwrap();

    let err = client.get_task_status("missing").await.unwrap_err();
    match err {
        ClientError::Api { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("task not found"));
        }
        other => panic!("unexpected error: {}", other),
    }

    let err = client
        .enqueue_lookup(&DnsLookupRequest {
            domain: "example.com".to_string(),
            qtype: "NOPE".to_string(),
            dns_servers: vec![],
            tls_insecure_skip_verify: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 400, .. }));
}

#[tokio::test]
async fn test_client_reports_unreachable_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{}", addr), Duration::from_secs(2), false).unwrap();
    let err = client.get_task_status("abc").await.unwrap_err();
    assert!(matches!(err, ClientError::Http { .. }));
}
