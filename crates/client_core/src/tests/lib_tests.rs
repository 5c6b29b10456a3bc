use super::*;
use std::sync::Arc;

use anyhow::Result as TestResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct BackendState {
    sent: Arc<Mutex<Vec<Value>>>,
    requested_ids: Arc<Mutex<Vec<String>>>,
    records: Arc<Mutex<Vec<EmailTrackingEntity>>>,
    fail_list_with: Arc<Mutex<Option<(StatusCode, Value)>>>,
}

fn entity(tracking_id: &str, open_count: i64) -> EmailTrackingEntity {
    EmailTrackingEntity {
        tracking_id: tracking_id.to_string(),
        recipient_email: "test@example.com".to_string(),
        batch_id: "BATCH-XYZ".to_string(),
        sent_timestamp: Some("2025-10-24T10:00:00Z".to_string()),
        open_count,
        first_open_timestamp: Some("2025-10-24T11:00:00Z".to_string()),
        last_open_timestamp: Some("2025-10-24T12:00:00Z".to_string()),
        client_user_agent: Some("MockAgent".to_string()),
        client_browser: Some("Chrome".to_string()),
        client_device: Some("Desktop".to_string()),
        client_ip_address: Some("192.168.1.1".to_string()),
        client_city: Some("MockCity".to_string()),
        client_country: Some("MC".to_string()),
    }
}

async fn handle_send(
    State(state): State<BackendState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let recipient = payload["message"]["toRecipients"][0]["emailAddress"]["address"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    state.sent.lock().await.push(payload);

    if recipient == "reject@example.com" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Recipient rejected", "error": "Bad Request" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "SUCCESS",
            "message": "Email sent successfully via SMTP.",
            "messageId": "TEST-MSG-ID"
        })),
    )
}

async fn handle_status(
    State(state): State<BackendState>,
    Path(tracking_id): Path<String>,
) -> (StatusCode, String) {
    state.requested_ids.lock().await.push(tracking_id.clone());

    match tracking_id.as_str() {
        "broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "message": "database unavailable" }).to_string(),
        ),
        "garbled" => (StatusCode::OK, "not json".to_string()),
        _ => {
            let records = state.records.lock().await;
            match records.iter().find(|record| record.tracking_id == tracking_id) {
                Some(record) => (
                    StatusCode::OK,
                    serde_json::to_string(record).expect("encode record"),
                ),
                None => (StatusCode::NOT_FOUND, String::new()),
            }
        }
    }
}

async fn handle_all(State(state): State<BackendState>) -> (StatusCode, Json<Value>) {
    if let Some((status, body)) = state.fail_list_with.lock().await.clone() {
        return (status, Json(body));
    }
    let records = state.records.lock().await.clone();
    (
        StatusCode::OK,
        Json(serde_json::to_value(records).expect("encode records")),
    )
}

async fn spawn_backend() -> TestResult<(TrackingClient, BackendState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = BackendState::default();
    let app = Router::new()
        .route("/api/mail/send", post(handle_send))
        .route("/api/mail/track/status/:tracking_id", get(handle_status))
        .route("/api/mail/track/all", get(handle_all))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let client = TrackingClient::new(&format!("http://{addr}/api/mail"))?;
    Ok((client, state))
}

#[test]
fn wraps_content_with_trailing_tracking_pixel() {
    assert_eq!(
        wrap_with_tracking_pixel("hello"),
        r#"<html><body>hello<img src="cid:pixel" /></body></html>"#
    );
}

#[test]
fn mail_request_enables_tracking_and_single_recipient() {
    let request = build_mail_request("a@b.com", "Hi", "hello", MailProtocol::Smtp);
    assert!(request.request_pixel_tracking);
    assert!(request.save_to_sent_items);
    assert_eq!(request.tracking_id, None);
    assert_eq!(request.preferred_protocol, MailProtocol::Smtp);
    assert_eq!(request.message.body.content_type, ContentType::Html);
    assert_eq!(request.message.to_recipients.len(), 1);
    assert_eq!(
        request.message.to_recipients[0].email_address.name.as_deref(),
        Some("")
    );
}

#[test]
fn rejects_unusable_base_urls() {
    assert!(matches!(
        TrackingClient::new("not a url"),
        Err(TrackingError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        TrackingClient::new("mailto:ops@example.com"),
        Err(TrackingError::OpaqueBaseUrl(_))
    ));
}

#[test]
fn endpoints_extend_base_path() {
    let client = TrackingClient::new("http://localhost:8080/api/mail/").expect("client");
    assert_eq!(
        client.endpoint(&["track", "all"]).as_str(),
        "http://localhost:8080/api/mail/track/all"
    );
    assert_eq!(
        client.endpoint(&["track", "status", "a/b c"]).as_str(),
        "http://localhost:8080/api/mail/track/status/a%2Fb%20c"
    );
}

#[tokio::test]
async fn send_email_posts_wrapped_body_and_protocol() {
    let (client, state) = spawn_backend().await.expect("spawn backend");

    let response = client
        .send_email("a@b.com", "Hi", "hello", MailProtocol::Smtp)
        .await
        .expect("send");

    assert!(response.is_success());
    assert_eq!(response.message_id.as_deref(), Some("TEST-MSG-ID"));

    let sent = state.sent.lock().await.clone();
    assert_eq!(sent.len(), 1);
    let payload = &sent[0];
    assert_eq!(
        payload["message"]["body"]["content"],
        r#"<html><body>hello<img src="cid:pixel" /></body></html>"#
    );
    assert_eq!(payload["message"]["subject"], "Hi");
    assert_eq!(payload["preferredProtocol"], "SMTP");
    assert_eq!(payload["requestPixelTracking"], true);
    assert_eq!(payload["saveToSentItems"], true);
    assert_eq!(
        payload["message"]["toRecipients"][0]["emailAddress"]["address"],
        "a@b.com"
    );
}

#[tokio::test]
async fn send_email_passes_msgraph_protocol_through() {
    let (client, state) = spawn_backend().await.expect("spawn backend");

    client
        .send_email("test@user.com", "Test Subject", "MSGRAPH test body.", MailProtocol::MsGraph)
        .await
        .expect("send");

    let sent = state.sent.lock().await.clone();
    assert_eq!(sent[0]["preferredProtocol"], "MSGRAPH");
}

#[tokio::test]
async fn send_email_surfaces_server_message_on_rejection() {
    let (client, _state) = spawn_backend().await.expect("spawn backend");

    let err = client
        .send_email("reject@example.com", "Hi", "hello", MailProtocol::Smtp)
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.server_message(), Some("Recipient rejected"));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn get_tracking_status_returns_entity() {
    let (client, state) = spawn_backend().await.expect("spawn backend");
    state.records.lock().await.push(entity("ID-TEST-001", 5));

    let found = client
        .get_tracking_status("ID-TEST-001")
        .await
        .expect("status");

    assert_eq!(found, entity("ID-TEST-001", 5));
}

#[tokio::test]
async fn get_tracking_status_distinguishes_not_found() {
    let (client, _state) = spawn_backend().await.expect("spawn backend");

    let err = client
        .get_tracking_status("missing")
        .await
        .expect_err("must fail");

    assert!(err.is_not_found());
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn get_tracking_status_reports_server_errors() {
    let (client, _state) = spawn_backend().await.expect("spawn backend");

    let err = client
        .get_tracking_status("broken")
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.server_message(), Some("database unavailable"));
    assert!(err.to_string().contains("database unavailable"));
}

#[tokio::test]
async fn get_tracking_status_rejects_malformed_success_body() {
    let (client, _state) = spawn_backend().await.expect("spawn backend");

    let err = client
        .get_tracking_status("garbled")
        .await
        .expect_err("must fail");

    assert!(matches!(err, TrackingError::Decode(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn tracking_id_travels_as_single_path_segment() {
    let (client, state) = spawn_backend().await.expect("spawn backend");

    let _ = client.get_tracking_status("a/b c").await;

    let requested = state.requested_ids.lock().await.clone();
    assert_eq!(requested, vec!["a/b c".to_string()]);
}

#[tokio::test]
async fn get_all_tracking_status_returns_records() {
    let (client, state) = spawn_backend().await.expect("spawn backend");
    state.records.lock().await.push(entity("ID-456", 5));

    let records = client.get_all_tracking_status().await.expect("all");

    assert_eq!(records, vec![entity("ID-456", 5)]);
}

#[tokio::test]
async fn get_all_tracking_status_accepts_empty_list() {
    let (client, _state) = spawn_backend().await.expect("spawn backend");

    let records = client.get_all_tracking_status().await.expect("all");

    assert!(records.is_empty());
}

#[tokio::test]
async fn get_all_tracking_status_reports_failures() {
    let (client, state) = spawn_backend().await.expect("spawn backend");
    *state.fail_list_with.lock().await = Some((
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "message": "maintenance window" }),
    ));

    let err = client
        .get_all_tracking_status()
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(err.server_message(), Some("maintenance window"));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = TrackingClient::new(&format!("http://{addr}/api/mail")).expect("client");
    let err = client
        .get_all_tracking_status()
        .await
        .expect_err("must fail");

    assert!(matches!(err, TrackingError::Transport(_)));
    assert_eq!(err.status(), None);
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn dot_only_tracking_ids_are_rejected_before_sending() {
    let (client, state) = spawn_backend().await.expect("spawn backend");

    for tracking_id in [".", ".."] {
        let err = client
            .get_tracking_status(tracking_id)
            .await
            .expect_err("must fail");
        assert!(matches!(err, TrackingError::UnroutableTrackingId(ref id) if id == tracking_id));
        assert_eq!(err.status(), None);
    }

    assert!(state.requested_ids.lock().await.is_empty());
}

#[tokio::test]
async fn truncated_error_body_still_reports_status() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        let _ = socket
            .write_all(
                b"HTTP/1.1 500 Internal Server Error\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{\"message\":",
            )
            .await;
        let _ = socket.shutdown().await;
    });

    let client = TrackingClient::new(&format!("http://{addr}/api/mail")).expect("client");
    let err = client
        .get_all_tracking_status()
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.server_message(), None);
}
