use super::*;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use shared::error::{ErrorKind, FALLBACK_FAILURE_MESSAGE};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: String,
    delay: Duration,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn handle_deploy(
    State(state): State<ServerState>,
    Json(payload): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.received.lock().await.push(payload);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

async fn spawn_deploy_server_with_delay(
    status: StatusCode,
    body: impl Into<String>,
    delay: Duration,
) -> std::io::Result<(String, Arc<Mutex<Vec<Value>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        status,
        body: body.into(),
        delay,
        received: Arc::clone(&received),
    };
    let app = Router::new()
        .route("/deploy", post(handle_deploy))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/deploy"), received))
}

async fn spawn_deploy_server(
    status: StatusCode,
    body: impl Into<String>,
) -> std::io::Result<(String, Arc<Mutex<Vec<Value>>>)> {
    spawn_deploy_server_with_delay(status, body, Duration::ZERO).await
}

async fn deploy_once(endpoint: &str) -> Result<DeploymentResult, SubmissionError> {
    HttpDeploymentService::new(endpoint)
        .deploy(&DeployRequest::new("https://github.com/acme/site"))
        .await
}

#[tokio::test]
async fn successful_deploy_drives_controller_to_succeeded() {
    let (endpoint, received) = spawn_deploy_server(
        StatusCode::OK,
        json!({
            "repo": "acme/site",
            "public_url": "https://acme-site.example",
            "buildResult": {"status": "ok"},
        })
        .to_string(),
    )
    .await
    .expect("spawn server");

    let service = HttpDeploymentService::new(endpoint);
    let mut controller = SubmissionController::new();
    let state = controller
        .submit(&service, "https://github.com/acme/site")
        .await
        .clone();

    assert_eq!(
        state,
        SubmissionState::Succeeded(DeploymentResult {
            repository_id: "acme/site".into(),
            deployment_url: "https://acme-site.example".into(),
            build_metadata: json!({"status": "ok"}),
        })
    );
    assert_eq!(
        *received.lock().await,
        vec![json!({"url": "https://github.com/acme/site"})]
    );
}

#[tokio::test]
async fn extra_response_fields_are_ignored() {
    let (endpoint, _received) = spawn_deploy_server(
        StatusCode::CREATED,
        json!({
            "message": "App deployed successfully",
            "repo": "site",
            "public_url": "https://abc123.ngrok.example",
            "buildResult": {"message": "Build completed and uploaded successfully", "status": "success"},
            "timestamp": "2024-01-01T00:00:00Z",
        })
        .to_string(),
    )
    .await
    .expect("spawn server");

    let result = deploy_once(&endpoint).await.expect("deployment");
    assert_eq!(result.repository_id, "site");
    assert_eq!(result.deployment_url, "https://abc123.ngrok.example");
    assert_eq!(result.build_metadata["status"], "success");
}

#[tokio::test]
async fn server_error_without_message_uses_fallback() {
    let (endpoint, _received) = spawn_deploy_server(StatusCode::INTERNAL_SERVER_ERROR, "{}")
        .await
        .expect("spawn server");

    let service = HttpDeploymentService::new(endpoint);
    let mut controller = SubmissionController::new();
    let state = controller.submit(&service, "https://github.com/acme/site").await;

    assert_eq!(
        state,
        &SubmissionState::Failed(SubmissionError::new(
            ErrorKind::Service,
            FALLBACK_FAILURE_MESSAGE
        ))
    );
}

#[tokio::test]
async fn service_error_text_is_surfaced() {
    let (endpoint, _received) = spawn_deploy_server(
        StatusCode::BAD_REQUEST,
        json!({"error": "URL must be a valid GitHub repository URL"}).to_string(),
    )
    .await
    .expect("spawn server");

    let err = deploy_once(&endpoint).await.expect_err("rejected");
    assert_eq!(err.kind, ErrorKind::Service);
    assert_eq!(err.message, "URL must be a valid GitHub repository URL");
}

#[tokio::test]
async fn non_json_error_body_uses_fallback() {
    let (endpoint, _received) =
        spawn_deploy_server(StatusCode::BAD_GATEWAY, "<html>502 Bad Gateway</html>")
            .await
            .expect("spawn server");

    let err = deploy_once(&endpoint).await.expect_err("bad gateway");
    assert_eq!(err.kind, ErrorKind::Service);
    assert_eq!(err.message, FALLBACK_FAILURE_MESSAGE);
}

#[tokio::test]
async fn success_missing_public_url_is_protocol_error() {
    let (endpoint, _received) = spawn_deploy_server(
        StatusCode::OK,
        json!({"repo": "acme/site", "buildResult": {}}).to_string(),
    )
    .await
    .expect("spawn server");

    let service = HttpDeploymentService::new(endpoint);
    let mut controller = SubmissionController::new();
    let state = controller.submit(&service, "https://github.com/acme/site").await;

    let error = state.error().expect("failed state");
    assert_eq!(error.kind, ErrorKind::Protocol);
    assert!(error.message.contains("public_url"), "unexpected: {}", error.message);
}

#[tokio::test]
async fn success_with_unparseable_body_is_protocol_error() {
    let (endpoint, _received) = spawn_deploy_server(StatusCode::OK, "deployed!")
        .await
        .expect("spawn server");

    let err = deploy_once(&endpoint).await.expect_err("not json");
    assert_eq!(err.kind, ErrorKind::Protocol);
}

#[tokio::test]
async fn unreachable_service_is_transport_error_with_fallback() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let service = HttpDeploymentService::new(format!("http://{addr}/deploy"));
    let mut controller = SubmissionController::new();
    let state = controller.submit(&service, "https://github.com/acme/site").await;

    assert_eq!(state, &SubmissionState::Failed(SubmissionError::transport()));
    assert_eq!(state.error_message(), Some(FALLBACK_FAILURE_MESSAGE));
}

#[tokio::test]
async fn configured_timeout_applies_at_transport() {
    let (endpoint, received) = spawn_deploy_server_with_delay(
        StatusCode::OK,
        json!({"repo": "r", "public_url": "u", "buildResult": {}}).to_string(),
        Duration::from_secs(5),
    )
    .await
    .expect("spawn server");

    let settings = ClientSettings {
        endpoint,
        request_timeout: Some(Duration::from_millis(200)),
    };
    let service = HttpDeploymentService::from_settings(&settings).expect("client");
    let err = service
        .deploy(&DeployRequest::new("https://github.com/acme/site"))
        .await
        .expect_err("timed out");

    assert_eq!(err.kind, ErrorKind::Transport);
    assert_eq!(received.lock().await.len(), 1);
}

#[test]
fn from_settings_rejects_invalid_endpoint() {
    let settings = ClientSettings {
        endpoint: "ftp://deploy.example".into(),
        request_timeout: None,
    };
    assert!(matches!(
        HttpDeploymentService::from_settings(&settings),
        Err(SettingsError::InvalidEndpoint { .. })
    ));

    let service = HttpDeploymentService::from_settings(&ClientSettings::default())
        .expect("default settings");
    assert_eq!(service.endpoint(), DEFAULT_ENDPOINT);
}
