//! Integration tests for the import pipeline.
//!
//! Runs the real client against an in-process axum registry bound to an
//! ephemeral port, so payloads are checked exactly as they go over the wire.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use meshport::cli::{cmd_model_import, csv_follow_up, import_model};
use meshport::client::RegistryClient;
use meshport::config::Config;
use meshport_core::{
    ImportError, ImportRequest, InputMode, Renderer, UploadType, decode_csv_data_uri, to_text,
};
use std::sync::{Arc, Mutex};

// =============================================================================
// FAKE REGISTRY
// =============================================================================

const KUBERNETES_REPLY: &str = r#"{
    "model_name": ["Kubernetes"],
    "entity_count": {"model_count": 1, "comp_count": 1},
    "err_msg": "Imported model Kubernetes",
    "entity_type_summary": {
        "successful_models": ["Kubernetes"],
        "successful_components": [{"DisplayName": "Pod", "Model": "Kubernetes", "Version": "v1"}]
    }
}"#;

const NOTHING_REGISTERED_REPLY: &str = r#"{
    "model_name": ["broken.yaml"],
    "entity_count": {"model_count": 1, "total_err_count": 1},
    "entity_type_summary": {
        "successful_models": [],
        "unsuccessful_entity_name_with_error": [{
            "name": ["broken.yaml"],
            "entityType": ["unknown"],
            "error": {"LongDescription": ["not a model definition"]}
        }]
    }
}"#;

/// A received request together with its `Authorization` header.
type Received = (Option<String>, ImportRequest);

#[derive(Clone)]
struct FakeRegistry {
    status: StatusCode,
    reply: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl FakeRegistry {
    fn requests(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn register(
    State(registry): State<FakeRegistry>,
    headers: HeaderMap,
    Json(request): Json<ImportRequest>,
) -> (StatusCode, String) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    registry.received.lock().unwrap().push((auth, request));
    (registry.status, registry.reply.clone())
}

/// Start a registry answering every registration with `status` and `reply`.
async fn spawn_registry(status: StatusCode, reply: &str) -> (String, FakeRegistry) {
    let registry = FakeRegistry {
        status,
        reply: reply.to_string(),
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api/meshmodels/register", post(register))
        .with_state(registry.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), registry)
}

fn write(path: &std::path::Path, contents: &[u8]) {
    std::fs::write(path, contents).unwrap();
}

// =============================================================================
// PAYLOADS ON THE WIRE
// =============================================================================

#[tokio::test]
async fn file_import_sends_base64_model_file() {
    let (base, registry) = spawn_registry(StatusCode::OK, KUBERNETES_REPLY).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.yaml");
    write(&path, b"name: kubernetes\nversion: v1.30.0\n");

    let client = RegistryClient::new(base, None);
    let outcome = import_model(&client, &path.to_string_lossy()).await.unwrap();
    assert!(matches!(outcome.mode, InputMode::File(_)));

    let requests = registry.requests();
    assert_eq!(requests.len(), 1);
    let (auth, request) = &requests[0];
    assert!(auth.is_none());
    assert_eq!(request.upload_type, UploadType::File);
    assert!(request.register);
    assert_eq!(request.import_body.file_name, "model.yaml");
    let sent = STANDARD
        .decode(request.import_body.model_file.as_deref().unwrap())
        .unwrap();
    assert_eq!(sent, b"name: kubernetes\nversion: v1.30.0\n");
    assert!(request.import_body.url.is_none());
    assert!(request.import_body.model_csv.is_none());

    let text = to_text(&Renderer::plain().render(&outcome.report));
    assert!(text.starts_with("SUMMARY: Imported model Kubernetes"));
    assert!(text.contains("MODEL: Kubernetes"));
}

#[tokio::test]
async fn directory_import_sends_named_tarball() {
    let (base, registry) = spawn_registry(StatusCode::OK, KUBERNETES_REPLY).await;
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("kubernetes");
    std::fs::create_dir(&model_dir).unwrap();
    write(&model_dir.join("model.json"), b"{\"name\":\"kubernetes\"}");

    let client = RegistryClient::new(base, None);
    import_model(&client, &model_dir.to_string_lossy())
        .await
        .unwrap();

    let (_, request) = &registry.requests()[0];
    assert_eq!(request.upload_type, UploadType::File);
    assert_eq!(request.import_body.file_name, "kubernetes.tar.gz");
    let sent = STANDARD
        .decode(request.import_body.model_file.as_deref().unwrap())
        .unwrap();
    assert_eq!(&sent[..2], &[0x1f, 0x8b]);
}

#[tokio::test]
async fn csv_import_sends_data_uris() {
    let (base, registry) = spawn_registry(StatusCode::OK, KUBERNETES_REPLY).await;
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("Models.csv"), b"model,version\nkubernetes,v1\n");
    write(&dir.path().join("Components.csv"), b"component\nPod\n");
    write(&dir.path().join("Relationships.csv"), b"");

    let client = RegistryClient::new(base, None);
    let outcome = import_model(&client, &dir.path().to_string_lossy())
        .await
        .unwrap();
    assert!(matches!(outcome.mode, InputMode::Csv(_)));

    let meshery = dir.path().join(".meshery");
    let follow_up = to_text(&csv_follow_up(&outcome.mode, Some(&meshery)));
    assert!(follow_up.contains(&format!(
        "Model can be accessed from {}",
        meshery.join("models").display()
    )));
    assert!(follow_up.contains(&format!(
        "Logs for the csv generation can be accessed {}",
        meshery.join("logs").join("registry").display()
    )));

    let (_, request) = &registry.requests()[0];
    assert_eq!(request.upload_type, UploadType::Csv);
    let body = &request.import_body;
    assert!(body.model_file.is_none());
    assert_eq!(
        decode_csv_data_uri(body.model_csv.as_deref().unwrap()).unwrap(),
        b"model,version\nkubernetes,v1\n"
    );
    assert_eq!(
        decode_csv_data_uri(body.component_csv.as_deref().unwrap()).unwrap(),
        b"component\nPod\n"
    );
    assert!(
        decode_csv_data_uri(body.relationship_csv.as_deref().unwrap())
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn url_import_sends_only_the_url() {
    let (base, registry) = spawn_registry(StatusCode::OK, KUBERNETES_REPLY).await;

    let client = RegistryClient::new(base, None);
    let outcome = import_model(&client, "https://example.com/models/kubernetes.tar")
        .await
        .unwrap();
    assert!(matches!(outcome.mode, InputMode::Url(_)));

    let (_, request) = &registry.requests()[0];
    assert_eq!(request.upload_type, UploadType::UrlImport);
    assert_eq!(
        request.import_body.url.as_deref(),
        Some("https://example.com/models/kubernetes.tar")
    );
    assert!(request.import_body.model_file.is_none());
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let (base, registry) = spawn_registry(StatusCode::OK, KUBERNETES_REPLY).await;

    let client = RegistryClient::new(base, Some("s3cret".to_string()));
    import_model(&client, "https://example.com/model.tar")
        .await
        .unwrap();

    let (auth, _) = &registry.requests()[0];
    assert_eq!(auth.as_deref(), Some("Bearer s3cret"));
}

// =============================================================================
// FAILURES
// =============================================================================

#[tokio::test]
async fn non_ok_status_is_request_error() {
    let (base, _registry) = spawn_registry(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;

    let client = RegistryClient::new(base, None);
    let result = import_model(&client, "https://example.com/model.tar").await;
    match result {
        Err(ImportError::Request { url, reason }) => {
            assert!(url.ends_with("/api/meshmodels/register"));
            assert!(reason.contains("500"));
            assert!(reason.contains("boom"));
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_reply_is_decode_error() {
    let (base, _registry) = spawn_registry(StatusCode::OK, "<html>oops</html>").await;

    let client = RegistryClient::new(base, None);
    let result = import_model(&client, "https://example.com/model.tar").await;
    assert!(matches!(result, Err(ImportError::Decode { .. })));
}

#[tokio::test]
async fn missing_path_fails_before_any_request() {
    let (base, registry) = spawn_registry(StatusCode::OK, KUBERNETES_REPLY).await;
    let dir = tempfile::tempdir().unwrap();

    let client = RegistryClient::new(base, None);
    let result = import_model(&client, &dir.path().join("absent.yaml").to_string_lossy()).await;
    assert!(matches!(result, Err(ImportError::FolderStat { .. })));
    assert!(registry.requests().is_empty());
}

#[tokio::test]
async fn incomplete_csv_set_fails_before_any_request() {
    let (base, registry) = spawn_registry(StatusCode::OK, KUBERNETES_REPLY).await;
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("models.csv"), b"model\n");

    let client = RegistryClient::new(base, None);
    let result = import_model(&client, &dir.path().to_string_lossy()).await;
    let err = result.unwrap_err();
    assert!(matches!(err, ImportError::CsvLocation { .. }));
    assert!(err.hints().is_some());
    assert!(registry.requests().is_empty());
}

#[tokio::test]
async fn nothing_registered_fails_the_command() {
    let (base, registry) = spawn_registry(StatusCode::OK, NOTHING_REGISTERED_REPLY).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    write(&path, b"not: a model\n");

    let config = Config::default().with_overrides(Some(base), None);
    let result = cmd_model_import(&config, &path.to_string_lossy(), Renderer::plain()).await;
    assert!(matches!(result, Err(ImportError::NoModelRegistered)));
    assert_eq!(registry.requests().len(), 1);
}

#[tokio::test]
async fn registered_import_succeeds() {
    let (base, _registry) = spawn_registry(StatusCode::OK, KUBERNETES_REPLY).await;

    let config = Config::default().with_overrides(Some(base), None);
    let result = cmd_model_import(&config, "https://example.com/model.tar", Renderer::plain()).await;
    assert!(result.is_ok());
}
