mod common;

use std::time::Duration;

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use geolens_core::file::SelectedFile;
use geolens_core::upload::{
    AnalysisClient, AnalysisError, HttpAnalysisClient, SessionState, UploadSession,
};
use serde_json::{json, Value};

use common::{image_file, RecordingReporter};

/// Echoes what it received in the `file_info` section.
async fn echo_upload(mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let format = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap();
        return (
            StatusCode::OK,
            Json(json!({
                "file_info": {"filename": filename, "size": [bytes.len(), 1], "format": format},
                "detections": {"summary": {"ship": 1}}
            })),
        );
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "No file part in the request"})),
    )
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/upload")
}

fn client(endpoint: &str) -> HttpAnalysisClient {
    HttpAnalysisClient::new(endpoint, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_multipart_upload_round_trip() {
    let endpoint = spawn_server(Router::new().route("/upload", post(echo_upload))).await;

    let result = client(&endpoint).submit(&image_file()).await.unwrap();

    let info = result.file_info.unwrap();
    assert_eq!(info.filename.as_deref(), Some("harbor.png"));
    assert_eq!(info.format.as_deref(), Some("image/png"));
    assert_eq!(info.size, Some([4, 1]));
    assert_eq!(result.detections.unwrap().summary.unwrap().total(), 1);
}

#[tokio::test]
async fn test_path_backed_file_is_read() {
    let endpoint = spawn_server(Router::new().route("/upload", post(echo_upload))).await;
    let (_dir, path) = common::write_temp("scene.tiff", &common::sample_geotiff());
    let file = SelectedFile::from_path(&path).unwrap();

    let result = client(&endpoint).submit(&file).await.unwrap();
    let info = result.file_info.unwrap();
    assert_eq!(info.format.as_deref(), Some("image/tiff"));
    assert_eq!(info.size.unwrap()[0], common::sample_geotiff().len() as u64);
}

#[tokio::test]
async fn test_server_error_message_is_surfaced() {
    let router = Router::new().route(
        "/upload",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "model crashed"})),
            )
        }),
    );
    let endpoint = spawn_server(router).await;

    let err = client(&endpoint).submit(&image_file()).await.unwrap_err();
    match err {
        AnalysisError::Status { status, ref message } => {
            assert_eq!(status, 500);
            assert_eq!(message.as_deref(), Some("model crashed"));
        }
        ref other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.report_message(), "model crashed");
}

#[tokio::test]
async fn test_non_json_success_is_malformed() {
    let router = Router::new().route("/upload", post(|| async { "ok" }));
    let endpoint = spawn_server(router).await;

    let err = client(&endpoint).submit(&image_file()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Malformed(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/upload"))
        .submit(&image_file())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Transport(_)));
}

#[tokio::test]
async fn test_request_timeout() {
    let router = Router::new().route(
        "/upload",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({}))
        }),
    );
    let endpoint = spawn_server(router).await;
    let slow = HttpAnalysisClient::new(&endpoint, Duration::from_millis(200)).unwrap();

    match slow.submit(&image_file()).await {
        Err(AnalysisError::Transport(e)) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_session_over_http_reports_failure() {
    let router = Router::new().route(
        "/upload",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "No selected file"})),
            )
        }),
    );
    let endpoint = spawn_server(router).await;
    let reporter = RecordingReporter::default();
    let mut session = UploadSession::default();

    session
        .run(&client(&endpoint), &image_file(), &reporter)
        .await;

    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(session.progress(), 100);
    assert_eq!(
        session.result().and_then(|r| r.error.as_deref()),
        Some("No selected file")
    );
    assert_eq!(reporter.values().last(), Some(&100));
}
