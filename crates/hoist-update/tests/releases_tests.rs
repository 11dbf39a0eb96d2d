//! Release source tests against a mock releases API

mod common;

use common::*;
use hoist_update::{ReleaseManager, UpdateError, VersionOracle};
use wiremock::MockServer;

const MATRIX: &str = r#"
schema_version: "1.0"
versions:
  "2.0.x":
    compatible_extensions:
      seo-tools: "^2.0.0"
      payments: ">=3.1.0"
    breaking_changes:
      - "Template engine replaced"
"#;

#[tokio::test]
async fn test_check_for_updates_combines_release_and_matrix() {
    let server = MockServer::start().await;
    mock_latest_release(&server, TAG_TARGET).await;
    mock_matrix(&server, MATRIX).await;

    let manager = ReleaseManager::new(&config_for(&server)).unwrap();
    let info = manager.check_for_updates().await.unwrap();

    assert_eq!(info.version, TARGET_VERSION);
    assert_eq!(info.title.as_deref(), Some("Release v2.0.0"));
    assert_eq!(info.release_date.as_deref(), Some("2026-09-01T00:00:00Z"));
    assert_eq!(info.extensions.len(), 2);
    assert_eq!(info.extensions.get("payments").unwrap(), ">=3.1.0");
}

#[tokio::test]
async fn test_missing_matrix_yields_no_requirements() {
    let server = MockServer::start().await;
    mock_latest_release(&server, TAG_TARGET).await;

    let manager = ReleaseManager::new(&config_for(&server)).unwrap();
    let info = manager.check_for_updates().await.unwrap();

    assert_eq!(info.version, TARGET_VERSION);
    assert!(info.extensions.is_empty());
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start().await;
    mock_release_status(&server, 500).await;

    let manager = ReleaseManager::new(&config_for(&server)).unwrap();
    let err = manager.check_for_updates().await.unwrap_err();

    assert!(matches!(err, UpdateError::Transport { .. }));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    drop(server);

    let manager = ReleaseManager::new(&config).unwrap();
    let err = manager.get_latest().await.unwrap_err();
    assert!(err.is_retryable());
}
