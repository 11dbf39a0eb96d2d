//! Wiremock helpers for the releases API

use hoist_core::types::RuntimeConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REPO_OWNER: &str = "hoist-dev";
pub const REPO_NAME: &str = "hoist";
pub const MATRIX_PATH: &str = "/compatibility-matrix.yaml";

/// Runtime config pointing every URL at `server`
pub fn config_for(server: &MockServer) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.update.api_url = server.uri();
    config.update.repo_owner = REPO_OWNER.to_string();
    config.update.repo_name = REPO_NAME.to_string();
    config.update.compatibility_matrix_url = format!("{}{}", server.uri(), MATRIX_PATH);
    config.network.http_timeout_secs = 5;
    config
}

fn latest_release_path() -> String {
    format!("/repos/{}/{}/releases/latest", REPO_OWNER, REPO_NAME)
}

/// Serve `tag` as the latest release
pub async fn mock_latest_release(server: &MockServer, tag: &str) {
    let body = serde_json::json!({
        "tag_name": tag,
        "name": format!("Release {}", tag),
        "body": "- Faster deactivation",
        "prerelease": false,
        "published_at": "2026-09-01T00:00:00Z"
    });

    Mock::given(method("GET"))
        .and(path(latest_release_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer the latest release request with `status`
pub async fn mock_release_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(latest_release_path()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve a compatibility matrix body
pub async fn mock_matrix(server: &MockServer, yaml: &str) {
    Mock::given(method("GET"))
        .and(path(MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(yaml))
        .mount(server)
        .await;
}
