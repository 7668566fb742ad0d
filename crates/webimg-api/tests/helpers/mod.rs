//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p webimg-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use webimg_api::setup::{routes, services};
use webimg_api::state::AppState;
use webimg_core::Config;
use webimg_processing::Normalizer;

/// Test application: server plus the temporary download/upload roots.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn download_root(&self) -> &Path {
        &self.state.config.download_root
    }

    pub fn upload_root(&self) -> &Path {
        &self.state.config.upload_root
    }

    /// Sorted file names directly inside `dir`.
    pub fn files_in(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn create_test_config(root: &Path) -> Config {
    Config {
        download_root: root.join("downloads"),
        upload_root: root.join("uploads"),
        download_timeout_secs: 5,
        max_upload_size_bytes: 10 * 1024 * 1024,
        ..Config::default()
    }
}

/// Setup test app with isolated folders.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}, None).await
}

/// Like [`setup_test_app`], with config tweaks and an optional normalizer
/// replacing the real one.
pub async fn setup_test_app_with(
    configure: impl FnOnce(&mut Config),
    normalizer: Option<Arc<dyn Normalizer>>,
) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(temp_dir.path());
    configure(&mut config);

    let mut state = services::initialize_services(&config)
        .await
        .expect("Failed to initialize services");
    if let Some(normalizer) = normalizer {
        let mut replaced = (*state).clone();
        replaced.normalizer = normalizer;
        state = Arc::new(replaced);
    }
    let app = routes::setup_routes(&config, state.clone())
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

pub fn folder_path(app: &TestApp, response: &serde_json::Value) -> PathBuf {
    let key = response["folder_key"].as_str().expect("folder_key missing");
    app.download_root().join(key)
}
