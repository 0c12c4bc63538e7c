use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use scholar::client::HttpBackend;
use scholar::config::ServerConfig;
use scholar::{ChatMode, Orchestrator};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn server_config(base_url: &str) -> ServerConfig {
    ServerConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn http_backend(base_url: &str) -> HttpBackend {
    HttpBackend::new(&server_config(base_url)).expect("failed to create backend")
}

#[allow(dead_code)]
pub fn orchestrator(base_url: &str, mode: ChatMode) -> Orchestrator {
    Orchestrator::new(Arc::new(http_backend(base_url)), mode)
}

/// Address on localhost that nothing is listening on
#[allow(dead_code)]
pub fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
