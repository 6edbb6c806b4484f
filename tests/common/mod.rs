//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temp library root, default
//! config, and full [`AppContext`]. The [`with_server`] constructor starts
//! Axum on a random port for HTTP-level testing.

use std::net::SocketAddr;
use std::path::Path;

use clipforged::config::Config;
use clipforged::server::{create_router, AppContext};
use tempfile::TempDir;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by a
/// temporary library root.
pub struct TestHarness {
    pub ctx: AppContext,
    pub root: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration and a temp root.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration; the library root
    /// is always replaced with a fresh temp directory.
    pub fn with_config(mut config: Config) -> Self {
        let root = TempDir::new().expect("failed to create temp library root");
        config.library.root = root.path().to_path_buf();

        let ctx = AppContext::new(config);
        Self { ctx, root }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::spawn(Self::new()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        Self::spawn(Self::with_config(config)).await
    }

    async fn spawn(harness: Self) -> (Self, SocketAddr) {
        let app = create_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// The library root on disk.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Create a subfolder under the library root.
    pub fn mkdir(&self, rel: &str) -> std::path::PathBuf {
        let dir = self.root.path().join(rel);
        std::fs::create_dir_all(&dir).expect("failed to create folder");
        dir
    }

    /// Write a file under the library root.
    pub fn write_file(&self, rel: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = self.root.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent");
        }
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }
}

/// Config whose pipeline runs `sh -c <script> <input> <output>`.
///
/// The script sees the input directory as `$0` and the output directory as
/// `$1`, which is enough to fake any pipeline behavior in tests.
pub fn config_with_pipeline(script: &str) -> Config {
    let mut config = Config::default();
    config.pipeline.program = "sh".to_string();
    config.pipeline.args = vec!["-c".to_string(), script.to_string()];
    config
}
