use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL used to build servable links in listing responses.
    /// Defaults to `http://localhost:<port>` when unset.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8750
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// The base URL clients should use to reach the stream endpoint.
    pub fn effective_base_url(&self) -> String {
        match self.base_url {
            Some(ref url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Root directory under which all logical folder/file identifiers are
    /// resolved. Immutable after startup.
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Program to invoke for clip generation.
    #[serde(default = "default_program")]
    pub program: String,

    /// Leading arguments placed before the input/output directories,
    /// typically the script path.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Maximum job duration in seconds. Unset means the job may run
    /// indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_program() -> String {
    "python3".to_string()
}

fn default_args() -> Vec<String> {
    vec!["viral.py".to_string()]
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            timeout_secs: None,
        }
    }
}
