mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./clipforged.toml",
        "~/.config/clipforged/config.toml",
        "/etc/clipforged/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.library.root.as_os_str().is_empty() {
        anyhow::bail!("Library root cannot be empty");
    }

    // The root may live on a volume that is mounted after startup, so a
    // missing directory is only a warning here; requests against it fail
    // with NotFound.
    if !config.library.root.exists() {
        tracing::warn!("Library root does not exist: {:?}", config.library.root);
    }

    if config.pipeline.program.is_empty() {
        anyhow::bail!("Pipeline program cannot be empty");
    }

    Ok(())
}
