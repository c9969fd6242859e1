//! Persisted settings, one JSON file in the data directory. Loading a
//! missing or corrupt file rewrites the defaults instead of failing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub theme: String,
    pub color_theme: String,
    pub last_tool: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            color_theme: "blue".to_string(),
            last_tool: String::new(),
        }
    }
}

/// Resolve the data directory: CLI/env override, else `~/.backoffice`,
/// else a local `.backoffice` folder.
pub fn resolve_data_dir(cli_override: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = cli_override {
        return dir;
    }
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".backoffice"),
        _ => PathBuf::from(".backoffice"),
    }
}

pub fn load(data_dir: &Path) -> AppConfig {
    let path = data_dir.join(CONFIG_FILE);
    match std::fs::read_to_string(&path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config unreadable, rewriting defaults");
                let config = AppConfig::default();
                let _ = save(data_dir, &config);
                config
            }
        },
        Err(_) => {
            let config = AppConfig::default();
            let _ = save(data_dir, &config);
            config
        }
    }
}

pub fn save(data_dir: &Path, config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;
    let path = data_dir.join(CONFIG_FILE);
    let text = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
