///! CLI configuration management

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fallback backend address when nothing else is configured
pub const DEFAULT_SERVER: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub default_server: String,
    pub default_output: String,
    pub token: Option<String>,
    pub admin_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_server: build_time_server().to_string(),
            default_output: "table".to_string(),
            token: None,
            admin_name: None,
        }
    }
}

/// Server baked in with `CAMPUS_ADMIN_GATEWAY_URL` at build time, if any
pub fn build_time_server() -> &'static str {
    option_env!("CAMPUS_ADMIN_GATEWAY_URL").unwrap_or(DEFAULT_SERVER)
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Pick the server: explicit flag/env first, then the config file
    pub fn resolve_server(&self, flag: Option<&str>) -> String {
        flag.unwrap_or(&self.default_server)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/campus-admin/cli.toml"))
    }
}
