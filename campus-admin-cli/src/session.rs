///! Session token shared between the API client and commands

use crate::config::Config;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable handle to the current bearer token.
///
/// Every clone sees the same token. The API client reads it on each request;
/// login sets it and logout clears it.
#[derive(Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// Session seeded from the persisted config
    pub fn from_config(config: &Config) -> Self {
        Self {
            token: Arc::new(RwLock::new(config.token.clone())),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub async fn set(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
    }

    /// Write the current token into `config` and save it to `path`
    pub async fn persist(&self, config: &mut Config, path: &Path) -> Result<()> {
        config.token = self.token().await;
        config.save_to(path)
    }
}
