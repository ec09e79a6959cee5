use crate::constants::ENCRYPTION_KEY_ENV;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level API configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub security: SecurityConfig,
    pub blobs: BlobConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Encryption knobs.
///
/// `encryption_key_env` names the variable that holds the key; the key value
/// itself never passes through the config file, so rotation only requires the
/// environment to change.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub encryption_key_env: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self { encryption_key_env: ENCRYPTION_KEY_ENV.to_owned() }
    }
}

/// Blob store root and the public URL prefix uploads are served from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    pub data_dir: PathBuf,
    pub base_url: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("data/blobs"), base_url: "/blobs".to_owned() }
    }
}

/// Logging output configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for rolling log files; console-only when unset.
    pub path: Option<PathBuf>,
    pub level: Option<String>,
}
