use crate::engine::{BlobsInner, LocalBlobStore};
use crate::error::{BlobError, BlobErrorExt};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone)]
struct BlobsConfig {
    base_url: String,
    create: bool,
}

impl Default for BlobsConfig {
    fn default() -> Self {
        Self { base_url: "/blobs".to_string(), create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct BlobsBuilder<S: Sealed = NoRoot> {
    state: S,
    config: BlobsConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> BlobsBuilder<S> {
    /// Sets the URL prefix stored blobs are served under.
    #[must_use = "Sets the public URL prefix for stored blobs"]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use = "Sets whether the blob root should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> BlobsBuilder<N> {
        BlobsBuilder { state, config: self.config }
    }
}

impl BlobsBuilder<NoRoot> {
    #[must_use = "Creates a new blob store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory path for the blob engine"]
    pub fn root(self, path: impl Into<PathBuf>) -> BlobsBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }
}

impl BlobsBuilder<WithRoot> {
    /// Consumes the configuration and initializes the blob engine.
    ///
    /// Boot sequence: create the root directory if `create(true)` is set,
    /// canonicalize it so symlinks cannot move the sandbox, sweep stale
    /// temporary files left by earlier crashes, and hand back a thread-safe
    /// [`LocalBlobStore`] handle. The sweep is non-critical; a failed cleanup
    /// logs a warning and initialization proceeds.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Io`] if:
    /// - The root directory does not exist and `create` is false.
    /// - The process lacks permissions to create or resolve the root directory.
    pub async fn connect(self) -> Result<LocalBlobStore, BlobError> {
        let root = &self.state.0;

        if self.config.create {
            fs::create_dir_all(root)
                .await
                .context(format!("Failed to bootstrap blob root: {}", root.display()))?;
            info!(path = %root.display(), "Bootstrapped blob root directory");
        }

        let canonical = fs::canonicalize(root)
            .await
            .context(format!("Failed to resolve blob root: {}", root.display()))?;

        let blobs = LocalBlobStore {
            inner: Arc::new(BlobsInner {
                root: canonical,
                base_url: self.config.base_url,
                tmp_counter: AtomicU64::new(1),
            }),
        };

        blobs.purge_tmp().await;

        Ok(blobs)
    }
}
