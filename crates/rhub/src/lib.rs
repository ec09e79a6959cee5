//! Facade crate for `ReclaimHub` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates subsystem wiring.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`init_logging`] once at process start, keeping the returned handle alive.
//! - Call [`init`] to assemble storage, encryption, and the item service from
//!   an [`ApiConfig`].

use rhub_blobs::LocalBlobStore;
use rhub_database::Database;
pub use rhub_domain as domain;
use rhub_domain::config::ApiConfig;
use rhub_items::ItemService;
pub use rhub_kernel as kernel;
use rhub_logger::Logger;
use rhub_vault::Vault;

/// Feature registry for runtime introspection.
pub mod features {
    pub use rhub_audit as audit;
    pub use rhub_items as items;
    pub use rhub_verification as verification;

    /// Feature slices compiled into this build.
    pub const ENABLED: &[&str] = &["items", "verification", "audit"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Assembled platform subsystems.
///
/// The [`ItemService`] owns clones of the database and blob store handles;
/// the standalone handles here serve maintenance tasks and health checks.
#[derive(Debug, Clone)]
pub struct Platform {
    pub database: Database,
    pub blobs: LocalBlobStore,
    pub items: ItemService<Database, LocalBlobStore>,
}

/// Initialize the global logging subscriber from configuration.
///
/// The returned [`Logger`] handle must outlive the process, otherwise the
/// background file writer shuts down early.
///
/// # Errors
/// Returns an error when the configured level does not parse, or when a
/// global subscriber is already installed.
pub fn init_logging(config: &ApiConfig) -> Result<Logger, Box<dyn std::error::Error>> {
    let mut builder = Logger::builder().name("rhub").console(true);

    if let Some(level) = config.logging.level.as_deref() {
        builder = builder.level(level.parse()?);
    }

    let logger = match config.logging.path.as_ref() {
        Some(path) => builder.path(path).init()?,
        None => builder.init()?,
    };

    Ok(logger)
}

/// Assemble all enabled subsystems into a [`Platform`].
///
/// # Errors
/// Returns an error if the blob store root cannot be prepared.
pub async fn init(config: &ApiConfig) -> Result<Platform, Box<dyn std::error::Error>> {
    let database = Database::open();

    let blobs = LocalBlobStore::builder()
        .root(&config.blobs.data_dir)
        .base_url(&config.blobs.base_url)
        .connect()
        .await?;

    let vault = Vault::builder().key_env(config.security.encryption_key_env.clone()).build();

    let items = ItemService::new(database.clone(), blobs.clone(), vault);

    Ok(Platform { database, blobs, items })
}
