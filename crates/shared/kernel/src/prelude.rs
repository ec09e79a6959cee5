//! Convenience re-exports for slice crates.

pub use crate::config::{ConfigError, ConfigErrorExt, load_config};
pub use crate::safe_nanoid;
