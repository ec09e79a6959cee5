use crate::engine::{KeySource, Vault};
use private::Sealed;
use std::borrow::Cow;

#[derive(Debug, Default)]
pub struct NoKey;
#[derive(Debug)]
pub struct WithKey(KeySource);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoKey {}
impl Sealed for WithKey {}

/// A builder for the [`Vault`].
///
/// Construction is infallible on purpose: the key is resolved and validated
/// on every encrypt/decrypt call, not up front, so a misconfigured key only
/// fails the operations that actually touch secure data.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct VaultBuilder<K: Sealed = NoKey> {
    key: K,
}

impl Default for VaultBuilder {
    fn default() -> Self {
        Self { key: NoKey }
    }
}

impl VaultBuilder<NoKey> {
    /// Creates a new empty builder.
    #[must_use = "Builder must be given a key source before use"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the key from the named environment variable on every call.
    #[must_use]
    pub fn key_env(self, var: impl Into<Cow<'static, str>>) -> VaultBuilder<WithKey> {
        VaultBuilder { key: WithKey(KeySource::Env(var.into())) }
    }

    /// Uses an injected 64-hex-character key string.
    ///
    /// The string is still validated on every call; this only changes where
    /// the key comes from.
    #[must_use]
    pub fn key_hex(self, key: impl Into<String>) -> VaultBuilder<WithKey> {
        VaultBuilder { key: WithKey(KeySource::Hex(key.into())) }
    }
}

impl VaultBuilder<WithKey> {
    /// Finalizes vault construction.
    #[must_use]
    pub fn build(self) -> Vault {
        Vault { key_source: self.key.0 }
    }
}
