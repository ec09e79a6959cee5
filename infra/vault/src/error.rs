//! # Vault Errors
//!
//! This module defines the [`VaultError`] enum used throughout the vault crate
//! for reporting configuration and cryptographic failures. Messages never
//! contain key material, plaintext, or cipher bytes.

use std::borrow::Cow;

/// A specialized error enum for vault-related failures.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The configured encryption key is missing, has the wrong length, or is
    /// not valid hexadecimal. Never retried automatically.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// GCM tag verification failed.
    ///
    /// A wrong tag, tampered ciphertext, and a wrong key are indistinguishable
    /// at this layer; all surface as this variant.
    #[error("Authentication failed{}: {message}", format_context(.context))]
    AuthenticationFailed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The ciphertext, IV, or tag is malformed (bad hex, wrong length, or the
    /// decrypted bytes are not valid UTF-8). Distinct from
    /// [`VaultError::AuthenticationFailed`]: this variant makes no claim of
    /// tampering.
    #[error("Decryption failed{}: {message}", format_context(.context))]
    MalformedInput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure during the encryption process itself.
    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Attaches call-site context to a vault result.
pub trait VaultErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, VaultError>;
}

impl<T> VaultErrorExt<T> for Result<T, VaultError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, VaultError> {
        self.map_err(|mut e| {
            match &mut e {
                VaultError::Configuration { context: c, .. }
                | VaultError::AuthenticationFailed { context: c, .. }
                | VaultError::MalformedInput { context: c, .. }
                | VaultError::Encryption { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
