use rhub_database::DatabaseError;
use rhub_vault::VaultError;
use std::borrow::Cow;

/// A specialized [`VerificationError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// A question spec was rejected before any encryption or write occurred.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Stored answers could not be decrypted. Deliberately opaque: the caller
    /// learns neither which record failed nor why, so decryption failures
    /// cannot be used as an oracle for key or tamper state across items.
    #[error("Security answers could not be retrieved{}", format_context(.context))]
    Retrieval { context: Option<Cow<'static, str>> },

    /// Encrypting a new answer failed. Creation-path crypto errors keep their
    /// detail, unlike the read path.
    #[error("Encryption error{}: {source}", format_context(.context))]
    Encryption {
        #[source]
        source: VaultError,
        context: Option<Cow<'static, str>>,
    },

    /// A wrapper for underlying storage errors.
    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },
}

impl From<DatabaseError> for VerificationError {
    fn from(source: DatabaseError) -> Self {
        Self::Database { source, context: None }
    }
}

/// Attaches call-site context to a verification result.
pub trait VerificationErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, VerificationError>;
}

impl<T, E: Into<VerificationError>> VerificationErrorExt<T> for Result<T, E> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, VerificationError> {
        self.map_err(|e| {
            let mut e = e.into();
            match &mut e {
                VerificationError::Validation { context: c, .. }
                | VerificationError::Retrieval { context: c }
                | VerificationError::Encryption { context: c, .. }
                | VerificationError::Database { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
