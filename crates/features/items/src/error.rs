use rhub_blobs::BlobError;
use rhub_database::DatabaseError;
use rhub_verification::VerificationError;
use std::borrow::Cow;

/// A specialized [`ItemError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    /// The referenced item does not exist.
    #[error("Item not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A wrapper for blob engine failures on the upload or cleanup path.
    #[error("Blob storage error{}: {source}", format_context(.context))]
    Blob {
        #[source]
        source: BlobError,
        context: Option<Cow<'static, str>>,
    },

    /// A wrapper for relational storage failures.
    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    /// A wrapper for security question failures.
    #[error("Verification error{}: {source}", format_context(.context))]
    Verification {
        #[source]
        source: VerificationError,
        context: Option<Cow<'static, str>>,
    },
}

impl From<BlobError> for ItemError {
    fn from(source: BlobError) -> Self {
        Self::Blob { source, context: None }
    }
}

impl From<DatabaseError> for ItemError {
    fn from(source: DatabaseError) -> Self {
        // A missing row is the caller's 404, not an engine fault.
        if source.is_not_found() {
            Self::NotFound { message: source.to_string().into(), context: None }
        } else {
            Self::Database { source, context: None }
        }
    }
}

impl From<rhub_audit::AuditError> for ItemError {
    fn from(source: rhub_audit::AuditError) -> Self {
        let rhub_audit::AuditError::Database { source, context } = source;
        Self::Database { source, context }
    }
}

impl From<VerificationError> for ItemError {
    fn from(source: VerificationError) -> Self {
        Self::Verification { source, context: None }
    }
}

/// Attaches call-site context to an item result.
pub trait ItemErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ItemError>;
}

impl<T, E: Into<ItemError>> ItemErrorExt<T> for Result<T, E> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ItemError> {
        self.map_err(|e| {
            let mut e = e.into();
            match &mut e {
                ItemError::NotFound { context: c, .. }
                | ItemError::Blob { context: c, .. }
                | ItemError::Database { context: c, .. }
                | ItemError::Verification { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
