use rhub_database::DatabaseError;
use std::borrow::Cow;

/// A specialized [`AuditError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// A wrapper for underlying storage errors.
    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },
}

impl From<DatabaseError> for AuditError {
    fn from(source: DatabaseError) -> Self {
        Self::Database { source, context: None }
    }
}

/// Attaches call-site context to an audit result.
pub trait AuditErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, AuditError>;
}

impl<T, E: Into<AuditError>> AuditErrorExt<T> for Result<T, E> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, AuditError> {
        self.map_err(|e| {
            let mut e = e.into();
            match &mut e {
                AuditError::Database { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
