use std::borrow::Cow;

/// A specialized [`BlobError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Blob not found{}: {message}", format_context(.context))]
    BlobNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Path traversal security violation{}: {message}", format_context(.context))]
    PathTraversalAttempt { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unsupported media type{}: {message}", format_context(.context))]
    UnsupportedMediaType { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },
}

impl From<std::io::Error> for BlobError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, context: None }
    }
}

/// Attaches call-site context to a blob result.
pub trait BlobErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, BlobError>;
}

impl<T, E: Into<BlobError>> BlobErrorExt<T> for Result<T, E> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, BlobError> {
        self.map_err(|e| {
            let mut e = e.into();
            match &mut e {
                BlobError::BlobNotFound { context: c, .. }
                | BlobError::PathTraversalAttempt { context: c, .. }
                | BlobError::UnsupportedMediaType { context: c, .. }
                | BlobError::Io { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
