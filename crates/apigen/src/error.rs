//! Error types for generation.

/// Error that aborts a generation run.
///
/// Generation is all-or-nothing: any error propagates to the caller and no
/// partial module is produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A schema shape, reference, parameter location or content type the
    /// generator cannot express.
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    /// The document could not be normalized to the OpenAPI 3.x model.
    #[error("failed to upgrade document: {message}")]
    DocumentUpgradeFailure {
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedConstruct(message.into())
    }

    pub fn upgrade(
        message: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::DocumentUpgradeFailure {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
