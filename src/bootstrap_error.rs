use thiserror::Error;

/// A list specifying categories of [`BootstrapError`](crate::BootstrapError).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BootstrapError {
    /// Erroneous connection settings, e.g. from an unreadable or malformed
    /// settings file.
    #[error("Erroneous connection settings")]
    Settings {
        /// The causing Error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The configured endpoint is not a valid URL.
    #[error("The configured endpoint is not a valid URL")]
    Endpoint {
        /// The causing Error.
        #[from]
        source: url::ParseError,
    },

    /// Fetching or registering a table schema failed.
    #[error("Schema handling failed for table {table}")]
    Schema {
        /// Name of the affected table.
        table: String,
        /// The causing Error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Error occured in communication with the file system.
    #[error(transparent)]
    Io {
        /// The causing Error.
        #[from]
        source: std::io::Error,
    },

    /// Error occured in thread synchronization.
    #[error("Error occured in thread synchronization")]
    Poison,

    /// Error caused by wrong usage.
    #[error("Wrong usage: {}", _0)]
    Usage(&'static str),
}

/// Abbreviation of `Result<T, BootstrapError>`.
pub type BootstrapResult<T> = std::result::Result<T, BootstrapError>;

impl BootstrapError {
    /// Reveal the inner error
    pub fn inner(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self)
    }

    pub(crate) fn settings(error: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Self::Settings { source: error }
    }

    pub(crate) fn schema(
        table: &str,
        error: Box<dyn std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        Self::Schema {
            table: table.to_string(),
            source: error,
        }
    }
}

impl<G> From<std::sync::PoisonError<G>> for BootstrapError {
    fn from(_error: std::sync::PoisonError<G>) -> Self {
        Self::Poison
    }
}
