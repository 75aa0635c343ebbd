//! Error types for Res Panel
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

use crate::states::NoticeLevel;

/// Main error type for the panel core
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// An external service call was rejected or failed
    #[snafu(display("{operation} failed: {message}"))]
    Service {
        operation: &'static str,
        message: String,
    },

    /// The operation is locally known to be illegal right now
    #[snafu(display("Not allowed: {reason}"))]
    Precondition { reason: String },

    /// Saving the draft was rejected by the service
    #[snafu(display("Save failed: {message}"))]
    Commit { message: String },

    /// A save is already running
    #[snafu(display("A save is already in progress"))]
    CommitInProgress,

    /// A status refresh batch is already running
    #[snafu(display("A status refresh is already in progress"))]
    RefreshInFlight,

    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (settings file, log directory)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },
}

impl Error {
    /// Shorthand for a rejected service call
    pub fn service(operation: &'static str, message: impl Into<String>) -> Self {
        Error::Service {
            operation,
            message: message.into(),
        }
    }

    /// Shorthand for a local precondition failure
    pub fn precondition(reason: impl Into<String>) -> Self {
        Error::Precondition {
            reason: reason.into(),
        }
    }

    /// Whether the failure is a local rejection issued before any external call
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::Precondition { .. } | Error::CommitInProgress | Error::Invalid { .. }
        )
    }

    /// Severity used when the error is shown to the user
    pub fn notice_level(&self) -> NoticeLevel {
        match self {
            Error::Precondition { .. } | Error::Invalid { .. } => NoticeLevel::Warn,
            Error::CommitInProgress | Error::RefreshInFlight => NoticeLevel::Info,
            _ => NoticeLevel::Error,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
