use thiserror::Error;

use crate::coercion::TargetType;
use crate::type_tag::SqlType;

/// Coarse classification of a [`RqliteDbError`].
///
/// Callers use this to tell bad data apart from a wrong cast, and both apart
/// from a failure reported by the remote engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The literal text does not parse, or the value exceeds the target range.
    MalformedValue,
    /// The (source tag, target type) pair is not an accepted conversion.
    IncompatibleType,
    /// The remote engine or the transport reported a failure.
    Upstream,
    /// The API was used incorrectly (closed cursor, bad index, mixed params...).
    Usage,
}

#[derive(Debug, Error)]
pub enum RqliteDbError {
    #[error("Invalid value [{value}] for column {column} as {target}: {reason}")]
    MalformedValue {
        column: usize,
        value: String,
        target: TargetType,
        reason: String,
    },

    #[error("Cannot convert value [{value}], column {column} ({source_type}) to {target}")]
    IncompatibleType {
        column: usize,
        value: String,
        source_type: SqlType,
        target: TargetType,
    },

    #[error("Target type cannot be empty for column {column}, value [{value}]")]
    NoTargetType { column: usize, value: String },

    #[error("{0} not supported")]
    Unsupported(String),

    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    #[error("Invalid row position: {0}")]
    InvalidRowPosition(i64),

    #[error("Unrecognized type tag [{tag}] for column {column}")]
    UnknownTypeTag { column: usize, tag: String },

    #[error("Cursor is closed")]
    CursorClosed,

    #[error("Executor is closed")]
    ExecutorClosed,

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("Invalid state: {0}")]
    StateError(String),

    #[error("Unterminated {what} starting at byte {offset}")]
    UnterminatedInput { what: &'static str, offset: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error message returned verbatim by the remote engine.
    #[error("{0}")]
    Upstream(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RqliteDbError {
    /// Classify this error into one of the [`ErrorKind`] buckets.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            RqliteDbError::MalformedValue { .. } => ErrorKind::MalformedValue,
            RqliteDbError::IncompatibleType { .. } => ErrorKind::IncompatibleType,
            RqliteDbError::Upstream(_) | RqliteDbError::Transport(_) | RqliteDbError::Json(_) => {
                ErrorKind::Upstream
            }
            #[cfg(feature = "http")]
            RqliteDbError::Http(_) => ErrorKind::Upstream,
            _ => ErrorKind::Usage,
        }
    }

    pub(crate) fn malformed(
        column: usize,
        value: &str,
        target: &TargetType,
        reason: impl std::fmt::Display,
    ) -> Self {
        RqliteDbError::MalformedValue {
            column,
            value: value.to_string(),
            target: target.clone(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn out_of_range(column: usize, value: &str, target: &TargetType) -> Self {
        Self::malformed(column, value, target, "out of range")
    }

    pub(crate) fn incompatible(
        column: usize,
        value: &str,
        source_type: SqlType,
        target: &TargetType,
    ) -> Self {
        RqliteDbError::IncompatibleType {
            column,
            value: value.to_string(),
            source_type,
            target: target.clone(),
        }
    }
}
