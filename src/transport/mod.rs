//! The request/response seam to the remote engine.

mod config;
#[cfg(feature = "http")]
mod http;

pub use config::{Level, RqliteOptions, RqliteOptionsBuilder};
#[cfg(feature = "http")]
pub use http::HttpTransport;

use crate::error::RqliteDbError;
use crate::results::WireResult;
use crate::statement::Statement;

/// Blocking submission of built statements.
///
/// Both calls return one [`WireResult`] per statement, in order. A result's
/// error, if set, is that statement's whole outcome.
pub trait Transport {
    /// Write path.
    ///
    /// # Errors
    /// Transport-level failures (I/O, non-200 status, undecodable body).
    fn execute(
        &self,
        statements: &[Statement],
        transaction: bool,
    ) -> Result<Vec<WireResult>, RqliteDbError>;

    /// Read path.
    ///
    /// # Errors
    /// Transport-level failures (I/O, non-200 status, undecodable body).
    fn query(&self, statements: &[Statement]) -> Result<Vec<WireResult>, RqliteDbError>;

    /// Whether writes are wrapped in a transaction unless the caller says
    /// otherwise.
    fn transaction_default(&self) -> bool {
        false
    }

    /// Run one read statement and return its checked result.
    ///
    /// # Errors
    /// Transport failures, a missing result, or the upstream error of a hard
    /// error result.
    fn query_single(&self, statement: Statement) -> Result<WireResult, RqliteDbError> {
        let first = self
            .query(std::slice::from_ref(&statement))?
            .into_iter()
            .next()
            .ok_or_else(|| RqliteDbError::Transport("missing result".into()))?;
        check_result(first)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(
        &self,
        statements: &[Statement],
        transaction: bool,
    ) -> Result<Vec<WireResult>, RqliteDbError> {
        (**self).execute(statements, transaction)
    }

    fn query(&self, statements: &[Statement]) -> Result<Vec<WireResult>, RqliteDbError> {
        (**self).query(statements)
    }

    fn transaction_default(&self) -> bool {
        (**self).transaction_default()
    }
}

/// Turn a hard error result into [`RqliteDbError::Upstream`] with the engine's
/// message unchanged.
///
/// Errors about a missing table are logged and passed through as an empty
/// result. That tolerance is provisional.
///
/// # Errors
/// [`RqliteDbError::Upstream`] when [`WireResult::is_error`] holds.
pub fn check_result(result: WireResult) -> Result<WireResult, RqliteDbError> {
    if result.is_error() {
        let message = result.error.unwrap_or_default();
        return Err(RqliteDbError::Upstream(message));
    }
    if result.is_soft_error() {
        tracing::warn!(
            "treating upstream error as empty result: {}",
            result.error.as_deref().unwrap_or_default()
        );
        return Ok(WireResult {
            error: result.error,
            ..WireResult::default()
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn hard_errors_become_upstream_verbatim() {
        let err = check_result(WireResult::from_error("near \"SELEC\": syntax error")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(err.to_string(), "near \"SELEC\": syntax error");
    }

    #[test]
    fn missing_table_is_an_empty_result() {
        let res = check_result(WireResult::from_error("no such table: t")).unwrap();
        assert_eq!(res.row_count(), 0);
        assert_eq!(res.column_count(), 0);
    }

    #[test]
    fn clean_results_pass_through() {
        let res = WireResult {
            rows_affected: Some(2),
            ..WireResult::default()
        };
        assert_eq!(check_result(res.clone()).unwrap(), res);
    }
}
