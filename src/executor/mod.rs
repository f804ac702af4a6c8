//! Statement dispatch over a [`Transport`].
//!
//! An [`Executor`] routes SQL text to the query or write path, checks every
//! result, and keeps the response of the last call so later results can be
//! stepped through with [`Executor::more_results`].

mod batch;
mod dispatch;

use std::rc::Rc;

use crate::cursor::{Cursor, Owner};
use crate::error::RqliteDbError;
use crate::metadata::MetadataSynthesizer;
use crate::results::WireResult;
use crate::statement::Statement;
use crate::transport::Transport;

/// Runs statements and tracks the results of the last call.
///
/// Cursors handed out stay tied to the executor: they read as closed once it
/// re-executes, steps past their result or closes.
///
/// ```rust
/// use rqlite_middleware::prelude::*;
/// use rqlite_middleware::test_utils::{ScriptedTransport, rows, written};
///
/// let engine = ScriptedTransport::new()
///     .with_result("INSERT INTO t VALUES (1)", written(1, Some(1)))
///     .with_result("SELECT id FROM t", rows(&[("id", TypeTag::Integer)], &[&[Some("1")]]));
/// let mut exec = Executor::new(&engine);
///
/// assert_eq!(exec.execute_update("INSERT INTO t VALUES (1)")?, 1);
/// let mut cursor = exec.execute_query("SELECT id FROM t")?;
/// assert!(cursor.advance()?);
/// assert_eq!(cursor.get_long("id")?, Some(1));
/// # Ok::<(), RqliteDbError>(())
/// ```
#[derive(Debug)]
pub struct Executor<T: Transport> {
    transport: T,
    transaction: bool,
    max_rows: usize,
    /// Shared with every cursor handed out; carries close-on-completion.
    owner: Rc<Owner>,
    closed: bool,
    results: Vec<WireResult>,
    /// Index into `results`; `None` after a failure, `results.len()` once exhausted.
    current: Option<usize>,
    cursor: Option<Cursor>,
    batch: Vec<Statement>,
}

impl<T: Transport> Executor<T> {
    /// Writes use the transport's transaction default until
    /// [`with_transaction`](Self::with_transaction) says otherwise.
    pub fn new(transport: T) -> Self {
        Self {
            transaction: transport.transaction_default(),
            transport,
            max_rows: 0,
            owner: Rc::default(),
            closed: false,
            results: Vec::new(),
            current: None,
            cursor: None,
            batch: Vec::new(),
        }
    }

    /// Run multi-statement writes and batches inside one transaction.
    #[must_use]
    pub fn with_transaction(mut self, transaction: bool) -> Self {
        self.transaction = transaction;
        self
    }

    #[must_use]
    pub fn is_transaction(&self) -> bool {
        self.transaction
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Metadata row sets over the same transport.
    pub fn metadata(&self) -> MetadataSynthesizer<&T> {
        MetadataSynthesizer::new(&self.transport)
    }

    pub(crate) fn ensure_open(&self) -> Result<(), RqliteDbError> {
        if self.is_closed() {
            Err(RqliteDbError::ExecutorClosed)
        } else {
            Ok(())
        }
    }

    /// Row cap applied to every cursor this executor creates; `0` is no cap.
    ///
    /// # Errors
    /// [`RqliteDbError::ParameterError`] for a negative cap,
    /// [`RqliteDbError::ExecutorClosed`] after [`close`](Self::close).
    pub fn set_max_rows(&mut self, max_rows: i64) -> Result<(), RqliteDbError> {
        self.ensure_open()?;
        self.max_rows = usize::try_from(max_rows).map_err(|_| {
            RqliteDbError::ParameterError(format!("Invalid max rows: {max_rows}"))
        })?;
        Ok(())
    }

    #[must_use]
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Close the executor once [`more_results`](Self::more_results) runs out
    /// of results, or when a cursor it handed out is closed.
    ///
    /// # Errors
    /// [`RqliteDbError::ExecutorClosed`] after [`close`](Self::close).
    pub fn set_close_on_completion(&mut self, close: bool) -> Result<(), RqliteDbError> {
        self.ensure_open()?;
        self.owner.set_close_on_completion(close);
        Ok(())
    }

    #[must_use]
    pub fn is_close_on_completion(&self) -> bool {
        self.owner.close_on_completion()
    }

    /// Drop held results, the pending batch and the current cursor. Every
    /// cursor handed out reads as closed afterwards. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.reset();
        self.batch.clear();
        self.owner.set_close_on_completion(false);
        self.closed = true;
        tracing::debug!("executor closed");
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed || self.owner.close_requested()
    }

    /// Kill every outstanding cursor without triggering close-on-completion.
    fn release_cursors(&mut self) {
        self.owner.invalidate();
        self.cursor = None;
    }

    fn reset(&mut self) {
        self.release_cursors();
        self.results.clear();
        self.current = None;
    }

    fn cursor_for(&self, result: WireResult) -> Cursor {
        Cursor::with_max_rows(result, self.max_rows).owned_by(self.owner.lease())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_utils::ScriptedTransport;

    #[test]
    fn negative_max_rows_is_rejected() {
        let engine = ScriptedTransport::new();
        let mut exec = Executor::new(&engine);
        assert!(matches!(
            exec.set_max_rows(-1),
            Err(RqliteDbError::ParameterError(_))
        ));
        exec.set_max_rows(5).unwrap();
        assert_eq!(exec.max_rows(), 5);
    }

    #[test]
    fn closed_executor_rejects_calls() {
        let engine = ScriptedTransport::new();
        let mut exec = Executor::new(&engine);
        exec.close();
        exec.close();
        assert!(exec.is_closed());
        assert!(matches!(exec.set_max_rows(1), Err(RqliteDbError::ExecutorClosed)));
        let err = exec.execute_query("SELECT 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(matches!(exec.add_batch("DELETE FROM t"), Err(RqliteDbError::ExecutorClosed)));
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn cursor_close_honors_close_on_completion() {
        let engine = ScriptedTransport::new();
        let mut exec = Executor::new(&engine);
        let mut cursor = exec.cursor_for(WireResult::default());
        cursor.close();
        assert!(!exec.is_closed());

        exec.set_close_on_completion(true).unwrap();
        let mut cursor = exec.cursor_for(WireResult::default());
        let sibling = cursor.clone();
        cursor.close();
        assert!(exec.is_closed());
        assert!(sibling.is_closed());
        assert!(matches!(exec.update_count(), Err(RqliteDbError::ExecutorClosed)));

        exec.close();
        assert!(!exec.is_close_on_completion());
    }

    #[test]
    fn transaction_default_comes_from_the_transport() {
        let engine = ScriptedTransport::new();
        assert!(!Executor::new(&engine).is_transaction());
        let engine = ScriptedTransport::new().with_transaction_default(true);
        assert!(Executor::new(&engine).is_transaction());
        assert!(!Executor::new(&engine).with_transaction(false).is_transaction());
    }
}
