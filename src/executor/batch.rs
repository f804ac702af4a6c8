use crate::error::RqliteDbError;
use crate::statement::Statement;
use crate::transport::{Transport, check_result};

use super::Executor;

impl<T: Transport> Executor<T> {
    /// Queue `sql` as one statement of the next batch.
    ///
    /// # Errors
    /// `ExecutorClosed`, or `StateError` for blank text.
    pub fn add_batch(&mut self, sql: &str) -> Result<(), RqliteDbError> {
        self.add_batch_statement(Statement::new(sql))
    }

    /// Queue a bound statement.
    ///
    /// # Errors
    /// Same as [`add_batch`](Self::add_batch).
    pub fn add_batch_statement(&mut self, statement: Statement) -> Result<(), RqliteDbError> {
        self.ensure_open()?;
        if statement.sql().trim().is_empty() {
            return Err(RqliteDbError::StateError("empty statement".into()));
        }
        self.batch.push(statement);
        Ok(())
    }

    /// # Errors
    /// [`RqliteDbError::ExecutorClosed`] after [`close`](Self::close).
    pub fn clear_batch(&mut self) -> Result<(), RqliteDbError> {
        self.ensure_open()?;
        self.batch.clear();
        Ok(())
    }

    #[must_use]
    pub fn batch_len(&self) -> usize {
        self.batch.len()
    }

    /// Send the queued statements in one write call and return each one's
    /// update count. The queue is cleared on success and kept on failure.
    ///
    /// # Errors
    /// `ExecutorClosed`, transport failures, or the upstream error of the
    /// first statement that failed.
    pub fn execute_batch(&mut self) -> Result<Vec<i64>, RqliteDbError> {
        self.ensure_open()?;
        if self.batch.is_empty() {
            return Ok(Vec::new());
        }
        let batch = std::mem::take(&mut self.batch);
        let outcome = self.run_batch(&batch);
        if outcome.is_err() {
            self.batch = batch;
        }
        outcome
    }

    fn run_batch(&mut self, batch: &[Statement]) -> Result<Vec<i64>, RqliteDbError> {
        tracing::debug!("executing batch of {} statement(s)", batch.len());
        let results = self.transport.execute(batch, self.transaction)?;
        let mut counts = Vec::with_capacity(results.len());
        for (i, result) in results.into_iter().enumerate() {
            let result = check_result(result).inspect_err(|e| {
                tracing::warn!("batch statement {} failed: {}", i + 1, e);
            })?;
            counts.push(result.rows_affected.unwrap_or(0));
        }
        Ok(counts)
    }
}
