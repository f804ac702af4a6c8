use crate::cursor::Cursor;
use crate::error::RqliteDbError;
use crate::results::WireResult;
use crate::statement::Statement;
use crate::transport::{Transport, check_result};
use crate::translation::split_statements;

use super::Executor;

/// Whether a result carries rows rather than an update count.
fn has_columns(result: &WireResult) -> bool {
    result.column_count() > 0
}

fn split_nonempty(sql: &str) -> Result<Vec<Statement>, RqliteDbError> {
    let statements: Vec<Statement> = split_statements(sql)?
        .into_iter()
        .map(Statement::new)
        .collect();
    if statements.is_empty() {
        return Err(RqliteDbError::StateError("empty statement".into()));
    }
    Ok(statements)
}

impl<T: Transport> Executor<T> {
    /// Send `statements` to the query path when `select` holds, the write
    /// path otherwise, and check every result.
    fn run(&mut self, statements: &[Statement], select: bool) -> Result<(), RqliteDbError> {
        self.ensure_open()?;
        self.reset();
        if statements.iter().any(|s| s.sql().trim().is_empty()) {
            return Err(RqliteDbError::StateError("empty statement".into()));
        }
        tracing::debug!(
            "dispatching {} statement(s) to {}",
            statements.len(),
            if select { "query" } else { "execute" }
        );
        let raw = if select {
            self.transport.query(statements)?
        } else {
            self.transport.execute(statements, self.transaction)?
        };
        self.results = raw
            .into_iter()
            .map(check_result)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(())
    }

    /// Make the first result current; a row result also becomes the held cursor.
    fn settle_first(&mut self) -> bool {
        let Some(first) = self.results.first() else {
            return false;
        };
        self.current = Some(0);
        if has_columns(first) {
            self.cursor = Some(self.cursor_for(first.clone()));
            true
        } else {
            false
        }
    }

    fn first_cursor(&mut self) -> Result<Cursor, RqliteDbError> {
        let first = self
            .results
            .first()
            .cloned()
            .ok_or_else(|| RqliteDbError::Transport("missing result".into()))?;
        self.current = Some(0);
        Ok(self.cursor_for(first))
    }

    /// Split `sql`, run it and return a cursor over the first result.
    ///
    /// Text containing `SELECT` (any case) goes to the query path.
    ///
    /// # Errors
    /// `ExecutorClosed`, `StateError` for blank text, splitter errors,
    /// transport failures and the upstream error of any hard error result.
    pub fn execute_query(&mut self, sql: &str) -> Result<Cursor, RqliteDbError> {
        self.ensure_open()?;
        let statements = split_nonempty(sql)?;
        let select = Statement::new(sql).is_select();
        self.run(&statements, select)?;
        self.first_cursor()
    }

    /// Run `sql` on the write path as one statement and return the rows it
    /// affected (0 when the engine reports none).
    ///
    /// # Errors
    /// Same as [`execute_query`](Self::execute_query).
    pub fn execute_update(&mut self, sql: &str) -> Result<i64, RqliteDbError> {
        self.update_prepared(&Statement::new(sql))
    }

    /// Split and run `sql`. Returns `true` when the first result has rows,
    /// available through [`cursor`](Self::cursor).
    ///
    /// # Errors
    /// Same as [`execute_query`](Self::execute_query).
    pub fn execute(&mut self, sql: &str) -> Result<bool, RqliteDbError> {
        self.ensure_open()?;
        let statements = split_nonempty(sql)?;
        let select = Statement::new(sql).is_select();
        self.run(&statements, select)?;
        Ok(self.settle_first())
    }

    /// Run one bound statement, routed like [`execute`](Self::execute).
    ///
    /// # Errors
    /// Same as [`execute_query`](Self::execute_query); a blank statement is a
    /// `StateError`.
    pub fn execute_prepared(&mut self, statement: &Statement) -> Result<bool, RqliteDbError> {
        let select = statement.is_select();
        self.run(std::slice::from_ref(statement), select)?;
        Ok(self.settle_first())
    }

    /// Run one bound statement on the query path.
    ///
    /// # Errors
    /// Same as [`execute_prepared`](Self::execute_prepared).
    pub fn query_prepared(&mut self, statement: &Statement) -> Result<Cursor, RqliteDbError> {
        self.run(std::slice::from_ref(statement), true)?;
        self.first_cursor()
    }

    /// Run one bound statement on the write path and return the rows it
    /// affected.
    ///
    /// # Errors
    /// Same as [`execute_prepared`](Self::execute_prepared).
    pub fn update_prepared(&mut self, statement: &Statement) -> Result<i64, RqliteDbError> {
        self.run(std::slice::from_ref(statement), false)?;
        self.current = self.results.first().map(|_| 0);
        Ok(self
            .results
            .first()
            .and_then(|r| r.rows_affected)
            .unwrap_or(0))
    }

    /// The cursor over the current result, when it has rows.
    ///
    /// # Errors
    /// [`RqliteDbError::ExecutorClosed`] after [`close`](Self::close).
    pub fn cursor(&mut self) -> Result<Option<&mut Cursor>, RqliteDbError> {
        self.ensure_open()?;
        Ok(self.cursor.as_mut())
    }

    /// The current result of the last call, rows uncapped.
    #[must_use]
    pub fn current_result(&self) -> Option<&WireResult> {
        self.current.and_then(|i| self.results.get(i))
    }

    /// Take ownership of the current cursor.
    pub fn take_cursor(&mut self) -> Option<Cursor> {
        self.cursor.take()
    }

    /// Rows affected by the current result; `-1` when it has rows or there is
    /// no current result.
    ///
    /// # Errors
    /// [`RqliteDbError::ExecutorClosed`] after [`close`](Self::close).
    pub fn update_count(&self) -> Result<i64, RqliteDbError> {
        self.ensure_open()?;
        let Some(result) = self.current_result() else {
            return Ok(-1);
        };
        if has_columns(result) {
            return Ok(-1);
        }
        Ok(result.rows_affected.unwrap_or(0))
    }

    /// Step to the next result of the last call. Cursors over earlier results
    /// read as closed afterwards.
    /// Returns `true` when the new current result has rows.
    ///
    /// With close-on-completion set, running out of results closes the executor.
    ///
    /// # Errors
    /// [`RqliteDbError::ExecutorClosed`] after [`close`](Self::close).
    pub fn more_results(&mut self) -> Result<bool, RqliteDbError> {
        self.ensure_open()?;
        self.release_cursors();
        let next = self.current.map_or(0, |i| i + 1);
        if let Some(result) = self.results.get(next) {
            self.current = Some(next);
            if has_columns(result) {
                self.cursor = Some(self.cursor_for(result.clone()));
                return Ok(true);
            }
            return Ok(false);
        }
        self.current = Some(self.results.len());
        if self.is_close_on_completion() {
            self.close();
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_utils::{Endpoint, ScriptedTransport, rows, written};
    use crate::type_tag::TypeTag;

    fn engine() -> ScriptedTransport {
        let ids = rows(
            &[("id", TypeTag::Integer)],
            &[&[Some("1")], &[Some("2")], &[Some("3")]],
        );
        ScriptedTransport::new()
            .with_result("SELECT id FROM t", ids)
            .with_result("INSERT INTO t VALUES (4)", written(1, Some(4)))
            .with_result("UPDATE t SET id = id + 1", written(3, None))
            .with_result("DELETE FROM ghosts", WireResult::from_error("no such table: ghosts"))
            .with_result("SELEC 1", WireResult::from_error("near \"SELEC\": syntax error"))
    }

    #[test]
    fn select_text_goes_to_the_query_path() {
        let engine = engine();
        let mut exec = Executor::new(&engine);
        let mut cursor = exec.execute_query("SELECT id FROM t").unwrap();
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.get_int("ID").unwrap(), Some(1));
        assert_eq!(engine.calls().last().unwrap().endpoint, Endpoint::Query);
    }

    #[test]
    fn query_cursor_is_clamped_to_max_rows() {
        let engine = engine();
        let mut exec = Executor::new(&engine);
        exec.set_max_rows(2).unwrap();
        let cursor = exec.execute_query("SELECT id FROM t").unwrap();
        assert_eq!(cursor.result().row_count(), 2);
        assert_eq!(exec.update_count().unwrap(), -1);
    }

    #[test]
    fn updates_report_rows_affected() {
        let engine = engine();
        let mut exec = Executor::new(&engine).with_transaction(true);
        assert_eq!(exec.execute_update("UPDATE t SET id = id + 1").unwrap(), 3);
        assert_eq!(exec.update_count().unwrap(), 3);
        let call = engine.calls().pop().unwrap();
        assert_eq!(call.endpoint, Endpoint::Execute);
        assert!(call.transaction);
    }

    #[test]
    fn missing_table_is_an_empty_update() {
        let engine = engine();
        let mut exec = Executor::new(&engine);
        assert_eq!(exec.execute_update("DELETE FROM ghosts").unwrap(), 0);
    }

    #[test]
    fn hard_errors_propagate_verbatim() {
        let engine = engine();
        let mut exec = Executor::new(&engine);
        let err = exec.execute("SELEC 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(err.to_string(), "near \"SELEC\": syntax error");
        assert_eq!(exec.update_count().unwrap(), -1);
    }

    #[test]
    fn blank_text_is_rejected_before_dispatch() {
        let engine = engine();
        let mut exec = Executor::new(&engine);
        assert!(matches!(exec.execute("  ;; "), Err(RqliteDbError::StateError(_))));
        assert!(matches!(exec.execute_update(" "), Err(RqliteDbError::StateError(_))));
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn execute_then_walk_results() {
        let engine = engine();
        let mut exec = Executor::new(&engine);
        assert!(!exec.execute("INSERT INTO t VALUES (4); UPDATE t SET id = id + 1").unwrap());
        assert_eq!(exec.update_count().unwrap(), 1);
        assert!(exec.cursor().unwrap().is_none());

        assert!(!exec.more_results().unwrap());
        assert_eq!(exec.update_count().unwrap(), 3);

        assert!(!exec.more_results().unwrap());
        assert_eq!(exec.update_count().unwrap(), -1);
        assert!(!exec.is_closed());
    }

    #[test]
    fn execute_with_rows_holds_a_cursor() {
        let engine = engine();
        let mut exec = Executor::new(&engine);
        assert!(exec.execute("SELECT id FROM t").unwrap());
        let cursor = exec.cursor().unwrap().unwrap();
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.get_int(1).unwrap(), Some(1));
        assert_eq!(exec.update_count().unwrap(), -1);
        assert!(exec.take_cursor().is_some());
        assert!(exec.cursor().unwrap().is_none());
    }

    #[test]
    fn close_on_completion_closes_after_last_result() {
        let engine = engine();
        let mut exec = Executor::new(&engine);
        exec.set_close_on_completion(true).unwrap();
        exec.execute("INSERT INTO t VALUES (4)").unwrap();
        assert!(!exec.more_results().unwrap());
        assert!(exec.is_closed());
    }

    #[test]
    fn prepared_statements_route_by_text() {
        let engine = ScriptedTransport::new()
            .with_result("SELECT name FROM users WHERE id = ?", rows(&[("name", TypeTag::Varchar)], &[&[Some("ann")]]))
            .with_result("DELETE FROM users WHERE id = ?", written(1, None));
        let mut exec = Executor::new(&engine);

        let select = Statement::new("SELECT name FROM users WHERE id = ?")
            .with_positional_param(0, 7)
            .unwrap();
        let mut cursor = exec.query_prepared(&select).unwrap();
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.get_string(1).unwrap().as_deref(), Some("ann"));
        assert!(exec.execute_prepared(&select).unwrap());

        let delete = Statement::new("DELETE FROM users WHERE id = ?")
            .with_positional_param(0, 7)
            .unwrap();
        assert_eq!(exec.update_prepared(&delete).unwrap(), 1);
        assert!(!exec.execute_prepared(&delete).unwrap());

        let calls = engine.calls();
        assert_eq!(calls[0].statements[0], select);
        assert_eq!(calls[2].endpoint, Endpoint::Execute);
    }

    #[test]
    fn transport_failures_surface_as_upstream() {
        let engine = engine();
        engine.go_offline("connection refused");
        let mut exec = Executor::new(&engine);
        let err = exec.execute_query("SELECT id FROM t").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }
}
