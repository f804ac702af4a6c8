//! In-memory [`Transport`] for tests and development: scripted results keyed
//! by SQL text, and a log of every call.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::RqliteDbError;
use crate::results::WireResult;
use crate::statement::Statement;
use crate::transport::Transport;
use crate::type_tag::TypeTag;

/// Which endpoint a recorded call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Execute,
    Query,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: Endpoint,
    pub statements: Vec<Statement>,
    pub transaction: bool,
}

/// Answers each statement with the result scripted for its exact SQL text.
///
/// Unscripted statements get a hard `unscripted statement` error result.
/// Not `Sync`; meant for single-threaded tests.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    results: RefCell<HashMap<String, WireResult>>,
    calls: RefCell<Vec<Call>>,
    offline: RefCell<Option<String>>,
    transaction_default: bool,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`respond`](Self::respond).
    #[must_use]
    pub fn with_result(self, sql: impl Into<String>, result: WireResult) -> Self {
        self.respond(sql, result);
        self
    }

    /// Default for executors built over this transport.
    #[must_use]
    pub fn with_transaction_default(mut self, transaction: bool) -> Self {
        self.transaction_default = transaction;
        self
    }

    /// Script (or replace) the result for `sql`.
    pub fn respond(&self, sql: impl Into<String>, result: WireResult) {
        self.results.borrow_mut().insert(sql.into(), result);
    }

    /// Make every following call fail at the transport level.
    pub fn go_offline(&self, message: impl Into<String>) {
        *self.offline.borrow_mut() = Some(message.into());
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// SQL text of every submitted statement, in submission order.
    #[must_use]
    pub fn sql_log(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .flat_map(|c| c.statements.iter().map(|s| s.sql().to_string()))
            .collect()
    }

    fn answer(
        &self,
        endpoint: Endpoint,
        statements: &[Statement],
        transaction: bool,
    ) -> Result<Vec<WireResult>, RqliteDbError> {
        self.calls.borrow_mut().push(Call {
            endpoint,
            statements: statements.to_vec(),
            transaction,
        });
        if let Some(message) = self.offline.borrow().as_ref() {
            return Err(RqliteDbError::Transport(message.clone()));
        }
        let results = self.results.borrow();
        Ok(statements
            .iter()
            .map(|s| {
                results.get(s.sql()).cloned().unwrap_or_else(|| {
                    WireResult::from_error(format!("unscripted statement: {}", s.sql()))
                })
            })
            .collect())
    }
}

impl Transport for ScriptedTransport {
    fn execute(
        &self,
        statements: &[Statement],
        transaction: bool,
    ) -> Result<Vec<WireResult>, RqliteDbError> {
        self.answer(Endpoint::Execute, statements, transaction)
    }

    fn query(&self, statements: &[Statement]) -> Result<Vec<WireResult>, RqliteDbError> {
        self.answer(Endpoint::Query, statements, false)
    }

    fn transaction_default(&self) -> bool {
        self.transaction_default
    }
}

/// A query result with the given layout and rows.
#[must_use]
pub fn rows(layout: &[(&str, TypeTag)], rows: &[&[Option<&str>]]) -> WireResult {
    let mut result = WireResult::with_layout(layout);
    for row in rows {
        result.add_row(row.iter().map(|c| c.map(str::to_string)).collect());
    }
    result
}

/// A write result.
#[must_use]
pub fn written(rows_affected: i64, last_insert_id: Option<i64>) -> WireResult {
    WireResult {
        rows_affected: Some(rows_affected),
        last_insert_id,
        ..WireResult::default()
    }
}
