//! Standard metadata row sets built from the engine's catalog and pragmas.
//!
//! Every builder returns a [`WireResult`] with a fixed column layout, so the
//! rows can be read through a [`Cursor`](crate::cursor::Cursor) like any
//! query result.

mod capabilities;
mod indexes;
mod keys;
pub(crate) mod layouts;
mod pattern;
mod pragma;
mod type_info;

use std::cell::OnceCell;

pub use capabilities::{
    IDENTIFIER_QUOTE, NUMERIC_FUNCTIONS, PRODUCT_NAME, SEARCH_STRING_ESCAPE, SQL_KEYWORDS,
    STRING_FUNCTIONS, SYSTEM_FUNCTIONS, TIME_DATE_FUNCTIONS,
};
pub use pattern::LikePattern;

use crate::error::RqliteDbError;
use crate::results::WireResult;
use crate::statement::Statement;
use crate::transport::Transport;

/// The only catalog the engine exposes.
pub const MAIN_CATALOG: &str = "main";

/// Table-type names reported in `TABLE_TYPE`.
pub const TABLE_TYPES: [&str; 2] = ["TABLE", "VIEW"];

const SYSTEM_TABLE_PREFIX: &str = "sqlite";

/// Wraps a value as a present cell.
pub(crate) fn cell(value: impl ToString) -> Option<String> {
    Some(value.to_string())
}

/// Synthesizes metadata row sets over a [`Transport`].
///
/// ```rust
/// use rqlite_middleware::prelude::*;
/// use rqlite_middleware::test_utils::{ScriptedTransport, rows};
///
/// let engine = ScriptedTransport::new().with_result(
///     "SELECT name, type FROM sqlite_master WHERE type IN ('table', 'view') ORDER BY name",
///     rows(
///         &[("name", TypeTag::Text), ("type", TypeTag::Text)],
///         &[&[Some("users"), Some("table")]],
///     ),
/// );
/// let meta = MetadataSynthesizer::new(&engine);
/// let mut cursor = Cursor::new(meta.tables(Some("us%"), None)?);
/// assert!(cursor.advance()?);
/// assert_eq!(cursor.get_string("TABLE_NAME")?.as_deref(), Some("users"));
/// # Ok::<(), RqliteDbError>(())
/// ```
#[derive(Debug)]
pub struct MetadataSynthesizer<T: Transport> {
    transport: T,
    version: OnceCell<String>,
}

impl<T: Transport> MetadataSynthesizer<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            version: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn introspect(&self, sql: impl Into<String>) -> Result<WireResult, RqliteDbError> {
        let sql = sql.into();
        tracing::trace!("metadata query: {}", sql);
        self.transport.query_single(Statement::new(sql))
    }

    /// `(name, TABLE_TYPE)` of every table and view, ordered by name.
    fn catalog_entries(&self) -> Result<Vec<(String, String)>, RqliteDbError> {
        let result = self.introspect(
            "SELECT name, type FROM sqlite_master WHERE type IN ('table', 'view') ORDER BY name",
        )?;
        Ok((0..result.row_count())
            .filter_map(|row| {
                let name = result.get(row, "name")?;
                let kind = result.get(row, "type")?;
                Some((name.to_string(), kind.to_ascii_uppercase()))
            })
            .collect())
    }

    /// Tables and views whose name matches `table_pattern`, optionally
    /// limited to the given table types (`TABLE`, `VIEW`, any case).
    ///
    /// # Errors
    /// Transport and upstream failures of the catalog query.
    pub fn tables(
        &self,
        table_pattern: Option<&str>,
        types: Option<&[&str]>,
    ) -> Result<WireResult, RqliteDbError> {
        let pattern = LikePattern::new(table_pattern)?;
        let mut out = WireResult::with_layout(layouts::TABLES);
        for (name, kind) in self.catalog_entries()? {
            let wanted = types.is_none_or(|ts| ts.iter().any(|t| t.eq_ignore_ascii_case(&kind)));
            if wanted && pattern.matches(&name) {
                out.add_row(vec![cell(MAIN_CATALOG), None, cell(name), cell(kind)]);
            }
        }
        Ok(out)
    }

    /// Names of ordinary tables, excluding the engine's own `sqlite*` tables.
    ///
    /// # Errors
    /// Transport and upstream failures of the catalog query.
    pub fn user_tables(&self) -> Result<Vec<String>, RqliteDbError> {
        Ok(self
            .catalog_entries()?
            .into_iter()
            .filter(|(name, kind)| kind == "TABLE" && !name.starts_with(SYSTEM_TABLE_PREFIX))
            .map(|(name, _)| name)
            .collect())
    }

    /// Single row naming the `main` catalog.
    #[must_use]
    pub fn catalogs(&self) -> WireResult {
        let mut out = WireResult::with_layout(layouts::CATALOGS);
        out.add_row(vec![cell(MAIN_CATALOG)]);
        out
    }

    /// The engine has no schemas; always empty.
    #[must_use]
    pub fn schemas(&self) -> WireResult {
        WireResult::with_layout(layouts::SCHEMAS)
    }

    #[must_use]
    pub fn table_types(&self) -> WireResult {
        let mut out = WireResult::with_layout(layouts::TABLE_TYPES);
        for kind in TABLE_TYPES {
            out.add_row(vec![cell(kind)]);
        }
        out
    }

    /// Columns of every table or view matching `table_pattern` whose name
    /// matches `column_pattern`.
    ///
    /// `ORDINAL_POSITION` counts from 1 within each table, before column
    /// filtering.
    ///
    /// # Errors
    /// Transport and upstream failures of the catalog or pragma queries.
    pub fn columns(
        &self,
        table_pattern: Option<&str>,
        column_pattern: Option<&str>,
    ) -> Result<WireResult, RqliteDbError> {
        let tables = LikePattern::new(table_pattern)?;
        let columns = LikePattern::new(column_pattern)?;
        let mut out = WireResult::with_layout(layouts::COLUMNS);
        for (table, _) in self.catalog_entries()? {
            if !tables.matches(&table) {
                continue;
            }
            for (ordinal, col) in self.table_info(&table)?.into_iter().enumerate() {
                if !columns.matches(&col.name) {
                    continue;
                }
                let tag = col.tag();
                let code = tag.sql_type().code();
                let precision = tag.precision();
                let yes_no = |b: bool| cell(if b { "YES" } else { "NO" });
                out.add_row(vec![
                    cell(MAIN_CATALOG),
                    None,
                    cell(&table),
                    cell(&col.name),
                    cell(code),
                    cell(col.type_name()),
                    cell(precision),
                    cell(0),
                    cell(0),
                    cell(10),
                    cell(if col.not_null { 0 } else { 1 }),
                    None,
                    col.default.clone(),
                    cell(code),
                    cell(0),
                    cell(precision),
                    cell(ordinal + 1),
                    yes_no(!col.not_null),
                    None,
                    None,
                    None,
                    None,
                    yes_no(col.is_autoincrement()),
                    yes_no(false),
                ]);
            }
        }
        Ok(out)
    }

    /// Engine version from `sqlite_version()`, fetched once per synthesizer.
    ///
    /// # Errors
    /// Transport and upstream failures, or an empty version result.
    pub fn product_version(&self) -> Result<String, RqliteDbError> {
        if let Some(version) = self.version.get() {
            return Ok(version.clone());
        }
        let result = self.introspect("SELECT sqlite_version()")?;
        let version = result
            .values
            .first()
            .and_then(|row| row.first())
            .and_then(Clone::clone)
            .ok_or_else(|| RqliteDbError::Transport("sqlite_version() returned no row".into()))?;
        tracing::debug!("engine version {}", version);
        Ok(self.version.get_or_init(|| version).clone())
    }
}
