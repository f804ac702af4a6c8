//! Typed readers over the engine's introspection pragmas.

use crate::error::RqliteDbError;
use crate::results::WireResult;
use crate::transport::Transport;
use crate::type_tag::TypeTag;

use super::MetadataSynthesizer;

/// `PRAGMA name('arg')` with the argument quoted as a string literal.
fn pragma(name: &str, arg: &str) -> String {
    format!("PRAGMA {name}('{}')", arg.replace('\'', "''"))
}

fn text(result: &WireResult, row: usize, column: &str) -> Option<String> {
    result.get(row, column).map(str::to_string)
}

fn required(result: &WireResult, row: usize, column: &str) -> Result<String, RqliteDbError> {
    text(result, row, column).ok_or_else(|| {
        RqliteDbError::Transport(format!("introspection row {row} has no {column} value"))
    })
}

fn int(result: &WireResult, row: usize, column: &str) -> i64 {
    result
        .get(row, column)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn flag(result: &WireResult, row: usize, column: &str) -> bool {
    result
        .get(row, column)
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// One row of `table_info`.
#[derive(Debug, Clone)]
pub(crate) struct ColumnInfo {
    pub(crate) name: String,
    pub(crate) declared: String,
    pub(crate) not_null: bool,
    pub(crate) default: Option<String>,
    /// Position within the primary key, 0 when not part of it.
    pub(crate) pk: i64,
}

impl ColumnInfo {
    pub(crate) fn tag(&self) -> TypeTag {
        TypeTag::from_declared(&self.declared)
    }

    /// The declared type, or the tag name when none was declared.
    pub(crate) fn type_name(&self) -> &str {
        if self.declared.is_empty() {
            self.tag().name()
        } else {
            &self.declared
        }
    }

    /// Primary key, integer type, no explicit default.
    pub(crate) fn is_autoincrement(&self) -> bool {
        self.pk == 1
            && self.declared.to_ascii_uppercase().contains("INTEGER")
            && self
                .default
                .as_deref()
                .is_none_or(|d| d.eq_ignore_ascii_case("null"))
    }
}

/// One row of `foreign_key_list`.
#[derive(Debug, Clone)]
pub(crate) struct ForeignKey {
    pub(crate) seq: i64,
    /// Referenced (parent) table.
    pub(crate) table: String,
    pub(crate) from: String,
    /// Referenced column; absent when the parent's primary key is implied.
    pub(crate) to: Option<String>,
    pub(crate) on_update: Option<String>,
    pub(crate) on_delete: Option<String>,
}

/// One row of `index_list`.
#[derive(Debug, Clone)]
pub(crate) struct IndexEntry {
    pub(crate) name: String,
    pub(crate) unique: bool,
    /// `c` (CREATE INDEX), `u` (UNIQUE constraint) or `pk`.
    pub(crate) origin: Option<String>,
}

/// One row of `index_xinfo`.
#[derive(Debug, Clone)]
pub(crate) struct IndexColumn {
    pub(crate) cid: i64,
    pub(crate) name: Option<String>,
    pub(crate) descending: bool,
    /// False for the auxiliary columns trailing the key columns.
    pub(crate) key: bool,
}

impl<T: Transport> MetadataSynthesizer<T> {
    pub(crate) fn table_info(&self, table: &str) -> Result<Vec<ColumnInfo>, RqliteDbError> {
        let result = self.introspect(pragma("table_info", table))?;
        (0..result.row_count())
            .map(|row| {
                Ok(ColumnInfo {
                    name: required(&result, row, "name")?,
                    declared: text(&result, row, "type").unwrap_or_default(),
                    not_null: flag(&result, row, "notnull"),
                    default: text(&result, row, "dflt_value"),
                    pk: int(&result, row, "pk"),
                })
            })
            .collect()
    }

    pub(crate) fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>, RqliteDbError> {
        let result = self.introspect(pragma("foreign_key_list", table))?;
        (0..result.row_count())
            .map(|row| {
                Ok(ForeignKey {
                    seq: int(&result, row, "seq"),
                    table: required(&result, row, "table")?,
                    from: required(&result, row, "from")?,
                    to: text(&result, row, "to"),
                    on_update: text(&result, row, "on_update"),
                    on_delete: text(&result, row, "on_delete"),
                })
            })
            .collect()
    }

    pub(crate) fn index_list(&self, table: &str) -> Result<Vec<IndexEntry>, RqliteDbError> {
        let result = self.introspect(pragma("index_list", table))?;
        (0..result.row_count())
            .map(|row| {
                Ok(IndexEntry {
                    name: required(&result, row, "name")?,
                    unique: flag(&result, row, "unique"),
                    origin: text(&result, row, "origin"),
                })
            })
            .collect()
    }

    pub(crate) fn index_columns(&self, index: &str) -> Result<Vec<IndexColumn>, RqliteDbError> {
        let result = self.introspect(pragma("index_xinfo", index))?;
        let has_key = result.index_of("key").is_some();
        Ok((0..result.row_count())
            .map(|row| IndexColumn {
                cid: int(&result, row, "cid"),
                name: text(&result, row, "name"),
                descending: flag(&result, row, "desc"),
                key: !has_key || flag(&result, row, "key"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pragma_arguments_are_quoted() {
        assert_eq!(pragma("table_info", "users"), "PRAGMA table_info('users')");
        assert_eq!(pragma("table_info", "o'brien"), "PRAGMA table_info('o''brien')");
    }

    #[test]
    fn autoincrement_needs_integer_pk_without_default() {
        let mut col = ColumnInfo {
            name: "id".into(),
            declared: "integer".into(),
            not_null: false,
            default: None,
            pk: 1,
        };
        assert!(col.is_autoincrement());
        col.default = Some("NULL".into());
        assert!(col.is_autoincrement());
        col.default = Some("7".into());
        assert!(!col.is_autoincrement());
        col.default = None;
        col.declared = "TEXT".into();
        assert!(!col.is_autoincrement());
    }

    #[test]
    fn undeclared_type_reports_affinity_name() {
        let col = ColumnInfo {
            name: "x".into(),
            declared: String::new(),
            not_null: false,
            default: None,
            pk: 0,
        };
        assert_eq!(col.type_name(), "BLOB");
    }
}
