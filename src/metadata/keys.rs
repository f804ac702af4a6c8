use crate::error::RqliteDbError;
use crate::results::WireResult;
use crate::transport::Transport;

use super::pragma::{ColumnInfo, ForeignKey};
use super::{MAIN_CATALOG, MetadataSynthesizer, cell, layouts};

/// Matches every user table in the key builders.
const ALL_TABLES: &str = "%";

// Referential action codes.
const CASCADE: i32 = 0;
const RESTRICT: i32 = 1;
const SET_NULL: i32 = 2;
const NO_ACTION: i32 = 3;
const SET_DEFAULT: i32 = 4;

const INITIALLY_DEFERRED: i32 = 5;
const SCOPE_SESSION: i32 = 2;
const NOT_PSEUDO: i32 = 1;

/// Rule code for an `ON UPDATE`/`ON DELETE` action; unknown text is no action.
pub(crate) fn rule_code(action: Option<&str>) -> i32 {
    let Some(action) = action else {
        return NO_ACTION;
    };
    match action.trim().to_ascii_uppercase().as_str() {
        "CASCADE" => CASCADE,
        "RESTRICT" => RESTRICT,
        "SET NULL" => SET_NULL,
        "SET DEFAULT" => SET_DEFAULT,
        _ => NO_ACTION,
    }
}

/// Primary-key columns in key order.
fn key_columns(columns: Vec<ColumnInfo>) -> Vec<ColumnInfo> {
    let mut keys: Vec<ColumnInfo> = columns.into_iter().filter(|c| c.pk > 0).collect();
    keys.sort_by_key(|c| c.pk);
    keys
}

fn foreign_key_row(fk_table: &str, fk: &ForeignKey) -> Vec<Option<String>> {
    vec![
        cell(MAIN_CATALOG),
        None,
        cell(&fk.table),
        fk.to.clone(),
        cell(MAIN_CATALOG),
        None,
        cell(fk_table),
        cell(&fk.from),
        cell(fk.seq + 1),
        cell(rule_code(fk.on_update.as_deref())),
        cell(rule_code(fk.on_delete.as_deref())),
        cell(format!("FK_{fk_table}_{}", fk.from)),
        cell(format!("PK_{}", fk.table)),
        cell(INITIALLY_DEFERRED),
    ]
}

impl<T: Transport> MetadataSynthesizer<T> {
    /// `%` expands to every user table; anything else names one table.
    fn key_tables(&self, table: &str) -> Result<Vec<String>, RqliteDbError> {
        if table == ALL_TABLES {
            self.user_tables()
        } else {
            Ok(vec![table.to_string()])
        }
    }

    /// Primary-key columns of `table` (or of every user table for `%`).
    /// `KEY_SEQ` counts from 1 within each table.
    ///
    /// # Errors
    /// Transport and upstream failures of the introspection queries.
    pub fn primary_keys(&self, table: &str) -> Result<WireResult, RqliteDbError> {
        let mut out = WireResult::with_layout(layouts::PRIMARY_KEYS);
        for name in self.key_tables(table)? {
            for (seq, col) in key_columns(self.table_info(&name)?).iter().enumerate() {
                out.add_row(vec![
                    cell(MAIN_CATALOG),
                    None,
                    cell(&name),
                    cell(&col.name),
                    cell(seq + 1),
                    cell(format!("PK_{name}")),
                ]);
            }
        }
        Ok(out)
    }

    /// Foreign keys declared by `table`: the parent columns it references.
    ///
    /// # Errors
    /// Transport and upstream failures of the introspection queries.
    pub fn imported_keys(&self, table: &str) -> Result<WireResult, RqliteDbError> {
        let mut out = WireResult::with_layout(layouts::FOREIGN_KEYS);
        for name in self.key_tables(table)? {
            for fk in self.foreign_keys(&name)? {
                out.add_row(foreign_key_row(&name, &fk));
            }
        }
        Ok(out)
    }

    /// Foreign keys in any user table that reference `table`.
    ///
    /// # Errors
    /// Transport and upstream failures of the introspection queries.
    pub fn exported_keys(&self, table: &str) -> Result<WireResult, RqliteDbError> {
        let mut out = WireResult::with_layout(layouts::FOREIGN_KEYS);
        for name in self.user_tables()? {
            for fk in self.foreign_keys(&name)? {
                if fk.table.eq_ignore_ascii_case(table) {
                    out.add_row(foreign_key_row(&name, &fk));
                }
            }
        }
        Ok(out)
    }

    /// Foreign keys of `foreign_table` that reference `parent_table`.
    ///
    /// # Errors
    /// Transport and upstream failures of the introspection queries.
    pub fn cross_reference(
        &self,
        parent_table: &str,
        foreign_table: &str,
    ) -> Result<WireResult, RqliteDbError> {
        let mut out = WireResult::with_layout(layouts::FOREIGN_KEYS);
        for fk in self.foreign_keys(foreign_table)? {
            if fk.table.eq_ignore_ascii_case(parent_table) {
                out.add_row(foreign_key_row(foreign_table, &fk));
            }
        }
        Ok(out)
    }

    /// Primary-key columns usable as a row identifier. With `nullable`
    /// false, columns that may hold NULL are left out; a lone `INTEGER`
    /// primary key aliases the rowid and never does.
    ///
    /// # Errors
    /// Transport and upstream failures of the introspection queries.
    pub fn best_row_identifier(
        &self,
        table: &str,
        nullable: bool,
    ) -> Result<WireResult, RqliteDbError> {
        let keys = key_columns(self.table_info(table)?);
        let rowid_alias = keys.len() == 1 && keys[0].declared.eq_ignore_ascii_case("INTEGER");
        let mut out = WireResult::with_layout(layouts::BEST_ROW);
        for col in &keys {
            if !nullable && !col.not_null && !rowid_alias {
                continue;
            }
            let tag = col.tag();
            out.add_row(vec![
                cell(SCOPE_SESSION),
                cell(&col.name),
                cell(tag.sql_type().code()),
                cell(col.type_name()),
                cell(tag.precision()),
                cell(0),
                cell(0),
                cell(NOT_PSEUDO),
            ]);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{CATALOG_SQL, catalog, table_info};
    use super::*;
    use crate::cursor::Cursor;
    use crate::test_utils::ScriptedTransport;
    use crate::type_tag::TypeTag;

    fn foreign_key_list(keys: &[(i64, &str, &str, Option<&str>, &str, &str)]) -> WireResult {
        let mut out = WireResult::with_layout(&[
            ("id", TypeTag::Integer),
            ("seq", TypeTag::Integer),
            ("table", TypeTag::Text),
            ("from", TypeTag::Text),
            ("to", TypeTag::Text),
            ("on_update", TypeTag::Text),
            ("on_delete", TypeTag::Text),
            ("match", TypeTag::Text),
        ]);
        for (id, (seq, table, from, to, on_update, on_delete)) in keys.iter().enumerate() {
            out.add_row(vec![
                cell(id),
                cell(seq),
                cell(table),
                cell(from),
                to.map(str::to_string),
                cell(on_update),
                cell(on_delete),
                cell("NONE"),
            ]);
        }
        out
    }

    fn engine() -> ScriptedTransport {
        ScriptedTransport::new()
            .with_result(
                CATALOG_SQL,
                catalog(&[("items", "table"), ("orders", "table"), ("users", "table")]),
            )
            .with_result(
                "PRAGMA table_info('users')",
                table_info(&[("id", "INTEGER", false, None, 1), ("email", "TEXT", true, None, 0)]),
            )
            .with_result(
                "PRAGMA table_info('items')",
                table_info(&[
                    ("sku", "TEXT", false, None, 2),
                    ("order_id", "INTEGER", true, None, 1),
                    ("qty", "INTEGER", false, Some("1"), 0),
                ]),
            )
            .with_result("PRAGMA table_info('orders')", table_info(&[("id", "INTEGER", false, None, 1)]))
            .with_result(
                "PRAGMA foreign_key_list('orders')",
                foreign_key_list(&[(0, "users", "user_id", Some("id"), "NO ACTION", "CASCADE")]),
            )
            .with_result(
                "PRAGMA foreign_key_list('items')",
                foreign_key_list(&[(0, "orders", "order_id", None, "SET NULL", "whatever")]),
            )
            .with_result("PRAGMA foreign_key_list('users')", foreign_key_list(&[]))
    }

    #[test]
    fn rule_codes_default_to_no_action() {
        assert_eq!(rule_code(Some("cascade")), CASCADE);
        assert_eq!(rule_code(Some("SET DEFAULT")), SET_DEFAULT);
        assert_eq!(rule_code(Some("RESTRICT")), RESTRICT);
        assert_eq!(rule_code(Some("bogus")), NO_ACTION);
        assert_eq!(rule_code(None), NO_ACTION);
    }

    #[test]
    fn composite_primary_key_in_key_order() {
        let engine = engine();
        let meta = MetadataSynthesizer::new(&engine);
        let pk = meta.primary_keys("items").unwrap();
        assert_eq!(pk.row_count(), 2);
        assert_eq!(pk.get(0, "COLUMN_NAME"), Some("order_id"));
        assert_eq!(pk.get(0, "KEY_SEQ"), Some("1"));
        assert_eq!(pk.get(1, "COLUMN_NAME"), Some("sku"));
        assert_eq!(pk.get(1, "KEY_SEQ"), Some("2"));
        assert_eq!(pk.get(1, "PK_NAME"), Some("PK_items"));
    }

    #[test]
    fn percent_expands_to_user_tables() {
        let engine = engine();
        let meta = MetadataSynthesizer::new(&engine);
        let pk = meta.primary_keys("%").unwrap();
        let tables: Vec<_> = (0..pk.row_count()).filter_map(|r| pk.get(r, "TABLE_NAME")).collect();
        assert_eq!(tables, vec!["items", "items", "orders", "users"]);
    }

    #[test]
    fn imported_keys_map_rules_and_names() {
        let engine = engine();
        let meta = MetadataSynthesizer::new(&engine);
        let mut cursor = Cursor::new(meta.imported_keys("orders").unwrap());
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.get_string("PKTABLE_NAME").unwrap().as_deref(), Some("users"));
        assert_eq!(cursor.get_string("PKCOLUMN_NAME").unwrap().as_deref(), Some("id"));
        assert_eq!(cursor.get_string("FKCOLUMN_NAME").unwrap().as_deref(), Some("user_id"));
        assert_eq!(cursor.get_short("KEY_SEQ").unwrap(), Some(1));
        assert_eq!(cursor.get_short("UPDATE_RULE").unwrap(), Some(3));
        assert_eq!(cursor.get_short("DELETE_RULE").unwrap(), Some(0));
        assert_eq!(cursor.get_string("FK_NAME").unwrap().as_deref(), Some("FK_orders_user_id"));
        assert_eq!(cursor.get_string("PK_NAME").unwrap().as_deref(), Some("PK_users"));
        assert!(!cursor.advance().unwrap());
    }

    #[test]
    fn exported_keys_scan_every_table() {
        let engine = engine();
        let meta = MetadataSynthesizer::new(&engine);
        let exported = meta.exported_keys("ORDERS").unwrap();
        assert_eq!(exported.row_count(), 1);
        assert_eq!(exported.get(0, "FKTABLE_NAME"), Some("items"));
        assert_eq!(exported.get(0, "PKCOLUMN_NAME"), None);
        assert_eq!(exported.get(0, "UPDATE_RULE"), Some("2"));
        assert_eq!(exported.get(0, "DELETE_RULE"), Some("3"));
    }

    #[test]
    fn cross_reference_filters_by_parent() {
        let engine = engine();
        let meta = MetadataSynthesizer::new(&engine);
        assert_eq!(meta.cross_reference("users", "orders").unwrap().row_count(), 1);
        assert_eq!(meta.cross_reference("items", "orders").unwrap().row_count(), 0);
    }

    #[test]
    fn best_row_identifier_respects_nullability() {
        let engine = engine();
        let meta = MetadataSynthesizer::new(&engine);

        let users = meta.best_row_identifier("users", false).unwrap();
        assert_eq!(users.row_count(), 1);
        assert_eq!(users.get(0, "SCOPE"), Some("2"));
        assert_eq!(users.get(0, "PSEUDO_COLUMN"), Some("1"));

        let items = meta.best_row_identifier("items", false).unwrap();
        assert_eq!(items.row_count(), 1);
        assert_eq!(items.get(0, "COLUMN_NAME"), Some("order_id"));
        assert_eq!(meta.best_row_identifier("items", true).unwrap().row_count(), 2);
    }
}
