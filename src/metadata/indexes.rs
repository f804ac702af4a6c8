use crate::error::RqliteDbError;
use crate::results::WireResult;
use crate::transport::Transport;

use super::{MAIN_CATALOG, MetadataSynthesizer, cell, layouts};

const INDEX_OTHER: i32 = 3;
const PRIMARY_KEY_ORIGIN: &str = "pk";

fn index_row(
    table: &str,
    index: &str,
    unique: bool,
    ordinal: usize,
    column: Option<String>,
    descending: bool,
) -> Vec<Option<String>> {
    vec![
        cell(MAIN_CATALOG),
        None,
        cell(table),
        cell(!unique),
        None,
        cell(index),
        cell(INDEX_OTHER),
        cell(ordinal),
        column,
        cell(if descending { "D" } else { "A" }),
        cell(0),
        cell(0),
        None,
    ]
}

impl<T: Transport> MetadataSynthesizer<T> {
    /// Index columns of `table`. The primary key is reported first as
    /// `PK_IDX_<table>`, then each declared index; `unique` skips
    /// non-unique indexes. `ORDINAL_POSITION` counts from 1 within each index.
    ///
    /// # Errors
    /// Transport and upstream failures of the introspection queries.
    pub fn index_info(&self, table: &str, unique: bool) -> Result<WireResult, RqliteDbError> {
        let mut out = WireResult::with_layout(layouts::INDEX_INFO);

        let mut keys: Vec<_> = self.table_info(table)?.into_iter().filter(|c| c.pk > 0).collect();
        keys.sort_by_key(|c| c.pk);
        let pk_index = format!("PK_IDX_{table}");
        for (i, col) in keys.into_iter().enumerate() {
            out.add_row(index_row(table, &pk_index, true, i + 1, Some(col.name), false));
        }

        for index in self.index_list(table)? {
            if unique && !index.unique {
                continue;
            }
            // already reported as PK_IDX_
            if index.origin.as_deref() == Some(PRIMARY_KEY_ORIGIN) {
                continue;
            }
            let columns = self.index_columns(&index.name)?;
            let key_columns = columns.into_iter().filter(|c| c.cid >= 0 && c.key);
            for (i, col) in key_columns.enumerate() {
                out.add_row(index_row(
                    table,
                    &index.name,
                    index.unique,
                    i + 1,
                    col.name,
                    col.descending,
                ));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::table_info;
    use super::*;
    use crate::cursor::Cursor;
    use crate::test_utils::{ScriptedTransport, rows};
    use crate::type_tag::TypeTag;

    fn engine() -> ScriptedTransport {
        let list = rows(
            &[
                ("seq", TypeTag::Integer),
                ("name", TypeTag::Text),
                ("unique", TypeTag::Integer),
                ("origin", TypeTag::Text),
                ("partial", TypeTag::Integer),
            ],
            &[
                &[Some("0"), Some("idx_email"), Some("1"), Some("u"), Some("0")],
                &[Some("1"), Some("idx_name_age"), Some("0"), Some("c"), Some("0")],
                &[Some("2"), Some("sqlite_autoindex_people_1"), Some("1"), Some("pk"), Some("0")],
            ],
        );
        let xinfo_layout = [
            ("seqno", TypeTag::Integer),
            ("cid", TypeTag::Integer),
            ("name", TypeTag::Text),
            ("desc", TypeTag::Integer),
            ("coll", TypeTag::Text),
            ("key", TypeTag::Integer),
        ];
        ScriptedTransport::new()
            .with_result(
                "PRAGMA table_info('people')",
                table_info(&[("id", "INTEGER", false, None, 1), ("email", "TEXT", true, None, 0)]),
            )
            .with_result("PRAGMA index_list('people')", list)
            .with_result(
                "PRAGMA index_xinfo('idx_email')",
                rows(
                    &xinfo_layout,
                    &[
                        &[Some("0"), Some("1"), Some("email"), Some("0"), Some("BINARY"), Some("1")],
                        &[Some("1"), Some("-1"), None, Some("0"), Some("BINARY"), Some("0")],
                    ],
                ),
            )
            .with_result(
                "PRAGMA index_xinfo('idx_name_age')",
                rows(
                    &xinfo_layout,
                    &[
                        &[Some("0"), Some("2"), Some("name"), Some("0"), Some("BINARY"), Some("1")],
                        &[Some("1"), Some("3"), Some("age"), Some("1"), Some("BINARY"), Some("1")],
                        &[Some("2"), Some("-1"), None, Some("0"), Some("BINARY"), Some("0")],
                    ],
                ),
            )
    }

    #[test]
    fn primary_key_then_declared_indexes() {
        let engine = engine();
        let meta = MetadataSynthesizer::new(&engine);
        let result = meta.index_info("people", false).unwrap();
        assert_eq!(result.row_count(), 4);

        let mut cursor = Cursor::new(result);
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.get_string("INDEX_NAME").unwrap().as_deref(), Some("PK_IDX_people"));
        assert_eq!(cursor.get_bool("NON_UNIQUE").unwrap(), Some(false));
        assert_eq!(cursor.get_short("TYPE").unwrap(), Some(3));

        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.get_string("INDEX_NAME").unwrap().as_deref(), Some("idx_email"));
        assert_eq!(cursor.get_short("ORDINAL_POSITION").unwrap(), Some(1));

        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.get_bool("NON_UNIQUE").unwrap(), Some(true));
        assert_eq!(cursor.get_string("ASC_OR_DESC").unwrap().as_deref(), Some("A"));

        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.get_string("COLUMN_NAME").unwrap().as_deref(), Some("age"));
        assert_eq!(cursor.get_short("ORDINAL_POSITION").unwrap(), Some(2));
        assert_eq!(cursor.get_string("ASC_OR_DESC").unwrap().as_deref(), Some("D"));
        assert_eq!(cursor.get_long("CARDINALITY").unwrap(), Some(0));
    }

    #[test]
    fn unique_only_skips_plain_indexes() {
        let engine = engine();
        let meta = MetadataSynthesizer::new(&engine);
        let result = meta.index_info("people", true).unwrap();
        assert_eq!(result.row_count(), 2);
        assert!(
            !engine
                .sql_log()
                .contains(&"PRAGMA index_xinfo('idx_name_age')".to_string())
        );
    }
}
