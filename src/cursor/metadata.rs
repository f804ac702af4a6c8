use crate::error::RqliteDbError;
use crate::results::WireResult;
use crate::type_tag::TypeTag;

/// Nullability of a result column. The engine never reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    NoNulls,
    Nullable,
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
struct ColumnInfo {
    label: String,
    type_name: String,
}

/// Static description of a result's columns, answered from the wire tags.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMetadata {
    columns: Vec<ColumnInfo>,
}

impl ResultMetadata {
    pub(crate) fn from_result(result: &WireResult) -> Self {
        let columns = result
            .columns
            .iter()
            .enumerate()
            .map(|(i, label)| ColumnInfo {
                label: label.clone(),
                type_name: result.types.get(i).cloned().unwrap_or_default(),
            })
            .collect();
        Self { columns }
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column(&self, column: usize) -> Result<&ColumnInfo, RqliteDbError> {
        column
            .checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .ok_or_else(|| RqliteDbError::InvalidColumn(column.to_string()))
    }

    fn tag(&self, column: usize) -> Result<TypeTag, RqliteDbError> {
        let info = self.column(column)?;
        TypeTag::parse(&info.type_name).ok_or_else(|| RqliteDbError::UnknownTypeTag {
            column,
            tag: info.type_name.clone(),
        })
    }

    /// # Errors
    /// [`RqliteDbError::InvalidColumn`] for an ordinal outside `1..=count`.
    pub fn column_label(&self, column: usize) -> Result<&str, RqliteDbError> {
        Ok(&self.column(column)?.label)
    }

    /// Column names double as labels.
    ///
    /// # Errors
    /// Same as [`column_label`](Self::column_label).
    pub fn column_name(&self, column: usize) -> Result<&str, RqliteDbError> {
        self.column_label(column)
    }

    /// The wire type name as reported, without modifiers stripped.
    ///
    /// # Errors
    /// Same as [`column_label`](Self::column_label).
    pub fn column_type_name(&self, column: usize) -> Result<&str, RqliteDbError> {
        Ok(&self.column(column)?.type_name)
    }

    /// Standard SQL type code.
    ///
    /// # Errors
    /// Also [`RqliteDbError::UnknownTypeTag`] for a tag outside the known set.
    pub fn column_type(&self, column: usize) -> Result<i32, RqliteDbError> {
        Ok(self.tag(column)?.sql_type().code())
    }

    /// # Errors
    /// Same as [`column_type`](Self::column_type).
    pub fn precision(&self, column: usize) -> Result<u32, RqliteDbError> {
        Ok(self.tag(column)?.precision())
    }

    /// # Errors
    /// Same as [`column_type`](Self::column_type).
    pub fn display_size(&self, column: usize) -> Result<u32, RqliteDbError> {
        Ok(self.tag(column)?.display_size())
    }

    /// # Errors
    /// Same as [`column_type`](Self::column_type).
    pub fn is_signed(&self, column: usize) -> Result<bool, RqliteDbError> {
        Ok(self.tag(column)?.is_signed())
    }

    /// Always 0.
    ///
    /// # Errors
    /// Same as [`column_label`](Self::column_label).
    pub fn scale(&self, column: usize) -> Result<u32, RqliteDbError> {
        self.column(column).map(|_| 0)
    }

    /// # Errors
    /// Same as [`column_label`](Self::column_label).
    pub fn nullable(&self, column: usize) -> Result<Nullability, RqliteDbError> {
        self.column(column).map(|_| Nullability::Unknown)
    }

    /// Name of the Rust type the column's cells decode to by default.
    ///
    /// # Errors
    /// Same as [`column_type`](Self::column_type).
    pub fn column_class_name(&self, column: usize) -> Result<&'static str, RqliteDbError> {
        Ok(self.tag(column)?.rust_type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;

    #[test]
    fn answers_from_static_tag_facts() {
        let res = WireResult::with_layout(&[
            ("id", TypeTag::Integer),
            ("name", TypeTag::Varchar),
            ("nothing", TypeTag::Null),
        ]);
        let meta = Cursor::new(res).metadata().unwrap();
        assert_eq!(meta.column_count(), 3);
        assert_eq!(meta.column_label(2).unwrap(), "name");
        assert_eq!(meta.column_type(1).unwrap(), 4);
        assert_eq!(meta.column_type(2).unwrap(), 12);
        assert_eq!(meta.precision(1).unwrap(), 10);
        assert_eq!(meta.display_size(1).unwrap(), 11);
        assert_eq!(meta.display_size(3).unwrap(), 4);
        assert!(meta.is_signed(1).unwrap());
        assert!(!meta.is_signed(2).unwrap());
        assert_eq!(meta.scale(2).unwrap(), 0);
        assert_eq!(meta.nullable(1).unwrap(), Nullability::Unknown);
        assert_eq!(meta.column_class_name(2).unwrap(), "String");
    }

    #[test]
    fn rejects_bad_ordinals_and_tags() {
        let res = WireResult {
            columns: vec!["g".into()],
            types: vec!["geometry".into()],
            ..WireResult::default()
        };
        let meta = ResultMetadata::from_result(&res);
        assert!(matches!(meta.column_label(0), Err(RqliteDbError::InvalidColumn(_))));
        assert!(matches!(meta.column_label(2), Err(RqliteDbError::InvalidColumn(_))));
        assert_eq!(meta.column_type_name(1).unwrap(), "geometry");
        assert!(matches!(
            meta.column_type(1),
            Err(RqliteDbError::UnknownTypeTag { column: 1, .. })
        ));
    }
}
