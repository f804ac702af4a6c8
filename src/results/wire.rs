use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::RqliteDbError;
use crate::type_tag::TypeTag;

/// Upstream error text that is treated as an empty result rather than a failure.
const SOFT_ERROR_MARKER: &str = "no such table";

/// One statement's outcome: column names, wire type tags, string cells and
/// optional write counters or error.
///
/// A result whose [`error`](Self::error) is set is terminal; its columns and
/// rows carry no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireResult {
    pub columns: Vec<String>,
    pub types: Vec<String>,
    pub values: Vec<Vec<Option<String>>>,
    pub rows_affected: Option<i64>,
    pub last_insert_id: Option<i64>,
    pub error: Option<String>,
    pub time: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<JsonValue>>,
    rows_affected: Option<i64>,
    last_insert_id: Option<i64>,
    error: Option<String>,
    time: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    results: Vec<RawResult>,
    time: Option<f64>,
}

/// JSON `null` is an absent cell; other scalars keep their JSON text.
fn cell_text(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl From<RawResult> for WireResult {
    fn from(raw: RawResult) -> Self {
        WireResult {
            columns: raw.columns,
            types: raw.types,
            values: raw
                .values
                .into_iter()
                .map(|row| row.into_iter().map(cell_text).collect())
                .collect(),
            rows_affected: raw.rows_affected,
            last_insert_id: raw.last_insert_id,
            error: raw.error,
            time: raw.time,
        }
    }
}

impl WireResult {
    /// Empty result with the given column layout.
    #[must_use]
    pub fn with_layout(layout: &[(&str, TypeTag)]) -> Self {
        WireResult {
            columns: layout.iter().map(|(name, _)| (*name).to_string()).collect(),
            types: layout.iter().map(|(_, tag)| tag.name().to_string()).collect(),
            ..WireResult::default()
        }
    }

    /// Result carrying only an upstream error message.
    #[must_use]
    pub fn from_error(message: impl Into<String>) -> Self {
        WireResult {
            error: Some(message.into()),
            ..WireResult::default()
        }
    }

    /// Append one row. Short rows are padded with absent cells.
    pub fn add_row(&mut self, row: Vec<Option<String>>) -> &mut Self {
        let mut row = row;
        if row.len() < self.columns.len() {
            row.resize(self.columns.len(), None);
        }
        self.values.push(row);
        self
    }

    /// Whether this result must be surfaced as a failure.
    ///
    /// Errors naming a missing table are tolerated and read as empty results.
    /// This is provisional until the engine reports structured error codes.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error
            .as_deref()
            .is_some_and(|e| !e.contains(SOFT_ERROR_MARKER))
    }

    /// Whether an error is present but tolerated by [`is_error`](Self::is_error).
    #[must_use]
    pub fn is_soft_error(&self) -> bool {
        self.error.is_some() && !self.is_error()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    /// Zero-based index of a column, compared case-insensitively.
    #[must_use]
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
    }

    /// Raw cell text by zero-based row and column name.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.index_of(column)?;
        self.values.get(row)?.get(idx)?.as_deref()
    }

    /// Parsed wire tag of a zero-based column.
    ///
    /// # Errors
    /// Returns [`RqliteDbError::InvalidColumn`] for an index past the last
    /// column and [`RqliteDbError::UnknownTypeTag`] for a tag outside the
    /// known set.
    pub fn type_tag(&self, column: usize) -> Result<TypeTag, RqliteDbError> {
        let raw = self
            .types
            .get(column)
            .ok_or_else(|| RqliteDbError::InvalidColumn(format!("{}", column + 1)))?;
        TypeTag::parse(raw).ok_or_else(|| RqliteDbError::UnknownTypeTag {
            column: column + 1,
            tag: raw.clone(),
        })
    }

    /// Keep at most `max_rows` rows; `0` means no limit.
    pub fn truncate(&mut self, max_rows: usize) {
        if max_rows > 0 {
            self.values.truncate(max_rows);
        }
    }
}

/// A decoded response body: one result per submitted statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireResponse {
    pub results: Vec<WireResult>,
    pub time: Option<f64>,
}

impl WireResponse {
    /// Decode a `{"results": [...], "time": ...}` payload.
    ///
    /// # Errors
    /// Returns [`RqliteDbError::Json`] when the body is not valid JSON of that shape.
    pub fn from_json(body: &str) -> Result<Self, RqliteDbError> {
        let raw: RawResponse = serde_json::from_str(body)?;
        Ok(WireResponse {
            results: raw.results.into_iter().map(WireResult::from).collect(),
            time: raw.time,
        })
    }

    #[must_use]
    pub fn first(&self) -> Option<&WireResult> {
        self.results.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_query_payload() {
        let body = r#"{"results":[{"columns":["id","name","score","ok"],
            "types":["integer","text","real","boolean"],
            "values":[[1,"fiona",1.5,true],[2,null,null,false]],"time":0.01}],"time":0.02}"#;
        let resp = WireResponse::from_json(body).unwrap();
        let res = resp.first().unwrap();
        assert_eq!(res.column_count(), 4);
        assert_eq!(res.values[0][0].as_deref(), Some("1"));
        assert_eq!(res.values[0][2].as_deref(), Some("1.5"));
        assert_eq!(res.values[0][3].as_deref(), Some("true"));
        assert_eq!(res.values[1][1], None);
        assert_eq!(res.get(0, "NAME"), Some("fiona"));
        assert_eq!(resp.time, Some(0.02));
    }

    #[test]
    fn decodes_execute_payload() {
        let body = r#"{"results":[{"last_insert_id":7,"rows_affected":1},{"error":"near \"x\": syntax error"}]}"#;
        let resp = WireResponse::from_json(body).unwrap();
        assert_eq!(resp.results[0].rows_affected, Some(1));
        assert_eq!(resp.results[0].last_insert_id, Some(7));
        assert!(!resp.results[0].is_error());
        assert!(resp.results[1].is_error());
    }

    #[test]
    fn missing_table_errors_are_soft() {
        let res = WireResult::from_error("no such table: ghosts");
        assert!(!res.is_error());
        assert!(res.is_soft_error());
    }

    #[test]
    fn rejects_non_json_bodies() {
        assert!(matches!(
            WireResponse::from_json("<html>"),
            Err(RqliteDbError::Json(_))
        ));
    }

    #[test]
    fn layout_rows_pad_and_report_tags() {
        let mut res = WireResult::with_layout(&[("A", TypeTag::Varchar), ("B", TypeTag::Integer)]);
        res.add_row(vec![Some("x".into())]);
        assert_eq!(res.values[0], vec![Some("x".to_string()), None]);
        assert_eq!(res.type_tag(1).unwrap(), TypeTag::Integer);
        assert!(matches!(
            res.type_tag(2),
            Err(RqliteDbError::InvalidColumn(_))
        ));
    }

    #[test]
    fn unknown_tags_surface_on_access() {
        let res = WireResult {
            columns: vec!["g".into()],
            types: vec!["geometry".into()],
            ..WireResult::default()
        };
        assert!(matches!(
            res.type_tag(0),
            Err(RqliteDbError::UnknownTypeTag { column: 1, .. })
        ));
    }
}
