use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::coercion::coerce_parameter;
use crate::error::RqliteDbError;
use crate::type_tag::{SqlType, TypeTag};
use crate::types::ParamValue;

/// Bound parameters of one statement. Positional and named values never coexist.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Params {
    #[default]
    Empty,
    /// Zero-based, possibly sparse; gaps hold [`ParamValue::Null`].
    Positional(Vec<ParamValue>),
    Named(BTreeMap<String, ParamValue>),
}

impl Params {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Params::Empty => 0,
            Params::Positional(values) => values.len(),
            Params::Named(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A SQL string and its bound parameters, ready for submission.
///
/// ```rust
/// use rqlite_middleware::prelude::*;
///
/// let stmt = Statement::new("INSERT INTO t (id, name) VALUES (?, ?)")
///     .with_positional_param(0, 1)?
///     .with_positional_param(1, "alice")?;
/// assert_eq!(stmt.build()?, serde_json::json!(["INSERT INTO t (id, name) VALUES (?, ?)", 1, "alice"]));
/// # Ok::<(), RqliteDbError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Params,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Params::Empty,
        }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Number of bound parameters (including gaps in a sparse positional list).
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.params.len()
    }

    /// Whether the text reads as a query (contains `SELECT`, any case).
    #[must_use]
    pub fn is_select(&self) -> bool {
        self.sql.to_ascii_uppercase().contains("SELECT")
    }

    fn positional_mut(&mut self) -> Result<&mut Vec<ParamValue>, RqliteDbError> {
        if let Params::Named(named) = &self.params
            && !named.is_empty()
        {
            return Err(RqliteDbError::StateError(
                "named parameters are already bound to this statement".into(),
            ));
        }
        if !matches!(self.params, Params::Positional(_)) {
            self.params = Params::Positional(Vec::new());
        }
        match &mut self.params {
            Params::Positional(values) => Ok(values),
            _ => Err(RqliteDbError::StateError("positional binding unavailable".into())),
        }
    }

    fn named_mut(&mut self) -> Result<&mut BTreeMap<String, ParamValue>, RqliteDbError> {
        if let Params::Positional(values) = &self.params
            && !values.is_empty()
        {
            return Err(RqliteDbError::StateError(
                "positional parameters are already bound to this statement".into(),
            ));
        }
        if !matches!(self.params, Params::Named(_)) {
            self.params = Params::Named(BTreeMap::new());
        }
        match &mut self.params {
            Params::Named(values) => Ok(values),
            _ => Err(RqliteDbError::StateError("named binding unavailable".into())),
        }
    }

    /// Bind `value` at zero-based `index`, growing the list with NULLs.
    ///
    /// # Errors
    /// [`RqliteDbError::ParameterError`] for a negative index,
    /// [`RqliteDbError::StateError`] when named values are bound.
    pub fn bind_positional(
        &mut self,
        index: i64,
        value: impl Into<ParamValue>,
    ) -> Result<&mut Self, RqliteDbError> {
        let idx = usize::try_from(index).map_err(|_| {
            RqliteDbError::ParameterError(format!("Invalid parameter index: {index}"))
        })?;
        let values = self.positional_mut()?;
        if idx >= values.len() {
            values.resize(idx + 1, ParamValue::Null);
        }
        values[idx] = value.into();
        Ok(self)
    }

    /// Append a positional value.
    ///
    /// # Errors
    /// [`RqliteDbError::StateError`] when named values are bound.
    pub fn append_positional(
        &mut self,
        value: impl Into<ParamValue>,
    ) -> Result<&mut Self, RqliteDbError> {
        self.positional_mut()?.push(value.into());
        Ok(self)
    }

    /// Replace the whole positional list.
    ///
    /// # Errors
    /// [`RqliteDbError::StateError`] when named values are bound.
    pub fn replace_positional(
        &mut self,
        values: Vec<ParamValue>,
    ) -> Result<&mut Self, RqliteDbError> {
        *self.positional_mut()? = values;
        Ok(self)
    }

    /// Bind a named value; the last write to a name wins.
    ///
    /// # Errors
    /// [`RqliteDbError::StateError`] when positional values are bound.
    pub fn bind_named(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Result<&mut Self, RqliteDbError> {
        self.named_mut()?.insert(name.into(), value.into());
        Ok(self)
    }

    /// Replace the whole named map.
    ///
    /// # Errors
    /// [`RqliteDbError::StateError`] when positional values are bound.
    pub fn replace_named(
        &mut self,
        values: BTreeMap<String, ParamValue>,
    ) -> Result<&mut Self, RqliteDbError> {
        *self.named_mut()? = values;
        Ok(self)
    }

    /// Drop every binding; either mode may be used afterwards.
    pub fn clear_parameters(&mut self) {
        self.params = Params::Empty;
    }

    /// Bind `value` at zero-based `index` after converting it to `target`.
    ///
    /// # Errors
    /// Conversion errors from [`coerce_parameter`], plus those of
    /// [`bind_positional`](Self::bind_positional).
    pub fn bind_as(
        &mut self,
        index: i64,
        value: &ParamValue,
        target: SqlType,
    ) -> Result<&mut Self, RqliteDbError> {
        let position = usize::try_from(index).map_or(0, |i| i + 1);
        let coerced = coerce_parameter(position, value, target)?;
        self.bind_positional(index, coerced)
    }

    /// Consuming form of [`bind_positional`](Self::bind_positional).
    ///
    /// # Errors
    /// Same as [`bind_positional`](Self::bind_positional).
    pub fn with_positional_param(
        mut self,
        index: i64,
        value: impl Into<ParamValue>,
    ) -> Result<Self, RqliteDbError> {
        self.bind_positional(index, value)?;
        Ok(self)
    }

    /// Consuming form of [`bind_named`](Self::bind_named).
    ///
    /// # Errors
    /// Same as [`bind_named`](Self::bind_named).
    pub fn with_named_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Result<Self, RqliteDbError> {
        self.bind_named(name, value)?;
        Ok(self)
    }

    /// Wire tag of the 1-based positional parameter, from the bound value's kind.
    ///
    /// # Errors
    /// [`RqliteDbError::ParameterError`] when no positional value is bound there.
    pub fn parameter_tag(&self, position: usize) -> Result<TypeTag, RqliteDbError> {
        match &self.params {
            Params::Positional(values) if position >= 1 => values
                .get(position - 1)
                .map(ParamValue::type_tag)
                .ok_or_else(|| {
                    RqliteDbError::ParameterError(format!("Invalid parameter index: {position}"))
                }),
            _ => Err(RqliteDbError::ParameterError(format!(
                "Invalid parameter index: {position}"
            ))),
        }
    }

    /// # Errors
    /// Same as [`parameter_tag`](Self::parameter_tag).
    pub fn parameter_precision(&self, position: usize) -> Result<u32, RqliteDbError> {
        Ok(self.parameter_tag(position)?.precision())
    }

    /// # Errors
    /// Same as [`parameter_tag`](Self::parameter_tag).
    pub fn is_parameter_signed(&self, position: usize) -> Result<bool, RqliteDbError> {
        Ok(self.parameter_tag(position)?.is_signed())
    }

    /// Render as the wire array `[sql, p1, p2, ...]` or `[sql, {name: value}]`.
    ///
    /// # Errors
    /// [`RqliteDbError::StateError`] when the SQL text is blank.
    pub fn build(&self) -> Result<JsonValue, RqliteDbError> {
        if self.sql.trim().is_empty() {
            return Err(RqliteDbError::StateError(
                "statement SQL cannot be empty".into(),
            ));
        }
        let mut out = vec![JsonValue::String(self.sql.clone())];
        match &self.params {
            Params::Empty => {}
            Params::Positional(values) => out.extend(values.iter().map(ParamValue::to_wire)),
            Params::Named(values) => {
                let map = values
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_wire()))
                    .collect::<serde_json::Map<_, _>>();
                out.push(JsonValue::Object(map));
            }
        }
        Ok(JsonValue::Array(out))
    }
}

impl From<&str> for Statement {
    fn from(sql: &str) -> Self {
        Statement::new(sql)
    }
}

impl From<String> for Statement {
    fn from(sql: String) -> Self {
        Statement::new(sql)
    }
}
