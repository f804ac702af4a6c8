use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use url::Url;
use uuid::Uuid;

use crate::type_tag::TypeTag;

/// Values that can be bound as statement parameters.
///
/// ```rust
/// use rqlite_middleware::prelude::*;
///
/// let params = vec![
///     ParamValue::Int(1),
///     ParamValue::Text("alice".into()),
///     ParamValue::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Binary data, sent base64-encoded
    Blob(Vec<u8>),
    /// Exact decimal, sent as its string form
    Decimal(Decimal),
    /// Timestamp, sent as `YYYY-MM-DD HH:MM:SS`
    Timestamp(NaiveDateTime),
    /// JSON value, sent as its serialized text
    JSON(JsonValue),
}

impl ParamValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Serialize to the JSON value placed in a statement array.
    ///
    /// Booleans, numbers and strings map to themselves, blobs to base64 text
    /// and everything else to its string form. Non-finite floats have no JSON
    /// number form and are sent as text.
    #[must_use]
    pub fn to_wire(&self) -> JsonValue {
        match self {
            ParamValue::Null => JsonValue::Null,
            ParamValue::Bool(b) => JsonValue::Bool(*b),
            ParamValue::Int(i) => JsonValue::from(*i),
            ParamValue::Float(f) => serde_json::Number::from_f64(*f)
                .map_or_else(|| JsonValue::String(f.to_string()), JsonValue::Number),
            ParamValue::Text(s) => JsonValue::String(s.clone()),
            ParamValue::Blob(bytes) => JsonValue::String(STANDARD.encode(bytes)),
            ParamValue::Decimal(d) => JsonValue::String(d.to_string()),
            ParamValue::Timestamp(ts) => {
                JsonValue::String(ts.format("%Y-%m-%d %H:%M:%S").to_string())
            }
            ParamValue::JSON(v) => JsonValue::String(v.to_string()),
        }
    }

    /// The text a result cell would carry for this value, `None` for NULL.
    #[must_use]
    pub fn to_wire_text(&self) -> Option<String> {
        match self.to_wire() {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Wire tag describing this value's runtime kind.
    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        match self {
            ParamValue::Null => TypeTag::Null,
            ParamValue::Bool(_) => TypeTag::Boolean,
            ParamValue::Int(i) if i32::try_from(*i).is_ok() => TypeTag::Integer,
            ParamValue::Int(_) => TypeTag::BigInt,
            ParamValue::Float(_) => TypeTag::Double,
            ParamValue::Text(_) | ParamValue::JSON(_) => TypeTag::Varchar,
            ParamValue::Blob(_) => TypeTag::Blob,
            ParamValue::Decimal(_) => TypeTag::Numeric,
            ParamValue::Timestamp(_) => TypeTag::Timestamp,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(value: Vec<u8>) -> Self {
        ParamValue::Blob(value)
    }
}

impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        ParamValue::Decimal(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// A decoded result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
    Date(DateTime<Utc>),
    Time(DateTime<Utc>),
    Timestamp(DateTime<Utc>),
    Url(Url),
    Uuid(Uuid),
}

impl CellValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let CellValue::Bool(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Any integer width, widened to `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Byte(v) => Some(i64::from(*v)),
            CellValue::Short(v) => Some(i64::from(*v)),
            CellValue::Int(v) => Some(i64::from(*v)),
            CellValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(f64::from(*v)),
            CellValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let CellValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if let CellValue::Bytes(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            CellValue::Date(v) | CellValue::Time(v) | CellValue::Timestamp(v) => Some(*v),
            _ => None,
        }
    }
}
