//! Decoding wire strings into typed values.
//!
//! Every `(source tag, target)` pair either decodes or fails with exactly one
//! of [`RqliteDbError::IncompatibleType`] (the pair is not accepted) or
//! [`RqliteDbError::MalformedValue`] (accepted, but the text does not parse or
//! the value does not fit).

mod numeric;
mod temporal;
mod text;

use std::fmt;

use chrono::{FixedOffset, Offset, Utc};

use crate::error::RqliteDbError;
use crate::type_tag::{SqlType, TypeTag};
use crate::types::{CellValue, ParamValue};

/// Client-facing representation requested when reading a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    String,
    NString,
    AsciiStream,
    UnicodeStream,
    CharacterStream,
    NCharacterStream,
    BinaryStream,
    Bytes,
    Clob,
    NClob,
    Date,
    Time,
    Timestamp,
    Url,
    /// Dispatch on a caller-chosen class; `None` means no class was given.
    Object(Option<ObjectClass>),
}

/// Classes accepted by [`TargetType::Object`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectClass {
    String,
    Integer,
    Long,
    Float,
    Double,
    Byte,
    Short,
    Decimal,
    Boolean,
    Bytes,
    Uuid,
    /// Any class this crate does not know how to produce.
    Other(String),
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectClass::String => f.write_str("string"),
            ObjectClass::Integer => f.write_str("integer"),
            ObjectClass::Long => f.write_str("long"),
            ObjectClass::Float => f.write_str("float"),
            ObjectClass::Double => f.write_str("double"),
            ObjectClass::Byte => f.write_str("byte"),
            ObjectClass::Short => f.write_str("short"),
            ObjectClass::Decimal => f.write_str("decimal"),
            ObjectClass::Boolean => f.write_str("boolean"),
            ObjectClass::Bytes => f.write_str("bytes"),
            ObjectClass::Uuid => f.write_str("uuid"),
            ObjectClass::Other(name) => f.write_str(name),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetType::Boolean => "boolean",
            TargetType::Byte => "byte",
            TargetType::Short => "short",
            TargetType::Int => "int",
            TargetType::Long => "long",
            TargetType::Float => "float",
            TargetType::Double => "double",
            TargetType::Decimal => "decimal",
            TargetType::String => "string",
            TargetType::NString => "nstring",
            TargetType::AsciiStream => "ascii stream",
            TargetType::UnicodeStream => "unicode stream",
            TargetType::CharacterStream => "character stream",
            TargetType::NCharacterStream => "ncharacter stream",
            TargetType::BinaryStream => "binary stream",
            TargetType::Bytes => "bytes",
            TargetType::Clob => "clob",
            TargetType::NClob => "nclob",
            TargetType::Date => "date",
            TargetType::Time => "time",
            TargetType::Timestamp => "timestamp",
            TargetType::Url => "url",
            TargetType::Object(Some(class)) => return write!(f, "object<{class}>"),
            TargetType::Object(None) => "object",
        };
        f.write_str(name)
    }
}

/// Optional decode inputs: a decimal scale and the zone local values are read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub scale: Option<u32>,
    pub offset: FixedOffset,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            scale: None,
            offset: utc(),
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }
}

pub(crate) fn utc() -> FixedOffset {
    Utc.fix()
}

/// One raw cell being decoded, with what is needed to report failures.
pub(crate) struct Cell<'a> {
    pub(crate) column: usize,
    pub(crate) raw: &'a str,
    pub(crate) source: SqlType,
}

impl Cell<'_> {
    pub(crate) fn incompatible(&self, target: &TargetType) -> RqliteDbError {
        RqliteDbError::incompatible(self.column, self.raw, self.source, target)
    }

    pub(crate) fn malformed(&self, target: &TargetType, reason: impl fmt::Display) -> RqliteDbError {
        RqliteDbError::malformed(self.column, self.raw, target, reason)
    }

    pub(crate) fn out_of_range(&self, target: &TargetType) -> RqliteDbError {
        RqliteDbError::out_of_range(self.column, self.raw, target)
    }

    /// Fail with a type-incompatible error unless the source is in `accepted`.
    pub(crate) fn require(
        &self,
        accepted: &[SqlType],
        target: &TargetType,
    ) -> Result<(), RqliteDbError> {
        if self.source.any_of(accepted) {
            Ok(())
        } else {
            Err(self.incompatible(target))
        }
    }
}

/// Decode one non-null wire string read from `column` (1-based) of type `tag`.
///
/// ```rust
/// use rqlite_middleware::prelude::*;
///
/// let v = decode(1, "32767", TypeTag::SmallInt, &TargetType::Short, &DecodeOptions::default());
/// assert_eq!(v.unwrap(), CellValue::Short(32767));
/// ```
///
/// # Errors
/// `IncompatibleType` when `tag` cannot produce `target`, `MalformedValue` when
/// the text does not parse or is out of range, `NoTargetType` / `Unsupported`
/// for object targets without a usable class.
pub fn decode(
    column: usize,
    raw: &str,
    tag: TypeTag,
    target: &TargetType,
    options: &DecodeOptions,
) -> Result<CellValue, RqliteDbError> {
    let cell = Cell {
        column,
        raw,
        source: tag.sql_type(),
    };
    match target {
        TargetType::Boolean => numeric::boolean(&cell, target).map(CellValue::Bool),
        TargetType::Byte => numeric::integer(&cell, target, i8::MIN.into(), i8::MAX.into())
            .and_then(|v| narrow(&cell, target, v).map(CellValue::Byte)),
        TargetType::Short => numeric::integer(&cell, target, i16::MIN.into(), i16::MAX.into())
            .and_then(|v| narrow(&cell, target, v).map(CellValue::Short)),
        TargetType::Int => numeric::integer(&cell, target, i32::MIN.into(), i32::MAX.into())
            .and_then(|v| narrow(&cell, target, v).map(CellValue::Int)),
        TargetType::Long => numeric::integer(&cell, target, i64::MIN.into(), i64::MAX.into())
            .and_then(|v| narrow(&cell, target, v).map(CellValue::Long)),
        TargetType::Float => numeric::float(&cell, target).map(CellValue::Float),
        TargetType::Double => numeric::double(&cell, target).map(CellValue::Double),
        TargetType::Decimal => {
            numeric::decimal(&cell, target, options.scale).map(CellValue::Decimal)
        }
        TargetType::String | TargetType::NString => Ok(CellValue::Text(raw.to_string())),
        TargetType::CharacterStream => text::character(&cell, target).map(CellValue::Text),
        TargetType::AsciiStream => text::ascii(&cell, target).map(CellValue::Bytes),
        TargetType::UnicodeStream => text::unicode(&cell, target).map(CellValue::Bytes),
        TargetType::Clob | TargetType::NClob | TargetType::NCharacterStream => {
            text::clob(&cell, target).map(CellValue::Text)
        }
        TargetType::Bytes | TargetType::BinaryStream => {
            text::blob(&cell, target).map(CellValue::Bytes)
        }
        TargetType::Date => temporal::date(&cell, target, options.offset).map(CellValue::Date),
        TargetType::Time => temporal::time(&cell, target, options.offset).map(CellValue::Time),
        TargetType::Timestamp => {
            temporal::timestamp(&cell, target, options.offset).map(CellValue::Timestamp)
        }
        TargetType::Url => text::url(&cell, target).map(CellValue::Url),
        TargetType::Object(class) => decode_object(&cell, class.as_ref(), target, options),
    }
}

fn narrow<T: TryFrom<i64>>(cell: &Cell<'_>, target: &TargetType, v: i64) -> Result<T, RqliteDbError> {
    T::try_from(v).map_err(|_| cell.out_of_range(target))
}

fn decode_object(
    cell: &Cell<'_>,
    class: Option<&ObjectClass>,
    target: &TargetType,
    options: &DecodeOptions,
) -> Result<CellValue, RqliteDbError> {
    let Some(class) = class else {
        return Err(RqliteDbError::NoTargetType {
            column: cell.column,
            value: cell.raw.to_string(),
        });
    };
    let scalar = match class {
        ObjectClass::String => TargetType::String,
        ObjectClass::Integer => TargetType::Int,
        ObjectClass::Long => TargetType::Long,
        ObjectClass::Float => TargetType::Float,
        ObjectClass::Double => TargetType::Double,
        ObjectClass::Byte => TargetType::Byte,
        ObjectClass::Short => TargetType::Short,
        ObjectClass::Decimal => TargetType::Decimal,
        ObjectClass::Boolean => TargetType::Boolean,
        ObjectClass::Bytes => TargetType::Bytes,
        ObjectClass::Uuid => return text::uuid(cell, target).map(CellValue::Uuid),
        ObjectClass::Other(name) => {
            return Err(RqliteDbError::Unsupported(format!(
                "Conversion of column {} to {name}",
                cell.column
            )));
        }
    };
    // Decimal objects ignore any requested scale.
    let options = DecodeOptions {
        scale: None,
        ..*options
    };
    decode(cell.column, cell.raw, source_tag(cell.source), &scalar, &options)
}

fn source_tag(source: SqlType) -> TypeTag {
    match source {
        SqlType::Integer => TypeTag::Integer,
        SqlType::Numeric => TypeTag::Numeric,
        SqlType::Boolean => TypeTag::Boolean,
        SqlType::TinyInt => TypeTag::TinyInt,
        SqlType::SmallInt => TypeTag::SmallInt,
        SqlType::BigInt => TypeTag::BigInt,
        SqlType::Float => TypeTag::Float,
        SqlType::Double => TypeTag::Double,
        SqlType::Varchar => TypeTag::Varchar,
        SqlType::Date => TypeTag::Date,
        SqlType::Time => TypeTag::Time,
        SqlType::Timestamp => TypeTag::Timestamp,
        SqlType::Datalink => TypeTag::Datalink,
        SqlType::Clob => TypeTag::Clob,
        SqlType::NClob => TypeTag::NClob,
        SqlType::NVarchar => TypeTag::NVarchar,
        SqlType::Blob => TypeTag::Blob,
        SqlType::Null => TypeTag::Null,
    }
}

/// The target a cell of `tag` decodes to when the caller does not choose one.
/// `None` for the NULL tag.
#[must_use]
pub fn natural_target(tag: TypeTag) -> Option<TargetType> {
    let target = match tag.sql_type() {
        SqlType::Integer => TargetType::Int,
        SqlType::Numeric => TargetType::Decimal,
        SqlType::Boolean => TargetType::Boolean,
        SqlType::TinyInt => TargetType::Byte,
        SqlType::SmallInt => TargetType::Short,
        SqlType::BigInt => TargetType::Long,
        SqlType::Float => TargetType::Float,
        SqlType::Double => TargetType::Double,
        SqlType::Varchar | SqlType::NVarchar | SqlType::Clob | SqlType::NClob => {
            TargetType::String
        }
        SqlType::Date => TargetType::Date,
        SqlType::Time => TargetType::Time,
        SqlType::Timestamp => TargetType::Timestamp,
        SqlType::Datalink => TargetType::Url,
        SqlType::Blob => TargetType::Bytes,
        SqlType::Null => return None,
    };
    Some(target)
}

/// Convert a bound parameter into the wire value for a declared SQL type.
///
/// `position` is the 1-based parameter position used in error messages.
///
/// # Errors
/// Returns the same classified errors as [`decode`] when the value's text does
/// not convert, and [`RqliteDbError::ParameterError`] when a blob target is
/// given anything but bytes.
pub fn coerce_parameter(
    position: usize,
    value: &ParamValue,
    target: SqlType,
) -> Result<ParamValue, RqliteDbError> {
    if value.is_null() {
        return Ok(ParamValue::Null);
    }
    let text = value.to_wire_text().unwrap_or_default();
    let declared = Cell {
        column: position,
        raw: &text,
        source: target,
    };
    let coerced = match target {
        SqlType::Null => ParamValue::Null,
        SqlType::Blob => match value {
            ParamValue::Blob(bytes) => ParamValue::Blob(bytes.clone()),
            _ => {
                return Err(RqliteDbError::ParameterError(format!(
                    "Invalid BLOB data for parameter {position}"
                )));
            }
        },
        SqlType::Boolean => {
            let as_text = Cell {
                source: SqlType::Varchar,
                ..declared
            };
            ParamValue::Int(i64::from(numeric::boolean(&as_text, &TargetType::Boolean)?))
        }
        SqlType::TinyInt => ParamValue::Int(numeric::integer(
            &declared,
            &TargetType::Byte,
            i8::MIN.into(),
            i8::MAX.into(),
        )?),
        SqlType::SmallInt => ParamValue::Int(numeric::integer(
            &declared,
            &TargetType::Short,
            i16::MIN.into(),
            i16::MAX.into(),
        )?),
        SqlType::Integer => ParamValue::Int(numeric::integer(
            &declared,
            &TargetType::Int,
            i32::MIN.into(),
            i32::MAX.into(),
        )?),
        SqlType::BigInt => ParamValue::Int(numeric::integer(
            &declared,
            &TargetType::Long,
            i64::MIN.into(),
            i64::MAX.into(),
        )?),
        SqlType::Float => {
            ParamValue::Float(f64::from(numeric::float(&declared, &TargetType::Float)?))
        }
        SqlType::Double => ParamValue::Float(numeric::double(&declared, &TargetType::Double)?),
        SqlType::Numeric => {
            ParamValue::Decimal(numeric::decimal(&declared, &TargetType::Decimal, None)?)
        }
        SqlType::Varchar | SqlType::NVarchar | SqlType::Clob | SqlType::NClob => {
            ParamValue::Text(text.clone())
        }
        SqlType::Date => {
            let d = temporal::date(&declared, &TargetType::Date, utc())?;
            ParamValue::Text(d.format("%Y-%m-%d").to_string())
        }
        SqlType::Time => {
            let t = temporal::time(&declared, &TargetType::Time, utc())?;
            ParamValue::Text(t.format("%H:%M:%S").to_string())
        }
        SqlType::Timestamp => {
            let ts = temporal::timestamp(&declared, &TargetType::Timestamp, utc())?;
            ParamValue::Timestamp(ts.naive_utc())
        }
        SqlType::Datalink => ParamValue::Text(text::url(&declared, &TargetType::Url)?.to_string()),
    };
    Ok(coerced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn dec(raw: &str, tag: TypeTag, target: TargetType) -> Result<CellValue, RqliteDbError> {
        decode(1, raw, tag, &target, &DecodeOptions::default())
    }

    #[test]
    fn object_targets_dispatch_to_scalars() {
        assert_eq!(
            dec("42", TypeTag::Integer, TargetType::Object(Some(ObjectClass::Long))).unwrap(),
            CellValue::Long(42)
        );
        assert_eq!(
            dec("x", TypeTag::Blob, TargetType::Object(Some(ObjectClass::String))).unwrap(),
            CellValue::Text("x".into())
        );
        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert!(matches!(
            dec(id, TypeTag::Uuid, TargetType::Object(Some(ObjectClass::Uuid))).unwrap(),
            CellValue::Uuid(_)
        ));
    }

    #[test]
    fn object_without_class_or_unknown_class() {
        assert!(matches!(
            dec("1", TypeTag::Integer, TargetType::Object(None)),
            Err(RqliteDbError::NoTargetType { column: 1, .. })
        ));
        assert!(matches!(
            dec(
                "1",
                TypeTag::Integer,
                TargetType::Object(Some(ObjectClass::Other("Widget".into())))
            ),
            Err(RqliteDbError::Unsupported(_))
        ));
    }

    #[test]
    fn string_targets_pass_any_source_through() {
        for tag in [TypeTag::Blob, TypeTag::Date, TypeTag::Integer, TypeTag::Null] {
            assert_eq!(
                dec("raw", tag, TargetType::String).unwrap(),
                CellValue::Text("raw".into())
            );
        }
    }

    #[test]
    fn natural_targets_follow_tag() {
        assert_eq!(natural_target(TypeTag::Uuid), Some(TargetType::String));
        assert_eq!(natural_target(TypeTag::Datetime), Some(TargetType::Timestamp));
        assert_eq!(natural_target(TypeTag::Null), None);
    }

    #[test]
    fn coerces_parameters_to_declared_types() {
        assert_eq!(
            coerce_parameter(1, &ParamValue::from("TRUE"), SqlType::Boolean).unwrap(),
            ParamValue::Int(1)
        );
        assert_eq!(
            coerce_parameter(1, &ParamValue::from("120"), SqlType::TinyInt).unwrap(),
            ParamValue::Int(120)
        );
        let err = coerce_parameter(2, &ParamValue::Int(200), SqlType::TinyInt).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedValue);
        assert_eq!(
            coerce_parameter(1, &ParamValue::from("2024-03-01"), SqlType::Date).unwrap(),
            ParamValue::Text("2024-03-01".into())
        );
        assert!(matches!(
            coerce_parameter(1, &ParamValue::from("abc"), SqlType::Blob),
            Err(RqliteDbError::ParameterError(_))
        ));
        assert_eq!(
            coerce_parameter(1, &ParamValue::Null, SqlType::Integer).unwrap(),
            ParamValue::Null
        );
    }
}
