use std::num::IntErrorKind;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::{Cell, TargetType};
use crate::error::RqliteDbError;
use crate::type_tag::SqlType;

const BOOLEAN_SOURCES: &[SqlType] = &[
    SqlType::Integer,
    SqlType::Numeric,
    SqlType::Varchar,
    SqlType::Boolean,
];

const FLOAT_SOURCES: &[SqlType] = &[SqlType::Float, SqlType::Double, SqlType::Numeric];

const DECIMAL_SOURCES: &[SqlType] = &[
    SqlType::Integer,
    SqlType::Float,
    SqlType::Double,
    SqlType::Varchar,
    SqlType::Numeric,
    SqlType::Boolean,
    SqlType::TinyInt,
    SqlType::SmallInt,
    SqlType::BigInt,
];

/// Integer sources accepted for each width; wider targets accept more tags.
fn integer_sources(target: &TargetType) -> &'static [SqlType] {
    match target {
        TargetType::Byte => &[
            SqlType::Integer,
            SqlType::TinyInt,
            SqlType::Boolean,
            SqlType::Numeric,
        ],
        TargetType::Short | TargetType::Int => &[
            SqlType::Integer,
            SqlType::TinyInt,
            SqlType::SmallInt,
            SqlType::Boolean,
            SqlType::Numeric,
        ],
        _ => &[
            SqlType::Integer,
            SqlType::TinyInt,
            SqlType::SmallInt,
            SqlType::BigInt,
            SqlType::Boolean,
            SqlType::Numeric,
        ],
    }
}

pub(super) fn boolean(cell: &Cell<'_>, target: &TargetType) -> Result<bool, RqliteDbError> {
    cell.require(BOOLEAN_SOURCES, target)?;
    match cell.source {
        SqlType::Integer | SqlType::Numeric => match cell.raw {
            "1" => Ok(true),
            "0" => Ok(false),
            _ => Err(cell.out_of_range(target)),
        },
        _ => {
            if cell.raw.eq_ignore_ascii_case("true") || cell.raw == "1" {
                Ok(true)
            } else if cell.raw.eq_ignore_ascii_case("false") || cell.raw == "0" {
                Ok(false)
            } else {
                Err(cell.malformed(target, "expected true or false"))
            }
        }
    }
}

/// Boolean cells may carry `true`/`false`; integer parsing sees them as 1/0.
fn boolean_as_digit<'a>(cell: &Cell<'a>) -> &'a str {
    if cell.source == SqlType::Boolean {
        if cell.raw.eq_ignore_ascii_case("true") {
            return "1";
        }
        if cell.raw.eq_ignore_ascii_case("false") {
            return "0";
        }
    }
    cell.raw
}

/// Parse a signed integer and require it to lie within `[min, max]`.
pub(super) fn integer(
    cell: &Cell<'_>,
    target: &TargetType,
    min: i128,
    max: i128,
) -> Result<i64, RqliteDbError> {
    cell.require(integer_sources(target), target)?;
    let text = boolean_as_digit(cell);
    let parsed = match text.parse::<i128>() {
        Ok(v) => v,
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            return Err(cell.out_of_range(target));
        }
        Err(e) => integral_numeric(cell).ok_or_else(|| cell.malformed(target, e))?,
    };
    if parsed < min || parsed > max {
        return Err(cell.out_of_range(target));
    }
    i64::try_from(parsed).map_err(|_| cell.out_of_range(target))
}

/// A NUMERIC cell such as `5.00` still names an integer.
fn integral_numeric(cell: &Cell<'_>) -> Option<i128> {
    if cell.source != SqlType::Numeric {
        return None;
    }
    let d = Decimal::from_str(cell.raw).ok()?;
    if d.fract().is_zero() { d.to_i128() } else { None }
}

pub(super) fn float(cell: &Cell<'_>, target: &TargetType) -> Result<f32, RqliteDbError> {
    cell.require(FLOAT_SOURCES, target)?;
    cell.raw.parse::<f32>().map_err(|e| cell.malformed(target, e))
}

pub(super) fn double(cell: &Cell<'_>, target: &TargetType) -> Result<f64, RqliteDbError> {
    cell.require(FLOAT_SOURCES, target)?;
    cell.raw.parse::<f64>().map_err(|e| cell.malformed(target, e))
}

/// Exact decimal; with a scale, rounded half-up and padded to that scale.
pub(super) fn decimal(
    cell: &Cell<'_>,
    target: &TargetType,
    scale: Option<u32>,
) -> Result<Decimal, RqliteDbError> {
    cell.require(DECIMAL_SOURCES, target)?;
    let text = boolean_as_digit(cell);
    let mut value = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| cell.malformed(target, e))?;
    if let Some(scale) = scale {
        value = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(scale);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::super::{DecodeOptions, decode};
    use crate::error::{ErrorKind, RqliteDbError};
    use crate::type_tag::TypeTag;
    use crate::types::CellValue;
    use super::*;

    fn dec(raw: &str, tag: TypeTag, target: TargetType) -> Result<CellValue, RqliteDbError> {
        decode(3, raw, tag, &target, &DecodeOptions::default())
    }

    fn kind(raw: &str, tag: TypeTag, target: TargetType) -> ErrorKind {
        dec(raw, tag, target).unwrap_err().kind()
    }

    #[test]
    fn boolean_from_integer_accepts_only_zero_and_one() {
        assert_eq!(dec("1", TypeTag::Integer, TargetType::Boolean).unwrap(), CellValue::Bool(true));
        assert_eq!(dec("0", TypeTag::Numeric, TargetType::Boolean).unwrap(), CellValue::Bool(false));
        assert_eq!(kind("2", TypeTag::Integer, TargetType::Boolean), ErrorKind::MalformedValue);
    }

    #[test]
    fn boolean_from_text_is_case_insensitive() {
        assert_eq!(dec("TRUE", TypeTag::Varchar, TargetType::Boolean).unwrap(), CellValue::Bool(true));
        assert_eq!(dec("False", TypeTag::Boolean, TargetType::Boolean).unwrap(), CellValue::Bool(false));
        assert_eq!(kind("yes", TypeTag::Text, TargetType::Boolean), ErrorKind::MalformedValue);
        assert_eq!(kind("1", TypeTag::Blob, TargetType::Boolean), ErrorKind::IncompatibleType);
    }

    #[test]
    fn integer_width_boundaries_are_exact() {
        assert_eq!(dec("32767", TypeTag::SmallInt, TargetType::Short).unwrap(), CellValue::Short(32767));
        assert_eq!(dec("-32768", TypeTag::SmallInt, TargetType::Short).unwrap(), CellValue::Short(-32768));
        assert_eq!(kind("32768", TypeTag::SmallInt, TargetType::Short), ErrorKind::MalformedValue);
        assert_eq!(kind("-129", TypeTag::TinyInt, TargetType::Byte), ErrorKind::MalformedValue);
        assert_eq!(dec("127", TypeTag::TinyInt, TargetType::Byte).unwrap(), CellValue::Byte(127));
        assert_eq!(
            dec("9223372036854775807", TypeTag::BigInt, TargetType::Long).unwrap(),
            CellValue::Long(i64::MAX)
        );
        assert_eq!(kind("9223372036854775808", TypeTag::BigInt, TargetType::Long), ErrorKind::MalformedValue);
    }

    #[test]
    fn out_of_range_names_the_reason() {
        let err = dec("200", TypeTag::Integer, TargetType::Byte).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");
        assert!(err.to_string().contains("column 3"), "{err}");
    }

    #[test]
    fn integer_source_sets_grow_with_width() {
        assert_eq!(kind("1", TypeTag::SmallInt, TargetType::Byte), ErrorKind::IncompatibleType);
        assert_eq!(kind("1", TypeTag::BigInt, TargetType::Int), ErrorKind::IncompatibleType);
        assert_eq!(dec("1", TypeTag::BigInt, TargetType::Long).unwrap(), CellValue::Long(1));
        assert_eq!(kind("1", TypeTag::Varchar, TargetType::Long), ErrorKind::IncompatibleType);
        assert_eq!(kind("1.0", TypeTag::Double, TargetType::Int), ErrorKind::IncompatibleType);
    }

    #[test]
    fn integer_parse_failures_are_malformed() {
        assert_eq!(kind("12a", TypeTag::Integer, TargetType::Int), ErrorKind::MalformedValue);
        assert_eq!(kind("1.5", TypeTag::Numeric, TargetType::Int), ErrorKind::MalformedValue);
        assert_eq!(dec("5.00", TypeTag::Numeric, TargetType::Int).unwrap(), CellValue::Int(5));
        assert_eq!(dec("true", TypeTag::Boolean, TargetType::Int).unwrap(), CellValue::Int(1));
    }

    #[test]
    fn floats_parse_without_range_checks() {
        assert_eq!(dec("1.5", TypeTag::Float, TargetType::Float).unwrap(), CellValue::Float(1.5));
        assert_eq!(dec("-2.25", TypeTag::Numeric, TargetType::Double).unwrap(), CellValue::Double(-2.25));
        assert_eq!(kind("1.5", TypeTag::Integer, TargetType::Double), ErrorKind::IncompatibleType);
        assert_eq!(kind("one", TypeTag::Double, TargetType::Double), ErrorKind::MalformedValue);
    }

    #[test]
    fn decimal_rounds_half_up_to_scale() {
        let opts = DecodeOptions::default().with_scale(2);
        let v = decode(1, "2.345", TypeTag::Numeric, &TargetType::Decimal, &opts).unwrap();
        assert_eq!(v, CellValue::Decimal(Decimal::new(235, 2)));
        let v = decode(1, "-2.345", TypeTag::Varchar, &TargetType::Decimal, &opts).unwrap();
        assert_eq!(v, CellValue::Decimal(Decimal::new(-235, 2)));
        let v = decode(1, "7", TypeTag::Integer, &TargetType::Decimal, &opts).unwrap();
        assert_eq!(v.clone(), CellValue::Decimal(Decimal::new(700, 2)));
        if let CellValue::Decimal(d) = v {
            assert_eq!(d.to_string(), "7.00");
        }
    }

    #[test]
    fn decimal_accepts_exponent_and_rejects_junk() {
        assert_eq!(
            dec("1.5e3", TypeTag::Double, TargetType::Decimal).unwrap(),
            CellValue::Decimal(Decimal::new(1500, 0))
        );
        assert_eq!(kind("abc", TypeTag::Varchar, TargetType::Decimal), ErrorKind::MalformedValue);
        assert_eq!(kind("1", TypeTag::Date, TargetType::Decimal), ErrorKind::IncompatibleType);
    }
}
