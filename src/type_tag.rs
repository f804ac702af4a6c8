//! Wire type tags and the static facts attached to them.
//!
//! The remote engine labels every result column with a type name string
//! (`"INTEGER"`, `"VARCHAR(32)"`, `"BLOB"`...). [`TypeTag`] is the parsed form
//! of that label; [`SqlType`] is the coarser category the coercion engine
//! dispatches on.

use std::fmt;
use std::str::FromStr;

use crate::error::RqliteDbError;

/// Client-facing SQL type category, with the standard numeric type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Integer,
    Numeric,
    Boolean,
    TinyInt,
    SmallInt,
    BigInt,
    Float,
    Double,
    Varchar,
    Date,
    Time,
    Timestamp,
    Datalink,
    Clob,
    NClob,
    NVarchar,
    Blob,
    Null,
}

impl SqlType {
    /// Standard SQL type code (the values reported in `DATA_TYPE` columns).
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            SqlType::Integer => 4,
            SqlType::Numeric => 2,
            SqlType::Boolean => 16,
            SqlType::TinyInt => -6,
            SqlType::SmallInt => 5,
            SqlType::BigInt => -5,
            SqlType::Float => 6,
            SqlType::Double => 8,
            SqlType::Varchar => 12,
            SqlType::Date => 91,
            SqlType::Time => 92,
            SqlType::Timestamp => 93,
            SqlType::Datalink => 70,
            SqlType::Clob => 2005,
            SqlType::NClob => 2011,
            SqlType::NVarchar => -9,
            SqlType::Blob => 2004,
            SqlType::Null => 0,
        }
    }

    pub(crate) fn any_of(self, accepted: &[SqlType]) -> bool {
        accepted.contains(&self)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlType::Integer => "INTEGER",
            SqlType::Numeric => "NUMERIC",
            SqlType::Boolean => "BOOLEAN",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "FLOAT",
            SqlType::Double => "DOUBLE",
            SqlType::Varchar => "VARCHAR",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Datalink => "DATALINK",
            SqlType::Clob => "CLOB",
            SqlType::NClob => "NCLOB",
            SqlType::NVarchar => "NVARCHAR",
            SqlType::Blob => "BLOB",
            SqlType::Null => "NULL",
        };
        f.write_str(name)
    }
}

/// A wire type tag as reported by the remote engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Integer,
    Numeric,
    Boolean,
    TinyInt,
    SmallInt,
    BigInt,
    Float,
    Double,
    Text,
    Varchar,
    Uuid,
    Date,
    Time,
    Timestamp,
    Datetime,
    Datalink,
    Clob,
    NClob,
    NVarchar,
    Blob,
    Null,
}

/// Tags advertised by the type catalog, in catalog order.
pub const CATALOG_TAGS: [TypeTag; 20] = [
    TypeTag::Integer,
    TypeTag::Numeric,
    TypeTag::Boolean,
    TypeTag::TinyInt,
    TypeTag::SmallInt,
    TypeTag::BigInt,
    TypeTag::Float,
    TypeTag::Double,
    TypeTag::Varchar,
    TypeTag::Uuid,
    TypeTag::Date,
    TypeTag::Time,
    TypeTag::Timestamp,
    TypeTag::Datetime,
    TypeTag::Datalink,
    TypeTag::Clob,
    TypeTag::NClob,
    TypeTag::NVarchar,
    TypeTag::Blob,
    TypeTag::Null,
];

impl TypeTag {
    /// Parse a declared type such as `"varchar(32)"` or `"DECIMAL(10,2)"`.
    ///
    /// Only the leading word before any `(`, `)` or `,` is significant.
    /// Returns `None` for names outside the fixed enumeration.
    #[must_use]
    pub fn parse(raw: &str) -> Option<TypeTag> {
        let upper = raw.trim().to_ascii_uppercase();
        let head = upper
            .split(['(', ')', ','])
            .next()
            .unwrap_or_default()
            .trim();
        let tag = match head {
            "INTEGER" => TypeTag::Integer,
            "NUMERIC" => TypeTag::Numeric,
            "BOOLEAN" => TypeTag::Boolean,
            "TINYINT" => TypeTag::TinyInt,
            "SMALLINT" => TypeTag::SmallInt,
            "BIGINT" => TypeTag::BigInt,
            "FLOAT" => TypeTag::Float,
            "DOUBLE" => TypeTag::Double,
            "TEXT" => TypeTag::Text,
            "VARCHAR" => TypeTag::Varchar,
            "UUID" => TypeTag::Uuid,
            "DATE" => TypeTag::Date,
            "TIME" => TypeTag::Time,
            "TIMESTAMP" => TypeTag::Timestamp,
            "DATETIME" => TypeTag::Datetime,
            "DATALINK" => TypeTag::Datalink,
            "CLOB" => TypeTag::Clob,
            "NCLOB" => TypeTag::NClob,
            "NVARCHAR" => TypeTag::NVarchar,
            "BLOB" => TypeTag::Blob,
            "NULL" => TypeTag::Null,
            _ => return None,
        };
        Some(tag)
    }

    /// Resolve a column's declared type from a schema pragma.
    ///
    /// Exact tag names win; anything else falls back to the engine's
    /// affinity rules (`INT` → integer, `CHAR`/`CLOB`/`TEXT` → varchar, empty or
    /// `BLOB` → blob, `REAL`/`FLOA`/`DOUB` → double, otherwise numeric).
    #[must_use]
    pub fn from_declared(raw: &str) -> TypeTag {
        if let Some(tag) = TypeTag::parse(raw) {
            return tag;
        }
        let upper = raw.trim().to_ascii_uppercase();
        if upper.contains("INT") {
            TypeTag::Integer
        } else if ["CHAR", "CLOB", "TEXT"].iter().any(|k| upper.contains(k)) {
            TypeTag::Varchar
        } else if upper.is_empty() || upper.contains("BLOB") {
            TypeTag::Blob
        } else if ["REAL", "FLOA", "DOUB"].iter().any(|k| upper.contains(k)) {
            TypeTag::Double
        } else {
            TypeTag::Numeric
        }
    }

    /// Canonical upper-case wire name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Integer => "INTEGER",
            TypeTag::Numeric => "NUMERIC",
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::TinyInt => "TINYINT",
            TypeTag::SmallInt => "SMALLINT",
            TypeTag::BigInt => "BIGINT",
            TypeTag::Float => "FLOAT",
            TypeTag::Double => "DOUBLE",
            TypeTag::Text => "TEXT",
            TypeTag::Varchar => "VARCHAR",
            TypeTag::Uuid => "UUID",
            TypeTag::Date => "DATE",
            TypeTag::Time => "TIME",
            TypeTag::Timestamp => "TIMESTAMP",
            TypeTag::Datetime => "DATETIME",
            TypeTag::Datalink => "DATALINK",
            TypeTag::Clob => "CLOB",
            TypeTag::NClob => "NCLOB",
            TypeTag::NVarchar => "NVARCHAR",
            TypeTag::Blob => "BLOB",
            TypeTag::Null => "NULL",
        }
    }

    /// The SQL category this tag decodes as.
    #[must_use]
    pub fn sql_type(self) -> SqlType {
        match self {
            TypeTag::Integer => SqlType::Integer,
            TypeTag::Numeric => SqlType::Numeric,
            TypeTag::Boolean => SqlType::Boolean,
            TypeTag::TinyInt => SqlType::TinyInt,
            TypeTag::SmallInt => SqlType::SmallInt,
            TypeTag::BigInt => SqlType::BigInt,
            TypeTag::Float => SqlType::Float,
            TypeTag::Double => SqlType::Double,
            TypeTag::Text | TypeTag::Varchar | TypeTag::Uuid => SqlType::Varchar,
            TypeTag::Date => SqlType::Date,
            TypeTag::Time => SqlType::Time,
            TypeTag::Timestamp | TypeTag::Datetime => SqlType::Timestamp,
            TypeTag::Datalink => SqlType::Datalink,
            TypeTag::Clob => SqlType::Clob,
            TypeTag::NClob => SqlType::NClob,
            TypeTag::NVarchar => SqlType::NVarchar,
            TypeTag::Blob => SqlType::Blob,
            TypeTag::Null => SqlType::Null,
        }
    }

    /// Column size reported for this tag: digits for numbers, characters for
    /// text and temporal values.
    #[must_use]
    pub fn precision(self) -> u32 {
        match self {
            TypeTag::Integer => 10,
            TypeTag::Numeric => 38,
            TypeTag::Boolean => 1,
            TypeTag::TinyInt => 3,
            TypeTag::SmallInt => 5,
            TypeTag::BigInt => 19,
            TypeTag::Float => 7,
            TypeTag::Double => 15,
            TypeTag::Text | TypeTag::Varchar | TypeTag::NVarchar | TypeTag::Datalink => 255,
            TypeTag::Date => 10,
            TypeTag::Time => 8,
            TypeTag::Timestamp => 19,
            TypeTag::Datetime => 29,
            TypeTag::Clob | TypeTag::NClob | TypeTag::Blob => 65535,
            TypeTag::Uuid => 36,
            TypeTag::Null => 0,
        }
    }

    /// Maximum display width in characters.
    #[must_use]
    pub fn display_size(self) -> u32 {
        match self {
            TypeTag::Integer => 11,
            TypeTag::Numeric => 38,
            TypeTag::Boolean => 5,
            TypeTag::TinyInt => 4,
            TypeTag::SmallInt => 6,
            TypeTag::BigInt => 20,
            TypeTag::Float | TypeTag::Double => 25,
            TypeTag::Date => 10,
            TypeTag::Time => 8,
            TypeTag::Timestamp => 19,
            TypeTag::Datetime => 29,
            TypeTag::Uuid => 36,
            TypeTag::Null => 4,
            TypeTag::Text
            | TypeTag::Varchar
            | TypeTag::Datalink
            | TypeTag::Clob
            | TypeTag::NClob
            | TypeTag::NVarchar
            | TypeTag::Blob => 255,
        }
    }

    #[must_use]
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            TypeTag::Integer
                | TypeTag::Numeric
                | TypeTag::TinyInt
                | TypeTag::SmallInt
                | TypeTag::BigInt
                | TypeTag::Float
                | TypeTag::Double
        )
    }

    /// Name of the Rust representation a cell of this tag decodes to by default.
    #[must_use]
    pub fn rust_type_name(self) -> &'static str {
        match self {
            TypeTag::Integer => "i32",
            TypeTag::Numeric => "rust_decimal::Decimal",
            TypeTag::Boolean => "bool",
            TypeTag::TinyInt => "i8",
            TypeTag::SmallInt => "i16",
            TypeTag::BigInt => "i64",
            TypeTag::Float => "f32",
            TypeTag::Double => "f64",
            TypeTag::Text
            | TypeTag::Varchar
            | TypeTag::NVarchar
            | TypeTag::Uuid
            | TypeTag::Clob
            | TypeTag::NClob => "String",
            TypeTag::Date | TypeTag::Time | TypeTag::Timestamp | TypeTag::Datetime => {
                "chrono::DateTime<Utc>"
            }
            TypeTag::Datalink => "url::Url",
            TypeTag::Blob => "Vec<u8>",
            TypeTag::Null => "()",
        }
    }

    /// Whether literals of this tag are quoted in SQL text.
    #[must_use]
    pub fn needs_literal_quotes(self) -> bool {
        matches!(
            self.sql_type(),
            SqlType::Varchar
                | SqlType::Date
                | SqlType::Time
                | SqlType::Timestamp
                | SqlType::Datalink
                | SqlType::NVarchar
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = RqliteDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::parse(s).ok_or_else(|| RqliteDbError::UnknownTypeTag {
            column: 0,
            tag: s.to_string(),
        })
    }
}
