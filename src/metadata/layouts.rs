//! Fixed column layouts of the synthesized metadata row sets.

use crate::type_tag::TypeTag::{self, BigInt, Boolean, Integer, SmallInt, Varchar};

pub(crate) type Layout = &'static [(&'static str, TypeTag)];

pub(crate) const TABLES: Layout = &[
    ("TABLE_CAT", Varchar),
    ("TABLE_SCHEM", Varchar),
    ("TABLE_NAME", Varchar),
    ("TABLE_TYPE", Varchar),
    ("REMARKS", Varchar),
    ("TYPE_CAT", Varchar),
    ("TYPE_SCHEM", Varchar),
    ("TYPE_NAME", Varchar),
    ("SELF_REFERENCING_COL_NAME", Varchar),
    ("REF_GENERATION", Varchar),
];

pub(crate) const CATALOGS: Layout = &[("TABLE_CAT", Varchar)];

pub(crate) const SCHEMAS: Layout = &[("TABLE_SCHEM", Varchar), ("TABLE_CATALOG", Varchar)];

pub(crate) const TABLE_TYPES: Layout = &[("TABLE_TYPE", Varchar)];

pub(crate) const COLUMNS: Layout = &[
    ("TABLE_CAT", Varchar),
    ("TABLE_SCHEM", Varchar),
    ("TABLE_NAME", Varchar),
    ("COLUMN_NAME", Varchar),
    ("DATA_TYPE", Integer),
    ("TYPE_NAME", Varchar),
    ("COLUMN_SIZE", Integer),
    ("BUFFER_LENGTH", Integer),
    ("DECIMAL_DIGITS", Integer),
    ("NUM_PREC_RADIX", Integer),
    ("NULLABLE", Integer),
    ("REMARKS", Varchar),
    ("COLUMN_DEF", Varchar),
    ("SQL_DATA_TYPE", Integer),
    ("SQL_DATETIME_SUB", Integer),
    ("CHAR_OCTET_LENGTH", Integer),
    ("ORDINAL_POSITION", Integer),
    ("IS_NULLABLE", Varchar),
    ("SCOPE_CATALOG", Varchar),
    ("SCOPE_SCHEMA", Varchar),
    ("SCOPE_TABLE", Varchar),
    ("SOURCE_DATA_TYPE", Integer),
    ("IS_AUTOINCREMENT", Varchar),
    ("IS_GENERATEDCOLUMN", Varchar),
];

pub(crate) const PRIMARY_KEYS: Layout = &[
    ("TABLE_CAT", Varchar),
    ("TABLE_SCHEM", Varchar),
    ("TABLE_NAME", Varchar),
    ("COLUMN_NAME", Varchar),
    ("KEY_SEQ", SmallInt),
    ("PK_NAME", Varchar),
];

/// Shared by imported keys, exported keys and cross references.
pub(crate) const FOREIGN_KEYS: Layout = &[
    ("PKTABLE_CAT", Varchar),
    ("PKTABLE_SCHEM", Varchar),
    ("PKTABLE_NAME", Varchar),
    ("PKCOLUMN_NAME", Varchar),
    ("FKTABLE_CAT", Varchar),
    ("FKTABLE_SCHEM", Varchar),
    ("FKTABLE_NAME", Varchar),
    ("FKCOLUMN_NAME", Varchar),
    ("KEY_SEQ", SmallInt),
    ("UPDATE_RULE", SmallInt),
    ("DELETE_RULE", SmallInt),
    ("FK_NAME", Varchar),
    ("PK_NAME", Varchar),
    ("DEFERRABILITY", SmallInt),
];

pub(crate) const BEST_ROW: Layout = &[
    ("SCOPE", SmallInt),
    ("COLUMN_NAME", Varchar),
    ("DATA_TYPE", Integer),
    ("TYPE_NAME", Varchar),
    ("COLUMN_SIZE", Integer),
    ("BUFFER_LENGTH", Integer),
    ("DECIMAL_DIGITS", SmallInt),
    ("PSEUDO_COLUMN", SmallInt),
];

pub(crate) const TYPE_INFO: Layout = &[
    ("TYPE_NAME", Varchar),
    ("DATA_TYPE", Integer),
    ("PRECISION", Integer),
    ("LITERAL_PREFIX", Varchar),
    ("LITERAL_SUFFIX", Varchar),
    ("CREATE_PARAMS", Varchar),
    ("NULLABLE", SmallInt),
    ("CASE_SENSITIVE", Boolean),
    ("SEARCHABLE", SmallInt),
    ("UNSIGNED_ATTRIBUTE", Boolean),
    ("FIXED_PREC_SCALE", Boolean),
    ("AUTO_INCREMENT", Boolean),
    ("LOCAL_TYPE_NAME", Varchar),
    ("MINIMUM_SCALE", SmallInt),
    ("MAXIMUM_SCALE", SmallInt),
    ("SQL_DATA_TYPE", Integer),
    ("SQL_DATETIME_SUB", Integer),
    ("NUM_PREC_RADIX", Integer),
];

pub(crate) const INDEX_INFO: Layout = &[
    ("TABLE_CAT", Varchar),
    ("TABLE_SCHEM", Varchar),
    ("TABLE_NAME", Varchar),
    ("NON_UNIQUE", Boolean),
    ("INDEX_QUALIFIER", Varchar),
    ("INDEX_NAME", Varchar),
    ("TYPE", SmallInt),
    ("ORDINAL_POSITION", SmallInt),
    ("COLUMN_NAME", Varchar),
    ("ASC_OR_DESC", Varchar),
    ("CARDINALITY", BigInt),
    ("PAGES", BigInt),
    ("FILTER_CONDITION", Varchar),
];
