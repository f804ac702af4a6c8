//! Fixed capability strings reported to database-metadata callers.

pub const PRODUCT_NAME: &str = "SQLite";

pub const IDENTIFIER_QUOTE: &str = "\"";

/// Escape character for `LIKE` patterns in metadata calls.
pub const SEARCH_STRING_ESCAPE: &str = "\\";

pub const SQL_KEYWORDS: &str = concat!(
    "ACTION,ADD,AFTER,ALL,ALTER,ANALYZE,AND,AS,ASC,ATTACH,AUTOINCREMENT,",
    "BEFORE,BEGIN,BETWEEN,BY,",
    "CASCADE,CASE,CAST,CHECK,COLLATE,COLUMN,COMMIT,CONFLICT,CONSTRAINT,CREATE,",
    "CROSS,CURRENT_DATE,CURRENT_TIME,CURRENT_TIMESTAMP,",
    "DATABASE,DEFAULT,DEFERRABLE,DEFERRED,DELETE,DESC,DETACH,DISTINCT,DROP,",
    "EACH,ELSE,END,ESCAPE,EXCEPT,EXCLUSIVE,EXISTS,EXPLAIN,",
    "FAIL,FOR,FOREIGN,FROM,FULL,GLOB,GROUP,HAVING,",
    "IF,IGNORE,IMMEDIATE,IN,INDEX,INDEXED,INITIALLY,INNER,INSERT,INSTEAD,INTERSECT,INTO,IS,ISNULL,",
    "JOIN,KEY,LEFT,LIKE,LIMIT,MATCH,NATURAL,NO,NOT,NOTNULL,NULL,OF,OFFSET,ON,OR,ORDER,OUTER,",
    "PLAN,PRAGMA,PRIMARY,QUERY,RAISE,RECURSIVE,REFERENCES,REGEXP,REINDEX,RELEASE,RENAME,REPLACE,",
    "RESTRICT,RIGHT,ROLLBACK,ROW,SAVEPOINT,SELECT,SET,TABLE,TEMP,TEMPORARY,THEN,TO,TRANSACTION,",
    "TRIGGER,UNION,UNIQUE,UPDATE,USING,VACUUM,VALUES,VIEW,VIRTUAL,WHEN,WHERE,WITH,WITHOUT",
);

pub const NUMERIC_FUNCTIONS: &str =
    "abs,coalesce,likelihood,likely,max,min,random,randomblob,round,sign,unlikely,zeroblob";

pub const STRING_FUNCTIONS: &str = concat!(
    "char,concat,concat_ws,format,glob,hex,instr,length,like,lower,ltrim,octet_length,",
    "printf,replace,rtrim,soundex,substr,substring,trim,unicode,unhex,upper",
);

pub const SYSTEM_FUNCTIONS: &str = concat!(
    "changes,iif,ifnull,last_insert_rowid,nullif,quote,sqlite_compileoption_get,",
    "sqlite_compileoption_used,sqlite_offset,sqlite_source_id,sqlite_version,",
    "total_changes,typeof",
);

pub const TIME_DATE_FUNCTIONS: &str = "date,datetime,julianday,strftime,time";
