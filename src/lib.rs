//! Typed statement dispatch, value coercion and metadata synthesis over
//! rqlite's string-encoded HTTP/JSON API.
//!
//! Result cells arrive as text with a per-column type tag. This crate turns
//! them into typed values, builds parameterized statements, splits SQL
//! scripts, and synthesizes the standard database-metadata row sets from the
//! engine's catalog and pragmas.
//!
//! ```rust
//! use rqlite_middleware::prelude::*;
//!
//! let mut result = WireResult::with_layout(&[
//!     ("id", TypeTag::Integer),
//!     ("active", TypeTag::Boolean),
//!     ("note", TypeTag::Varchar),
//! ]);
//! result.add_row(vec![Some("1".into()), Some("1".into()), Some("hi".into())]);
//!
//! let mut cursor = Cursor::new(result);
//! assert!(cursor.advance()?);
//! assert_eq!(cursor.get_bool(2)?, Some(true));
//! assert_eq!(cursor.get_string("note")?.as_deref(), Some("hi"));
//! # Ok::<(), RqliteDbError>(())
//! ```

pub mod coercion;
pub mod cursor;
pub mod error;
pub mod executor;
pub mod metadata;
pub mod prelude;
pub mod results;
pub mod statement;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod translation;
pub mod transport;
pub mod type_tag;
pub mod types;

pub use coercion::{DecodeOptions, ObjectClass, TargetType, coerce_parameter, decode};
pub use cursor::{ColumnRef, Cursor, Nullability, ResultMetadata};
pub use error::{ErrorKind, RqliteDbError};
pub use executor::Executor;
pub use metadata::MetadataSynthesizer;
pub use results::{WireResponse, WireResult};
pub use statement::{Params, Statement};
pub use translation::split_statements;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{Level, RqliteOptions, RqliteOptionsBuilder, Transport, check_result};
pub use type_tag::{SqlType, TypeTag};
pub use types::{CellValue, ParamValue};
