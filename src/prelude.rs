//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::coercion::{
    DecodeOptions, ObjectClass, TargetType, coerce_parameter, decode, natural_target,
};
pub use crate::cursor::{ColumnRef, Cursor, Nullability, ResultMetadata};
pub use crate::error::{ErrorKind, RqliteDbError};
pub use crate::executor::Executor;
pub use crate::metadata::{LikePattern, MetadataSynthesizer};
pub use crate::results::{WireResponse, WireResult};
pub use crate::statement::{Params, Statement};
pub use crate::translation::split_statements;
pub use crate::transport::{
    Level, RqliteOptions, RqliteOptionsBuilder, Transport, check_result,
};
pub use crate::type_tag::{SqlType, TypeTag};
pub use crate::types::{CellValue, ParamValue};

#[cfg(feature = "http")]
pub use crate::transport::HttpTransport;
