//! Forward-only typed access over one [`WireResult`].

mod metadata;
mod owner;

pub use metadata::{Nullability, ResultMetadata};
pub(crate) use owner::{Lease, Owner};

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use url::Url;

use crate::coercion::{DecodeOptions, ObjectClass, TargetType, decode, natural_target};
use crate::error::RqliteDbError;
use crate::results::WireResult;
use crate::types::CellValue;

/// A column reference: a 1-based ordinal or a case-insensitive label.
pub trait ColumnRef {
    /// Resolve to a 1-based ordinal within `result`.
    ///
    /// # Errors
    /// Returns [`RqliteDbError::InvalidColumn`] when the column does not exist.
    fn ordinal(&self, result: &WireResult) -> Result<usize, RqliteDbError>;
}

impl ColumnRef for usize {
    fn ordinal(&self, result: &WireResult) -> Result<usize, RqliteDbError> {
        if *self >= 1 && *self <= result.column_count() {
            Ok(*self)
        } else {
            Err(RqliteDbError::InvalidColumn(self.to_string()))
        }
    }
}

impl ColumnRef for &str {
    fn ordinal(&self, result: &WireResult) -> Result<usize, RqliteDbError> {
        result
            .index_of(self)
            .map(|i| i + 1)
            .ok_or_else(|| RqliteDbError::InvalidColumn((*self).to_string()))
    }
}

/// Forward-only cursor with per-cell decoding.
///
/// The position starts before the first row (`-1`), moves one row per
/// [`advance`](Self::advance) and stops after the last row (`n`).
///
/// ```rust
/// use rqlite_middleware::prelude::*;
///
/// let mut result = WireResult::with_layout(&[("id", TypeTag::Integer), ("note", TypeTag::Varchar)]);
/// result.add_row(vec![Some("1".into()), Some("hi".into())]);
///
/// let mut cursor = Cursor::new(result);
/// while cursor.advance()? {
///     assert_eq!(cursor.get_int(1)?, Some(1));
///     assert_eq!(cursor.get_string("NOTE")?.as_deref(), Some("hi"));
/// }
/// # Ok::<(), RqliteDbError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Cursor {
    result: WireResult,
    position: i64,
    was_null: bool,
    closed: bool,
    options: DecodeOptions,
    /// Set for cursors handed out by an executor.
    lease: Option<Lease>,
}

impl Cursor {
    #[must_use]
    pub fn new(result: WireResult) -> Self {
        Self {
            result,
            position: -1,
            was_null: false,
            closed: false,
            options: DecodeOptions::default(),
            lease: None,
        }
    }

    /// Cursor over at most `max_rows` rows (`0` means no cap). Extra rows are
    /// dropped here, not while iterating.
    #[must_use]
    pub fn with_max_rows(mut result: WireResult, max_rows: usize) -> Self {
        result.truncate(max_rows);
        Self::new(result)
    }

    /// Zone used for temporal targets when a getter is given no offset.
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.options = self.options.with_offset(offset);
        self
    }

    pub(crate) fn owned_by(mut self, lease: Lease) -> Self {
        self.lease = Some(lease);
        self
    }

    fn ensure_open(&self) -> Result<(), RqliteDbError> {
        if self.is_closed() {
            Err(RqliteDbError::CursorClosed)
        } else {
            Ok(())
        }
    }

    fn len(&self) -> i64 {
        i64::try_from(self.result.row_count()).unwrap_or(i64::MAX)
    }

    /// Move to the next row. Returns `false` once past the last row, and keeps
    /// returning `false` from then on.
    ///
    /// # Errors
    /// [`RqliteDbError::CursorClosed`] after [`close`](Self::close).
    pub fn advance(&mut self) -> Result<bool, RqliteDbError> {
        self.ensure_open()?;
        let n = self.len();
        if self.position + 1 < n {
            self.position += 1;
            Ok(true)
        } else {
            self.position = n;
            Ok(false)
        }
    }

    /// Current position in `{-1, 0..n-1, n}`.
    #[must_use]
    pub fn position(&self) -> i64 {
        self.position
    }

    /// 1-based current row, or 0 when not on a row.
    #[must_use]
    pub fn row(&self) -> usize {
        if self.on_row() {
            usize::try_from(self.position + 1).unwrap_or(0)
        } else {
            0
        }
    }

    fn on_row(&self) -> bool {
        self.position >= 0 && self.position < self.len()
    }

    #[must_use]
    pub fn is_before_first(&self) -> bool {
        self.position == -1 && self.len() > 0
    }

    #[must_use]
    pub fn is_after_last(&self) -> bool {
        self.len() > 0 && self.position >= self.len()
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.len() > 0 && self.position == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.len() > 0 && self.position == self.len() - 1
    }

    /// Whether the last cell read was NULL. Only meaningful until the next read.
    #[must_use]
    pub fn was_null(&self) -> bool {
        self.was_null
    }

    /// 1-based ordinal of a column label.
    ///
    /// # Errors
    /// [`RqliteDbError::InvalidColumn`] for an unknown label,
    /// [`RqliteDbError::CursorClosed`] after close.
    pub fn find_column(&self, label: &str) -> Result<usize, RqliteDbError> {
        self.ensure_open()?;
        label.ordinal(&self.result)
    }

    /// Column layout of this result.
    ///
    /// # Errors
    /// [`RqliteDbError::CursorClosed`] after close.
    pub fn metadata(&self) -> Result<ResultMetadata, RqliteDbError> {
        self.ensure_open()?;
        Ok(ResultMetadata::from_result(&self.result))
    }

    /// Close the cursor. For a cursor from an executor with close-on-completion
    /// set, this also closes the executor.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(lease) = &self.lease {
            lease.release();
        }
    }

    /// Closed directly, or its executor has moved on, re-executed or closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed || self.lease.as_ref().is_some_and(|lease| !lease.is_live())
    }

    /// The wrapped result, for rendering.
    #[must_use]
    pub fn result(&self) -> &WireResult {
        &self.result
    }

    /// Raw cell text at the current row; sets the was-null flag.
    fn raw(&mut self, column: &impl ColumnRef) -> Result<(usize, Option<String>), RqliteDbError> {
        self.ensure_open()?;
        let ordinal = column.ordinal(&self.result)?;
        if !self.on_row() {
            return Err(RqliteDbError::InvalidRowPosition(self.position));
        }
        let row = usize::try_from(self.position)
            .map_err(|_| RqliteDbError::InvalidRowPosition(self.position))?;
        let cell = self
            .result
            .values
            .get(row)
            .and_then(|r| r.get(ordinal - 1))
            .cloned()
            .flatten();
        self.was_null = cell.is_none();
        Ok((ordinal, cell))
    }

    /// Decode the cell at `column` into `target`; `None` when the cell is NULL.
    ///
    /// # Errors
    /// Cursor state errors (`CursorClosed`, `InvalidColumn`,
    /// `InvalidRowPosition`) and the classified decode errors.
    pub fn get(
        &mut self,
        column: impl ColumnRef,
        target: &TargetType,
    ) -> Result<Option<CellValue>, RqliteDbError> {
        let options = self.options;
        self.get_with(&column, target, &options)
    }

    fn get_with(
        &mut self,
        column: &impl ColumnRef,
        target: &TargetType,
        options: &DecodeOptions,
    ) -> Result<Option<CellValue>, RqliteDbError> {
        let (ordinal, cell) = self.raw(column)?;
        let Some(raw) = cell else {
            return Ok(None);
        };
        let tag = self.result.type_tag(ordinal - 1)?;
        decode(ordinal, &raw, tag, target, options).map(Some)
    }

    /// Decode to the column's natural representation.
    ///
    /// # Errors
    /// Same as [`get`](Self::get).
    pub fn get_object(&mut self, column: impl ColumnRef) -> Result<Option<CellValue>, RqliteDbError> {
        let ordinal = {
            self.ensure_open()?;
            column.ordinal(&self.result)?
        };
        let tag = self.result.type_tag(ordinal - 1)?;
        match natural_target(tag) {
            Some(target) => self.get(ordinal, &target),
            None => {
                self.raw(&ordinal)?;
                self.was_null = true;
                Ok(None)
            }
        }
    }

    /// Decode as an object of the given class.
    ///
    /// # Errors
    /// Same as [`get`](Self::get); an [`ObjectClass::Other`] class is unsupported.
    pub fn get_object_as(
        &mut self,
        column: impl ColumnRef,
        class: ObjectClass,
    ) -> Result<Option<CellValue>, RqliteDbError> {
        self.get(column, &TargetType::Object(Some(class)))
    }
}

macro_rules! typed_getter {
    ($(#[$doc:meta])* $name:ident, $target:expr, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        ///
        /// # Errors
        /// Same as [`Cursor::get`].
        pub fn $name(&mut self, column: impl ColumnRef) -> Result<Option<$ty>, RqliteDbError> {
            match self.get(column, &$target)? {
                Some(CellValue::$variant(v)) => Ok(Some(v)),
                Some(other) => Err(RqliteDbError::StateError(format!(
                    "decoder produced {other:?} for {}",
                    $target
                ))),
                None => Ok(None),
            }
        }
    };
}

impl Cursor {
    typed_getter!(get_bool, TargetType::Boolean, Bool, bool);
    typed_getter!(get_byte, TargetType::Byte, Byte, i8);
    typed_getter!(get_short, TargetType::Short, Short, i16);
    typed_getter!(get_int, TargetType::Int, Int, i32);
    typed_getter!(get_long, TargetType::Long, Long, i64);
    typed_getter!(get_float, TargetType::Float, Float, f32);
    typed_getter!(get_double, TargetType::Double, Double, f64);
    typed_getter!(
        /// Text of any column, unchanged.
        get_string, TargetType::String, Text, String
    );
    typed_getter!(get_nstring, TargetType::NString, Text, String);
    typed_getter!(get_clob, TargetType::Clob, Text, String);
    typed_getter!(get_nclob, TargetType::NClob, Text, String);
    typed_getter!(get_character_stream, TargetType::CharacterStream, Text, String);
    typed_getter!(get_ncharacter_stream, TargetType::NCharacterStream, Text, String);
    typed_getter!(
        /// ASCII bytes; non-ASCII characters read as `?`.
        get_ascii_stream, TargetType::AsciiStream, Bytes, Vec<u8>
    );
    typed_getter!(
        /// UTF-16BE bytes.
        get_unicode_stream, TargetType::UnicodeStream, Bytes, Vec<u8>
    );
    typed_getter!(
        /// Base64-decoded blob.
        get_bytes, TargetType::Bytes, Bytes, Vec<u8>
    );
    typed_getter!(get_binary_stream, TargetType::BinaryStream, Bytes, Vec<u8>);
    typed_getter!(get_url, TargetType::Url, Url, Url);

    /// Exact decimal, optionally rounded half-up to `scale`.
    ///
    /// # Errors
    /// Same as [`Cursor::get`].
    pub fn get_decimal(
        &mut self,
        column: impl ColumnRef,
        scale: Option<u32>,
    ) -> Result<Option<Decimal>, RqliteDbError> {
        let options = DecodeOptions {
            scale,
            ..self.options
        };
        match self.get_with(&column, &TargetType::Decimal, &options)? {
            Some(CellValue::Decimal(d)) => Ok(Some(d)),
            Some(other) => Err(RqliteDbError::StateError(format!(
                "decoder produced {other:?} for decimal"
            ))),
            None => Ok(None),
        }
    }

    fn get_temporal(
        &mut self,
        column: &impl ColumnRef,
        target: &TargetType,
        offset: Option<FixedOffset>,
    ) -> Result<Option<DateTime<Utc>>, RqliteDbError> {
        let options = DecodeOptions {
            offset: offset.unwrap_or(self.options.offset),
            ..self.options
        };
        Ok(self
            .get_with(column, target, &options)?
            .and_then(|v| v.as_datetime()))
    }

    /// Date at start of day; local dates are read in `offset` (default: the cursor's).
    ///
    /// # Errors
    /// Same as [`Cursor::get`].
    pub fn get_date(
        &mut self,
        column: impl ColumnRef,
        offset: Option<FixedOffset>,
    ) -> Result<Option<DateTime<Utc>>, RqliteDbError> {
        self.get_temporal(&column, &TargetType::Date, offset)
    }

    /// Time of day on 1970-01-01.
    ///
    /// # Errors
    /// Same as [`Cursor::get`].
    pub fn get_time(
        &mut self,
        column: impl ColumnRef,
        offset: Option<FixedOffset>,
    ) -> Result<Option<DateTime<Utc>>, RqliteDbError> {
        self.get_temporal(&column, &TargetType::Time, offset)
    }

    /// # Errors
    /// Same as [`Cursor::get`].
    pub fn get_timestamp(
        &mut self,
        column: impl ColumnRef,
        offset: Option<FixedOffset>,
    ) -> Result<Option<DateTime<Utc>>, RqliteDbError> {
        self.get_temporal(&column, &TargetType::Timestamp, offset)
    }
}
