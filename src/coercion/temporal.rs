use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::{Cell, TargetType};
use crate::error::RqliteDbError;
use crate::type_tag::SqlType;

const DATE_SOURCES: &[SqlType] = &[SqlType::Varchar, SqlType::Date, SqlType::Timestamp];
const TIME_SOURCES: &[SqlType] = &[SqlType::Varchar, SqlType::Time, SqlType::Timestamp];
const TIMESTAMP_SOURCES: &[SqlType] = &[SqlType::Varchar, SqlType::Timestamp, SqlType::Date];

const LOCAL_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const LOCAL_TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

fn instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn local_datetime(raw: &str) -> Option<NaiveDateTime> {
    LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Read a wall-clock value in `offset` and return the instant it names.
fn localize(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    naive
        .and_local_timezone(offset)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Integer cells hold Unix epoch seconds.
fn epoch_seconds(cell: &Cell<'_>, target: &TargetType) -> Result<DateTime<Utc>, RqliteDbError> {
    let secs = cell
        .raw
        .parse::<i64>()
        .map_err(|e| cell.malformed(target, e))?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| cell.out_of_range(target))
}

/// Instant first, then a local date at start of day. A local date-time is
/// accepted too and truncated to its day.
pub(super) fn date(
    cell: &Cell<'_>,
    target: &TargetType,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, RqliteDbError> {
    if cell.source == SqlType::Integer {
        return epoch_seconds(cell, target);
    }
    cell.require(DATE_SOURCES, target)?;
    if let Some(dt) = instant(cell.raw) {
        return Ok(dt);
    }
    let day = NaiveDate::parse_from_str(cell.raw, "%Y-%m-%d")
        .ok()
        .or_else(|| local_datetime(cell.raw).map(|dt| dt.date()))
        .ok_or_else(|| cell.malformed(target, "expected an ISO instant or YYYY-MM-DD"))?;
    day.and_hms_opt(0, 0, 0)
        .and_then(|midnight| localize(midnight, offset))
        .ok_or_else(|| cell.out_of_range(target))
}

/// Local time of day anchored on 1970-01-01 in `offset`.
pub(super) fn time(
    cell: &Cell<'_>,
    target: &TargetType,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, RqliteDbError> {
    if cell.source == SqlType::Integer {
        return epoch_seconds(cell, target);
    }
    cell.require(TIME_SOURCES, target)?;
    let of_day = LOCAL_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(cell.raw, fmt).ok())
        .or_else(|| local_datetime(cell.raw).map(|dt| dt.time()))
        .ok_or_else(|| cell.malformed(target, "expected HH:MM[:SS[.fff]]"))?;
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|epoch| localize(epoch.and_time(of_day), offset))
        .ok_or_else(|| cell.out_of_range(target))
}

/// Instant first, then `YYYY-MM-DD HH:MM:SS` in `offset`. Date cells also
/// accept a bare date at start of day.
pub(super) fn timestamp(
    cell: &Cell<'_>,
    target: &TargetType,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, RqliteDbError> {
    if cell.source == SqlType::Integer {
        return epoch_seconds(cell, target);
    }
    cell.require(TIMESTAMP_SOURCES, target)?;
    if let Some(dt) = instant(cell.raw) {
        return Ok(dt);
    }
    let naive = local_datetime(cell.raw)
        .or_else(|| {
            if cell.source != SqlType::Date {
                return None;
            }
            NaiveDate::parse_from_str(cell.raw, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
        })
        .ok_or_else(|| cell.malformed(target, "expected an ISO instant or YYYY-MM-DD HH:MM:SS"))?;
    localize(naive, offset).ok_or_else(|| cell.out_of_range(target))
}
