use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use url::Url;
use uuid::Uuid;

use super::{Cell, TargetType};
use crate::error::RqliteDbError;
use crate::type_tag::SqlType;

/// Sources whose wire text can be read as characters.
const CHARACTER_SOURCES: &[SqlType] = &[
    SqlType::Varchar,
    SqlType::Clob,
    SqlType::NClob,
    SqlType::NVarchar,
    SqlType::Integer,
    SqlType::Double,
    SqlType::Numeric,
    SqlType::Boolean,
];

const CLOB_SOURCES: &[SqlType] = &[
    SqlType::Varchar,
    SqlType::Clob,
    SqlType::NClob,
    SqlType::NVarchar,
];

const URL_SOURCES: &[SqlType] = &[SqlType::Varchar, SqlType::Datalink];

pub(super) fn character(cell: &Cell<'_>, target: &TargetType) -> Result<String, RqliteDbError> {
    cell.require(CHARACTER_SOURCES, target)?;
    Ok(cell.raw.to_string())
}

/// ASCII bytes; characters outside ASCII become `?`.
pub(super) fn ascii(cell: &Cell<'_>, target: &TargetType) -> Result<Vec<u8>, RqliteDbError> {
    cell.require(CHARACTER_SOURCES, target)?;
    Ok(cell
        .raw
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect())
}

/// UTF-16 big-endian bytes.
pub(super) fn unicode(cell: &Cell<'_>, target: &TargetType) -> Result<Vec<u8>, RqliteDbError> {
    cell.require(CHARACTER_SOURCES, target)?;
    Ok(cell
        .raw
        .encode_utf16()
        .flat_map(u16::to_be_bytes)
        .collect())
}

pub(super) fn clob(cell: &Cell<'_>, target: &TargetType) -> Result<String, RqliteDbError> {
    cell.require(CLOB_SOURCES, target)?;
    Ok(cell.raw.to_string())
}

/// Blob cells travel base64-encoded.
pub(super) fn blob(cell: &Cell<'_>, target: &TargetType) -> Result<Vec<u8>, RqliteDbError> {
    cell.require(&[SqlType::Blob], target)?;
    STANDARD
        .decode(cell.raw)
        .map_err(|e| cell.malformed(target, e))
}

pub(super) fn url(cell: &Cell<'_>, target: &TargetType) -> Result<Url, RqliteDbError> {
    cell.require(URL_SOURCES, target)?;
    Url::parse(cell.raw).map_err(|e| cell.malformed(target, e))
}

pub(super) fn uuid(cell: &Cell<'_>, target: &TargetType) -> Result<Uuid, RqliteDbError> {
    Uuid::parse_str(cell.raw).map_err(|e| cell.malformed(target, e))
}

#[cfg(test)]
mod tests {
    use super::super::{DecodeOptions, ObjectClass, decode};
    use super::*;
    use crate::error::ErrorKind;
    use crate::type_tag::TypeTag;
    use crate::types::CellValue;

    fn dec(raw: &str, tag: TypeTag, target: TargetType) -> Result<CellValue, RqliteDbError> {
        decode(2, raw, tag, &target, &DecodeOptions::default())
    }

    #[test]
    fn streams_encode_text() {
        assert_eq!(
            dec("héllo", TypeTag::Varchar, TargetType::AsciiStream).unwrap(),
            CellValue::Bytes(b"h?llo".to_vec())
        );
        assert_eq!(
            dec("hé", TypeTag::NVarchar, TargetType::UnicodeStream).unwrap(),
            CellValue::Bytes(vec![0x00, b'h', 0x00, 0xE9])
        );
        assert_eq!(
            dec("42", TypeTag::Integer, TargetType::CharacterStream).unwrap(),
            CellValue::Text("42".into())
        );
        assert_eq!(
            dec("1", TypeTag::Blob, TargetType::CharacterStream).unwrap_err().kind(),
            ErrorKind::IncompatibleType
        );
    }

    #[test]
    fn clob_targets_accept_only_character_tags() {
        assert_eq!(
            dec("doc", TypeTag::Clob, TargetType::NClob).unwrap(),
            CellValue::Text("doc".into())
        );
        assert_eq!(
            dec("1", TypeTag::Integer, TargetType::Clob).unwrap_err().kind(),
            ErrorKind::IncompatibleType
        );
    }

    #[test]
    fn blob_decodes_base64_only_from_blob_tags() {
        assert_eq!(
            dec("AAEC", TypeTag::Blob, TargetType::Bytes).unwrap(),
            CellValue::Bytes(vec![0, 1, 2])
        );
        assert_eq!(
            dec("AAEC", TypeTag::Blob, TargetType::BinaryStream).unwrap(),
            CellValue::Bytes(vec![0, 1, 2])
        );
        assert_eq!(
            dec("!!", TypeTag::Blob, TargetType::Bytes).unwrap_err().kind(),
            ErrorKind::MalformedValue
        );
        assert_eq!(
            dec("AAEC", TypeTag::Varchar, TargetType::Bytes).unwrap_err().kind(),
            ErrorKind::IncompatibleType
        );
    }

    #[test]
    fn url_requires_an_absolute_uri() {
        let v = dec("https://example.com/a", TypeTag::Datalink, TargetType::Url).unwrap();
        assert!(matches!(v, CellValue::Url(u) if u.host_str() == Some("example.com")));
        assert_eq!(
            dec("not a url", TypeTag::Varchar, TargetType::Url).unwrap_err().kind(),
            ErrorKind::MalformedValue
        );
        assert_eq!(
            dec("https://x", TypeTag::Blob, TargetType::Url).unwrap_err().kind(),
            ErrorKind::IncompatibleType
        );
    }

    #[test]
    fn bad_uuid_is_malformed() {
        let target = TargetType::Object(Some(ObjectClass::Uuid));
        assert_eq!(
            dec("xyz", TypeTag::Uuid, target).unwrap_err().kind(),
            ErrorKind::MalformedValue
        );
    }
}
