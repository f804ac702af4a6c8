use crate::results::WireResult;
use crate::transport::Transport;
use crate::type_tag::CATALOG_TAGS;

use super::{MetadataSynthesizer, cell, layouts};

const TYPE_NULLABLE: i32 = 1;
const SEARCHABLE: i32 = 3;

impl<T: Transport> MetadataSynthesizer<T> {
    /// One row per advertised wire tag, in catalog order. Built locally.
    #[must_use]
    pub fn type_info(&self) -> WireResult {
        let mut out = WireResult::with_layout(layouts::TYPE_INFO);
        for tag in CATALOG_TAGS {
            let quote = tag.needs_literal_quotes().then(|| "'".to_string());
            out.add_row(vec![
                cell(tag.name()),
                cell(tag.sql_type().code()),
                cell(tag.precision()),
                quote.clone(),
                quote,
                None,
                cell(TYPE_NULLABLE),
                cell(false),
                cell(SEARCHABLE),
                cell(!tag.is_signed()),
                cell(false),
                cell(false),
                cell(tag.name()),
                cell(0),
                cell(0),
                cell(0),
                cell(0),
                cell(10),
            ]);
        }
        out
    }
}
