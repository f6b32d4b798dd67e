use thiserror::Error;

use crate::sections::SectionTag;

/// Errors from decoding or encoding map sections.
///
/// All of these are fatal for the map being processed; there is no
/// transient/retryable class since every input is fully buffered before
/// decoding starts.
#[derive(Debug, Error)]
pub enum ChkError {
    #[error("Missing section {0}")]
    MissingSection(SectionTag),
    #[error("Section {tag}: expected {expected} bytes, got {actual}")]
    SectionSize {
        tag: SectionTag,
        expected: usize,
        actual: usize,
    },
    #[error("Section {tag}: length {len} is not a multiple of record size {record}")]
    RecordAlign {
        tag: SectionTag,
        record: usize,
        len: usize,
    },
    #[error("Section {tag}: {table} index {index} out of range ({limit} entries)")]
    BadReference {
        tag: SectionTag,
        table: &'static str,
        index: u32,
        limit: u32,
    },
    #[error("Section {tag}: {what} count {actual} does not match required {expected}")]
    Cardinality {
        tag: SectionTag,
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Section {tag}: string at offset {offset} is not valid utf-8")]
    BadString { tag: SectionTag, offset: usize },
}

/// Errors from reading a static definition table.
///
/// A table read fails atomically; no partial record array is ever produced.
#[derive(Debug, Error)]
pub enum DatError {
    #[error("{kind}.dat is truncated: need {needed} bytes, file has {len}")]
    Truncated {
        kind: &'static str,
        needed: usize,
        len: usize,
    },
    #[error("{kind}.dat is {len} bytes, expected {expected}")]
    Size {
        kind: &'static str,
        expected: usize,
        len: usize,
    },
}
