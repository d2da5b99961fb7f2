//! Training data: entries, the fixed training/generalization/validation split,
//! and the strategies that carve training subsets out of it.

mod entry;
mod reader;

pub use entry::*;
pub use reader::*;

/// Records whose text (fields joined by commas) is shorter than this are skipped
/// when reading data and weight files.
pub(crate) const MIN_RECORD_LEN: usize = 3;

pub(crate) fn is_short_record(record: &csv::StringRecord) -> bool {
    record.as_slice().len() + record.len().saturating_sub(1) < MIN_RECORD_LEN
}
