//! Forward iterators over the run-length encoded sample tables.
//!
//! Each iterator shares the same contract: accessors read the current
//! sample's value, `advance_sample` steps forward and reports whether a
//! next sample exists. The tables are read-only; iterators are consumed
//! linearly and never rewind.

mod chunk_info;
mod composition_offset;
mod decoding_time;
mod sync_sample;

pub use chunk_info::ChunkInfoIterator;
pub use composition_offset::CompositionOffsetIterator;
pub use decoding_time::DecodingTimeIterator;
pub use sync_sample::SyncSampleIterator;
