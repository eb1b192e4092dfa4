use crate::Result;
use crate::bail;
use crate::boxes::{CttsBox, CttsEntry};

/// Forward iterator over the composition time to sample table (`ctts`).
///
/// The table is optional; when it was absent from the file the iterator is
/// constructed invalid and the caller substitutes a zero offset per sample.
pub struct CompositionOffsetIterator<'a> {
    entries: &'a [CttsEntry],
    entry_index: usize,
    /// Samples already consumed from the current entry.
    sample_index: u32,
}

impl<'a> CompositionOffsetIterator<'a> {
    pub fn new(composition_offset: Option<&'a CttsBox>) -> Result<Self> {
        let entries = composition_offset.map_or(&[][..], |c| &c.entries);
        if entries.iter().any(|e| e.sample_count == 0) {
            bail!("ctts entry with a zero sample count");
        }

        Ok(Self {
            entries,
            entry_index: 0,
            sample_index: 0,
        })
    }

    /// Composition offset of the current sample, in timescale units.
    pub fn sample_offset(&self) -> i32 {
        self.entries[self.entry_index].sample_offset
    }

    /// Step to the next sample. Returns false once the table is exhausted.
    pub fn advance_sample(&mut self) -> bool {
        if !self.is_valid() {
            return false;
        }

        self.sample_index += 1;
        if self.sample_index >= self.entries[self.entry_index].sample_count {
            self.entry_index += 1;
            self.sample_index = 0;
        }

        self.is_valid()
    }

    pub fn is_valid(&self) -> bool {
        self.entry_index < self.entries.len()
    }

    /// Total number of samples described by the table.
    pub fn num_samples(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.sample_count)).sum()
    }
}
