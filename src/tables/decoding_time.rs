use crate::Result;
use crate::bail;
use crate::boxes::{SttsBox, SttsEntry};

/// Forward iterator over the decoding time to sample table (`stts`).
pub struct DecodingTimeIterator<'a> {
    entries: &'a [SttsEntry],
    entry_index: usize,
    /// Samples already consumed from the current entry.
    sample_index: u32,
}

impl<'a> DecodingTimeIterator<'a> {
    pub fn new(decoding_time: &'a SttsBox) -> Result<Self> {
        if decoding_time.entries.iter().any(|e| e.sample_count == 0) {
            bail!("stts entry with a zero sample count");
        }

        Ok(Self {
            entries: &decoding_time.entries,
            entry_index: 0,
            sample_index: 0,
        })
    }

    /// Decode delta of the current sample, in timescale units.
    pub fn sample_delta(&self) -> u32 {
        self.entries[self.entry_index].sample_delta
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
