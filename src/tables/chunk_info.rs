use crate::boxes::{StscBox, StscEntry};

/// Forward iterator over the sample to chunk table (`stsc`).
///
/// Each table entry applies to every chunk from its `first_chunk` up to the
/// next entry's; the last entry extends to all later chunks, so sample
/// advancement within the chunk table never exhausts.
pub struct ChunkInfoIterator<'a> {
    entries: &'a [StscEntry],
    /// Index of the latest entry with `first_chunk <= current_chunk`.
    entry_index: usize,
    /// One-based index of the current chunk.
    current_chunk: u32,
    /// Samples already consumed from the current chunk.
    sample_index: u32,
}

impl<'a> ChunkInfoIterator<'a> {
    pub fn new(sample_to_chunk: &'a StscBox) -> Self {
        Self {
            entries: &sample_to_chunk.entries,
            entry_index: 0,
            current_chunk: 1,
            sample_index: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.entry_index < self.entries.len()
    }

    /// One-based index of the current chunk.
    pub fn current_chunk(&self) -> u32 {
        self.current_chunk
    }

    /// Number of samples in the current chunk.
    pub fn samples_per_chunk(&self) -> u32 {
        self.entries[self.entry_index].samples_per_chunk
    }

    /// One-based sample description index of the current chunk.
    pub fn sample_description_index(&self) -> u32 {
        self.entries[self.entry_index].sample_description_index
    }

    /// Step to the first sample of the next chunk.
    pub fn advance_chunk(&mut self) -> bool {
        self.current_chunk += 1;
        self.sample_index = 0;

        while self.entry_index + 1 < self.entries.len()
            && self.entries[self.entry_index + 1].first_chunk <= self.current_chunk
        {
            self.entry_index += 1;
        }

        self.is_valid()
    }

    /// Step to the next sample, moving to the next chunk when the current
    /// chunk's samples are exhausted.
    pub fn advance_sample(&mut self) -> bool {
        if !self.is_valid() {
            return false;
        }

        self.sample_index += 1;
        if self.sample_index >= self.samples_per_chunk() {
            self.advance_chunk();
        }

        true
    }

    /// `first_chunk` of the last table entry, or 0 for an empty table.
    pub fn last_first_chunk(&self) -> u32 {
        self.entries.last().map_or(0, |e| e.first_chunk)
    }

    /// Total number of samples in the inclusive chunk range
    /// `[first_chunk, last_chunk]`.
    pub fn num_samples(&self, first_chunk: u32, last_chunk: u32) -> u64 {
        if first_chunk > last_chunk {
            return 0;
        }

        let mut total = 0u64;
        for (i, entry) in self.entries.iter().enumerate() {
            let span_end = self
                .entries
                .get(i + 1)
                .map_or(last_chunk, |next| next.first_chunk.saturating_sub(1));

            let lo = entry.first_chunk.max(first_chunk);
            let hi = span_end.min(last_chunk);
            if lo <= hi {
                total += u64::from(hi - lo + 1) * u64::from(entry.samples_per_chunk);
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(u32, u32, u32)]) -> StscBox {
        StscBox {
            entries: entries
                .iter()
                .map(
                    |&(first_chunk, samples_per_chunk, sample_description_index)| StscEntry {
                        first_chunk,
                        samples_per_chunk,
                        sample_description_index,
                    },
                )
                .collect(),
        }
    }

    #[test]
    fn test_interpolated_chunks() {
        // Chunks 1-2 hold 2 samples each, chunks 3 onward hold 3.
        let stsc = table(&[(1, 2, 1), (3, 3, 2)]);
        let mut it = ChunkInfoIterator::new(&stsc);

        assert_eq!(it.current_chunk(), 1);
        assert_eq!(it.samples_per_chunk(), 2);
        assert_eq!(it.sample_description_index(), 1);

        assert!(it.advance_chunk());
        assert_eq!(it.current_chunk(), 2);
        assert_eq!(it.samples_per_chunk(), 2);

        assert!(it.advance_chunk());
        assert_eq!(it.current_chunk(), 3);
        assert_eq!(it.samples_per_chunk(), 3);
        assert_eq!(it.sample_description_index(), 2);

        assert!(it.advance_chunk());
        assert_eq!(it.samples_per_chunk(), 3);
    }

    #[test]
    fn test_sample_advancement_crosses_chunks() {
        let stsc = table(&[(1, 2, 1)]);
        let mut it = ChunkInfoIterator::new(&stsc);

        assert!(it.advance_sample());
        assert_eq!(it.current_chunk(), 1);
        assert!(it.advance_sample());
        assert_eq!(it.current_chunk(), 2);
        assert!(it.advance_sample());
        assert!(it.advance_sample());
        assert_eq!(it.current_chunk(), 3);
    }

    #[test]
    fn test_num_samples_ranges() {
        let stsc = table(&[(1, 2, 1), (3, 3, 1), (5, 1, 1)]);
        let it = ChunkInfoIterator::new(&stsc);

        assert_eq!(it.num_samples(1, 2), 4);
        assert_eq!(it.num_samples(1, 4), 10);
        assert_eq!(it.num_samples(3, 6), 8);
        assert_eq!(it.num_samples(5, 5), 1);
        assert_eq!(it.num_samples(4, 2), 0);
        assert_eq!(it.last_first_chunk(), 5);
    }

    #[test]
    fn test_empty_table() {
        let stsc = table(&[]);
        let mut it = ChunkInfoIterator::new(&stsc);

        assert!(!it.is_valid());
        assert!(!it.advance_sample());
        assert_eq!(it.last_first_chunk(), 0);
        assert_eq!(it.num_samples(1, 10), 0);
    }
}
