use super::SampleDescription;

/// Sample table box (`stbl`) of one track.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    /// Sample description box (`stsd`).
    pub description: SampleDescription,
    /// Decoding time to sample box (`stts`).
    pub decoding_time: SttsBox,
    /// Composition time to sample box (`ctts`), if present.
    pub composition_offset: Option<CttsBox>,
    /// Sample to chunk box (`stsc`).
    pub sample_to_chunk: StscBox,
    /// Sample size box (`stsz`).
    pub sample_size: StszBox,
    /// Chunk offset box (`stco`/`co64`), widened to 64 bits.
    pub chunk_offsets: Co64Box,
    /// Sync sample box (`stss`), if present. When absent every sample is a
    /// sync sample.
    pub sync_sample: Option<StssBox>,
}

/// Decoding time to sample box (`stts`), run-length encoded decode deltas.
#[derive(Debug, Clone, Default)]
pub struct SttsBox {
    pub entries: Vec<SttsEntry>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SttsEntry {
    /// Number of consecutive samples sharing this delta.
    pub sample_count: u32,
    /// Decode time delta of each of those samples, in timescale units.
    pub sample_delta: u32,
}

/// Composition time to sample box (`ctts`), run-length encoded composition
/// offsets. Offsets are signed (box version 1).
#[derive(Debug, Clone, Default)]
pub struct CttsBox {
    pub entries: Vec<CttsEntry>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CttsEntry {
    pub sample_count: u32,
    /// Composition minus decode time of each sample in this entry.
    pub sample_offset: i32,
}

/// Sample to chunk box (`stsc`).
#[derive(Debug, Clone, Default)]
pub struct StscBox {
    pub entries: Vec<StscEntry>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StscEntry {
    /// One-based index of the first chunk this entry applies to. The entry
    /// covers all chunks up to the next entry's first chunk.
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    /// One-based index into the track's sample descriptions.
    pub sample_description_index: u32,
}

/// Sample size box (`stsz`).
#[derive(Debug, Clone, Default)]
pub struct StszBox {
    /// Constant size for every sample, or 0 when sizes are per-sample.
    pub sample_size: u32,
    /// Total number of samples in the track.
    pub sample_count: u32,
    /// Per-sample sizes; used only when `sample_size` is 0.
    pub sizes: Vec<u32>,
}

/// Chunk offset box (`co64`): absolute file offset of each chunk's first
/// sample.
#[derive(Debug, Clone, Default)]
pub struct Co64Box {
    pub offsets: Vec<u64>,
}

/// Sync sample box (`stss`): 1-based numbers of the sync samples, sorted.
#[derive(Debug, Clone, Default)]
pub struct StssBox {
    pub entries: Vec<u32>,
}
