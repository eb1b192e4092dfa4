/// Sample flag bit marking a non-sync (non-key) sample.
pub const SAMPLE_IS_NON_SYNC_SAMPLE: u32 = 0x0001_0000;

/// Movie fragment box (`moof`).
#[derive(Debug, Clone, Default)]
pub struct MovieFragment {
    pub tracks: Vec<TrackFragment>,
}

/// Track fragment box (`traf`).
#[derive(Debug, Clone, Default)]
pub struct TrackFragment {
    pub header: TfhdBox,
    /// Track fragment decode time (`tfdt`).
    pub decode_time: TfdtBox,
    /// Track fragment runs (`trun`), in file order.
    pub runs: Vec<TrunBox>,
    /// Sample auxiliary information offsets (`saio`); empty when absent.
    pub auxiliary_offset: SaioBox,
    /// Sample auxiliary information sizes (`saiz`); empty when absent.
    pub auxiliary_size: SaizBox,
}

/// Track fragment header box (`tfhd`).
///
/// A field is `Some` iff the corresponding flag bit was set in the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfhdBox {
    /// An integer that uniquely identifies this track over the entire
    /// lifetime of this presentation.
    pub track_id: u32,
    /// If present, overrides the track extends default for this fragment.
    /// One-based.
    pub sample_description_index: Option<u32>,
    /// If present, overrides the default sample duration in the track
    /// extends box for this fragment.
    pub default_sample_duration: Option<u32>,
    /// If present, overrides the default sample size in the track extends
    /// box for this fragment.
    pub default_sample_size: Option<u32>,
    /// If present, overrides the default sample flags in the track extends
    /// box for this fragment.
    pub default_sample_flags: Option<u32>,
}

/// Track fragment decode time box (`tfdt`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TfdtBox {
    /// The absolute decode time, measured on the media timeline, of the
    /// first sample in decode order in the track fragment.
    pub base_media_decode_time: u64,
}

/// Track fragment run box (`trun`).
#[derive(Debug, Clone, Default)]
pub struct TrunBox {
    /// Absolute file offset of the first sample's payload, resolved by the
    /// upstream parser from the run's data offset and the fragment's base
    /// data offset.
    pub data_offset: u64,
    /// The number of samples in this run.
    pub sample_count: u32,
    /// Per-sample records; either empty or `sample_count` long. Missing
    /// entries and missing fields fall back to the header and track extends
    /// defaults.
    pub samples: Vec<TrunSample>,
}

/// Per-sample fields of a `trun` entry. A field is `Some` iff the
/// corresponding flag bit was set in the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrunSample {
    /// The length of the sample in timescale units.
    pub duration: Option<u32>,
    /// The size of the sample in bytes.
    pub size: Option<u32>,
    /// Sample flag word; bit 16 marks a non-sync sample.
    pub flags: Option<u32>,
    /// Composition minus decode time of the sample.
    pub composition_time_offset: Option<i32>,
}

/// Sample auxiliary information offsets box (`saio`).
///
/// One absolute file offset per track fragment run, resolved by the
/// upstream parser.
#[derive(Debug, Clone, Default)]
pub struct SaioBox {
    pub offsets: Vec<u64>,
}

/// Sample auxiliary information sizes box (`saiz`).
#[derive(Debug, Clone, Default)]
pub struct SaizBox {
    /// Constant per-sample information size, or 0 when sizes are
    /// per-sample.
    pub default_sample_info_size: u8,
    /// Number of samples covered by this box, cumulative over the
    /// fragment's runs.
    pub sample_count: u32,
    /// Per-sample information sizes; used only when
    /// `default_sample_info_size` is 0.
    pub sample_info_sizes: Vec<u8>,
}
