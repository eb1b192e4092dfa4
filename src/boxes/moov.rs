use super::SampleTable;

/// Movie box (`moov`): the track definitions of a presentation.
#[derive(Debug, Clone, Default)]
pub struct Movie {
    pub tracks: Vec<Track>,
    /// Movie extends (`mvex`); empty for non-fragmented presentations.
    pub extends: MovieExtends,
}

impl Movie {
    /// Find a track by its id.
    pub fn track(&self, track_id: u32) -> Option<&Track> {
        self.tracks.iter().find(|t| t.track_id == track_id)
    }

    /// Find the track extends record for a track.
    pub fn track_extends(&self, track_id: u32) -> Option<&TrexBox> {
        self.extends.tracks.iter().find(|t| t.track_id == track_id)
    }
}

/// Track box (`trak`), flattened to the fields run traversal consumes.
#[derive(Debug, Clone, Default)]
pub struct Track {
    /// An integer that uniquely identifies this track over the entire
    /// lifetime of this presentation (`tkhd`).
    pub track_id: u32,
    /// The number of media time units that pass in one second (`mdhd`).
    pub timescale: u32,
    /// Edit list entries (`elst`); empty when the box is absent. Edits are
    /// not applied to timestamps, only reported.
    pub edit_list: Vec<ElstEntry>,
    /// Sample table (`stbl`).
    pub sample_table: SampleTable,
}

/// One entry of an edit list box (`elst`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ElstEntry {
    /// Duration of this edit in movie timescale units.
    pub segment_duration: u64,
    /// Starting time within the media of this edit, or -1 for an empty edit.
    pub media_time: i64,
}

/// Movie extends box (`mvex`): fragment defaults per track.
#[derive(Debug, Clone, Default)]
pub struct MovieExtends {
    pub tracks: Vec<TrexBox>,
}

/// Track extends box (`trex`): the outermost defaults for fragmented
/// samples of one track.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrexBox {
    pub track_id: u32,
    /// One-based index into the track's sample descriptions.
    pub default_sample_description_index: u32,
    pub default_sample_duration: u32,
    pub default_sample_size: u32,
    pub default_sample_flags: u32,
}
