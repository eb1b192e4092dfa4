//! Typed box structs consumed by run traversal.
//!
//! These model the already-parsed payloads of the boxes the traversal reads;
//! an upstream demuxer (or a test) fills them in. Container hierarchies are
//! flattened to the fields the traversal actually uses.

mod moof;
mod moov;
mod stbl;
mod stsd;

pub use moof::{
    MovieFragment, SAMPLE_IS_NON_SYNC_SAMPLE, SaioBox, SaizBox, TfdtBox, TfhdBox, TrackFragment,
    TrunBox, TrunSample,
};
pub use moov::{ElstEntry, Movie, MovieExtends, Track, TrexBox};
pub use stbl::{
    Co64Box, CttsBox, CttsEntry, SampleTable, StscBox, StscEntry, StssBox, StszBox, SttsBox,
    SttsEntry,
};
pub use stsd::{AudioSampleEntry, SampleDescription, TrackEncryption, VideoSampleEntry};
