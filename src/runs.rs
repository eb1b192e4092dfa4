//! Offset-ordered traversal of sample runs.
//!
//! [`TrackRunIterator`] flattens the sample tables of a movie, or the track
//! fragment runs of a movie fragment, into a sequence of runs sorted by
//! their first data offset, then walks them run by run and sample by
//! sample. In well-structured encrypted media each run's auxiliary
//! information immediately precedes its payload, so offset order lets a
//! streaming consumer discard input bytes as soon as both have been read
//! instead of retaining the whole media data box.

use log::{debug, error, warn};

use crate::bail;
use crate::boxes::{
    AudioSampleEntry, Movie, MovieFragment, SAMPLE_IS_NON_SYNC_SAMPLE, SampleDescription, TfhdBox,
    TrackEncryption, TrexBox, TrunBox, VideoSampleEntry,
};
use crate::cenc::{DecryptConfig, FrameCencInfo};
use crate::err;
use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::tables::{
    ChunkInfoIterator, CompositionOffsetIterator, DecodingTimeIterator, SyncSampleIterator,
};

/// Offset value meaning "no byte is needed".
const INVALID_OFFSET: u64 = u64::MAX;

/// One sample inside a run.
#[derive(Debug, Clone, Copy, Default)]
struct SampleInfo {
    /// Payload size in bytes.
    size: u32,
    /// Decode duration in timescale units.
    duration: u32,
    /// Composition minus decode time.
    cts_offset: i32,
    is_keyframe: bool,
}

/// The sample entry a run's samples reference, borrowed from the movie.
#[derive(Debug, Clone, Copy)]
enum TrackDescription<'a> {
    Audio(&'a AudioSampleEntry),
    Video(&'a VideoSampleEntry),
}

impl<'a> TrackDescription<'a> {
    fn track_encryption(&self) -> Option<&'a TrackEncryption> {
        match self {
            TrackDescription::Audio(entry) => entry.track_encryption.as_ref(),
            TrackDescription::Video(entry) => entry.track_encryption.as_ref(),
        }
    }

    fn is_encrypted(&self) -> bool {
        match self {
            TrackDescription::Audio(entry) => entry.is_encrypted(),
            TrackDescription::Video(entry) => entry.is_encrypted(),
        }
    }
}

/// Location of a run's packed auxiliary information.
#[derive(Debug, Clone)]
struct RunAuxInfo {
    /// Absolute file offset where the run's packed info begins.
    start_offset: u64,
    /// Constant per-sample info size, or 0 when sizes are per-sample.
    default_size: u8,
    /// Per-sample info sizes; used only when `default_size` is 0.
    sizes: Vec<u8>,
    /// Total packed size for the run.
    total_size: u32,
}

/// A contiguous group of samples sharing one starting offset and decode
/// timestamp: a chunk in non-fragmented input, a track fragment run in
/// fragmented input.
#[derive(Debug, Clone)]
struct TrackRunInfo<'a> {
    track_id: u32,
    timescale: u32,
    start_dts: i64,
    /// Byte offset of the first sample; successive samples are contiguous.
    sample_start_offset: u64,
    samples: Vec<SampleInfo>,
    description: TrackDescription<'a>,
    aux_info: Option<RunAuxInfo>,
}

impl TrackRunInfo<'_> {
    fn aux_total_size(&self) -> u32 {
        self.aux_info.as_ref().map_or(0, |a| a.total_size)
    }

    /// Sort key: runs order by their smallest data offset (payload or aux
    /// info), with the larger offset breaking ties.
    fn offset_key(&self) -> (u64, u64) {
        let aux = match &self.aux_info {
            Some(aux) if aux.total_size > 0 => aux.start_offset,
            _ => INVALID_OFFSET,
        };

        (
            aux.min(self.sample_start_offset),
            aux.max(self.sample_start_offset),
        )
    }
}

/// Resolve one fragmented sample through the default chain: explicit `trun`
/// entry, then track fragment header, then track extends. The header's
/// size and duration defaults apply only when positive; its flags default
/// applies whenever the header carries one.
fn resolve_sample(trex: &TrexBox, tfhd: &TfhdBox, trun: &TrunBox, index: u32) -> SampleInfo {
    let entry = trun.samples.get(index as usize);

    let size = entry
        .and_then(|s| s.size)
        .or(tfhd.default_sample_size.filter(|&size| size > 0))
        .unwrap_or(trex.default_sample_size);

    let duration = entry
        .and_then(|s| s.duration)
        .or(tfhd.default_sample_duration.filter(|&duration| duration > 0))
        .unwrap_or(trex.default_sample_duration);

    let cts_offset = entry.and_then(|s| s.composition_time_offset).unwrap_or(0);

    let flags = entry
        .and_then(|s| s.flags)
        .or(tfhd.default_sample_flags)
        .unwrap_or(trex.default_sample_flags);

    SampleInfo {
        size,
        duration,
        cts_offset,
        is_keyframe: flags & SAMPLE_IS_NON_SYNC_SAMPLE == 0,
    }
}

/// Pick the sample entry a run references. `desc_idx` is one-based; an
/// out-of-range index falls back to the first entry.
fn select_description(
    description: &SampleDescription,
    desc_idx: u32,
    track_id: u32,
) -> Result<TrackDescription<'_>> {
    if desc_idx == 0 {
        bail!("sample description index of track {track_id} is zero");
    }
    let idx = desc_idx as usize - 1;

    match description {
        SampleDescription::Audio(entries) => {
            if entries.is_empty() {
                bail!("track {track_id} has no audio sample entries");
            }
            let idx = if idx >= entries.len() { 0 } else { idx };
            Ok(TrackDescription::Audio(&entries[idx]))
        }
        SampleDescription::Video(entries) => {
            if entries.is_empty() {
                bail!("track {track_id} has no video sample entries");
            }
            let idx = if idx >= entries.len() { 0 } else { idx };
            Ok(TrackDescription::Video(&entries[idx]))
        }
        SampleDescription::Other => {
            bail!("track {track_id} has no audio or video sample entries")
        }
    }
}

fn build_movie_runs(moov: &Movie) -> Result<Vec<TrackRunInfo<'_>>> {
    let mut runs = Vec::new();

    for trak in &moov.tracks {
        let stbl = &trak.sample_table;
        if matches!(stbl.description, SampleDescription::Other) {
            debug!("Skipping unhandled track type of track {}", trak.track_id);
            continue;
        }

        // Edit lists are not applied. A single edit with a nonnegative
        // media time could be forwarded to the muxer if it is ever needed.
        if !trak.edit_list.is_empty() {
            if trak.edit_list.len() > 1 {
                warn!("Multi-entry edit box detected on track {}", trak.track_id);
            }
            debug!(
                "Edit list with media time {} ignored on track {}",
                trak.edit_list[0].media_time, trak.track_id
            );
        }

        let mut decoding_time = DecodingTimeIterator::new(&stbl.decoding_time)?;
        let mut composition_offset =
            CompositionOffsetIterator::new(stbl.composition_offset.as_ref())?;
        let has_composition_offset = composition_offset.is_valid();
        let mut chunk_info = ChunkInfoIterator::new(&stbl.sample_to_chunk);
        let mut sync_sample = SyncSampleIterator::new(stbl.sync_sample.as_ref());
        // saiz and saio are not read here; encrypted descriptions are
        // rejected below, so non-fragmented input never carries aux info.

        let sample_size = &stbl.sample_size;
        let chunk_offsets = &stbl.chunk_offsets.offsets;

        let num_samples = sample_size.sample_count;
        let num_chunks = chunk_offsets.len() as u32;

        // The declared sample count must agree with every table.
        if u64::from(num_samples) != decoding_time.num_samples() {
            bail!(
                "stts of track {} covers {} samples, stsz declares {}",
                trak.track_id,
                decoding_time.num_samples(),
                num_samples
            );
        }
        if has_composition_offset && u64::from(num_samples) != composition_offset.num_samples() {
            bail!(
                "ctts of track {} covers {} samples, stsz declares {}",
                trak.track_id,
                composition_offset.num_samples(),
                num_samples
            );
        }
        if num_chunks > 0 && u64::from(num_samples) != chunk_info.num_samples(1, num_chunks) {
            bail!(
                "stsc of track {} covers {} samples over {} chunks, stsz declares {}",
                trak.track_id,
                chunk_info.num_samples(1, num_chunks),
                num_chunks,
                num_samples
            );
        }
        if num_chunks < chunk_info.last_first_chunk() {
            bail!(
                "stsc of track {} references chunk {} but only {} chunk offsets exist",
                trak.track_id,
                chunk_info.last_first_chunk(),
                num_chunks
            );
        }

        if num_samples > 0 && (!decoding_time.is_valid() || !chunk_info.is_valid()) {
            bail!(
                "track {} declares {} samples but its timing or chunk table is empty",
                trak.track_id,
                num_samples
            );
        }

        let mut run_start_dts = 0i64;
        let mut sample_index = 0u32;

        for chunk_index in 0..num_chunks {
            if chunk_info.current_chunk() != chunk_index + 1 {
                bail!(
                    "stsc of track {} lost sync at chunk {}",
                    trak.track_id,
                    chunk_index + 1
                );
            }

            let description = select_description(
                &stbl.description,
                chunk_info.sample_description_index(),
                trak.track_id,
            )?;
            if description.is_encrypted() {
                bail!(
                    "track {} uses an encrypted description in a non-fragmented presentation",
                    trak.track_id
                );
            }

            let start_dts = run_start_dts;
            let samples_per_chunk = chunk_info.samples_per_chunk();
            let mut samples = Vec::with_capacity(samples_per_chunk as usize);

            for _ in 0..samples_per_chunk {
                let size = if sample_size.sample_size != 0 {
                    sample_size.sample_size
                } else {
                    *sample_size.sizes.get(sample_index as usize).ok_or_else(|| {
                        err!(
                            "stsz of track {} is missing the size of sample {}",
                            trak.track_id,
                            sample_index
                        )
                    })?
                };

                let sample = SampleInfo {
                    size,
                    duration: decoding_time.sample_delta(),
                    cts_offset: if has_composition_offset {
                        composition_offset.sample_offset()
                    } else {
                        0
                    },
                    is_keyframe: sync_sample.is_sync_sample(),
                };
                run_start_dts += i64::from(sample.duration);
                samples.push(sample);

                // Every advance must succeed, except that the timing tables
                // end exactly on the last overall sample.
                sample_index += 1;
                if !(chunk_info.advance_sample() && sync_sample.advance_sample()) {
                    bail!(
                        "stsc of track {} ended before sample {}",
                        trak.track_id,
                        sample_index
                    );
                }
                if sample_index == num_samples {
                    if decoding_time.advance_sample() {
                        bail!(
                            "stts of track {} extends past its declared {} samples",
                            trak.track_id,
                            num_samples
                        );
                    }
                    if has_composition_offset && composition_offset.advance_sample() {
                        bail!(
                            "ctts of track {} extends past its declared {} samples",
                            trak.track_id,
                            num_samples
                        );
                    }
                } else {
                    if !decoding_time.advance_sample() {
                        bail!(
                            "stts of track {} ended before sample {}",
                            trak.track_id,
                            sample_index
                        );
                    }
                    if has_composition_offset && !composition_offset.advance_sample() {
                        bail!(
                            "ctts of track {} ended before sample {}",
                            trak.track_id,
                            sample_index
                        );
                    }
                }
            }

            runs.push(TrackRunInfo {
                track_id: trak.track_id,
                timescale: trak.timescale,
                start_dts,
                sample_start_offset: chunk_offsets[chunk_index as usize],
                samples,
                description,
                aux_info: None,
            });
        }
    }

    Ok(runs)
}

fn build_fragment_runs<'a>(
    moov: &'a Movie,
    moof: &MovieFragment,
) -> Result<Vec<TrackRunInfo<'a>>> {
    let mut runs = Vec::new();

    for traf in &moof.tracks {
        let track_id = traf.header.track_id;
        let trak = moov
            .track(track_id)
            .ok_or_else(|| err!("fragment references unknown track {track_id}"))?;
        let trex = moov
            .track_extends(track_id)
            .ok_or_else(|| err!("no track extends entry for track {track_id}"))?;

        let description_box = &trak.sample_table.description;
        if matches!(description_box, SampleDescription::Other) {
            debug!("Skipping unhandled track type of track {track_id}");
            continue;
        }

        let desc_idx = traf
            .header
            .sample_description_index
            .filter(|&idx| idx > 0)
            .unwrap_or(trex.default_sample_description_index);
        let description = select_description(description_box, desc_idx, track_id)?;

        let mut run_start_dts = traf.decode_time.base_media_decode_time as i64;
        let mut sample_count_sum = 0u32;

        for (j, trun) in traf.runs.iter().enumerate() {
            // Aux info for run j comes from the saio entry with the same
            // index, when there is one.
            let aux_info = if let Some(&start_offset) = traf.auxiliary_offset.offsets.get(j) {
                // The size table must cover every sample of this run.
                if traf.auxiliary_size.sample_count < sample_count_sum + trun.sample_count {
                    bail!(
                        "saiz of track {} covers {} samples, runs up to {} need {}",
                        track_id,
                        traf.auxiliary_size.sample_count,
                        j,
                        sample_count_sum + trun.sample_count
                    );
                }

                let default_size = traf.auxiliary_size.default_sample_info_size;
                let sizes = if default_size == 0 {
                    let lo = sample_count_sum as usize;
                    let hi = lo + trun.sample_count as usize;
                    traf.auxiliary_size
                        .sample_info_sizes
                        .get(lo..hi)
                        .ok_or_else(|| {
                            err!("saiz of track {track_id} is missing per-sample sizes for run {j}")
                        })?
                        .to_vec()
                } else {
                    Vec::new()
                };

                let total_size = if default_size > 0 {
                    u32::from(default_size) * trun.sample_count
                } else {
                    sizes.iter().map(|&s| u32::from(s)).sum()
                };

                Some(RunAuxInfo {
                    start_offset,
                    default_size,
                    sizes,
                    total_size,
                })
            } else {
                None
            };

            let start_dts = run_start_dts;
            let mut samples = Vec::with_capacity(trun.sample_count as usize);
            for k in 0..trun.sample_count {
                let sample = resolve_sample(trex, &traf.header, trun, k);
                run_start_dts += i64::from(sample.duration);
                samples.push(sample);
            }

            runs.push(TrackRunInfo {
                track_id,
                timescale: trak.timescale,
                start_dts,
                sample_start_offset: trun.data_offset,
                samples,
                description,
                aux_info,
            });
            sample_count_sum += trun.sample_count;
        }
    }

    Ok(runs)
}

/// Iterator over the sample runs of a presentation, in increasing file
/// offset order.
///
/// Borrowing an immutable [`Movie`], the iterator is initialized either
/// against the movie itself ([`init`](Self::init), non-fragmented input) or
/// against a succession of movie fragments
/// ([`init_fragment`](Self::init_fragment), each call fully replacing the
/// previous state), then driven forward with
/// [`advance_run`](Self::advance_run) and
/// [`advance_sample`](Self::advance_sample) until exhausted.
///
/// Queries against an exhausted position are programmer errors. Every one
/// fails a debug assertion in test builds. In release builds the queries
/// that read a cached scalar (`dts`, `sample_offset`) return the stale
/// value, `get_decrypt_config` returns `None`, and the rest still panic on
/// the out-of-bounds index.
pub struct TrackRunIterator<'a> {
    moov: &'a Movie,
    runs: Vec<TrackRunInfo<'a>>,
    run_index: usize,
    sample_index: usize,
    /// Decode timestamp of the current sample.
    sample_dts: i64,
    /// File offset of the current sample.
    sample_offset: u64,
    /// Either empty or one entry per sample of the current run.
    cenc_info: Vec<FrameCencInfo>,
}

impl<'a> TrackRunIterator<'a> {
    pub fn new(moov: &'a Movie) -> Self {
        Self {
            moov,
            runs: Vec::new(),
            run_index: 0,
            sample_index: 0,
            sample_dts: 0,
            sample_offset: 0,
            cenc_info: Vec::new(),
        }
    }

    /// Build the run sequence of a non-fragmented presentation from the
    /// movie's sample tables.
    ///
    /// On failure the iterator is left empty and safely queryable
    /// (`is_run_valid()` is false).
    pub fn init(&mut self) -> Result<()> {
        let runs = build_movie_runs(self.moov);
        self.install(runs)
    }

    /// Build the run sequence of one movie fragment, replacing any previous
    /// state.
    ///
    /// The fragment is not retained; its offsets and sample data are copied
    /// into the run records. On failure the iterator is left empty and
    /// safely queryable.
    pub fn init_fragment(&mut self, moof: &MovieFragment) -> Result<()> {
        let runs = build_fragment_runs(self.moov, moof);
        self.install(runs)
    }

    fn install(&mut self, runs: Result<Vec<TrackRunInfo<'a>>>) -> Result<()> {
        match runs {
            Ok(mut runs) => {
                runs.sort_by_key(TrackRunInfo::offset_key);
                self.runs = runs;
                self.run_index = 0;
                self.reset_run();
                Ok(())
            }
            Err(e) => {
                self.runs = Vec::new();
                self.run_index = 0;
                self.reset_run();
                Err(e)
            }
        }
    }

    /// Step to the next run in offset order.
    pub fn advance_run(&mut self) {
        if self.run_index < self.runs.len() {
            self.run_index += 1;
        }
        self.reset_run();
    }

    fn reset_run(&mut self) {
        self.sample_index = 0;
        self.cenc_info.clear();
        if let Some(run) = self.runs.get(self.run_index) {
            self.sample_dts = run.start_dts;
            self.sample_offset = run.sample_start_offset;
        }
    }

    /// Step to the next sample of the current run.
    pub fn advance_sample(&mut self) {
        debug_assert!(self.is_sample_valid());
        if let Some(sample) = self
            .runs
            .get(self.run_index)
            .and_then(|r| r.samples.get(self.sample_index))
        {
            self.sample_dts += i64::from(sample.duration);
            self.sample_offset += u64::from(sample.size);
            self.sample_index += 1;
        }
    }

    pub fn is_run_valid(&self) -> bool {
        self.run_index < self.runs.len()
    }

    pub fn is_sample_valid(&self) -> bool {
        self.runs
            .get(self.run_index)
            .is_some_and(|r| self.sample_index < r.samples.len())
    }

    fn run(&self) -> &TrackRunInfo<'a> {
        debug_assert!(self.is_run_valid(), "query against an exhausted run");
        &self.runs[self.run_index]
    }

    fn sample(&self) -> &SampleInfo {
        debug_assert!(self.is_sample_valid(), "query against an exhausted sample");
        &self.runs[self.run_index].samples[self.sample_index]
    }

    /// Whether auxiliary information must be supplied via
    /// [`cache_aux_info`](Self::cache_aux_info) before the current run's
    /// samples can be emitted.
    pub fn aux_info_needs_caching(&self) -> bool {
        self.run().description.is_encrypted()
            && self.run().aux_total_size() > 0
            && self.cenc_info.is_empty()
    }

    /// Parse the packed auxiliary information block of the current run.
    ///
    /// `buf` must hold at least [`aux_info_size`](Self::aux_info_size)
    /// bytes read from [`aux_info_offset`](Self::aux_info_offset). On
    /// failure the cache is discarded; the consumer may retry or skip the
    /// run.
    pub fn cache_aux_info(&mut self, buf: &[u8]) -> Result<()> {
        if !self.aux_info_needs_caching() {
            return Err(Error::AuxInfo(
                "the current run has no pending auxiliary information".to_owned(),
            ));
        }
        if (buf.len() as u64) < u64::from(self.aux_info_size()) {
            return Err(Error::AuxInfo(format!(
                "buffer holds {} bytes, the run needs {}",
                buf.len(),
                self.aux_info_size()
            )));
        }

        let iv_size = self
            .run()
            .description
            .track_encryption()
            .map_or(0, |t| t.default_iv_size);

        let run = &self.runs[self.run_index];
        let Some(aux) = run.aux_info.as_ref() else {
            return Err(Error::AuxInfo(
                "the current run carries no auxiliary information".to_owned(),
            ));
        };

        let mut cenc_info = Vec::with_capacity(run.samples.len());
        let mut pos = 0usize;
        for i in 0..run.samples.len() {
            let info_size = if aux.default_size > 0 {
                usize::from(aux.default_size)
            } else {
                usize::from(*aux.sizes.get(i).ok_or_else(|| {
                    Error::AuxInfo(format!("no auxiliary information size for sample {i}"))
                })?)
            };

            let chunk = buf.get(pos..pos + info_size).ok_or_else(|| {
                Error::AuxInfo(format!("auxiliary information truncated at sample {i}"))
            })?;
            let mut reader = Reader::new(chunk);
            cenc_info.push(FrameCencInfo::parse(&mut reader, iv_size)?);
            pos += info_size;
        }

        self.cenc_info = cenc_info;
        Ok(())
    }

    /// Smallest file offset whose bytes may still be needed.
    ///
    /// Runs are emitted in offset order and auxiliary information is cached
    /// before samples are returned, so no byte before the lesser of the
    /// current and next runs' minimum offsets can be required again. The
    /// current run's minimum alone would not be safe: the format places no
    /// ordering restriction between consecutive runs.
    pub fn max_clear_offset(&self) -> u64 {
        let mut offset = INVALID_OFFSET;

        if self.is_sample_valid() {
            offset = offset.min(self.sample_offset);
            if self.aux_info_needs_caching() {
                offset = offset.min(self.aux_info_offset());
            }
        }
        if let Some(next_run) = self.runs.get(self.run_index + 1) {
            offset = offset.min(next_run.sample_start_offset);
            if let Some(aux) = &next_run.aux_info
                && aux.total_size > 0
            {
                offset = offset.min(aux.start_offset);
            }
        }

        if offset == INVALID_OFFSET {
            return self.runs.first().map_or(0, |run| run.sample_start_offset);
        }
        offset
    }

    /// Id of the current run's track. Valid while `is_run_valid()`, as are
    /// all the run queries below.
    pub fn track_id(&self) -> u32 {
        self.run().track_id
    }

    /// Media timescale of the current run's track.
    pub fn timescale(&self) -> u32 {
        self.run().timescale
    }

    pub fn is_audio(&self) -> bool {
        matches!(self.run().description, TrackDescription::Audio(_))
    }

    pub fn is_video(&self) -> bool {
        matches!(self.run().description, TrackDescription::Video(_))
    }

    /// The audio sample entry of the current run. The run must be audio.
    pub fn audio_description(&self) -> &'a AudioSampleEntry {
        match self.run().description {
            TrackDescription::Audio(entry) => entry,
            TrackDescription::Video(_) => panic!("the current run is not an audio run"),
        }
    }

    /// The video sample entry of the current run. The run must be video.
    pub fn video_description(&self) -> &'a VideoSampleEntry {
        match self.run().description {
            TrackDescription::Video(entry) => entry,
            TrackDescription::Audio(_) => panic!("the current run is not a video run"),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.run().description.is_encrypted()
    }

    /// The track encryption parameters of the current run's sample entry,
    /// when it carries a protection scheme.
    pub fn track_encryption(&self) -> Option<&'a TrackEncryption> {
        self.run().description.track_encryption()
    }

    /// File offset of the current run's packed auxiliary information.
    /// Meaningful only while `aux_info_size()` is nonzero.
    pub fn aux_info_offset(&self) -> u64 {
        self.run()
            .aux_info
            .as_ref()
            .map_or(INVALID_OFFSET, |a| a.start_offset)
    }

    /// Total packed auxiliary information size of the current run, or 0
    /// when the run carries none.
    pub fn aux_info_size(&self) -> u32 {
        self.run().aux_total_size()
    }

    /// Decode timestamp of the current sample. Valid while
    /// `is_sample_valid()`, as are all the sample queries below.
    pub fn dts(&self) -> i64 {
        debug_assert!(self.is_sample_valid(), "query against an exhausted sample");
        self.sample_dts
    }

    /// Composition timestamp of the current sample.
    pub fn cts(&self) -> i64 {
        self.dts() + i64::from(self.sample().cts_offset)
    }

    pub fn duration(&self) -> u32 {
        self.sample().duration
    }

    pub fn sample_size(&self) -> u32 {
        self.sample().size
    }

    /// File offset of the current sample's payload.
    pub fn sample_offset(&self) -> u64 {
        debug_assert!(self.is_sample_valid(), "query against an exhausted sample");
        self.sample_offset
    }

    pub fn is_keyframe(&self) -> bool {
        self.sample().is_keyframe
    }

    /// Assemble the decryption parameters of the current sample. Valid only
    /// on an encrypted run whose auxiliary information has been cached.
    ///
    /// Returns `None` when the sample's subsample map does not cover its
    /// size exactly.
    pub fn get_decrypt_config(&self) -> Option<DecryptConfig> {
        debug_assert!(self.is_sample_valid(), "query against an exhausted sample");
        debug_assert!(self.is_encrypted());
        debug_assert!(!self.aux_info_needs_caching());

        let cenc_info = self.cenc_info.get(self.sample_index)?;
        let track_encryption = self.track_encryption()?;

        let total = cenc_info.total_size_of_subsamples();
        if total != 0 && total != u64::from(self.sample_size()) {
            error!(
                "Subsample counts of the sample at offset {} sum to {} but its size is {} (kid {})",
                self.sample_offset,
                total,
                self.sample_size(),
                hex::encode(track_encryption.default_kid)
            );
            return None;
        }

        Some(DecryptConfig {
            key_id: track_encryption.default_kid,
            iv: cenc_info.iv().to_vec(),
            subsamples: cenc_info.subsamples().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::TrunSample;

    fn trex() -> TrexBox {
        TrexBox {
            track_id: 1,
            default_sample_description_index: 1,
            default_sample_duration: 1000,
            default_sample_size: 50,
            default_sample_flags: SAMPLE_IS_NON_SYNC_SAMPLE,
        }
    }

    #[test]
    fn test_resolve_prefers_explicit_entry() {
        let tfhd = TfhdBox {
            track_id: 1,
            default_sample_duration: Some(2000),
            default_sample_size: Some(60),
            default_sample_flags: Some(0),
            ..Default::default()
        };
        let trun = TrunBox {
            data_offset: 0,
            sample_count: 1,
            samples: vec![TrunSample {
                duration: Some(3000),
                size: Some(70),
                flags: Some(SAMPLE_IS_NON_SYNC_SAMPLE),
                composition_time_offset: Some(-10),
            }],
        };

        let sample = resolve_sample(&trex(), &tfhd, &trun, 0);
        assert_eq!(sample.duration, 3000);
        assert_eq!(sample.size, 70);
        assert_eq!(sample.cts_offset, -10);
        assert!(!sample.is_keyframe);
    }

    #[test]
    fn test_resolve_falls_back_to_header_then_extends() {
        let trun = TrunBox {
            data_offset: 0,
            sample_count: 1,
            samples: Vec::new(),
        };

        let tfhd = TfhdBox {
            track_id: 1,
            default_sample_duration: Some(2000),
            default_sample_size: Some(60),
            default_sample_flags: Some(0),
            ..Default::default()
        };
        let sample = resolve_sample(&trex(), &tfhd, &trun, 0);
        assert_eq!(sample.duration, 2000);
        assert_eq!(sample.size, 60);
        assert_eq!(sample.cts_offset, 0);
        assert!(sample.is_keyframe);

        let bare = TfhdBox {
            track_id: 1,
            ..Default::default()
        };
        let sample = resolve_sample(&trex(), &bare, &trun, 0);
        assert_eq!(sample.duration, 1000);
        assert_eq!(sample.size, 50);
        assert!(!sample.is_keyframe);
    }

    #[test]
    fn test_resolve_ignores_zero_header_size_and_duration() {
        // A header default of zero falls through to the track extends value
        // for size and duration, unlike flags.
        let tfhd = TfhdBox {
            track_id: 1,
            default_sample_duration: Some(0),
            default_sample_size: Some(0),
            default_sample_flags: Some(0),
            ..Default::default()
        };
        let trun = TrunBox {
            data_offset: 0,
            sample_count: 1,
            samples: Vec::new(),
        };

        let sample = resolve_sample(&trex(), &tfhd, &trun, 0);
        assert_eq!(sample.duration, 1000);
        assert_eq!(sample.size, 50);
        assert!(sample.is_keyframe);
    }

    fn video_entries(count: usize) -> SampleDescription {
        SampleDescription::Video(
            (0..count)
                .map(|i| VideoSampleEntry {
                    format: *b"avc1",
                    width: 640 + i as u16,
                    height: 360,
                    track_encryption: None,
                })
                .collect(),
        )
    }

    #[test]
    fn test_select_description_one_based() {
        let description = video_entries(2);

        let selected = select_description(&description, 2, 1).unwrap();
        let TrackDescription::Video(entry) = selected else {
            panic!("expected a video entry");
        };
        assert_eq!(entry.width, 641);
    }

    #[test]
    fn test_select_description_out_of_range_falls_back_to_first() {
        let description = video_entries(2);

        let selected = select_description(&description, 9, 1).unwrap();
        let TrackDescription::Video(entry) = selected else {
            panic!("expected a video entry");
        };
        assert_eq!(entry.width, 640);
    }

    #[test]
    fn test_select_description_rejects_zero_and_empty() {
        let description = video_entries(2);
        assert!(select_description(&description, 0, 1).is_err());

        let empty = SampleDescription::Video(Vec::new());
        assert!(select_description(&empty, 1, 1).is_err());
    }
}
