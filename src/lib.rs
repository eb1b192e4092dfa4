//! Offset-ordered sample run traversal for ISO base media files.
//!
//! Given the parsed box tree of an mp4 presentation, [`TrackRunIterator`]
//! emits its samples as a flat sequence of runs sorted by file offset, each
//! sample carrying decode and composition timestamps, size, payload offset,
//! keyframe flag and, for encrypted fragmented content, its Common
//! Encryption parameters. The offset ordering lets a consumer that feeds
//! from a streamed input free earlier bytes as soon as a run's auxiliary
//! information and payload have both been read.
//!
//! Both non-fragmented presentations (sample tables in the movie box) and
//! fragmented presentations (movie fragments with track fragment runs) are
//! supported:
//!
//! ```
//! use mp4_runs::{TrackRunIterator, boxes::Movie};
//!
//! fn dump(moov: &Movie) -> mp4_runs::Result<()> {
//!     let mut iter = TrackRunIterator::new(moov);
//!     iter.init()?;
//!
//!     while iter.is_run_valid() {
//!         while iter.is_sample_valid() {
//!             println!(
//!                 "track {} dts {} offset {} size {}",
//!                 iter.track_id(),
//!                 iter.dts(),
//!                 iter.sample_offset(),
//!                 iter.sample_size()
//!             );
//!             iter.advance_sample();
//!         }
//!         iter.advance_run();
//!     }
//!
//!     Ok(())
//! }
//! ```

mod cenc;
mod error;
mod reader;
mod runs;

pub mod boxes;
pub mod tables;

pub use cenc::{DecryptConfig, FrameCencInfo, SubsampleEntry};
pub use error::{Error, Result};
pub use reader::Reader;
pub use runs::TrackRunIterator;
