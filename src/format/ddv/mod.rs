//! DDV container format support
//!
//! A DDV stream opens with a fixed header declaring which of the two
//! streams (video, audio) it carries, followed by per-stream headers, a
//! per-frame size table, skipped audio prebuffers, and the interleaved
//! frame payloads. See [`header`] for the byte layout, [`demuxer`] for
//! packet-level access, and [`player`] for the one-call-per-frame driver.

pub mod demuxer;
pub mod header;
pub mod player;

pub use demuxer::{DdvDemuxer, FramePayload};
pub use header::{AudioHeader, FileHeader, VideoHeader};
pub use player::DdvPlayer;
