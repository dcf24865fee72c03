//! Container format handling (demuxing)
//!
//! This module provides functionality for reading the DDV interleaved
//! audio/video container format.

pub mod ddv;
pub mod demuxer;
pub mod packet;
pub mod stream;

pub use demuxer::{Demuxer, DemuxerContext};
pub use packet::{Packet, PacketFlags};
pub use stream::{AudioInfo, Stream, StreamInfo, VideoInfo};

/// Format capability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCapabilities {
    /// Format supports seeking
    pub seekable: bool,
    /// Format supports multiple streams
    pub multi_stream: bool,
    /// Format supports timestamps
    pub timestamps: bool,
}

/// Container format information
#[derive(Debug, Clone)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Long/descriptive name
    pub long_name: String,
    /// File extensions
    pub extensions: Vec<String>,
    /// Format capabilities
    pub capabilities: FormatCapabilities,
}

/// Detect format from file extension
pub fn detect_format_from_extension(path: &str) -> Option<&'static str> {
    let ext = path.rsplit('.').next()?.to_lowercase();
    match ext.as_str() {
        "ddv" => Some("ddv"),
        _ => None,
    }
}

/// Get format information by name
pub fn get_format_info(name: &str) -> Option<FormatInfo> {
    match name {
        "ddv" => Some(FormatInfo {
            name: "ddv".to_string(),
            long_name: "DDV interleaved audio/video".to_string(),
            extensions: vec!["ddv".to_string()],
            capabilities: FormatCapabilities {
                seekable: true,
                multi_stream: true,
                timestamps: true,
            },
        }),
        _ => None,
    }
}
