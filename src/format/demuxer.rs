//! Demuxer support for reading container formats

use super::{Packet, Stream};
use crate::error::Result;

/// Demuxer trait for reading container formats
///
/// Implementations own their reader; construction and header parsing happen
/// in the concrete type (see [`crate::format::ddv::DdvDemuxer`]).
pub trait Demuxer {
    /// Get the list of streams in this container
    fn streams(&self) -> &[Stream];

    /// Read the next packet
    fn read_packet(&mut self) -> Result<Packet>;

    /// Seek to a specific timestamp (in stream time_base units)
    fn seek(&mut self, stream_index: usize, timestamp: i64) -> Result<()>;

    /// Close the demuxer, releasing any per-stream state
    fn close(&mut self) -> Result<()>;
}

/// Context shared by demuxer implementations
pub struct DemuxerContext {
    streams: Vec<Stream>,
    format_name: String,
    duration: i64,
}

impl DemuxerContext {
    /// Create a new demuxer context
    pub fn new(format_name: String) -> Self {
        DemuxerContext {
            streams: Vec::new(),
            format_name,
            duration: 0,
        }
    }

    /// Get the format name
    pub fn format_name(&self) -> &str {
        &self.format_name
    }

    /// Get all streams
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Get a specific stream
    pub fn stream(&self, index: usize) -> Option<&Stream> {
        self.streams.get(index)
    }

    /// Add a stream
    pub fn add_stream(&mut self, stream: Stream) {
        self.streams.push(stream);
    }

    /// Remove all streams
    pub fn clear_streams(&mut self) {
        self.streams.clear();
    }

    /// Get the duration
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Set the duration
    pub fn set_duration(&mut self, duration: i64) {
        self.duration = duration;
    }
}
