//! Common utilities and data structures

pub mod buffer;
pub mod pixfmt;
pub mod rational;
pub mod samplefmt;
pub mod timestamp;

pub use buffer::Buffer;
pub use pixfmt::PixelFormat;
pub use rational::Rational;
pub use samplefmt::SampleFormat;
pub use timestamp::Timestamp;

use std::fmt;

/// Common media types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Video stream
    Video,
    /// Audio stream
    Audio,
    /// Data stream
    Data,
    /// Unknown stream type
    Unknown,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Video => write!(f, "video"),
            MediaType::Audio => write!(f, "audio"),
            MediaType::Data => write!(f, "data"),
            MediaType::Unknown => write!(f, "unknown"),
        }
    }
}
