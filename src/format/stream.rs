//! Stream information and metadata

use crate::util::{MediaType, Rational};

/// Information about a media stream
#[derive(Debug, Clone)]
pub struct StreamInfo {
    /// Stream index
    pub index: usize,

    /// Media type
    pub media_type: MediaType,

    /// Codec identifier
    pub codec_id: String,

    /// Time base for this stream
    pub time_base: Rational,

    /// Duration in time_base units
    pub duration: i64,

    /// Number of frames (if known)
    pub nb_frames: Option<u64>,

    /// Video-specific info
    pub video_info: Option<VideoInfo>,

    /// Audio-specific info
    pub audio_info: Option<AudioInfo>,
}

impl StreamInfo {
    /// Create a new stream info
    pub fn new(index: usize, media_type: MediaType, codec_id: String) -> Self {
        StreamInfo {
            index,
            media_type,
            codec_id,
            time_base: Rational::new(1, 90000), // Default to 90kHz
            duration: 0,
            nb_frames: None,
            video_info: None,
            audio_info: None,
        }
    }

    /// Get duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.duration as f64 * self.time_base.to_f64()
    }
}

/// Video stream information
#[derive(Debug, Clone)]
pub struct VideoInfo {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Frame rate
    pub frame_rate: Rational,

    /// Pixel format
    pub pix_fmt: String,

    /// Interval between keyframes, in frames (0 if unknown)
    pub keyframe_interval: u32,
}

impl VideoInfo {
    /// Create new video info
    pub fn new(width: u32, height: u32) -> Self {
        VideoInfo {
            width,
            height,
            frame_rate: Rational::new(25, 1),
            pix_fmt: String::from("rgba"),
            keyframe_interval: 0,
        }
    }
}

/// Audio stream information
#[derive(Debug, Clone)]
pub struct AudioInfo {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of channels
    pub channels: u16,

    /// Sample format
    pub sample_fmt: String,

    /// Samples per compressed frame (if fixed)
    pub samples_per_frame: Option<u32>,
}

impl AudioInfo {
    /// Create new audio info
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        AudioInfo {
            sample_rate,
            channels,
            sample_fmt: String::from("s16"),
            samples_per_frame: None,
        }
    }
}

/// A media stream
#[derive(Debug, Clone)]
pub struct Stream {
    /// Stream information
    pub info: StreamInfo,
}

impl Stream {
    /// Create a new stream
    pub fn new(info: StreamInfo) -> Self {
        Stream { info }
    }
}
