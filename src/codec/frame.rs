//! Frame representation for uncompressed media data

use crate::util::{Buffer, PixelFormat, SampleFormat, Timestamp};

/// A frame of uncompressed media data
#[derive(Debug, Clone)]
pub enum Frame {
    Video(VideoFrame),
    Audio(AudioFrame),
}

impl Frame {
    /// Get the presentation timestamp
    pub fn pts(&self) -> Timestamp {
        match self {
            Frame::Video(f) => f.pts,
            Frame::Audio(f) => f.pts,
        }
    }

    /// Set the presentation timestamp
    pub fn set_pts(&mut self, pts: Timestamp) {
        match self {
            Frame::Video(f) => f.pts = pts,
            Frame::Audio(f) => f.pts = pts,
        }
    }
}

/// A video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Frame data (one buffer per plane; packed formats use a single plane)
    pub data: Vec<Buffer>,

    /// Line sizes for each plane
    pub linesize: Vec<usize>,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Pixel format
    pub format: PixelFormat,

    /// Presentation timestamp
    pub pts: Timestamp,

    /// Duration
    pub duration: i64,

    /// Is keyframe
    pub keyframe: bool,
}

impl VideoFrame {
    /// Create a new video frame
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        VideoFrame {
            data: Vec::new(),
            linesize: Vec::new(),
            width,
            height,
            format,
            pts: Timestamp::none(),
            duration: 0,
            keyframe: false,
        }
    }

    /// Get the number of planes
    pub fn num_planes(&self) -> usize {
        self.data.len()
    }

    /// Get a plane by index
    pub fn plane(&self, index: usize) -> Option<&Buffer> {
        self.data.get(index)
    }
}

/// An audio frame
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Audio data (interleaved formats use a single buffer)
    pub data: Vec<Buffer>,

    /// Number of samples per channel
    pub nb_samples: usize,

    /// Sample rate
    pub sample_rate: u32,

    /// Number of channels
    pub channels: u16,

    /// Sample format
    pub format: SampleFormat,

    /// Presentation timestamp
    pub pts: Timestamp,

    /// Duration
    pub duration: i64,
}

impl AudioFrame {
    /// Create a new audio frame
    pub fn new(nb_samples: usize, sample_rate: u32, channels: u16, format: SampleFormat) -> Self {
        AudioFrame {
            data: Vec::new(),
            nb_samples,
            sample_rate,
            channels,
            format,
            pts: Timestamp::none(),
            duration: 0,
        }
    }

    /// Get total number of samples across all channels
    pub fn total_samples(&self) -> usize {
        self.nb_samples * self.channels as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_frame() {
        let frame = VideoFrame::new(320, 240, PixelFormat::RGBA);
        assert_eq!(frame.width, 320);
        assert_eq!(frame.num_planes(), 0);
        assert!(!frame.pts.is_valid());
    }

    #[test]
    fn test_audio_frame_totals() {
        let frame = AudioFrame::new(735, 22050, 2, SampleFormat::I16);
        assert_eq!(frame.total_samples(), 1470);
    }
}
