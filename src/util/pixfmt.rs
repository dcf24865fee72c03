//! Pixel format definitions

use std::fmt;

/// Pixel format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// RGB24 - 8 bits per component, packed
    RGB24,
    /// RGBA - RGB with alpha channel, packed (R, G, B, A byte order)
    RGBA,
    /// YUV420P - Planar YUV 4:2:0
    YUV420P,
    /// GRAY8 - 8-bit grayscale
    GRAY8,
    /// Unknown format
    Unknown,
}

impl PixelFormat {
    /// Get the number of components in this pixel format
    pub fn num_components(&self) -> usize {
        match self {
            PixelFormat::RGB24 => 3,
            PixelFormat::RGBA => 4,
            PixelFormat::YUV420P => 3,
            PixelFormat::GRAY8 => 1,
            PixelFormat::Unknown => 0,
        }
    }

    /// Get the bits per pixel for this format
    pub fn bits_per_pixel(&self) -> usize {
        match self {
            PixelFormat::RGB24 => 24,
            PixelFormat::RGBA => 32,
            PixelFormat::YUV420P => 12,
            PixelFormat::GRAY8 => 8,
            PixelFormat::Unknown => 0,
        }
    }

    /// Check if this is a planar format
    pub fn is_planar(&self) -> bool {
        matches!(self, PixelFormat::YUV420P)
    }

    /// Check if this is an RGB format
    pub fn is_rgb(&self) -> bool {
        matches!(self, PixelFormat::RGB24 | PixelFormat::RGBA)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::RGB24 => "rgb24",
            PixelFormat::RGBA => "rgba",
            PixelFormat::YUV420P => "yuv420p",
            PixelFormat::GRAY8 => "gray8",
            PixelFormat::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        PixelFormat::Unknown
    }
}
