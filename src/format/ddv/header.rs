//! DDV container header structures and parsing
//!
//! Layout (all fields little-endian): a fixed file header, then a video
//! header if the contains field has bit 0 set, then an audio header (plus
//! its interleave prebuffer size list) if bit 1 is set.

use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

/// Magic tag opening every DDV stream
pub const DDV_MAGIC: [u8; 4] = *b"DDV\0";

/// The only container version seen in known data
pub const DDV_VERSION: u32 = 1;

/// Contains-field bit for a video stream
pub const CONTAINS_VIDEO: u32 = 1 << 0;

/// Contains-field bit for an audio stream
pub const CONTAINS_AUDIO: u32 = 1 << 1;

/// Fixed DDV file header
#[derive(Debug, Clone)]
pub struct FileHeader {
    /// Container version (always 1)
    pub version: u32,
    /// Bitfield: bit 0 = has video, bit 1 = has audio
    pub contains: u32,
    /// Frames per second
    pub frame_rate: u32,
    /// Total number of frames
    pub frame_count: u32,
}

impl FileHeader {
    /// Parse and validate the file header
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != DDV_MAGIC {
            return Err(Error::BadMagic { found: magic });
        }

        let version = reader.read_u32::<LittleEndian>()?;
        if version != DDV_VERSION {
            return Err(Error::UnsupportedVersion { found: version });
        }

        Ok(FileHeader {
            version,
            contains: reader.read_u32::<LittleEndian>()?,
            frame_rate: reader.read_u32::<LittleEndian>()?,
            frame_count: reader.read_u32::<LittleEndian>()?,
        })
    }

    pub fn has_video(&self) -> bool {
        self.contains & CONTAINS_VIDEO != 0
    }

    pub fn has_audio(&self) -> bool {
        self.contains & CONTAINS_AUDIO != 0
    }
}

/// Video stream header, present when the contains field has bit 0 set
#[derive(Debug, Clone)]
pub struct VideoHeader {
    /// Purpose unknown; carried through from the container
    pub unknown: u32,
    pub width: u16,
    pub height: u16,
    pub max_audio_frame_size: u32,
    pub max_video_frame_size: u32,
    pub key_frame_rate: u32,
}

impl VideoHeader {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(VideoHeader {
            unknown: reader.read_u32::<LittleEndian>()?,
            width: reader.read_u16::<LittleEndian>()?,
            height: reader.read_u16::<LittleEndian>()?,
            max_audio_frame_size: reader.read_u32::<LittleEndian>()?,
            max_video_frame_size: reader.read_u32::<LittleEndian>()?,
            key_frame_rate: reader.read_u32::<LittleEndian>()?,
        })
    }

    /// Macroblock grid width (frames are padded up to 16-pixel tiles)
    pub fn macroblocks_x(&self) -> usize {
        (self.width as usize + 15) / 16
    }

    /// Macroblock grid height
    pub fn macroblocks_y(&self) -> usize {
        (self.height as usize + 15) / 16
    }
}

/// Audio stream header, present when the contains field has bit 1 set
#[derive(Debug, Clone)]
pub struct AudioHeader {
    pub format: u32,
    pub sample_rate: u32,
    pub max_audio_frame_size: u32,
    pub samples_per_frame: u32,
    /// Number of interleaved prebuffer payloads preceding the frame data
    pub interleave_count: u32,
    /// Sizes of the prebuffer payloads (skipped, never decoded)
    pub prebuffer_sizes: Vec<u32>,
}

impl AudioHeader {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let format = reader.read_u32::<LittleEndian>()?;
        let sample_rate = reader.read_u32::<LittleEndian>()?;
        let max_audio_frame_size = reader.read_u32::<LittleEndian>()?;
        let samples_per_frame = reader.read_u32::<LittleEndian>()?;
        let interleave_count = reader.read_u32::<LittleEndian>()?;

        let mut prebuffer_sizes = Vec::with_capacity(interleave_count.min(1024) as usize);
        for _ in 0..interleave_count {
            prebuffer_sizes.push(reader.read_u32::<LittleEndian>()?);
        }

        Ok(AudioHeader {
            format,
            sample_rate,
            max_audio_frame_size,
            samples_per_frame,
            interleave_count,
            prebuffer_sizes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn le32(v: u32) -> [u8; 4] {
        v.to_le_bytes()
    }

    #[test]
    fn test_file_header_roundtrip() {
        let mut data = Vec::new();
        data.extend_from_slice(&DDV_MAGIC);
        data.extend_from_slice(&le32(1));
        data.extend_from_slice(&le32(CONTAINS_VIDEO | CONTAINS_AUDIO));
        data.extend_from_slice(&le32(15));
        data.extend_from_slice(&le32(900));

        let header = FileHeader::read(&mut Cursor::new(data)).unwrap();
        assert!(header.has_video());
        assert!(header.has_audio());
        assert_eq!(header.frame_rate, 15);
        assert_eq!(header.frame_count, 900);
    }

    #[test]
    fn test_bad_magic() {
        let mut data = Vec::new();
        data.extend_from_slice(b"RIFF");
        data.extend_from_slice(&le32(1));
        let err = FileHeader::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, Error::BadMagic { found } if &found == b"RIFF"));
    }

    #[test]
    fn test_unsupported_version() {
        let mut data = Vec::new();
        data.extend_from_slice(&DDV_MAGIC);
        data.extend_from_slice(&le32(2));
        data.extend_from_slice(&le32(0));
        data.extend_from_slice(&le32(0));
        data.extend_from_slice(&le32(0));
        let err = FileHeader::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion { found: 2 }));
    }

    #[test]
    fn test_truncated_header_is_short_read() {
        let err = FileHeader::read(&mut Cursor::new(b"DDV\0\x01\x00".to_vec())).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_macroblock_grid_rounds_up() {
        let header = VideoHeader {
            unknown: 0,
            width: 300,
            height: 200,
            max_audio_frame_size: 0,
            max_video_frame_size: 0,
            key_frame_rate: 0,
        };
        assert_eq!(header.macroblocks_x(), 19);
        assert_eq!(header.macroblocks_y(), 13);
    }

    #[test]
    fn test_audio_header_prebuffer_sizes() {
        let mut data = Vec::new();
        data.extend_from_slice(&le32(1)); // format
        data.extend_from_slice(&le32(22050));
        data.extend_from_slice(&le32(4000));
        data.extend_from_slice(&le32(1470));
        data.extend_from_slice(&le32(2)); // interleave count
        data.extend_from_slice(&le32(100));
        data.extend_from_slice(&le32(200));

        let header = AudioHeader::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(header.sample_rate, 22050);
        assert_eq!(header.prebuffer_sizes, vec![100, 200]);
    }
}
