//! Codec implementations (decoders)

pub mod ddv;
pub mod decoder;
pub mod frame;

pub use ddv::{DdvAudioDecoder, DdvVideoDecoder};
pub use decoder::{create_decoder, Decoder, DecoderContext};
pub use frame::{AudioFrame, Frame, VideoFrame};

use crate::util::MediaType;

/// Codec capability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecCapabilities {
    /// Codec supports lossy compression
    pub lossy: bool,
    /// Codec supports lossless compression
    pub lossless: bool,
    /// Codec supports intra-only coding
    pub intra_only: bool,
    /// Codec supports inter-frame prediction
    pub inter: bool,
}

/// Codec information
#[derive(Debug, Clone)]
pub struct CodecInfo {
    /// Codec identifier
    pub id: String,
    /// Codec name
    pub name: String,
    /// Long descriptive name
    pub long_name: String,
    /// Media type
    pub media_type: MediaType,
    /// Codec capabilities
    pub capabilities: CodecCapabilities,
}

/// Get codec information by ID
pub fn get_codec_info(id: &str) -> Option<CodecInfo> {
    match id {
        "ddv-video" => Some(CodecInfo {
            id: "ddv-video".to_string(),
            name: "DDV Video".to_string(),
            long_name: "DDV intra-coded DCT video".to_string(),
            media_type: MediaType::Video,
            capabilities: CodecCapabilities {
                lossy: true,
                lossless: false,
                intra_only: true,
                inter: false,
            },
        }),
        "ddv-audio" => Some(CodecInfo {
            id: "ddv-audio".to_string(),
            name: "DDV Audio".to_string(),
            long_name: "DDV predictive 16-bit audio".to_string(),
            media_type: MediaType::Audio,
            capabilities: CodecCapabilities {
                lossy: true,
                lossless: false,
                intra_only: true,
                inter: false,
            },
        }),
        _ => None,
    }
}
