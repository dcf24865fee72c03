//! Decoder trait and construction

use super::Frame;
use crate::error::{Error, Result};
use crate::format::{Packet, StreamInfo};
use crate::util::MediaType;

/// Decoder trait for decoding compressed data
pub trait Decoder {
    /// Send a packet to the decoder
    fn send_packet(&mut self, packet: &Packet) -> Result<()>;

    /// Receive a decoded frame
    fn receive_frame(&mut self) -> Result<Frame>;

    /// Flush the decoder
    fn flush(&mut self) -> Result<()>;
}

/// Decoder context
pub struct DecoderContext {
    codec_id: String,
    extradata: Option<Vec<u8>>,
}

impl DecoderContext {
    /// Create a new decoder context
    pub fn new(codec_id: String) -> Self {
        DecoderContext {
            codec_id,
            extradata: None,
        }
    }

    /// Set extradata (codec-specific configuration)
    pub fn set_extradata(&mut self, data: Vec<u8>) {
        self.extradata = Some(data);
    }

    /// Get the codec ID
    pub fn codec_id(&self) -> &str {
        &self.codec_id
    }

    /// Get extradata
    pub fn extradata(&self) -> Option<&[u8]> {
        self.extradata.as_deref()
    }
}

/// Create a decoder for the given stream
///
/// Decoder parameters (dimensions, sample rate, channel count) come from the
/// demuxed stream information, so this takes a [`StreamInfo`] rather than a
/// bare codec ID.
pub fn create_decoder(info: &StreamInfo) -> Result<Box<dyn Decoder>> {
    match (info.codec_id.as_str(), info.media_type) {
        ("ddv-video", MediaType::Video) => {
            let video = info.video_info.as_ref().ok_or_else(|| {
                Error::invalid_input("ddv-video stream is missing video parameters")
            })?;
            use crate::codec::ddv::DdvVideoDecoder;
            Ok(Box::new(DdvVideoDecoder::new(
                video.width as u16,
                video.height as u16,
            )))
        }
        ("ddv-audio", MediaType::Audio) => {
            let audio = info.audio_info.as_ref().ok_or_else(|| {
                Error::invalid_input("ddv-audio stream is missing audio parameters")
            })?;
            let samples = audio.samples_per_frame.ok_or_else(|| {
                Error::invalid_input("ddv-audio stream is missing samples_per_frame")
            })?;
            use crate::codec::ddv::DdvAudioDecoder;
            Ok(Box::new(DdvAudioDecoder::new(
                audio.sample_rate,
                audio.channels,
                samples,
            )?))
        }
        _ => Err(Error::unsupported(format!(
            "no decoder available for codec: {}",
            info.codec_id
        ))),
    }
}
