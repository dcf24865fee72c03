//! Frame driver: demuxer and decoders composed behind one update loop
//!
//! The player owns every buffer the per-frame path touches — raw payload
//! buffers, the RGBA pixel buffer, and the PCM buffer — all sized from the
//! container headers and reused across frames. Each [`DdvPlayer::update`]
//! call decodes exactly one frame.

use super::demuxer::DdvDemuxer;
use crate::codec::ddv::{DdvAudioDecoder, DdvVideoDecoder};
use crate::error::Result;
use crate::format::Demuxer;
use crate::util::Rational;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::trace;

/// Synchronous DDV playback driver
pub struct DdvPlayer<R: Read + Seek> {
    demuxer: DdvDemuxer<R>,
    video: Option<DdvVideoDecoder>,
    audio: Option<DdvAudioDecoder>,
    raw_video: Vec<u8>,
    raw_audio: Vec<u8>,
    pixels: Vec<u32>,
    samples: Vec<i16>,
}

impl DdvPlayer<BufReader<File>> {
    /// Open a DDV file from disk
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        DdvPlayer::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> DdvPlayer<R> {
    /// Parse the container and size all decode buffers from its headers
    pub fn new(reader: R) -> Result<Self> {
        let mut demuxer = DdvDemuxer::new(reader);
        demuxer.open()?;

        let mut video = None;
        let mut pixels = Vec::new();
        let mut raw_video = Vec::new();
        if let Some(header) = demuxer.video_header() {
            video = Some(DdvVideoDecoder::new(header.width, header.height));
            pixels = vec![0u32; header.width as usize * header.height as usize];
            raw_video = Vec::with_capacity(header.max_video_frame_size as usize);
        }

        let mut audio = None;
        let mut samples = Vec::new();
        let mut raw_audio = Vec::new();
        if let Some(header) = demuxer.audio_header() {
            // All known containers interleave two channels
            audio = Some(DdvAudioDecoder::new(
                header.sample_rate,
                2,
                header.samples_per_frame,
            )?);
            samples = vec![0i16; header.samples_per_frame as usize * 2];
            raw_audio = Vec::with_capacity(header.max_audio_frame_size as usize + 4);
        }

        Ok(DdvPlayer {
            demuxer,
            video,
            audio,
            raw_video,
            raw_audio,
            pixels,
            samples,
        })
    }

    /// Decode the next frame into the internal pixel and PCM buffers.
    ///
    /// Returns `Ok(false)` once every frame has been played.
    pub fn update(&mut self) -> Result<bool> {
        let Some(payload) = self
            .demuxer
            .read_frame_into(&mut self.raw_video, &mut self.raw_audio)?
        else {
            return Ok(false);
        };
        trace!(
            frame = payload.frame_index,
            video_len = payload.video_len,
            audio_len = payload.audio_len,
            "decoding frame"
        );

        if let Some(video) = &mut self.video {
            video.decode_frame(&self.raw_video[..payload.video_len], &mut self.pixels)?;
        }
        if let Some(audio) = &self.audio {
            audio.decode_frame(&self.raw_audio, &mut self.samples)?;
        }
        Ok(true)
    }

    /// Rewind to the first frame
    pub fn reset(&mut self) -> Result<()> {
        self.demuxer.seek(0, 0)
    }

    /// Decoded pixels of the last frame, packed `0x00BBGGRR`, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Decoded PCM of the last frame, interleaved s16
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    pub fn width(&self) -> u16 {
        self.video.as_ref().map(|v| v.width()).unwrap_or(0)
    }

    pub fn height(&self) -> u16 {
        self.video.as_ref().map(|v| v.height()).unwrap_or(0)
    }

    /// Container frame rate
    pub fn frame_rate(&self) -> Rational {
        let rate = self
            .demuxer
            .file_header()
            .map(|h| h.frame_rate.max(1))
            .unwrap_or(1);
        Rational::new(rate as i64, 1)
    }

    pub fn frame_count(&self) -> u32 {
        self.demuxer
            .file_header()
            .map(|h| h.frame_count)
            .unwrap_or(0)
    }

    /// Index of the next frame [`update`](Self::update) will decode
    pub fn current_frame(&self) -> u32 {
        self.demuxer.current_frame()
    }

    pub fn sample_rate(&self) -> u32 {
        self.audio.as_ref().map(|a| a.sample_rate()).unwrap_or(0)
    }

    pub fn channels(&self) -> u16 {
        self.audio.as_ref().map(|a| a.channels()).unwrap_or(0)
    }

    pub fn samples_per_frame(&self) -> u32 {
        self.audio
            .as_ref()
            .map(|a| a.samples_per_frame())
            .unwrap_or(0)
    }

    /// Access the underlying demuxer
    pub fn demuxer(&self) -> &DdvDemuxer<R> {
        &self.demuxer
    }
}
