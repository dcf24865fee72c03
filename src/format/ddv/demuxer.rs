//! DDV demuxer implementation
//!
//! Stream layout after the headers: the per-frame size table (one u32 per
//! frame, video + audio bytes combined), then the audio interleave
//! prebuffer payloads (skipped), then the frame payloads. When both
//! streams are present a frame payload starts with a u32 giving the video
//! share; the remainder is audio.

use super::header::{AudioHeader, FileHeader, VideoHeader};
use crate::error::{Error, Result};
use crate::format::{
    AudioInfo, Demuxer, DemuxerContext, Packet, Stream, StreamInfo, VideoInfo,
};
use crate::util::{Buffer, MediaType, Rational, Timestamp};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// Extra bytes tolerated above the header's declared per-frame maximum
const FRAME_SIZE_SLACK: u32 = 64 * 1024;

/// Over-read slack appended to raw audio buffers
const AUDIO_READ_SLACK: usize = 4;

/// Payload descriptor returned by [`DdvDemuxer::read_frame_into`]
#[derive(Debug, Clone, Copy)]
pub struct FramePayload {
    /// Index of the frame just read
    pub frame_index: u32,
    /// Bytes of video data placed in the video buffer
    pub video_len: usize,
    /// Bytes of audio data placed in the audio buffer
    pub audio_len: usize,
}

/// DDV demuxer over any seekable byte source
pub struct DdvDemuxer<R: Read + Seek> {
    reader: R,
    context: DemuxerContext,
    file_header: Option<FileHeader>,
    video_header: Option<VideoHeader>,
    audio_header: Option<AudioHeader>,
    frame_sizes: Vec<u32>,
    /// Byte offset of each frame payload, plus the end offset
    frame_offsets: Vec<u64>,
    current_frame: u32,
    pending_audio: Option<Packet>,
}

impl<R: Read + Seek> DdvDemuxer<R> {
    /// Create a demuxer; call [`open`](Self::open) to parse the headers
    pub fn new(reader: R) -> Self {
        DdvDemuxer {
            reader,
            context: DemuxerContext::new("ddv".to_string()),
            file_header: None,
            video_header: None,
            audio_header: None,
            frame_sizes: Vec::new(),
            frame_offsets: Vec::new(),
            current_frame: 0,
            pending_audio: None,
        }
    }

    /// Parse headers, the frame size table, and skip the audio prebuffers
    pub fn open(&mut self) -> Result<()> {
        let file_header = FileHeader::read(&mut self.reader)?;

        let video_header = if file_header.has_video() {
            Some(VideoHeader::read(&mut self.reader)?)
        } else {
            None
        };
        let audio_header = if file_header.has_audio() {
            Some(AudioHeader::read(&mut self.reader)?)
        } else {
            None
        };

        let mut frame_sizes = Vec::with_capacity(file_header.frame_count.min(1 << 20) as usize);
        for _ in 0..file_header.frame_count {
            frame_sizes.push(self.reader.read_u32::<LittleEndian>()?);
        }

        // The interleave prebuffers sit between the size table and the
        // frame payloads; they are never decoded
        if let Some(audio) = &audio_header {
            for &size in &audio.prebuffer_sizes {
                self.reader.seek(SeekFrom::Current(size as i64))?;
            }
        }

        let data_start = self.reader.stream_position()?;
        let frame_prefix = if file_header.has_video() && file_header.has_audio() {
            4u64 // the u32 video-size word is not counted in the size table
        } else {
            0
        };
        let mut frame_offsets = Vec::with_capacity(frame_sizes.len() + 1);
        let mut offset = data_start;
        for &size in &frame_sizes {
            frame_offsets.push(offset);
            offset += size as u64 + frame_prefix;
        }
        frame_offsets.push(offset);

        self.build_streams(&file_header, video_header.as_ref(), audio_header.as_ref());
        self.context.set_duration(file_header.frame_count as i64);

        debug!(
            frames = file_header.frame_count,
            frame_rate = file_header.frame_rate,
            has_video = file_header.has_video(),
            has_audio = file_header.has_audio(),
            "opened DDV stream"
        );

        self.file_header = Some(file_header);
        self.video_header = video_header;
        self.audio_header = audio_header;
        self.frame_sizes = frame_sizes;
        self.frame_offsets = frame_offsets;
        self.current_frame = 0;
        self.pending_audio = None;
        Ok(())
    }

    fn build_streams(
        &mut self,
        file_header: &FileHeader,
        video: Option<&VideoHeader>,
        audio: Option<&AudioHeader>,
    ) {
        self.context.clear_streams();
        let frame_rate = file_header.frame_rate.max(1) as i64;
        let mut index = 0;

        if let Some(video) = video {
            let mut info = StreamInfo::new(index, MediaType::Video, "ddv-video".to_string());
            info.time_base = Rational::new(1, frame_rate);
            info.duration = file_header.frame_count as i64;
            info.nb_frames = Some(file_header.frame_count as u64);
            info.video_info = Some(VideoInfo {
                width: video.width as u32,
                height: video.height as u32,
                frame_rate: Rational::new(frame_rate, 1),
                pix_fmt: "rgba".to_string(),
                keyframe_interval: video.key_frame_rate,
            });
            self.context.add_stream(Stream::new(info));
            index += 1;
        }

        if let Some(audio) = audio {
            let mut info = StreamInfo::new(index, MediaType::Audio, "ddv-audio".to_string());
            info.time_base = Rational::new(1, frame_rate);
            info.duration = file_header.frame_count as i64;
            info.nb_frames = Some(file_header.frame_count as u64);
            info.audio_info = Some(AudioInfo {
                sample_rate: audio.sample_rate,
                channels: 2,
                sample_fmt: "s16".to_string(),
                samples_per_frame: Some(audio.samples_per_frame),
            });
            self.context.add_stream(Stream::new(info));
        }
    }

    /// Parsed file header, available after [`open`](Self::open)
    pub fn file_header(&self) -> Option<&FileHeader> {
        self.file_header.as_ref()
    }

    pub fn video_header(&self) -> Option<&VideoHeader> {
        self.video_header.as_ref()
    }

    pub fn audio_header(&self) -> Option<&AudioHeader> {
        self.audio_header.as_ref()
    }

    /// Per-frame payload sizes from the container's size table
    pub fn frame_sizes(&self) -> &[u32] {
        &self.frame_sizes
    }

    /// Index of the next frame to be read
    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    fn declared_max_frame_size(&self) -> u32 {
        let video = self
            .video_header
            .as_ref()
            .map(|v| v.max_video_frame_size)
            .unwrap_or(0);
        let audio = self
            .audio_header
            .as_ref()
            .map(|a| a.max_audio_frame_size)
            .unwrap_or(0);
        video.saturating_add(audio)
    }

    /// Read the next frame's raw payloads into reusable buffers.
    ///
    /// The audio buffer gets a few zeroed slack bytes past `audio_len` so
    /// the decoder's word-wise refill can over-read harmlessly. Returns
    /// `None` once all frames have been read.
    pub fn read_frame_into(
        &mut self,
        video: &mut Vec<u8>,
        audio: &mut Vec<u8>,
    ) -> Result<Option<FramePayload>> {
        let file_header = self
            .file_header
            .as_ref()
            .ok_or_else(|| Error::invalid_state("demuxer not opened"))?;

        if self.current_frame >= file_header.frame_count {
            return Ok(None);
        }
        let frame_index = self.current_frame;
        let total = self.frame_sizes[frame_index as usize];

        let max = self.declared_max_frame_size();
        if max > 0 && total > max.saturating_add(FRAME_SIZE_SLACK) {
            return Err(Error::SizeOverflow {
                declared: total,
                max,
            });
        }

        let has_video = file_header.has_video();
        let has_audio = file_header.has_audio();
        let mut video_len = 0usize;
        let mut audio_len = 0usize;

        if has_video && has_audio {
            let video_size = self.reader.read_u32::<LittleEndian>()?;
            if video_size > total {
                return Err(Error::bitstream(format!(
                    "video share {} exceeds frame size {}",
                    video_size, total
                )));
            }
            video_len = video_size as usize;
            audio_len = (total - video_size) as usize;
            read_into(&mut self.reader, video, video_len, 0)?;
            read_into(&mut self.reader, audio, audio_len, AUDIO_READ_SLACK)?;
        } else if has_audio {
            audio_len = total as usize;
            read_into(&mut self.reader, audio, audio_len, AUDIO_READ_SLACK)?;
        } else if has_video {
            video_len = total as usize;
            read_into(&mut self.reader, video, video_len, 0)?;
        }

        self.current_frame += 1;
        Ok(Some(FramePayload {
            frame_index,
            video_len,
            audio_len,
        }))
    }

    fn video_stream_index(&self) -> Option<usize> {
        self.file_header.as_ref()?.has_video().then_some(0)
    }

    fn audio_stream_index(&self) -> Option<usize> {
        let header = self.file_header.as_ref()?;
        header
            .has_audio()
            .then_some(usize::from(header.has_video()))
    }
}

/// Resize `buf` and fill `len` bytes from the reader, zeroing `slack`
/// extra bytes at the tail
fn read_into<R: Read>(reader: &mut R, buf: &mut Vec<u8>, len: usize, slack: usize) -> Result<()> {
    buf.resize(len + slack, 0);
    reader.read_exact(&mut buf[..len])?;
    buf[len..].fill(0);
    Ok(())
}

impl<R: Read + Seek> Demuxer for DdvDemuxer<R> {
    fn streams(&self) -> &[Stream] {
        self.context.streams()
    }

    fn read_packet(&mut self) -> Result<Packet> {
        if let Some(packet) = self.pending_audio.take() {
            return Ok(packet);
        }

        let mut video = Vec::new();
        let mut audio = Vec::new();
        let payload = self
            .read_frame_into(&mut video, &mut audio)?
            .ok_or(Error::EndOfStream)?;

        let pts = Timestamp::new(payload.frame_index as i64);
        let audio_packet = self.audio_stream_index().map(|index| {
            audio.truncate(payload.audio_len);
            let mut packet = Packet::new_audio(index, Buffer::from_vec(audio));
            packet.pts = pts;
            packet.duration = 1;
            packet.set_keyframe(true);
            packet
        });

        if let Some(index) = self.video_stream_index() {
            video.truncate(payload.video_len);
            let mut packet = Packet::new_video(index, Buffer::from_vec(video));
            packet.pts = pts;
            packet.duration = 1;
            packet.set_keyframe(true);
            self.pending_audio = audio_packet;
            Ok(packet)
        } else {
            audio_packet.ok_or_else(|| Error::invalid_state("stream carries no media"))
        }
    }

    fn seek(&mut self, _stream_index: usize, timestamp: i64) -> Result<()> {
        let file_header = self
            .file_header
            .as_ref()
            .ok_or_else(|| Error::invalid_state("demuxer not opened"))?;

        if timestamp < 0 || timestamp > file_header.frame_count as i64 {
            return Err(Error::invalid_input(format!(
                "seek target {} out of range (0-{})",
                timestamp, file_header.frame_count
            )));
        }

        // Every DDV frame is intra-coded, so any frame is a seek point
        self.reader
            .seek(SeekFrom::Start(self.frame_offsets[timestamp as usize]))?;
        self.current_frame = timestamp as u32;
        self.pending_audio = None;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.file_header = None;
        self.video_header = None;
        self.audio_header = None;
        self.frame_sizes.clear();
        self.frame_offsets.clear();
        self.context.clear_streams();
        self.current_frame = 0;
        self.pending_audio = None;
        Ok(())
    }
}
