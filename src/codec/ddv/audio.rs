//! DDV audio decoder
//!
//! Each payload carries a 16-bit table flag, three residual bit-widths,
//! and three seed samples, followed by predicted samples. A residual is
//! read at the first width whose value is not the lone-sign-bit sentinel,
//! falling through to the second and third widths. The three-tap predictor
//! runs through a sign-preserving log approximation when the table flag is
//! set. Stereo frames hold both channels back to back, the first padded to
//! a byte boundary.

use super::bitread::AudioBitReader;
use super::tables::SND_BITS;
use crate::codec::{AudioFrame, Decoder, Frame};
use crate::error::{Error, Result};
use crate::format::Packet;
use crate::util::{Buffer, SampleFormat};

/// Number of seed samples opening each channel
const SEED_SAMPLES: usize = 3;

/// DDV audio decoder
pub struct DdvAudioDecoder {
    sample_rate: u32,
    channels: u16,
    samples_per_frame: u32,
    pending: Option<Packet>,
}

impl DdvAudioDecoder {
    /// Create a decoder; `channels` must be 1 or 2
    pub fn new(sample_rate: u32, channels: u16, samples_per_frame: u32) -> Result<Self> {
        if channels != 1 && channels != 2 {
            return Err(Error::unsupported(format!(
                "DDV audio supports 1 or 2 channels, not {}",
                channels
            )));
        }
        Ok(DdvAudioDecoder {
            sample_rate,
            channels,
            samples_per_frame,
            pending: None,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn samples_per_frame(&self) -> u32 {
        self.samples_per_frame
    }

    /// Decode one frame payload into interleaved s16 samples.
    ///
    /// Writes exactly `samples_per_frame` samples per channel at a stride
    /// equal to the channel count.
    pub fn decode_frame(&self, data: &[u8], out: &mut [i16]) -> Result<()> {
        let samples = self.samples_per_frame as usize;
        let need = samples * self.channels as usize;
        if out.len() < need {
            return Err(Error::BufferTooSmall {
                need,
                have: out.len(),
            });
        }

        out[..need].fill(0);
        let mut reader = AudioBitReader::new(data);
        if self.channels == 2 {
            decode_channel(&mut reader, out, 2, samples, false);
            decode_channel(&mut reader, &mut out[1..], 2, samples, true);
        } else {
            decode_channel(&mut reader, out, 1, samples, true);
        }
        Ok(())
    }
}

/// Decode one channel at the given stride. Unless this is the last channel
/// of the frame, the reader is aligned down to a byte boundary afterwards.
fn decode_channel(
    reader: &mut AudioBitReader<'_>,
    out: &mut [i16],
    stride: usize,
    samples: usize,
    is_last: bool,
) {
    let use_table = reader.next_bits(16);
    let width1 = reader.next_bits(16);
    let width2 = reader.next_bits(16);
    let width3 = reader.next_bits(16);

    let mut history = [0i32; SEED_SAMPLES];
    for (i, slot) in history.iter_mut().enumerate() {
        let seed = reader.next_bits(16);
        *slot = seed as i32;
        if i < samples {
            out[i * stride] = seed;
        }
    }
    let [mut v1, mut v2, mut v3] = history;

    for n in SEED_SAMPLES..samples {
        let mut residual = reader.next_bits(width1 as u16);
        if !accept_residual(&mut residual, width1) {
            residual = reader.next_bits(width2 as u16);
            if !accept_residual(&mut residual, width2) {
                residual = reader.next_bits(width3 as u16);
                accept_residual(&mut residual, width3);
            }
        }

        let predicted = (v1 + 5 * v3 - 4 * v2) >> 1;
        v1 = v2;
        v2 = v3;

        v3 = if use_table != 0 {
            let offset = sign_log(predicted as i16);
            expand((residual as i32 + offset) as i16) as i32
        } else {
            (predicted + residual as i32) as i16 as i32
        };

        out[n * stride] = v3 as i16;
    }

    if !is_last {
        reader.align();
    }
}

/// Check a residual against the lone-sign-bit sentinel for `width`.
///
/// Returns false when the value is the sentinel (try the next width);
/// otherwise folds the sign bit in and returns true.
fn accept_residual(residual: &mut i16, width: i16) -> bool {
    let mask = 1i32.wrapping_shl(width.wrapping_sub(1) as u32);
    let value = *residual as i32;
    if value == mask {
        return false;
    }
    if value & mask != 0 {
        *residual = (-(value & !mask)) as i16;
    }
    true
}

/// Sign-preserving log approximation of a sample.
///
/// The magnitude is split by `SND_BITS` of its top byte: the bit count
/// lands in bits [10:7], the mantissa in the low bits.
fn sign_log(x: i16) -> i32 {
    let magnitude = (x as i32).abs();
    let bucket = ((magnitude >> 7) & 0xFF) as usize;
    let bits = SND_BITS[bucket] as i32;
    let result = (((bits << 7) as u16) | ((magnitude >> bits) as u16)) as i32;
    if x < 0 {
        -result
    } else {
        result
    }
}

/// Inverse of the log approximation: rebuild a linear sample from the
/// bit-count/mantissa split, restoring a midpoint bit for wide buckets
fn expand(y: i16) -> i16 {
    let magnitude = (y as i32).abs();
    let bits = magnitude >> 7;
    let mantissa = magnitude & 0x7F;
    let mut result = mantissa.wrapping_shl(bits as u32) as u16 as i16;
    if bits >= 2 {
        result |= 1i32.wrapping_shl((bits - 2) as u32) as u16 as i16;
    }
    if y < 0 {
        result.wrapping_neg()
    } else {
        result
    }
}

impl Decoder for DdvAudioDecoder {
    fn send_packet(&mut self, packet: &Packet) -> Result<()> {
        self.pending = Some(packet.clone());
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<Frame> {
        let packet = self
            .pending
            .take()
            .ok_or_else(|| Error::invalid_state("no packet pending"))?;

        let samples = self.samples_per_frame as usize;
        let mut pcm = vec![0i16; samples * self.channels as usize];
        self.decode_frame(packet.data.as_slice(), &mut pcm)?;

        let mut frame = AudioFrame::new(samples, self.sample_rate, self.channels, SampleFormat::I16);
        frame.data.push(Buffer::from_vec(
            pcm.iter().flat_map(|s| s.to_le_bytes()).collect(),
        ));
        frame.pts = packet.pts;
        frame.duration = packet.duration;
        Ok(Frame::Audio(frame))
    }

    fn flush(&mut self) -> Result<()> {
        self.pending = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// LSB-first writer matching the audio reader's word layout
    pub struct AudioBitWriter {
        bytes: Vec<u8>,
        current: u32,
        filled: u32,
    }

    impl AudioBitWriter {
        pub fn new() -> Self {
            AudioBitWriter {
                bytes: Vec::new(),
                current: 0,
                filled: 0,
            }
        }

        pub fn put(&mut self, value: u32, bits: u32) {
            self.current |= (value & ((1u64 << bits) as u32).wrapping_sub(1)) << self.filled;
            self.filled += bits;
            while self.filled >= 8 {
                self.bytes.push(self.current as u8);
                self.current >>= 8;
                self.filled -= 8;
            }
        }

        pub fn align_byte(&mut self) {
            if self.filled > 0 {
                self.bytes.push(self.current as u8);
                self.current = 0;
                self.filled = 0;
            }
        }

        pub fn finish(mut self) -> Vec<u8> {
            self.align_byte();
            self.bytes
        }
    }

    /// Write a channel header with the given widths and seeds
    fn put_header(w: &mut AudioBitWriter, use_table: u16, widths: [u16; 3], seeds: [i16; 3]) {
        w.put(use_table as u32, 16);
        for width in widths {
            w.put(width as u32, 16);
        }
        for seed in seeds {
            w.put(seed as u16 as u32, 16);
        }
    }

    #[test]
    fn test_sign_log_properties() {
        assert_eq!(sign_log(0), 0);
        for &x in &[1i16, 100, 1000, 12345, i16::MAX] {
            assert_eq!(sign_log(x), -sign_log(-x), "x = {}", x);
        }
        // Monotone over positive inputs
        let mut prev = -1;
        for x in (0..32767).step_by(127) {
            let v = sign_log(x as i16);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_expand_is_odd() {
        for &y in &[0i16, 1, 127, 128, 500, 4000] {
            assert_eq!(expand(-y), -expand(y));
        }
    }

    #[test]
    fn test_expand_round_trips_the_log() {
        // expand(sign_log(x)) stays within the bucket width of x
        for &x in &[0i16, 5, 127, 128, 517, 1000, 8000, 30000] {
            let rebuilt = expand(sign_log(x) as i16) as i32;
            let bucket = 1i32 << SND_BITS[((x as i32 >> 7) & 0xFF) as usize];
            assert!(
                (rebuilt - x as i32).abs() <= bucket,
                "x = {} rebuilt = {}",
                x,
                rebuilt
            );
        }
    }

    #[test]
    fn test_accept_residual() {
        // Sentinel: only the sign bit set
        let mut r = 0b100i16;
        assert!(!accept_residual(&mut r, 3));

        // Positive residual passes through
        let mut r = 0b010i16;
        assert!(accept_residual(&mut r, 3));
        assert_eq!(r, 2);

        // Sign bit plus magnitude negates
        let mut r = 0b101i16;
        assert!(accept_residual(&mut r, 3));
        assert_eq!(r, -1);
    }

    #[test]
    fn test_mono_predictor_sequence() {
        // Width 3, no table, zero seeds, residual +1 each step:
        //   p = (v1 + 5*v3 - 4*v2) >> 1, sample = p + 1
        let mut w = AudioBitWriter::new();
        put_header(&mut w, 0, [3, 3, 3], [0, 0, 0]);
        for _ in 0..5 {
            w.put(0b001, 3);
        }

        let decoder = DdvAudioDecoder::new(22050, 1, 8).unwrap();
        let mut out = [0i16; 8];
        decoder.decode_frame(&w.finish(), &mut out).unwrap();

        let mut v = (0i32, 0i32, 0i32);
        let mut expected = vec![0i16, 0, 0];
        for _ in 0..5 {
            let p = (v.0 + 5 * v.2 - 4 * v.1) >> 1;
            let s = (p + 1) as i16;
            expected.push(s);
            v = (v.1, v.2, s as i32);
        }
        assert_eq!(&out[..], &expected[..]);
    }

    #[test]
    fn test_seed_samples_are_passed_through() {
        let mut w = AudioBitWriter::new();
        put_header(&mut w, 0, [4, 4, 4], [100, -200, 300]);
        w.put(0b0001, 4);

        let decoder = DdvAudioDecoder::new(22050, 1, 4).unwrap();
        let mut out = [0i16; 4];
        decoder.decode_frame(&w.finish(), &mut out).unwrap();
        assert_eq!(&out[..3], &[100, -200, 300]);
        // p = (100 + 5*300 - 4*(-200)) >> 1 = 1200, +1
        assert_eq!(out[3], 1201);
    }

    #[test]
    fn test_width_fallback() {
        // First width always rejects (sentinel), residual comes from the
        // second width
        let mut w = AudioBitWriter::new();
        put_header(&mut w, 0, [2, 5, 5], [0, 0, 0]);
        w.put(0b10, 2); // sentinel at width 2
        w.put(0b00011, 5); // +3 at width 5

        let decoder = DdvAudioDecoder::new(22050, 1, 4).unwrap();
        let mut out = [0i16; 4];
        decoder.decode_frame(&w.finish(), &mut out).unwrap();
        assert_eq!(out[3], 3);
    }

    #[test]
    fn test_stereo_interleave_and_alignment() {
        let samples = 4usize;
        let mut w = AudioBitWriter::new();
        // Channel 0: constant +1 residuals
        put_header(&mut w, 0, [3, 3, 3], [10, 10, 10]);
        w.put(0b001, 3);
        // The decoder aligns to a byte boundary between channels
        w.align_byte();
        // Channel 1: seeds only, residual 0
        put_header(&mut w, 0, [3, 3, 3], [-5, -6, -7]);
        w.put(0b000, 3);

        let decoder = DdvAudioDecoder::new(22050, 2, samples as u32).unwrap();
        let mut out = [0i16; 8];
        decoder.decode_frame(&w.finish(), &mut out).unwrap();

        assert_eq!(&out[..6], &[10, -5, 10, -6, 10, -7]);
        // ch0 sample 3: p = (10 + 50 - 40) >> 1 = 10, +1
        assert_eq!(out[6], 11);
        // ch1 sample 3: p = (-5 - 35 + 24) >> 1 = -8, +0
        assert_eq!(out[7], -8);
    }

    #[test]
    fn test_truncated_payload_yields_silence_not_panic() {
        let decoder = DdvAudioDecoder::new(22050, 2, 64).unwrap();
        let mut out = [0i16; 128];
        decoder.decode_frame(&[0x12, 0x34], &mut out).unwrap();
    }

    #[test]
    fn test_channel_count_validation() {
        assert!(DdvAudioDecoder::new(22050, 3, 100).is_err());
        assert!(DdvAudioDecoder::new(22050, 0, 100).is_err());
    }

    #[test]
    fn test_small_output_buffer_is_rejected() {
        let decoder = DdvAudioDecoder::new(22050, 2, 100).unwrap();
        let mut out = [0i16; 100];
        assert!(matches!(
            decoder.decode_frame(&[0u8; 16], &mut out),
            Err(Error::BufferTooSmall { .. })
        ));
    }
}
