//! Run-level decoding of the video bitstream
//!
//! The first 16-bit word of a video payload is the frame quantization
//! scale; the bitstream proper starts at the second word with an 11-bit
//! block header. Decoding expands the variable-length codes into a flat
//! stream of 16-bit run-level words, preserving block boundaries through
//! the `0xFE00` end-of-block sentinel. The frame ends when the 11-bit field
//! after an end-of-block reads `0x3FF`.

use super::bitread::VideoBitReader;
use super::tables::{vlc_tables, EOB_WORD, ESCAPE_WORD, FRAME_END};
use crate::error::{Error, Result};

#[inline]
fn emit(out: &mut Vec<u16>, word: u16, max_words: usize) -> Result<()> {
    if out.len() >= max_words {
        return Err(Error::bitstream(
            "run-level stream exceeds the frame's block capacity",
        ));
    }
    out.push(word);
    Ok(())
}

/// Expand one video frame's bitstream into run-level words.
///
/// `out` is cleared and refilled; `max_words` bounds it so a corrupt
/// payload cannot run away. Returns the frame quantization scale.
pub fn decode_frame(data: &[u8], out: &mut Vec<u16>, max_words: usize) -> Result<u16> {
    if data.len() < 6 {
        return Err(Error::bitstream("video payload too short"));
    }
    let qscale = u16::from_le_bytes([data[0], data[1]]);
    let tables = vlc_tables();

    out.clear();
    let mut reader = VideoBitReader::new(data, 1);

    // First block header
    let header = reader.peek(11);
    reader.consume(11);
    emit(out, header as u16, max_words)?;

    loop {
        let short_index = reader.peek(13) as usize;
        if short_index < 32 {
            // Eight or more leading zero bits: a single long code
            let long_index = reader.peek(17) as usize;
            reader.consume(8);
            let entry = tables.long[long_index];
            if entry.bits_to_shift == 0 {
                return Err(Error::bitstream("invalid long code in video bitstream"));
            }
            reader.consume(entry.bits_to_shift as u32);
            emit(out, entry.word, max_words)?;
            continue;
        }

        let entry = tables.short[short_index];
        if entry.bits_to_shift == 0 {
            return Err(Error::bitstream("invalid short code in video bitstream"));
        }
        reader.consume(entry.bits_to_shift as u32);
        for &word in entry.words.iter() {
            if word == 0 {
                break;
            }
            if word == ESCAPE_WORD {
                // Emit the current 16-bit window verbatim
                let literal = reader.peek(16) as u16;
                reader.consume(16);
                emit(out, literal, max_words)?;
                break;
            }
            emit(out, word, max_words)?;
            if word == EOB_WORD {
                let next = reader.peek(11);
                reader.consume(11);
                if next == FRAME_END {
                    return Ok(qscale);
                }
                emit(out, next as u16, max_words)?;
            }
        }
    }
}

/// MSB-first bitstream writer for synthesizing test payloads: a leading
/// quantization-scale word, then 16-bit words of bitstream
#[cfg(test)]
pub(crate) mod testbits {
    pub struct BitWriter {
        words: Vec<u16>,
        current: u16,
        filled: u32,
    }

    impl BitWriter {
        pub fn new(qscale: u16) -> Self {
            BitWriter {
                words: vec![qscale],
                current: 0,
                filled: 0,
            }
        }

        pub fn put(&mut self, value: u32, bits: u32) {
            for shift in (0..bits).rev() {
                let bit = (value >> shift) & 1;
                self.current = (self.current << 1) | bit as u16;
                self.filled += 1;
                if self.filled == 16 {
                    self.words.push(self.current);
                    self.current = 0;
                    self.filled = 0;
                }
            }
        }

        pub fn finish(mut self) -> Vec<u8> {
            if self.filled > 0 {
                self.words.push(self.current << (16 - self.filled));
            }
            // The reader primes itself with two words past the qscale
            while self.words.len() < 3 {
                self.words.push(0);
            }
            self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testbits::BitWriter;
    use super::*;

    fn decode(data: &[u8]) -> (u16, Vec<u16>) {
        let mut out = Vec::new();
        let qscale = decode_frame(data, &mut out, 4096).unwrap();
        (qscale, out)
    }

    #[test]
    fn test_minimal_frame() {
        // One block: header 0, end-of-block, frame end
        let mut w = BitWriter::new(7);
        w.put(0, 11); // block header
        w.put(0b10, 2); // end-of-block
        w.put(0x3FF, 11); // frame end
        let (qscale, words) = decode(&w.finish());
        assert_eq!(qscale, 7);
        assert_eq!(words, vec![0, EOB_WORD]);
    }

    #[test]
    fn test_two_blocks() {
        let mut w = BitWriter::new(1);
        w.put(0x040, 11); // first header
        w.put(0b10, 2);
        w.put(0x041, 11); // second block header, not the end marker
        w.put(0b10, 2);
        w.put(0x3FF, 11);
        let (_, words) = decode(&w.finish());
        assert_eq!(words, vec![0x040, EOB_WORD, 0x041, EOB_WORD]);
    }

    #[test]
    fn test_run_level_codes() {
        let mut w = BitWriter::new(1);
        w.put(0, 11);
        w.put(0b110, 3); // run 0, level +1
        w.put(0b0111, 4); // run 1, level -1
        w.put(0b10, 2);
        w.put(0x3FF, 11);
        let (_, words) = decode(&w.finish());
        assert_eq!(words, vec![0, 0x0401, 0x07FF, EOB_WORD]);
    }

    #[test]
    fn test_long_code() {
        let mut w = BitWriter::new(1);
        w.put(0, 11);
        w.put(0b0000000010000, 13); // run 10, level 2
        w.put(0, 1); // positive sign
        w.put(0b10, 2);
        w.put(0x3FF, 11);
        let (_, words) = decode(&w.finish());
        assert_eq!(words, vec![0, (10 << 10) | 2, EOB_WORD]);
    }

    #[test]
    fn test_escape_emits_raw_window() {
        let mut w = BitWriter::new(1);
        w.put(0, 11);
        w.put(0b000001, 6); // escape
        w.put(0xBEEF, 16); // literal window
        w.put(0b10, 2);
        w.put(0x3FF, 11);
        let (_, words) = decode(&w.finish());
        assert_eq!(words, vec![0, 0xBEEF, EOB_WORD]);
    }

    #[test]
    fn test_frame_end_only_on_marker() {
        // An 11-bit field of 0x3FE after the end-of-block is a block
        // header, not the end of the frame
        let mut w = BitWriter::new(1);
        w.put(0, 11);
        w.put(0b10, 2);
        w.put(0x3FE, 11);
        w.put(0b10, 2);
        w.put(0x3FF, 11);
        let (_, words) = decode(&w.finish());
        assert_eq!(words, vec![0, EOB_WORD, 0x3FE, EOB_WORD]);
    }

    #[test]
    fn test_truncated_payload_is_rejected() {
        let mut out = Vec::new();
        assert!(decode_frame(&[0x01, 0x00], &mut out, 16).is_err());
    }

    #[test]
    fn test_runaway_stream_is_bounded() {
        // A stream that never reaches the frame-end marker must stop at
        // the word capacity instead of spinning
        let mut w = BitWriter::new(1);
        w.put(0, 11);
        for _ in 0..64 {
            w.put(0b110, 3);
        }
        let mut out = Vec::new();
        assert!(decode_frame(&w.finish(), &mut out, 16).is_err());
    }
}
