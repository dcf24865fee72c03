//! DDV video decoder
//!
//! A frame is a grid of 16x16 macroblocks walked column by column, each
//! carrying six 8x8 blocks in the order {Cb, Cr, Y1, Y2, Y3, Y4} (chroma
//! subsampled 4:2:0, upsampled nearest-neighbor). Luma blocks cover the
//! macroblock quadrants left-to-right, top-to-bottom. Decoded YCbCr is
//! converted to RGB and written as packed `0x00BBGGRR` pixels; macroblock
//! padding beyond the frame dimensions is clipped.
//!
//! The per-block coefficient buffer persists across frames because the
//! block header's delta mode folds new run-level words into the previous
//! frame's slot contents.

use super::block::{unpack_block, DequantTables};
use super::idct::idct;
use super::vlc;
use crate::codec::{Decoder, Frame, VideoFrame};
use crate::error::{Error, Result};
use crate::format::Packet;
use crate::util::{Buffer, PixelFormat};

/// Macroblock edge length in pixels
pub const MACROBLOCK_SIZE: usize = 16;

/// Blocks per macroblock: two chroma, four luma
pub const BLOCKS_PER_MACROBLOCK: usize = 6;

/// DDV video decoder with all scratch buffers owned per instance
pub struct DdvVideoDecoder {
    width: u16,
    height: u16,
    mb_x: usize,
    mb_y: usize,
    dequant: DequantTables,
    /// Run-level word stream for the current frame
    words: Vec<u16>,
    /// Packed coefficient slots, 64 per block, kept across frames
    coeffs: Vec<u32>,
    /// IDCT outputs for the macroblock in flight: Cb, Cr, Y1..Y4
    blocks: [[i32; 64]; BLOCKS_PER_MACROBLOCK],
    pending: Option<Packet>,
}

impl DdvVideoDecoder {
    /// Create a decoder for the given frame dimensions
    pub fn new(width: u16, height: u16) -> Self {
        let mb_x = (width as usize + MACROBLOCK_SIZE - 1) / MACROBLOCK_SIZE;
        let mb_y = (height as usize + MACROBLOCK_SIZE - 1) / MACROBLOCK_SIZE;
        DdvVideoDecoder {
            width,
            height,
            mb_x,
            mb_y,
            dequant: DequantTables::new(),
            words: Vec::new(),
            coeffs: vec![0; mb_x * mb_y * BLOCKS_PER_MACROBLOCK * 64],
            blocks: [[0; 64]; BLOCKS_PER_MACROBLOCK],
            pending: None,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Macroblock grid dimensions
    pub fn macroblocks(&self) -> (usize, usize) {
        (self.mb_x, self.mb_y)
    }

    /// Decode one frame payload into a `width * height` pixel buffer.
    ///
    /// Pixels are packed `0x00BBGGRR`; the alpha byte is always zero.
    /// Every in-bounds pixel is written exactly once; nothing outside
    /// `width * height` is touched.
    pub fn decode_frame(&mut self, data: &[u8], pixels: &mut [u32]) -> Result<()> {
        let need = self.width as usize * self.height as usize;
        if pixels.len() < need {
            return Err(Error::BufferTooSmall {
                need,
                have: pixels.len(),
            });
        }
        if self.mb_x == 0 || self.mb_y == 0 {
            return Ok(());
        }

        let max_words = self.mb_x * self.mb_y * BLOCKS_PER_MACROBLOCK * 65 + 16;
        let qscale = vlc::decode_frame(data, &mut self.words, max_words)?;
        self.dequant.set_scale(qscale);

        let mut pos = 0usize;
        let mut block_index = 0usize;
        for mbx in 0..self.mb_x {
            for mby in 0..self.mb_y {
                for b in 0..BLOCKS_PER_MACROBLOCK {
                    let slots: &mut [u32; 64] = (&mut self.coeffs
                        [block_index * 64..(block_index + 1) * 64])
                        .try_into()
                        .expect("block slice is 64 slots");
                    unpack_block(&self.words, &mut pos, slots, b >= 2, &self.dequant)?;
                    idct(slots, &mut self.blocks[b]);
                    block_index += 1;
                }
                self.blit_macroblock(pixels, mbx * MACROBLOCK_SIZE, mby * MACROBLOCK_SIZE);
            }
        }
        Ok(())
    }

    /// Convert the macroblock in `self.blocks` to RGB and write it at
    /// `(x_off, y_off)`, clipping to the frame dimensions
    fn blit_macroblock(&self, pixels: &mut [u32], x_off: usize, y_off: usize) {
        let width = self.width as usize;
        let height = self.height as usize;

        for x in 0..MACROBLOCK_SIZE {
            for y in 0..MACROBLOCK_SIZE {
                let quadrant = (y / 8) * 2 + x / 8;
                let yv = self.blocks[2 + quadrant][(y & 7) * 8 + (x & 7)] as f32;
                let chroma_idx = (y / 2) * 8 + x / 2;
                let cb = self.blocks[0][chroma_idx] as f32;
                let cr = self.blocks[1][chroma_idx] as f32;

                let r = yv + 1.402 * cr;
                let g = yv - 0.3437 * cb - 0.7143 * cr;
                let b = yv + 1.772 * cb;

                let xpos = x_off + x;
                let ypos = y_off + y;
                if xpos < width && ypos < height {
                    let pixel = ((clamp(b) as u32) << 16)
                        | ((clamp(g) as u32) << 8)
                        | clamp(r) as u32;
                    pixels[ypos * width + xpos] = pixel;
                }
            }
        }
    }
}

fn clamp(v: f32) -> u8 {
    if v < 0.0 {
        0
    } else if v > 255.0 {
        255
    } else {
        v as u8
    }
}

impl Decoder for DdvVideoDecoder {
    fn send_packet(&mut self, packet: &Packet) -> Result<()> {
        self.pending = Some(packet.clone());
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<Frame> {
        let packet = self
            .pending
            .take()
            .ok_or_else(|| Error::invalid_state("no packet pending"))?;

        let width = self.width as u32;
        let height = self.height as u32;
        let mut pixels = vec![0u32; width as usize * height as usize];
        self.decode_frame(packet.data.as_slice(), &mut pixels)?;

        let mut frame = VideoFrame::new(width, height, PixelFormat::RGBA);
        frame.data.push(Buffer::from_vec(
            pixels.iter().flat_map(|p| p.to_le_bytes()).collect(),
        ));
        frame.linesize.push(width as usize * 4);
        frame.keyframe = true;
        frame.pts = packet.pts;
        frame.duration = packet.duration;
        Ok(Frame::Video(frame))
    }

    fn flush(&mut self) -> Result<()> {
        self.pending = None;
        Ok(())
    }
}
