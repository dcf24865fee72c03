//! DDV codec implementations
//!
//! The video decoder expands an MDEC-style variable-length bitstream into
//! run-level words, dequantizes and inverse-transforms 8x8 blocks, and
//! assembles 16x16 macroblocks into packed RGB pixels. The audio decoder
//! reconstructs 16-bit samples from a three-tap predictor with
//! variable-width residuals and a sign-preserving log table.

pub mod audio;
pub mod bitread;
pub mod block;
pub mod idct;
pub mod tables;
pub mod video;
pub mod vlc;

pub use audio::DdvAudioDecoder;
pub use video::DdvVideoDecoder;
