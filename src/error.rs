//! Error types for the DDV decoder library

use thiserror::Error;

/// Result type alias for DDV operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the DDV library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error (short reads on the underlying stream surface here)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Container magic is not "DDV\0"
    #[error("bad magic: expected \"DDV\\0\", got {found:02x?}")]
    BadMagic {
        /// The four bytes actually found at the start of the stream
        found: [u8; 4],
    },

    /// Container version is not the one known version
    #[error("unsupported DDV version {found} (expected 1)")]
    UnsupportedVersion { found: u32 },

    /// The compressed payload cannot be decoded
    #[error("invalid bitstream: {0}")]
    InvalidBitstream(String),

    /// A frame's declared size exceeds the header's maximum by more than the
    /// allowed slack
    #[error("frame size {declared} exceeds declared maximum {max}")]
    SizeOverflow { declared: u32, max: u32 },

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unsupported feature
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// End of stream
    #[error("end of stream")]
    EndOfStream,

    /// Buffer too small
    #[error("buffer too small: need {need}, have {have}")]
    BufferTooSmall { need: usize, have: usize },

    /// Invalid state
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Create an invalid bitstream error
    pub fn bitstream<S: Into<String>>(msg: S) -> Self {
        Error::InvalidBitstream(msg.into())
    }

    /// Create an unsupported error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::Unsupported(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Error::InvalidState(msg.into())
    }
}
