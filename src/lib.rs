//! DDV - a decoder for the DDV interleaved audio/video container format
//!
//! DDV streams carry a sequence of fixed-rate frames, each optionally holding
//! an intra-coded video frame (a macroblock mosaic of YCbCr blocks behind a
//! variable-length run-level code and an 8x8 inverse DCT) and a compressed
//! audio frame (a predictive codec with variable-width residuals). This crate
//! demuxes the container and decodes both payloads bit-exactly.
//!
//! # Architecture
//!
//! - `format`: container handling — header parsing, demuxing, and the
//!   [`format::ddv::DdvPlayer`] frame driver
//! - `codec`: the video and audio decoders
//! - `util`: common utilities (buffers, rationals, timestamps, formats)
//!
//! # Quick start
//!
//! ```rust,ignore
//! use ddv::format::ddv::DdvPlayer;
//!
//! let file = std::fs::File::open("intro.ddv")?;
//! let mut player = DdvPlayer::new(std::io::BufReader::new(file))?;
//! while player.update()? {
//!     render(player.width(), player.height(), player.pixels());
//!     queue_audio(player.samples());
//! }
//! ```

pub mod codec;
pub mod error;
pub mod format;
pub mod util;

pub use error::{Error, Result};

/// DDV library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;

/// Configuration for the DDV library
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Enable verbose logging
    pub verbose: bool,
    /// Enable debug output
    pub debug: bool,
}

/// Initialize the DDV library with the given configuration
pub fn init(config: Config) -> Result<()> {
    if config.verbose || config.debug {
        let level = if config.debug { "debug" } else { "info" };
        tracing_subscriber::fmt().with_env_filter(level).init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION_MAJOR, 0);
        assert_eq!(VERSION_MINOR, 1);
        assert_eq!(VERSION_PATCH, 0);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.verbose);
        assert!(!config.debug);
    }
}
