//! Decoder types

use crate::error::{Error, Result};
use crate::types::{check_block_dimensions, ChromaSubsampling};
use std::num::NonZeroUsize;

bitflags! {
    /// Options which influence the reconstruction of predicted frames.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DecoderOption : u8 {
        /// Clamp motion-compensated reads to the edge of the reference
        /// picture instead of rejecting out-of-range motion vectors.
        ///
        /// Each source sample outside the picture is replaced with the
        /// nearest edge sample (equivalent to OpenGL `GL_CLAMP_TO_EDGE`).
        /// Streams decoded this way are not bit-exact with strict decoding.
        const CLAMP_MOTION_VECTORS = 0b1;
    }
}

/// Everything needed to decode one sequence of frame payloads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GopConfig {
    /// Frame width in pixels. Must be a multiple of 16.
    pub width: usize,

    /// Frame height in pixels. Must be a multiple of 16.
    pub height: usize,

    /// How many frames make up one group of pictures.
    pub gop_size: usize,

    /// The chroma layout of intra payloads.
    pub subsampling: ChromaSubsampling,

    /// External decoder options enabled on this decoder.
    pub options: DecoderOption,
}

impl GopConfig {
    pub fn new(
        width: usize,
        height: usize,
        gop_size: usize,
        subsampling: ChromaSubsampling,
    ) -> Self {
        Self {
            width,
            height,
            gop_size,
            subsampling,
            options: DecoderOption::empty(),
        }
    }

    pub fn with_options(mut self, options: DecoderOption) -> Self {
        self.options = options;
        self
    }

    /// Check the configuration, yielding the GOP size on success.
    pub fn validate(&self) -> Result<NonZeroUsize> {
        check_block_dimensions(self.width, self.height)?;

        NonZeroUsize::new(self.gop_size).ok_or(Error::InvalidGopSize)
    }
}
