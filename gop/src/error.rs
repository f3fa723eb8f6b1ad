//! Error types

use crate::types::{FrameType, MotionVector};
use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Errors produced while parsing or reconstructing frames.
#[derive(Error, Debug)]
pub enum Error {
    /// The payload length does not match the size its frame type requires.
    #[error("malformed payload: expected {expected} bytes, got {actual}")]
    MalformedPayload { expected: usize, actual: usize },

    /// The chroma subsampling mode is not one of `4:4:4`, `4:2:2`, `4:2:0`.
    #[error("unsupported chroma subsampling {0:?}")]
    UnsupportedSubsampling(String),

    /// The frame dimensions are zero, or are not whole multiples of the
    /// motion compensation block size.
    #[error("unsupported frame dimensions {width}x{height}")]
    UnsupportedDimensions { width: usize, height: usize },

    /// The GOP size must be at least one frame.
    #[error("GOP size must be positive")]
    InvalidGopSize,

    /// A predicted frame was decoded with no earlier frame to predict from.
    ///
    /// The fixed GOP structure starts every group with an intra frame, so this
    /// indicates a scheduling bug rather than bad input.
    #[error("no decoded reference frame precedes frame {0}")]
    MissingReferenceFrame(usize),

    /// A motion vector points the source block outside of the reference.
    #[error("motion vector {vector} of block {block} reads outside the reference picture")]
    OutOfRangeMotionVector { block: usize, vector: MotionVector },

    /// A motion field does not hold exactly one vector per block.
    #[error("motion field has {actual} vectors, expected {expected}")]
    MotionFieldLength { expected: usize, actual: usize },

    /// A reference picture has different dimensions from the frame being
    /// reconstructed.
    #[error("reference picture is {actual:?}, expected {expected:?}")]
    ReferenceDimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A frame was stored twice.
    #[error("frame {0} has already been decoded")]
    FrameAlreadyDecoded(usize),

    /// The payload source failed.
    #[error("unhandled I/O error: {0}")]
    UnhandledIoError(#[from] io::Error),

    /// The frame sink rejected a finished frame.
    #[error("frame sink failed: {0}")]
    FrameSink(#[source] Box<dyn StdError + Send + Sync>),

    /// Decoding a particular frame failed.
    #[error("failed to decode frame {index} ({frame_type}): {source}")]
    FrameDecode {
        index: usize,
        frame_type: FrameType,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the index and type of the frame being decoded to this error.
    ///
    /// Errors that already carry a frame index keep the innermost one.
    pub fn at_frame(self, index: usize, frame_type: FrameType) -> Self {
        match self {
            Self::FrameDecode { .. } => self,
            source => Self::FrameDecode {
                index,
                frame_type,
                source: Box::new(source),
            },
        }
    }

    /// The error underneath any frame context.
    pub fn root(&self) -> &Error {
        match self {
            Self::FrameDecode { source, .. } => source.root(),
            other => other,
        }
    }

    /// The index of the frame that failed, if known.
    pub fn frame_index(&self) -> Option<usize> {
        match self {
            Self::FrameDecode { index, .. } => Some(*index),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
