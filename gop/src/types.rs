//! Parsed GOP payload types

use crate::error::{Error, Result};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// The width and height, in pixels, of the blocks motion vectors apply to.
pub const BLOCK_SIZE: usize = 16;

/// Ensure a frame can be tiled exactly by motion compensation blocks.
pub fn check_block_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 || width % BLOCK_SIZE != 0 || height % BLOCK_SIZE != 0 {
        return Err(Error::UnsupportedDimensions { width, height });
    }

    Ok(())
}

/// The number of motion compensation blocks in a frame.
pub fn block_count(width: usize, height: usize) -> usize {
    blocks_per_row(width) * ((height + BLOCK_SIZE - 1) / BLOCK_SIZE)
}

/// The number of motion compensation blocks in one row of a frame.
pub fn blocks_per_row(width: usize) -> usize {
    (width + BLOCK_SIZE - 1) / BLOCK_SIZE
}

/// How the chroma planes of an intra picture are sampled relative to luma.
///
/// Chroma planes are always upsampled back to full resolution by replicating
/// samples before color conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChromaSubsampling {
    /// Full resolution chroma.
    Yuv444,

    /// Chroma sampled at half the horizontal resolution.
    Yuv422,

    /// Chroma sampled at half the horizontal and vertical resolution.
    Yuv420,
}

impl ChromaSubsampling {
    /// How many luma samples, horizontally and vertically, share a chroma
    /// sample.
    pub fn factors(self) -> (usize, usize) {
        match self {
            Self::Yuv444 => (1, 1),
            Self::Yuv422 => (2, 1),
            Self::Yuv420 => (2, 2),
        }
    }

    /// The dimensions of each chroma plane for a luma plane of the given size.
    ///
    /// Partial chroma samples at odd edges round up.
    pub fn chroma_dimensions(self, width: usize, height: usize) -> (usize, usize) {
        let (x_factor, y_factor) = self.factors();

        (
            (width + x_factor - 1) / x_factor,
            (height + y_factor - 1) / y_factor,
        )
    }

    /// The total size of a planar picture: one luma and two chroma planes.
    pub fn planar_size(self, width: usize, height: usize) -> usize {
        let (chroma_width, chroma_height) = self.chroma_dimensions(width, height);

        width * height + 2 * chroma_width * chroma_height
    }
}

impl FromStr for ChromaSubsampling {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "4:4:4" => Ok(Self::Yuv444),
            "4:2:2" => Ok(Self::Yuv422),
            "4:2:0" => Ok(Self::Yuv420),
            other => Err(Error::UnsupportedSubsampling(other.to_string())),
        }
    }
}

impl fmt::Display for ChromaSubsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yuv444 => f.write_str("4:4:4"),
            Self::Yuv422 => f.write_str("4:2:2"),
            Self::Yuv420 => f.write_str("4:2:0"),
        }
    }
}

/// All frame types in a group of pictures.
///
/// A frame type indicates what reference frames should be used, if any, to
/// decode the frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameType {
    /// A full picture that can be independently decoded.
    Intra,

    /// A picture predicted from the frame before it.
    ForwardPredicted,

    /// A picture predicted from the frames on either side of it.
    BidirectionalPredicted,
}

impl FrameType {
    /// Classify the frame at a given position of a sequence.
    ///
    /// Every group opens with an intra frame, followed by a forward-predicted
    /// frame in every third slot and bidirectionally-predicted frames in the
    /// rest. The type depends only on the position, never on payload content.
    pub fn for_index(index: usize, gop_size: NonZeroUsize) -> Self {
        let position = index % gop_size.get();

        if position == 0 {
            Self::Intra
        } else if (position - 1) % 3 == 0 {
            Self::ForwardPredicted
        } else {
            Self::BidirectionalPredicted
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intra => f.write_str("I-frame"),
            Self::ForwardPredicted => f.write_str("P-frame"),
            Self::BidirectionalPredicted => f.write_str("B-frame"),
        }
    }
}

/// A motion vector, in whole pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MotionVector {
    pub dx: i16,
    pub dy: i16,
}

impl MotionVector {
    pub fn new(dx: i16, dy: i16) -> Self {
        Self { dx, dy }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

impl fmt::Display for MotionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

/// One motion vector per block of a frame, in row-major block order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MotionField(Vec<MotionVector>);

impl MotionField {
    pub fn new(vectors: Vec<MotionVector>) -> Self {
        Self(vectors)
    }

    /// A field that leaves every block in place.
    pub fn zero(width: usize, height: usize) -> Self {
        Self(vec![MotionVector::zero(); block_count(width, height)])
    }

    pub fn as_vectors(&self) -> &[MotionVector] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Signed per-pixel corrections added to a motion-compensated prediction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResidualPlane {
    width: usize,
    height: usize,
    samples: Vec<i16>,
}

impl ResidualPlane {
    /// Wrap row-major residual samples.
    pub fn new(width: usize, height: usize, samples: Vec<i16>) -> Result<Self> {
        if samples.len() != width * height {
            return Err(Error::MalformedPayload {
                expected: width * height,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// A plane that leaves the prediction unchanged.
    pub fn zero(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_samples(&self) -> &[i16] {
        &self.samples
    }
}

/// A picture stored as separate luma and chroma planes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanarImage {
    /// The number of luma samples per row.
    width: usize,

    /// The number of luma rows.
    height: usize,

    /// How the chroma planes are sampled.
    subsampling: ChromaSubsampling,

    /// The luma data of the picture.
    luma: Vec<u8>,

    /// The u-component chroma data of the picture.
    chroma_b: Vec<u8>,

    /// The v-component chroma data of the picture.
    chroma_r: Vec<u8>,
}

impl PlanarImage {
    /// Construct a planar picture, checking each plane against the size the
    /// subsampling mode requires.
    pub fn new(
        width: usize,
        height: usize,
        subsampling: ChromaSubsampling,
        luma: Vec<u8>,
        chroma_b: Vec<u8>,
        chroma_r: Vec<u8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::UnsupportedDimensions { width, height });
        }

        let (chroma_width, chroma_height) = subsampling.chroma_dimensions(width, height);
        let chroma_samples = chroma_width * chroma_height;

        if luma.len() != width * height
            || chroma_b.len() != chroma_samples
            || chroma_r.len() != chroma_samples
        {
            return Err(Error::MalformedPayload {
                expected: subsampling.planar_size(width, height),
                actual: luma.len() + chroma_b.len() + chroma_r.len(),
            });
        }

        Ok(Self {
            width,
            height,
            subsampling,
            luma,
            chroma_b,
            chroma_r,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn subsampling(&self) -> ChromaSubsampling {
        self.subsampling
    }

    /// Get the luma data for this picture.
    pub fn as_luma(&self) -> &[u8] {
        &self.luma
    }

    /// Get the chroma-B data for this picture.
    pub fn as_chroma_b(&self) -> &[u8] {
        &self.chroma_b
    }

    /// Get the chroma-R data for this picture.
    pub fn as_chroma_r(&self) -> &[u8] {
        &self.chroma_r
    }
}

/// A parsed frame payload.
///
/// Each variant carries exactly the fields its wire format holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FramePayload {
    /// Planar color data for an independently decoded picture.
    Intra(PlanarImage),

    /// One motion field against the previous frame, plus a residual.
    ForwardPredicted {
        field: MotionField,
        residual: ResidualPlane,
    },

    /// Motion fields against the previous and the next frame, plus a
    /// residual applied to their average.
    BidirectionalPredicted {
        forward: MotionField,
        backward: MotionField,
        residual: ResidualPlane,
    },
}

impl FramePayload {
    pub fn frame_type(&self) -> FrameType {
        match self {
            Self::Intra(_) => FrameType::Intra,
            Self::ForwardPredicted { .. } => FrameType::ForwardPredicted,
            Self::BidirectionalPredicted { .. } => FrameType::BidirectionalPredicted,
        }
    }
}
