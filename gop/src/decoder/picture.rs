//! Decoded picture type

/// A decoded picture, stored as interleaved 8-bit RGB samples.
///
/// Pictures are immutable once decoded; later frames only ever read them as
/// prediction references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    /// The number of pixels per row.
    width: usize,

    /// The number of rows.
    height: usize,

    /// Row-major RGB triples.
    data: Vec<u8>,
}

impl RgbImage {
    /// Construct an all-black picture.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    /// Wrap existing interleaved RGB data.
    ///
    /// Yields `None` if the data does not hold exactly `width * height`
    /// pixels.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height * 3 {
            return None;
        }

        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap data that is already known to be correctly sized.
    pub(crate) fn from_samples(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * 3);

        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Get how many samples exist per row.
    pub fn samples_per_row(&self) -> usize {
        self.width * 3
    }

    /// Get the interleaved RGB data of this picture.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the picture as a row-major list of pixels.
    pub fn pixels(&self) -> &[[u8; 3]] {
        bytemuck::cast_slice(&self.data)
    }

    /// Get a single pixel, if it lies within the picture.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        self.pixels().get(x + y * self.width).copied()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
