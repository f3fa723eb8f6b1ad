//! Internal reader adapter for reading fixed-width payload fields.

use crate::error::Result;
use crate::types::{MotionField, MotionVector, ResidualPlane};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io;

/// A reader that walks through one frame payload.
///
/// All payload fields are fixed-width little-endian integers with no
/// framing, so the reader only ever moves forward.
pub struct PayloadReader<'a> {
    /// The payload bytes that have not been read yet.
    remaining: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    /// Wrap a payload in a reader.
    pub fn from_payload(payload: &'a [u8]) -> Self {
        Self { remaining: payload }
    }

    /// How many bytes are left to read.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Split off the next `len` bytes of the payload.
    ///
    /// Running out of data yields an `UnhandledIoError` of kind
    /// `UnexpectedEof`.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining.len() {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }

        let (head, tail) = self.remaining.split_at(len);
        self.remaining = tail;

        Ok(head)
    }

    /// Read one motion vector, stored as an `(dx, dy)` pair of 16-bit
    /// integers.
    pub fn read_motion_vector(&mut self) -> Result<MotionVector> {
        let dx = self.remaining.read_i16::<LittleEndian>()?;
        let dy = self.remaining.read_i16::<LittleEndian>()?;

        Ok(MotionVector::new(dx, dy))
    }

    /// Read a motion field of `blocks` consecutive vectors.
    pub fn read_motion_field(&mut self, blocks: usize) -> Result<MotionField> {
        let mut vectors = Vec::with_capacity(blocks);
        for _ in 0..blocks {
            vectors.push(self.read_motion_vector()?);
        }

        Ok(MotionField::new(vectors))
    }

    /// Read a row-major plane of 16-bit residuals.
    pub fn read_residual_plane(&mut self, width: usize, height: usize) -> Result<ResidualPlane> {
        let bytes = self.read_bytes(width * height * 2)?;
        let mut samples = vec![0; width * height];
        LittleEndian::read_i16_into(bytes, &mut samples);

        ResidualPlane::new(width, height, samples)
    }
}
