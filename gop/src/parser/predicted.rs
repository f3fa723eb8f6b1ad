//! Predicted picture payload parsers

use crate::error::{Error, Result};
use crate::parser::reader::PayloadReader;
use crate::types::{block_count, check_block_dimensions, MotionField, ResidualPlane};

/// The size of one serialized motion vector.
const MOTION_VECTOR_SIZE: usize = 4;

/// The size of one serialized residual sample.
const RESIDUAL_SIZE: usize = 2;

/// The size of a forward-predicted payload: one motion field and one
/// residual plane.
pub fn predicted_payload_size(width: usize, height: usize) -> usize {
    block_count(width, height) * MOTION_VECTOR_SIZE + width * height * RESIDUAL_SIZE
}

/// The size of a bidirectionally-predicted payload: two motion fields and
/// one residual plane.
pub fn bidirectional_payload_size(width: usize, height: usize) -> usize {
    2 * block_count(width, height) * MOTION_VECTOR_SIZE + width * height * RESIDUAL_SIZE
}

fn check_length(payload: &[u8], expected: usize) -> Result<()> {
    if payload.len() != expected {
        return Err(Error::MalformedPayload {
            expected,
            actual: payload.len(),
        });
    }

    Ok(())
}

/// Parse a forward-predicted payload into its motion field and residual.
pub fn decode_predicted(
    payload: &[u8],
    width: usize,
    height: usize,
) -> Result<(MotionField, ResidualPlane)> {
    check_block_dimensions(width, height)?;
    check_length(payload, predicted_payload_size(width, height))?;

    let mut reader = PayloadReader::from_payload(payload);
    let field = reader.read_motion_field(block_count(width, height))?;
    let residual = reader.read_residual_plane(width, height)?;

    Ok((field, residual))
}

/// Parse a bidirectionally-predicted payload into its forward field,
/// backward field, and residual.
pub fn decode_bidirectional(
    payload: &[u8],
    width: usize,
    height: usize,
) -> Result<(MotionField, MotionField, ResidualPlane)> {
    check_block_dimensions(width, height)?;
    check_length(payload, bidirectional_payload_size(width, height))?;

    let blocks = block_count(width, height);
    let mut reader = PayloadReader::from_payload(payload);
    let forward = reader.read_motion_field(blocks)?;
    let backward = reader.read_motion_field(blocks)?;
    let residual = reader.read_residual_plane(width, height)?;

    Ok((forward, backward, residual))
}
