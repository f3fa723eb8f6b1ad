//! Per-frame reconstruction for each frame type

use crate::decoder::cpu::{compensate, planar_to_rgb};
use crate::decoder::picture::RgbImage;
use crate::decoder::types::DecoderOption;
use crate::error::{Error, Result};
use crate::parser::{decode_bidirectional, decode_planar_image, decode_predicted};
use crate::types::{ChromaSubsampling, MotionField, ResidualPlane};
use gop_rs_blend::blend::{add_residual, average};

/// Decode a self-contained intra payload into an RGB picture.
pub fn decode_intra(
    payload: &[u8],
    width: usize,
    height: usize,
    subsampling: ChromaSubsampling,
) -> Result<RgbImage> {
    let image = decode_planar_image(payload, width, height, subsampling)?;

    Ok(planar_to_rgb(&image))
}

/// Decode a forward-predicted payload against the frame before it.
pub fn decode_p(
    payload: &[u8],
    previous: &RgbImage,
    width: usize,
    height: usize,
    options: DecoderOption,
) -> Result<RgbImage> {
    let (field, residual) = decode_predicted(payload, width, height)?;

    reconstruct_predicted(&field, &residual, previous, options)
}

/// Decode a bidirectionally-predicted payload against the frames on either
/// side of it.
pub fn decode_b(
    payload: &[u8],
    previous: &RgbImage,
    future: &RgbImage,
    width: usize,
    height: usize,
    options: DecoderOption,
) -> Result<RgbImage> {
    let (forward, backward, residual) = decode_bidirectional(payload, width, height)?;

    reconstruct_bidirectional(&forward, &backward, &residual, previous, future, options)
}

fn check_residual(residual: &ResidualPlane, reference: &RgbImage) -> Result<()> {
    let dimensions = (residual.width(), residual.height());
    if dimensions != reference.dimensions() {
        return Err(Error::ReferenceDimensionMismatch {
            expected: dimensions,
            actual: reference.dimensions(),
        });
    }

    Ok(())
}

/// Apply a motion field to the previous frame and add the residual.
///
/// The residual is a single value per pixel, added to each of its three
/// color channels.
pub(crate) fn reconstruct_predicted(
    field: &MotionField,
    residual: &ResidualPlane,
    previous: &RgbImage,
    options: DecoderOption,
) -> Result<RgbImage> {
    check_residual(residual, previous)?;

    let (width, height) = previous.dimensions();
    let prediction = compensate(previous, field, width, height, options)?;
    let samples = add_residual(prediction.as_bytes(), residual.as_samples(), 3);

    Ok(RgbImage::from_samples(width, height, samples))
}

/// Average the forward and backward predictions, rounding down, and add the
/// residual.
pub(crate) fn reconstruct_bidirectional(
    forward: &MotionField,
    backward: &MotionField,
    residual: &ResidualPlane,
    previous: &RgbImage,
    future: &RgbImage,
    options: DecoderOption,
) -> Result<RgbImage> {
    check_residual(residual, previous)?;

    let (width, height) = previous.dimensions();
    let forward = compensate(previous, forward, width, height, options)?;
    let backward = compensate(future, backward, width, height, options)?;

    let prediction = average(forward.as_bytes(), backward.as_bytes());
    let samples = add_residual(&prediction, residual.as_samples(), 3);

    Ok(RgbImage::from_samples(width, height, samples))
}
