//! Block-matching motion estimation

use crate::decoder::RgbImage;
use crate::error::{Error, Result};
use crate::types::{
    block_count, blocks_per_row, check_block_dimensions, MotionField, MotionVector, ResidualPlane,
    BLOCK_SIZE,
};

/// Sum of absolute differences between the block of `current` at `pos` and
/// the block of `reference` at `source`, over all three channels.
fn block_sad(
    current: &RgbImage,
    reference: &RgbImage,
    pos: (usize, usize),
    source: (usize, usize),
) -> u32 {
    let samples_per_row = current.samples_per_row();
    let block_row = BLOCK_SIZE * 3;
    let mut sad = 0;

    for row in 0..BLOCK_SIZE {
        let cur = pos.0 * 3 + (pos.1 + row) * samples_per_row;
        let src = source.0 * 3 + (source.1 + row) * samples_per_row;

        sad += current.as_bytes()[cur..cur + block_row]
            .iter()
            .zip(&reference.as_bytes()[src..src + block_row])
            .map(|(&a, &b)| (a as i32 - b as i32).unsigned_abs())
            .sum::<u32>();
    }

    sad
}

fn check_pair(current: &RgbImage, reference: &RgbImage) -> Result<()> {
    if current.dimensions() != reference.dimensions() {
        return Err(Error::ReferenceDimensionMismatch {
            expected: current.dimensions(),
            actual: reference.dimensions(),
        });
    }

    Ok(())
}

/// Find, for every block of `current`, the displacement into `reference`
/// that best matches it.
///
/// Candidates are searched exhaustively within `search_range` pixels on each
/// axis. Candidates whose source block would leave the reference are
/// skipped, so every vector produced decodes without clamping. Ties keep the
/// first candidate in row-major order from `(-range, -range)`.
pub fn estimate_motion_field(
    current: &RgbImage,
    reference: &RgbImage,
    search_range: u16,
) -> Result<MotionField> {
    let (width, height) = current.dimensions();
    check_block_dimensions(width, height)?;
    check_pair(current, reference)?;

    let range = search_range.min(i16::MAX as u16) as isize;
    let mb_per_line = blocks_per_row(width);
    let mut vectors = Vec::with_capacity(block_count(width, height));

    for i in 0..block_count(width, height) {
        let pos = ((i % mb_per_line) * BLOCK_SIZE, (i / mb_per_line) * BLOCK_SIZE);
        let mut best = (u32::MAX, MotionVector::zero());

        for dy in -range..=range {
            for dx in -range..=range {
                let x = pos.0 as isize + dx;
                let y = pos.1 as isize + dy;

                if x < 0
                    || y < 0
                    || x as usize + BLOCK_SIZE > width
                    || y as usize + BLOCK_SIZE > height
                {
                    continue;
                }

                let sad = block_sad(current, reference, pos, (x as usize, y as usize));
                if sad < best.0 {
                    best = (sad, MotionVector::new(dx as i16, dy as i16));
                }
            }
        }

        vectors.push(best.1);
    }

    Ok(MotionField::new(vectors))
}

/// Compute the residual that turns `prediction` back into `current`.
///
/// Residuals are shared by the three channels of a pixel, so the mean
/// channel difference is used, truncated toward zero.
pub fn residual_between(current: &RgbImage, prediction: &RgbImage) -> Result<ResidualPlane> {
    check_pair(current, prediction)?;

    let samples = current
        .pixels()
        .iter()
        .zip(prediction.pixels())
        .map(|(c, p)| {
            let sum: i32 = c.iter().zip(p).map(|(&c, &p)| c as i32 - p as i32).sum();
            (sum / 3) as i16
        })
        .collect();

    ResidualPlane::new(current.width(), current.height(), samples)
}
