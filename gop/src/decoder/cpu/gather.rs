//! Motion-compensated block collection

use crate::decoder::picture::RgbImage;
use crate::decoder::types::DecoderOption;
use crate::error::{Error, Result};
use crate::types::{
    block_count, blocks_per_row, check_block_dimensions, MotionField, MotionVector, BLOCK_SIZE,
};
use log::warn;

/// Read a pixel from the reference picture at a given position.
///
/// Coordinates in `pos` will be clipped to the bounds of the picture, so
/// reads past an edge repeat the last row, column, or individual pixel.
fn read_sample(reference: &RgbImage, pos: (isize, isize)) -> [u8; 3] {
    let (x, y) = pos;

    let x = if x < 0 {
        0
    } else if x >= reference.width() as isize {
        reference.width().saturating_sub(1)
    } else {
        x as usize
    };

    let y = if y < 0 {
        0
    } else if y >= reference.height() as isize {
        reference.height().saturating_sub(1)
    } else {
        y as usize
    };

    reference.pixel(x, y).unwrap_or([0, 0, 0])
}

/// Find the top-left corner of the source block for the block at `pos`.
///
/// Yields `None` if any part of the source block lies outside the picture.
fn source_origin(
    pos: (usize, usize),
    mv: MotionVector,
    width: usize,
    height: usize,
) -> Option<(usize, usize)> {
    let x = pos.0 as isize + mv.dx as isize;
    let y = pos.1 as isize + mv.dy as isize;

    if x < 0 || y < 0 {
        return None;
    }

    let (x, y) = (x as usize, y as usize);
    if x + BLOCK_SIZE > width || y + BLOCK_SIZE > height {
        return None;
    }

    Some((x, y))
}

/// Copy a block that lies entirely within the reference picture.
///
/// Target and reference data are both row-major interleaved RGB of the same
/// dimensions.
fn gather_block(
    reference: &RgbImage,
    source: (usize, usize),
    pos: (usize, usize),
    target: &mut [u8],
) {
    let samples_per_row = reference.samples_per_row();
    let block_row = BLOCK_SIZE * 3;

    for row in 0..BLOCK_SIZE {
        let src = source.0 * 3 + (source.1 + row) * samples_per_row;
        let dst = pos.0 * 3 + (pos.1 + row) * samples_per_row;

        target[dst..dst + block_row].copy_from_slice(&reference.as_bytes()[src..src + block_row]);
    }
}

/// Copy a block whose source may cross the picture edge, clamping every
/// sample read.
fn gather_block_clamped(
    reference: &RgbImage,
    pos: (usize, usize),
    mv: MotionVector,
    target: &mut [u8],
) {
    let samples_per_row = reference.samples_per_row();

    for v in 0..BLOCK_SIZE {
        for u in 0..BLOCK_SIZE {
            let sample = read_sample(
                reference,
                (
                    (pos.0 + u) as isize + mv.dx as isize,
                    (pos.1 + v) as isize + mv.dy as isize,
                ),
            );

            let dst = (pos.0 + u) * 3 + (pos.1 + v) * samples_per_row;
            target[dst..dst + 3].copy_from_slice(&sample);
        }
    }
}

/// Produce a prediction of a frame by copying shifted blocks out of a
/// reference picture.
///
/// Each 16x16 block of the output is copied from the reference at the
/// block's own position displaced by its motion vector. Vectors are taken
/// from `field` in row-major block order.
///
/// Source blocks that do not lie entirely within the reference fail with
/// `OutOfRangeMotionVector`, unless `CLAMP_MOTION_VECTORS` is enabled.
pub fn compensate(
    reference: &RgbImage,
    field: &MotionField,
    width: usize,
    height: usize,
    options: DecoderOption,
) -> Result<RgbImage> {
    check_block_dimensions(width, height)?;

    if reference.dimensions() != (width, height) {
        return Err(Error::ReferenceDimensionMismatch {
            expected: (width, height),
            actual: reference.dimensions(),
        });
    }

    let expected = block_count(width, height);
    if field.len() != expected {
        return Err(Error::MotionFieldLength {
            expected,
            actual: field.len(),
        });
    }

    let mb_per_line = blocks_per_row(width);
    let mut predicted = vec![0; width * height * 3];
    let mut clamped_blocks = 0;

    for (i, mv) in field.as_vectors().iter().enumerate() {
        let pos = ((i % mb_per_line) * BLOCK_SIZE, (i / mb_per_line) * BLOCK_SIZE);

        match source_origin(pos, *mv, width, height) {
            Some(source) => gather_block(reference, source, pos, &mut predicted),
            None if options.contains(DecoderOption::CLAMP_MOTION_VECTORS) => {
                clamped_blocks += 1;
                gather_block_clamped(reference, pos, *mv, &mut predicted);
            }
            None => {
                return Err(Error::OutOfRangeMotionVector {
                    block: i,
                    vector: *mv,
                })
            }
        }
    }

    if clamped_blocks > 0 {
        warn!(
            "Clamped {} motion vectors to the reference picture edge",
            clamped_blocks
        );
    }

    Ok(RgbImage::from_samples(width, height, predicted))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 32x32 picture where every pixel encodes its own position.
    fn gradient() -> RgbImage {
        let mut data = Vec::new();
        for y in 0..32u8 {
            for x in 0..32u8 {
                data.extend_from_slice(&[x, y, x.wrapping_mul(y)]);
            }
        }

        RgbImage::from_raw(32, 32, data).unwrap()
    }

    fn field(vectors: &[(i16, i16)]) -> MotionField {
        MotionField::new(
            vectors
                .iter()
                .map(|&(dx, dy)| MotionVector::new(dx, dy))
                .collect(),
        )
    }

    #[test]
    fn zero_field_is_identity() {
        let reference = gradient();
        let predicted = compensate(
            &reference,
            &MotionField::zero(32, 32),
            32,
            32,
            DecoderOption::empty(),
        )
        .unwrap();

        assert_eq!(predicted, reference);
    }

    #[test]
    fn blocks_copy_from_displaced_source() {
        let reference = gradient();
        let vectors = field(&[(16, 0), (-3, 5), (7, -16), (0, 0)]);
        let predicted = compensate(&reference, &vectors, 32, 32, DecoderOption::empty()).unwrap();

        for y in 0..32 {
            for x in 0..32 {
                let (dx, dy) = match (x / 16, y / 16) {
                    (0, 0) => (16, 0),
                    (1, 0) => (-3, 5),
                    (0, 1) => (7, -16),
                    _ => (0, 0),
                };

                let source = (x as isize + dx) as usize;
                let source_y = (y as isize + dy) as usize;
                assert_eq!(
                    predicted.pixel(x, y),
                    reference.pixel(source, source_y),
                    "pixel ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn rejects_out_of_range_vectors() {
        let reference = gradient();
        #[rustfmt::skip]
        let cases: &[(&[(i16, i16)], usize)] = &[
            // Reads column x = -1.
            (&[(-1, 0), (0, 0), (0, 0), (0, 0)], 0),
            // Reads columns 17..33 of a 32 wide picture.
            (&[(0, 0), (1, 0), (0, 0), (0, 0)], 1),
            // Starts exactly at x = width.
            (&[(0, 0), (16, 0), (0, 0), (0, 0)], 1),
            // Reads row y = -1.
            (&[(0, 0), (0, 0), (0, 0), (0, -17)], 3),
            // Far out of the picture.
            (&[(0, 0), (0, 0), (i16::MIN, i16::MAX), (0, 0)], 2),
        ];

        for (vectors, bad_block) in cases.iter() {
            match compensate(&reference, &field(vectors), 32, 32, DecoderOption::empty()) {
                Err(Error::OutOfRangeMotionVector { block, vector }) => {
                    assert_eq!(block, *bad_block);
                    assert_eq!((vector.dx, vector.dy), vectors[*bad_block]);
                }
                other => panic!("unexpected result {:?}", other),
            }
        }
    }

    #[test]
    fn clamping_repeats_edge_samples() {
        let reference = gradient();
        let vectors = field(&[(-2, 0), (1, 0), (0, 0), (0, 0)]);
        let predicted = compensate(
            &reference,
            &vectors,
            32,
            32,
            DecoderOption::CLAMP_MOTION_VECTORS,
        )
        .unwrap();

        // Left edge: columns -2 and -1 clamp to column 0.
        assert_eq!(predicted.pixel(0, 3), reference.pixel(0, 3));
        assert_eq!(predicted.pixel(1, 3), reference.pixel(0, 3));
        assert_eq!(predicted.pixel(2, 3), reference.pixel(0, 3));
        assert_eq!(predicted.pixel(3, 3), reference.pixel(1, 3));

        // Right edge: column 32 clamps to column 31.
        assert_eq!(predicted.pixel(30, 9), reference.pixel(31, 9));
        assert_eq!(predicted.pixel(31, 9), reference.pixel(31, 9));
        assert_eq!(predicted.pixel(16, 9), reference.pixel(17, 9));
    }

    #[test]
    fn rejects_mismatched_inputs() {
        let reference = gradient();

        assert!(matches!(
            compensate(&reference, &field(&[(0, 0)]), 32, 32, DecoderOption::empty()),
            Err(Error::MotionFieldLength {
                expected: 4,
                actual: 1
            })
        ));
        assert!(matches!(
            compensate(
                &reference,
                &MotionField::zero(32, 16),
                32,
                16,
                DecoderOption::empty()
            ),
            Err(Error::ReferenceDimensionMismatch { .. })
        ));
    }
}
