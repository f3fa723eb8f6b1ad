//! Rust implementation of the prediction blending steps of the GOP decoder.
//! Every operation has a scalar and a SIMD variant, which must agree exactly.

/// Residual magnitude past which any 8-bit prediction saturates.
///
/// Clamping residuals to this range before adding them keeps every
/// intermediate value inside `i16`, and does not change the clamped result.
pub const RESIDUAL_LIMIT: i16 = 255;

mod scalar_impl {
    use super::RESIDUAL_LIMIT;

    /// Averages two samples, rounding down.
    #[inline]
    pub fn average(forward: u8, backward: u8) -> u8 {
        ((forward as u16 + backward as u16) >> 1) as u8
    }

    /// Adds a residual to a predicted sample, clamping to the 8-bit range.
    #[inline]
    pub fn reconstruct(prediction: u8, residual: i16) -> u8 {
        let residual = residual.clamp(-RESIDUAL_LIMIT, RESIDUAL_LIMIT);
        (prediction as i16 + residual).clamp(0, 255) as u8
    }
}

mod simd_impl {
    use super::RESIDUAL_LIMIT;
    use std::ops::Shr;
    use wide::i16x8;

    /// Utility mimicking `i16::clamp` for `i16x8` - see: https://github.com/Lokathor/wide/issues/131
    #[inline]
    fn clamp_simd(x: i16x8, min: i16x8, max: i16x8) -> i16x8 {
        x.max(min).min(max)
    }

    /// Utility to upcast and convert a slice of 8 `u8` values into a `i16x8` vector.
    #[inline]
    fn into_simd16(a: &[u8]) -> i16x8 {
        debug_assert!(a.len() == 8);
        i16x8::from([
            a[0] as i16,
            a[1] as i16,
            a[2] as i16,
            a[3] as i16,
            a[4] as i16,
            a[5] as i16,
            a[6] as i16,
            a[7] as i16,
        ])
    }

    /// Writes the 8 lanes of an already-clamped vector back as bytes.
    #[inline]
    fn store(target: &mut [u8], value: i16x8) {
        let value = value.as_array_ref();

        for i in 0..8 {
            target[i] = value[i] as u8;
        }
    }

    /// Same as `scalar_impl::average`, but performs it on 8 samples in
    /// parallel. The result overwrites `forward`.
    #[inline]
    pub fn average_simd(forward: &mut [u8], backward: &[u8]) {
        let sum = into_simd16(forward) + into_simd16(backward);

        store(forward, sum.shr(1));
    }

    /// Same as `scalar_impl::reconstruct`, but performs it on 8 samples in
    /// parallel. The result overwrites `prediction`.
    #[inline]
    pub fn reconstruct_simd(prediction: &mut [u8], residual: &[i16]) {
        debug_assert!(residual.len() == 8);

        let residual = clamp_simd(
            i16x8::from([
                residual[0],
                residual[1],
                residual[2],
                residual[3],
                residual[4],
                residual[5],
                residual[6],
                residual[7],
            ]),
            i16x8::splat(-RESIDUAL_LIMIT),
            i16x8::splat(RESIDUAL_LIMIT),
        );

        let result = clamp_simd(
            into_simd16(prediction) + residual,
            i16x8::ZERO,
            i16x8::splat(255),
        );

        store(prediction, result);
    }
}

use itertools::izip;
use scalar_impl::{average as average_sample, reconstruct};
use simd_impl::{average_simd, reconstruct_simd};

/// Averages two equally sized predictions sample by sample.
///
/// The average is floored, so `(200, 201)` yields `200`.
pub fn average(forward: &[u8], backward: &[u8]) -> Vec<u8> {
    debug_assert_eq!(forward.len(), backward.len());

    let mut result = forward.to_vec();

    for (f, b) in izip!(result.chunks_exact_mut(8), backward.chunks_exact(8)) {
        average_simd(f, b);
    }

    let backward_rem = backward.chunks_exact(8).remainder();
    for (f, b) in izip!(result.chunks_exact_mut(8).into_remainder(), backward_rem) {
        *f = average_sample(*f, *b);
    }

    result
}

/// Adds a per-pixel residual to interleaved prediction data.
///
/// `prediction` holds `channels` samples per pixel; each residual value is
/// applied to every channel of its pixel. Results are clamped to `0..=255`.
pub fn add_residual(prediction: &[u8], residual: &[i16], channels: usize) -> Vec<u8> {
    debug_assert_eq!(prediction.len(), residual.len() * channels);

    let expanded: Vec<i16> = residual
        .iter()
        .flat_map(|&r| std::iter::repeat(r).take(channels))
        .collect();

    let mut result = prediction.to_vec();

    for (p, r) in izip!(result.chunks_exact_mut(8), expanded.chunks_exact(8)) {
        reconstruct_simd(p, r);
    }

    let expanded_rem = expanded.chunks_exact(8).remainder();
    for (p, r) in izip!(result.chunks_exact_mut(8).into_remainder(), expanded_rem) {
        *p = reconstruct(*p, *r);
    }

    result
}
