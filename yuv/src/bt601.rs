//! YUV-to-RGB decode

/// Clamp a color component into the 8-bit range, truncating the fraction.
fn clamp(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }

    if v < 0.0 {
        return 0;
    }

    if v > 255.0 {
        return 255;
    }

    v as u8
}

/// Convert a single BT.601 `(Y, Cb, Cr)` sample into an RGB triple.
///
/// Chroma samples are centered on 128.
pub fn sample_to_rgb(y: u8, chroma_b: u8, chroma_r: u8) -> [u8; 3] {
    let y = y as f64;
    let b = chroma_b as f64 - 128.0;
    let r = chroma_r as f64 - 128.0;

    [
        clamp(y + 1.402 * r),
        clamp(y - 0.344136 * b - 0.714136 * r),
        clamp(y + 1.772 * b),
    ]
}

/// Convert BT.601 YUV data of any chroma subsampling into RGB 1:1:1 data.
///
/// This function yields an RGB picture with the same number of pixels as were
/// provided in the `y` picture. The `b` and `r` pictures are upsampled by
/// nearest-neighbor replication: each chroma sample covers a block of
/// `x_factor` by `y_factor` luma samples. Chroma rows are `ceil(y_width /
/// x_factor)` samples wide, so replication past the right or bottom edge of
/// the luma picture is cropped away.
///
/// The returned data is interleaved, three bytes per pixel. A `y_width` of
/// zero yields no pixels.
pub fn yuv_to_rgb(
    y: &[u8],
    chroma_b: &[u8],
    chroma_r: &[u8],
    y_width: usize,
    (x_factor, y_factor): (usize, usize),
) -> Vec<u8> {
    debug_assert!(x_factor > 0 && y_factor > 0);

    if y_width == 0 {
        return Vec::new();
    }

    let y_height = y.len() / y_width;
    let br_width = (y_width + x_factor - 1) / x_factor;

    let mut rgb = vec![0; y_width * y_height * 3];
    let pixels: &mut [[u8; 3]] = bytemuck::cast_slice_mut(&mut rgb);

    for y_pos in 0..y_height {
        for x_pos in 0..y_width {
            let br_pos = (x_pos / x_factor) + ((y_pos / y_factor) * br_width);
            let y_sample = y.get(x_pos + y_pos * y_width).copied().unwrap_or(0);
            let b_sample = chroma_b.get(br_pos).copied().unwrap_or(128);
            let r_sample = chroma_r.get(br_pos).copied().unwrap_or(128);

            pixels[x_pos + y_pos * y_width] = sample_to_rgb(y_sample, b_sample, r_sample);
        }
    }

    rgb
}
