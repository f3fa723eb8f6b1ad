//! Planar picture color conversion

use crate::decoder::picture::RgbImage;
use crate::types::PlanarImage;
use gop_rs_yuv::bt601::yuv_to_rgb;

/// Convert a planar YUV picture into an RGB picture.
///
/// Chroma planes are upsampled to the luma resolution by replication and
/// each pixel is converted with the BT.601 coefficients.
pub fn planar_to_rgb(image: &PlanarImage) -> RgbImage {
    let rgb = yuv_to_rgb(
        image.as_luma(),
        image.as_chroma_b(),
        image.as_chroma_r(),
        image.width(),
        image.subsampling().factors(),
    );

    RgbImage::from_samples(image.width(), image.height(), rgb)
}
