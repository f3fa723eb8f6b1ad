//! Intra picture payload parser

use crate::error::{Error, Result};
use crate::parser::reader::PayloadReader;
use crate::types::{ChromaSubsampling, PlanarImage};

/// Split an intra payload into its luma and chroma planes.
///
/// The payload is the luma plane followed by the chroma-B and chroma-R
/// planes, each sized according to `subsampling`. Any other length is
/// rejected, including payloads with trailing data.
pub fn decode_planar_image(
    payload: &[u8],
    width: usize,
    height: usize,
    subsampling: ChromaSubsampling,
) -> Result<PlanarImage> {
    if width == 0 || height == 0 {
        return Err(Error::UnsupportedDimensions { width, height });
    }

    let expected = subsampling.planar_size(width, height);
    if payload.len() != expected {
        return Err(Error::MalformedPayload {
            expected,
            actual: payload.len(),
        });
    }

    let (chroma_width, chroma_height) = subsampling.chroma_dimensions(width, height);
    let mut reader = PayloadReader::from_payload(payload);

    let luma = reader.read_bytes(width * height)?.to_vec();
    let chroma_b = reader.read_bytes(chroma_width * chroma_height)?.to_vec();
    let chroma_r = reader.read_bytes(chroma_width * chroma_height)?.to_vec();

    PlanarImage::new(width, height, subsampling, luma, chroma_b, chroma_r)
}
