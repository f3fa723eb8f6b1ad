//! Frame-type dispatch for payload parsing

use crate::error::Result;
use crate::parser::intra::decode_planar_image;
use crate::parser::predicted::{decode_bidirectional, decode_predicted};
use crate::types::{ChromaSubsampling, FramePayload, FrameType};

/// Parse a payload according to the type of the frame it belongs to.
pub fn decode_frame_payload(
    payload: &[u8],
    frame_type: FrameType,
    width: usize,
    height: usize,
    subsampling: ChromaSubsampling,
) -> Result<FramePayload> {
    match frame_type {
        FrameType::Intra => {
            decode_planar_image(payload, width, height, subsampling).map(FramePayload::Intra)
        }
        FrameType::ForwardPredicted => {
            let (field, residual) = decode_predicted(payload, width, height)?;

            Ok(FramePayload::ForwardPredicted { field, residual })
        }
        FrameType::BidirectionalPredicted => {
            let (forward, backward, residual) = decode_bidirectional(payload, width, height)?;

            Ok(FramePayload::BidirectionalPredicted {
                forward,
                backward,
                residual,
            })
        }
    }
}
