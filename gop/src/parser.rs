//! GOP payload parser functions.

mod frame;
mod intra;
mod predicted;
mod reader;

pub use frame::decode_frame_payload;
pub use intra::decode_planar_image;
pub use predicted::{
    bidirectional_payload_size, decode_bidirectional, decode_predicted, predicted_payload_size,
};
pub use reader::PayloadReader;
