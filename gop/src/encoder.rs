//! Payload production: the inverse of the parser, plus block-matching
//! motion estimation for building predicted frames.

mod estimate;
mod writer;

pub use estimate::{estimate_motion_field, residual_between};
pub use writer::{write_b_payload, write_intra_payload, write_p_payload};
