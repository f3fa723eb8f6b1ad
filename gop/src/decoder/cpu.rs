//! Decoder primitives implemented on the CPU

mod convert;
mod gather;

pub use convert::planar_to_rgb;
pub use gather::compensate;
