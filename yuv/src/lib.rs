//! Planar YUV to interleaved RGB conversion.

pub mod bt601;
