//! GOP frame decoder.

mod cpu;
mod frame;
mod picture;
mod state;
mod store;
mod types;

pub use cpu::{compensate, planar_to_rgb};
pub use frame::{decode_b, decode_intra, decode_p};
pub use picture::RgbImage;
pub use state::GopScheduler;
pub use store::DecodedFrameStore;
pub use types::{DecoderOption, GopConfig};
