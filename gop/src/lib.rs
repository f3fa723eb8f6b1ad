//! Pure-rust GOP video frame reconstruction

#[macro_use]
extern crate bitflags;

mod error;
mod io;

pub mod decoder;
pub mod encoder;
pub mod parser;
pub mod types;

pub use error::{Error, Result};
pub use io::{frame_name, FrameSink, PayloadSource};
