//! Payload input and frame output

use crate::decoder::RgbImage;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::io;

/// An ordered sequence of encoded frame payloads.
pub trait PayloadSource {
    /// The number of payloads, and thus frames, in the sequence.
    fn payload_count(&self) -> usize;

    /// Read the payload of the frame at `index`.
    fn read_payload(&self, index: usize) -> io::Result<Cow<'_, [u8]>>;
}

impl<T> PayloadSource for [T]
where
    T: AsRef<[u8]>,
{
    fn payload_count(&self) -> usize {
        self.len()
    }

    fn read_payload(&self, index: usize) -> io::Result<Cow<'_, [u8]>> {
        self.get(index)
            .map(|payload| Cow::Borrowed(payload.as_ref()))
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no payload for frame {}", index),
                )
            })
    }
}

impl<T> PayloadSource for Vec<T>
where
    T: AsRef<[u8]>,
{
    fn payload_count(&self) -> usize {
        self.as_slice().payload_count()
    }

    fn read_payload(&self, index: usize) -> io::Result<Cow<'_, [u8]>> {
        self.as_slice().read_payload(index)
    }
}

impl<S> PayloadSource for &S
where
    S: PayloadSource + ?Sized,
{
    fn payload_count(&self) -> usize {
        (**self).payload_count()
    }

    fn read_payload(&self, index: usize) -> io::Result<Cow<'_, [u8]>> {
        (**self).read_payload(index)
    }
}

/// Receives decoded frames in index order.
pub trait FrameSink {
    /// Accept the frame at `index`, along with its sequential name.
    fn write_frame(
        &mut self,
        index: usize,
        name: &str,
        frame: &RgbImage,
    ) -> Result<(), Box<dyn StdError + Send + Sync>>;
}

impl<F> FrameSink for F
where
    F: FnMut(usize, &str, &RgbImage) -> Result<(), Box<dyn StdError + Send + Sync>>,
{
    fn write_frame(
        &mut self,
        index: usize,
        name: &str,
        frame: &RgbImage,
    ) -> Result<(), Box<dyn StdError + Send + Sync>> {
        self(index, name, frame)
    }
}

/// The name a frame is emitted under, zero-padded to three digits.
pub fn frame_name(index: usize) -> String {
    format!("frame_{:03}", index)
}
