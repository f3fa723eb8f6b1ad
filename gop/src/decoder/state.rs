//! GOP decoder core

use crate::decoder::cpu::planar_to_rgb;
use crate::decoder::frame::{reconstruct_bidirectional, reconstruct_predicted};
use crate::decoder::picture::RgbImage;
use crate::decoder::store::DecodedFrameStore;
use crate::decoder::types::GopConfig;
use crate::error::{Error, Result};
use crate::io::{frame_name, FrameSink, PayloadSource};
use crate::parser::decode_frame_payload;
use crate::types::{FramePayload, FrameType};
use log::{debug, trace};
use std::num::NonZeroUsize;

/// All state necessary to decode a sequence of frame payloads laid out in a
/// fixed group-of-pictures structure.
///
/// Frames are produced strictly in index order. A bidirectionally-predicted
/// frame needs the frame after it, which is decoded ahead of its turn and held
/// in the frame store until it is reached.
pub struct GopScheduler<S> {
    /// The layout of every frame in the sequence.
    config: GopConfig,

    /// The validated GOP size.
    gop_size: NonZeroUsize,

    /// Where payloads are read from.
    source: S,

    /// Every frame decoded so far.
    store: DecodedFrameStore,
}

impl<S> GopScheduler<S>
where
    S: PayloadSource,
{
    /// Construct a new `GopScheduler` over a sequence of payloads.
    pub fn new(config: GopConfig, source: S) -> Result<Self> {
        let gop_size = config.validate()?;

        Ok(Self {
            config,
            gop_size,
            source,
            store: DecodedFrameStore::new(),
        })
    }

    pub fn config(&self) -> &GopConfig {
        &self.config
    }

    /// The number of frames in the sequence.
    pub fn frame_count(&self) -> usize {
        self.source.payload_count()
    }

    /// The type of the frame at `index`, as fixed by the GOP structure.
    pub fn frame_type(&self, index: usize) -> FrameType {
        FrameType::for_index(index, self.gop_size)
    }

    /// Get a frame that has already been decoded.
    ///
    /// This includes frames decoded ahead of their turn that have not yet
    /// been yielded by `decode_next_frame`.
    pub fn frame(&self, index: usize) -> Option<&RgbImage> {
        self.store.get(index)
    }

    pub fn store(&self) -> &DecodedFrameStore {
        &self.store
    }

    /// Decode the next frame in the sequence.
    ///
    /// Yields the index of the frame along with the frame itself, or `None`
    /// once every frame has been produced. Errors carry the index of the
    /// frame that failed, which may be later than the frame being produced
    /// if it was needed as a reference.
    pub fn decode_next_frame(&mut self) -> Result<Option<(usize, &RgbImage)>> {
        let index = self.store.len();
        if index >= self.frame_count() {
            return Ok(None);
        }

        if !self.store.commit_parked() {
            let frame = self.decode_frame(index)?;
            self.store.push(frame)?;
        }

        debug!("Produced {} {}", self.frame_type(index), frame_name(index));

        Ok(self.store.committed(index).map(|frame| (index, frame)))
    }

    /// Decode every remaining frame, handing each to `sink` in index order.
    ///
    /// Yields the number of frames written. Decoding halts at the first
    /// error; frames before the failing one will already have been written.
    pub fn decode_all<W>(&mut self, sink: &mut W) -> Result<usize>
    where
        W: FrameSink + ?Sized,
    {
        let mut written = 0;

        while let Some((index, frame)) = self.decode_next_frame()? {
            sink.write_frame(index, &frame_name(index), frame)
                .map_err(Error::FrameSink)?;
            written += 1;
        }

        Ok(written)
    }

    /// Take every frame decoded so far, in index order.
    pub fn into_frames(self) -> Vec<RgbImage> {
        self.store.into_frames()
    }

    /// Decode a single frame without storing it.
    fn decode_frame(&mut self, index: usize) -> Result<RgbImage> {
        let frame_type = self.frame_type(index);

        self.reconstruct_frame(index, frame_type)
            .map_err(|e| e.at_frame(index, frame_type))
    }

    fn reconstruct_frame(&mut self, index: usize, frame_type: FrameType) -> Result<RgbImage> {
        let GopConfig {
            width,
            height,
            subsampling,
            options,
            ..
        } = self.config;

        let payload = {
            let bytes = self.source.read_payload(index)?;
            decode_frame_payload(&bytes, frame_type, width, height, subsampling)?
        };

        match payload {
            FramePayload::Intra(image) => Ok(planar_to_rgb(&image)),
            FramePayload::ForwardPredicted { field, residual } => {
                let previous = self
                    .store
                    .newest_before(index)
                    .ok_or(Error::MissingReferenceFrame(index))?;

                reconstruct_predicted(&field, &residual, previous, options)
            }
            FramePayload::BidirectionalPredicted {
                forward,
                backward,
                residual,
            } => {
                self.ensure_future(index)?;

                let previous = self
                    .store
                    .newest_before(index)
                    .ok_or(Error::MissingReferenceFrame(index))?;
                let black;
                let future = match self.store.get(index + 1) {
                    Some(future) => future,
                    None => {
                        black = RgbImage::new(width, height);
                        &black
                    }
                };

                reconstruct_bidirectional(
                    &forward, &backward, &residual, previous, future, options,
                )
            }
        }
    }

    /// Decode the frame after `index` ahead of its turn, if it exists and has
    /// not been decoded yet.
    fn ensure_future(&mut self, index: usize) -> Result<()> {
        let future = index + 1;
        if future >= self.frame_count() || self.store.contains(future) {
            return Ok(());
        }

        trace!("Decoding frame {} ahead of frame {}", future, index);

        let frame = self.decode_frame(future)?;
        self.store.park(future, frame)
    }
}
