//! Decoded frame storage

use crate::decoder::picture::RgbImage;
use crate::error::{Error, Result};
use log::trace;
use std::collections::BTreeMap;

/// All frames decoded so far in one run, indexed by their position in the
/// sequence.
///
/// Frames are committed strictly in index order. A bidirectionally-predicted
/// frame may need a later frame before its own turn comes; such frames are
/// parked here until every frame before them has been committed. No frame is
/// ever replaced once stored.
#[derive(Default)]
pub struct DecodedFrameStore {
    /// Committed frames, `frames[i]` being frame `i`.
    frames: Vec<RgbImage>,

    /// Frames decoded ahead of their turn.
    ///
    /// Every key is at least `frames.len()`.
    parked: BTreeMap<usize, RgbImage>,
}

impl DecodedFrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of committed frames, which is also the index of the next
    /// frame to commit.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Determine if a frame has been decoded, whether committed or parked.
    pub fn contains(&self, index: usize) -> bool {
        index < self.frames.len() || self.parked.contains_key(&index)
    }

    /// Get a decoded frame, whether committed or parked.
    pub fn get(&self, index: usize) -> Option<&RgbImage> {
        self.frames.get(index).or_else(|| self.parked.get(&index))
    }

    /// Get a committed frame.
    pub fn committed(&self, index: usize) -> Option<&RgbImage> {
        self.frames.get(index)
    }

    /// Get the newest decoded frame that precedes `index`.
    ///
    /// While a frame is being decoded ahead of its turn, the frames between
    /// it and the committed frames are missing; this yields whichever frame
    /// before it is closest.
    pub fn newest_before(&self, index: usize) -> Option<&RgbImage> {
        if let Some((_, frame)) = self.parked.range(..index).next_back() {
            return Some(frame);
        }

        let committed = index.min(self.frames.len());
        self.frames.get(committed.checked_sub(1)?)
    }

    /// Commit the next frame in sequence.
    pub fn push(&mut self, frame: RgbImage) -> Result<usize> {
        let index = self.frames.len();
        if self.parked.contains_key(&index) {
            return Err(Error::FrameAlreadyDecoded(index));
        }

        self.frames.push(frame);

        Ok(index)
    }

    /// Store a frame decoded ahead of its turn.
    pub fn park(&mut self, index: usize, frame: RgbImage) -> Result<()> {
        if self.contains(index) {
            return Err(Error::FrameAlreadyDecoded(index));
        }

        trace!("Parking frame {} until frame {} is committed", index, self.frames.len());
        self.parked.insert(index, frame);

        Ok(())
    }

    /// Commit the next frame in sequence if it was decoded ahead of its turn.
    ///
    /// Yields `true` if a parked frame was committed.
    pub fn commit_parked(&mut self) -> bool {
        let index = self.frames.len();

        match self.parked.remove(&index) {
            Some(frame) => {
                trace!("Committing parked frame {}", index);
                self.frames.push(frame);
                true
            }
            None => false,
        }
    }

    /// Take every committed frame, in order.
    pub fn into_frames(self) -> Vec<RgbImage> {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(value: u8) -> RgbImage {
        RgbImage::from_raw(1, 1, vec![value; 3]).unwrap()
    }

    #[test]
    fn commits_in_order() {
        let mut store = DecodedFrameStore::new();
        assert!(store.is_empty());
        assert!(store.newest_before(0).is_none());

        assert_eq!(store.push(frame(0)).unwrap(), 0);
        assert_eq!(store.push(frame(1)).unwrap(), 1);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1), Some(&frame(1)));
        assert_eq!(store.newest_before(1), Some(&frame(0)));
        assert_eq!(store.newest_before(5), Some(&frame(1)));
        assert!(store.get(2).is_none());
    }

    #[test]
    fn parked_frames_wait_their_turn() {
        let mut store = DecodedFrameStore::new();
        store.push(frame(0)).unwrap();

        // Frame 1 is in flight; frames 2 and 3 are decoded ahead of it.
        store.park(3, frame(3)).unwrap();
        store.park(2, frame(2)).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.contains(2));
        assert!(store.committed(2).is_none());
        assert_eq!(store.get(3), Some(&frame(3)));
        assert_eq!(store.newest_before(2), Some(&frame(0)));
        assert_eq!(store.newest_before(4), Some(&frame(3)));

        // Nothing parked for frame 1.
        assert!(!store.commit_parked());
        store.push(frame(1)).unwrap();

        assert!(store.commit_parked());
        assert!(store.commit_parked());
        assert!(!store.commit_parked());

        let frames = store.into_frames();
        assert_eq!(frames, vec![frame(0), frame(1), frame(2), frame(3)]);
    }

    #[test]
    fn frames_are_never_replaced() {
        let mut store = DecodedFrameStore::new();
        store.push(frame(0)).unwrap();
        store.park(1, frame(1)).unwrap();

        assert!(matches!(
            store.park(0, frame(9)),
            Err(Error::FrameAlreadyDecoded(0))
        ));
        assert!(matches!(
            store.park(1, frame(9)),
            Err(Error::FrameAlreadyDecoded(1))
        ));
        assert!(matches!(
            store.push(frame(9)),
            Err(Error::FrameAlreadyDecoded(1))
        ));
        assert_eq!(store.get(1), Some(&frame(1)));
    }
}
