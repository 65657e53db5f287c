//! Bounded history of the most recent frames.

use crate::capture::{Frame, FrameError, FrameShape};
use std::collections::VecDeque;

/// Default number of frames kept.
pub const DEFAULT_CAPACITY: usize = 20;

/// Ring of the most recent frames, newest first.
///
/// Slot `i` holds the frame pushed `i` pushes ago. The first push locks the
/// frame shape; later frames of any other shape are rejected until
/// [`reset`](Self::reset).
#[derive(Debug)]
pub struct FrameHistory {
    slots: VecDeque<Frame>,
    capacity: usize,
    total_pushed: u64,
}

impl FrameHistory {
    /// Creates an empty history. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: VecDeque::with_capacity(capacity),
            capacity,
            total_pushed: 0,
        }
    }

    /// Inserts `frame` at slot 0, evicting the oldest frame when full.
    pub fn push(&mut self, frame: Frame) -> Result<(), FrameError> {
        if let Some(newest) = self.slots.front() {
            if let Err(e) = newest.ensure_same_shape(&frame) {
                tracing::warn!(error = %e, "Rejected frame with mismatched shape");
                return Err(e);
            }
        }

        if self.slots.len() == self.capacity {
            self.slots.pop_back();
        }
        self.slots.push_front(frame);
        self.total_pushed += 1;

        if self.slots.len() == self.capacity && self.total_pushed == self.capacity as u64 {
            tracing::info!(capacity = self.capacity, "Frame history is warm");
        }
        Ok(())
    }

    /// Returns true once `capacity` frames have been pushed.
    pub fn is_warm(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Returns the newest frame.
    pub fn most_recent(&self) -> Result<&Frame, FrameError> {
        self.slots.front().ok_or(FrameError::EmptyHistory)
    }

    /// Returns the frame pushed `index` pushes ago, if still held.
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.slots.get(index)
    }

    /// Iterates the held frames, newest to oldest.
    ///
    /// Yields exactly `capacity` frames once warm; before that, only the
    /// frames pushed so far.
    pub fn snapshot(&self) -> impl ExactSizeIterator<Item = &Frame> + '_ {
        self.slots.iter()
    }

    /// Number of filled slots, saturating at `capacity`.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing has been pushed since creation or reset.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total frames pushed since creation or reset.
    pub fn total_pushed(&self) -> u64 {
        self.total_pushed
    }

    /// Shape locked in by the held frames.
    pub fn shape(&self) -> Option<FrameShape> {
        self.slots.front().map(Frame::shape)
    }

    /// Drops every held frame and unlocks the shape.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.total_pushed = 0;
        tracing::info!("Frame history reset");
    }
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gray(value: u8, sequence: u64) -> Frame {
        Frame::new(vec![value; 16], 4, 4, sequence).unwrap()
    }

    #[test]
    fn test_empty_history() {
        let history = FrameHistory::new(3);

        assert!(history.is_empty());
        assert!(!history.is_warm());
        assert!(matches!(
            history.most_recent(),
            Err(FrameError::EmptyHistory)
        ));
        assert_eq!(history.snapshot().len(), 0);
    }

    #[test]
    fn test_warm_after_capacity_pushes() {
        let mut history = FrameHistory::new(3);

        for i in 0..2 {
            history.push(gray(i, i as u64)).unwrap();
            assert!(!history.is_warm());
        }
        history.push(gray(2, 2)).unwrap();
        assert!(history.is_warm());

        for i in 3..10 {
            history.push(gray(i, i as u64)).unwrap();
            assert!(history.is_warm());
            assert_eq!(history.len(), 3);
        }
    }

    #[test]
    fn test_snapshot_newest_first() {
        let mut history = FrameHistory::new(3);
        for i in 1..=5 {
            history.push(gray(i, i as u64)).unwrap();
        }

        let sequences: Vec<u64> = history.snapshot().map(Frame::sequence).collect();
        assert_eq!(sequences, vec![5, 4, 3]);
        assert_eq!(history.most_recent().unwrap().sequence(), 5);
        assert_eq!(history.get(2).unwrap().sequence(), 3);
        assert!(history.get(3).is_none());
    }

    #[test]
    fn test_mismatched_shape_rejected() {
        let mut history = FrameHistory::new(3);
        history.push(gray(1, 1)).unwrap();

        let wide = Frame::new(vec![0; 32], 8, 4, 2).unwrap();
        assert!(matches!(
            history.push(wide),
            Err(FrameError::DimensionMismatch { .. })
        ));
        // Rejected frame leaves the history untouched.
        assert_eq!(history.len(), 1);
        assert_eq!(history.total_pushed(), 1);
    }

    #[test]
    fn test_reset_unlocks_shape() {
        let mut history = FrameHistory::new(2);
        history.push(gray(1, 1)).unwrap();
        history.push(gray(2, 2)).unwrap();
        assert!(history.is_warm());

        history.reset();
        assert!(history.is_empty());
        assert!(!history.is_warm());
        assert_eq!(history.shape(), None);

        let wide = Frame::new(vec![0; 32], 8, 4, 3).unwrap();
        assert!(history.push(wide).is_ok());
    }

    #[test]
    fn test_zero_capacity_raised_to_one() {
        let mut history = FrameHistory::new(0);
        assert_eq!(history.capacity(), 1);

        history.push(gray(7, 1)).unwrap();
        assert!(history.is_warm());
    }

    proptest! {
        #[test]
        fn prop_slot_i_is_i_pushes_ago(capacity in 1usize..25, pushes in 1u64..60) {
            let mut history = FrameHistory::new(capacity);
            for seq in 1..=pushes {
                history.push(gray(0, seq)).unwrap();
            }

            prop_assert_eq!(history.len(), capacity.min(pushes as usize));
            prop_assert_eq!(history.is_warm(), pushes as usize >= capacity);
            for (i, frame) in history.snapshot().enumerate() {
                prop_assert_eq!(frame.sequence(), pushes - i as u64);
            }
        }
    }
}
