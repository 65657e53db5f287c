//! Two-frame motion effect.
//!
//! Emits the difference between consecutive frames. Static parts of the
//! scene cancel out and only moving edges remain visible.

use crate::capture::{Frame, FrameError};

/// Computes `previous - current` for each incoming frame.
///
/// The first frame after creation or [`reset`](Self::reset) has nothing to
/// compare against and is returned unchanged.
#[derive(Debug, Default)]
pub struct MotionDifferencer {
    /// Previous frame for differencing.
    previous: Option<Frame>,
}

impl MotionDifferencer {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Returns the motion frame for `current` and remembers it.
    pub fn process(&mut self, current: Frame) -> Result<Frame, FrameError> {
        let output = match self.previous.as_ref() {
            Some(prev) => {
                prev.ensure_same_shape(&current)?;
                let values: Vec<f64> = prev
                    .to_f64_vec()
                    .into_iter()
                    .zip(current.to_f64_vec())
                    .map(|(p, c)| p - c)
                    .collect();
                current.derive_f64(&values)
            }
            None => current.clone(),
        };

        self.previous = Some(current);
        Ok(output)
    }

    /// Forgets the previous frame.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Returns true if ready to produce a difference.
    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(value: u8, sequence: u64) -> Frame {
        Frame::new(vec![value; 64], 8, 8, sequence).unwrap()
    }

    #[test]
    fn test_first_frame_passes_through() {
        let mut motion = MotionDifferencer::new();
        let out = motion.process(gray(100, 1)).unwrap();

        assert!(out.to_f64_vec().iter().all(|&v| v == 100.0));
        assert!(motion.is_primed());
    }

    #[test]
    fn test_second_frame_returns_difference() {
        let mut motion = MotionDifferencer::new();

        motion.process(gray(150, 1)).unwrap();
        let out = motion.process(gray(100, 2)).unwrap();

        assert!(out.to_f64_vec().iter().all(|&v| v == 50.0));
        assert_eq!(out.sequence(), 2);
    }

    #[test]
    fn test_brightening_saturates_to_zero() {
        let mut motion = MotionDifferencer::new();

        motion.process(gray(100, 1)).unwrap();
        let out = motion.process(gray(150, 2)).unwrap();

        assert!(out.to_f64_vec().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_identical_frames_zero_difference() {
        let mut motion = MotionDifferencer::new();

        motion.process(gray(100, 1)).unwrap();
        let out = motion.process(gray(100, 2)).unwrap();

        assert!(out.to_f64_vec().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_mismatch_keeps_previous() {
        let mut motion = MotionDifferencer::new();
        motion.process(gray(100, 1)).unwrap();

        let other = Frame::new(vec![0; 16], 4, 4, 2).unwrap();
        assert!(matches!(
            motion.process(other),
            Err(FrameError::DimensionMismatch { .. })
        ));

        let out = motion.process(gray(40, 3)).unwrap();
        assert!(out.to_f64_vec().iter().all(|&v| v == 60.0));
    }

    #[test]
    fn test_reset_requires_new_prime() {
        let mut motion = MotionDifferencer::new();

        motion.process(gray(100, 1)).unwrap();
        assert!(motion.is_primed());

        motion.reset();
        assert!(!motion.is_primed());
    }
}
