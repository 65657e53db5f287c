//! Frame source abstraction.
//!
//! Camera hardware is an external collaborator; anything that can hand
//! out frames of a fixed shape implements [`FrameSource`].

use super::{CaptureConfig, Frame, FrameError};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use thiserror::Error;

/// Errors that can occur while acquiring frames.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to configure source: {0}")]
    ConfigFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("source not initialized")]
    NotInitialized,
}

impl From<FrameError> for SourceError {
    fn from(e: FrameError) -> Self {
        SourceError::CaptureFailed(e.to_string())
    }
}

/// Trait for frame producers.
pub trait FrameSource {
    /// Opens the source with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), SourceError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<Frame, SourceError>;

    /// Checks if the source is currently open.
    fn is_open(&self) -> bool;

    /// Closes the source.
    fn close(&mut self);
}

/// Side of the bright square drawn by [`MockSource`], in pixels.
const SQUARE_SIZE: u32 = 8;

/// Synthetic source: a bright square sliding diagonally over a dim,
/// noisy background. Output is fully determined by the configured seed.
#[derive(Debug, Default)]
pub struct MockSource {
    config: Option<CaptureConfig>,
    rng: Option<ChaCha8Rng>,
    sequence: u64,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSource for MockSource {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), SourceError> {
        config
            .validate()
            .map_err(|e| SourceError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.rng = Some(ChaCha8Rng::seed_from_u64(config.seed));
        self.sequence = 0;
        tracing::info!(shape = %config.shape(), seed = config.seed, "MockSource opened");
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, SourceError> {
        let (config, rng) = match (self.config.as_ref(), self.rng.as_mut()) {
            (Some(config), Some(rng)) => (config, rng),
            _ => return Err(SourceError::NotInitialized),
        };

        let shape = config.shape();
        let (lo, hi) = shape.element.range();
        let span = hi - lo;

        let travel_x = shape.width.saturating_sub(SQUARE_SIZE).max(1) as u64;
        let travel_y = shape.height.saturating_sub(SQUARE_SIZE).max(1) as u64;
        let left = (self.sequence % travel_x) as u32;
        let top = (self.sequence % travel_y) as u32;

        let frame = Frame::from_fn(shape, self.sequence + 1, |row, col, _| {
            let inside = (top..top + SQUARE_SIZE).contains(&row)
                && (left..left + SQUARE_SIZE).contains(&col);
            // Background sits in the lowest eighth of the range.
            let level = if inside {
                0.9
            } else {
                (rng.next_u32() & 0xff) as f64 / 255.0 / 8.0
            };
            lo + level * span
        })?;

        self.sequence += 1;
        Ok(frame)
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        self.rng = None;
        tracing::info!("MockSource closed");
    }
}
