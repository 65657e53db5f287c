//! Weighted blending of the frame history.

use super::history::{FrameHistory, DEFAULT_CAPACITY};
use crate::capture::{ConfigError, Frame, FrameError};
use serde::{Deserialize, Serialize};

/// How much each held frame contributes to the blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendPolicy {
    /// Every slot is weighted `1 / divisor`.
    #[default]
    FixedWeight,
    /// Slot `i` is weighted `1 / (divisor * (i + 1))`.
    DistanceScaled,
}

impl BlendPolicy {
    /// Weight of history slot `index` (0 = newest).
    pub fn weight(self, index: usize, divisor: f64) -> f64 {
        match self {
            Self::FixedWeight => 1.0 / divisor,
            Self::DistanceScaled => 1.0 / (divisor * (index + 1) as f64),
        }
    }
}

impl std::str::FromStr for BlendPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed-weight" => Ok(Self::FixedWeight),
            "distance-scaled" => Ok(Self::DistanceScaled),
            other => Err(format!(
                "unknown blend policy '{other}' (expected fixed-weight or distance-scaled)"
            )),
        }
    }
}

/// Long-exposure settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    /// Frames held in the history.
    pub capacity: usize,
    /// Weighting applied to held frames.
    pub blend_policy: BlendPolicy,
    /// Divisor shared by both policies.
    pub fixed_weight_divisor: f64,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            blend_policy: BlendPolicy::FixedWeight,
            fixed_weight_divisor: 2.0,
        }
    }
}

impl ExposureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        if !self.fixed_weight_divisor.is_finite() || self.fixed_weight_divisor <= 0.0 {
            return Err(ConfigError::InvalidDivisor(self.fixed_weight_divisor));
        }
        Ok(())
    }

    /// Blend weights for every slot, newest first.
    pub fn weights(&self) -> Vec<f64> {
        (0..self.capacity)
            .map(|i| self.blend_policy.weight(i, self.fixed_weight_divisor))
            .collect()
    }
}

/// Produces one long-exposure frame per input frame.
///
/// Until the history has filled once, input frames are returned unchanged.
/// After that, each output sample is the weighted sum of the corresponding
/// samples of every held frame, saturated into the element type.
///
/// Mutating calls take `&mut self`; share an accumulator between threads
/// only behind a lock such as `Mutex<Accumulator>`.
#[derive(Debug)]
pub struct Accumulator {
    history: FrameHistory,
    weights: Vec<f64>,
    config: ExposureConfig,
    passthrough_frames: u64,
    blended_frames: u64,
}

impl Accumulator {
    /// Creates an accumulator from a validated configuration.
    pub fn new(config: ExposureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            history: FrameHistory::new(config.capacity),
            weights: config.weights(),
            config,
            passthrough_frames: 0,
            blended_frames: 0,
        })
    }

    /// Pushes `frame` into the history and returns the blended output.
    pub fn accumulate(&mut self, frame: Frame) -> Result<Frame, FrameError> {
        self.history.push(frame)?;
        let newest = self.history.most_recent()?;

        if !self.history.is_warm() {
            self.passthrough_frames += 1;
            tracing::trace!(
                filled = self.history.len(),
                capacity = self.history.capacity(),
                "Warming up, passing frame through"
            );
            return Ok(newest.clone());
        }

        let mut sums = vec![0.0f64; newest.sample_count()];
        for (frame, &weight) in self.history.snapshot().zip(&self.weights) {
            frame.add_scaled_into(&mut sums, weight);
        }
        let output = newest.derive_f64(&sums);

        self.blended_frames += 1;
        tracing::trace!(sequence = output.sequence(), "Blended frame history");
        Ok(output)
    }

    /// The most recent raw input frame.
    pub fn last_frame(&self) -> Result<&Frame, FrameError> {
        self.history.most_recent()
    }

    /// Returns true once the history has filled.
    pub fn is_warm(&self) -> bool {
        self.history.is_warm()
    }

    pub fn history(&self) -> &FrameHistory {
        &self.history
    }

    pub fn config(&self) -> &ExposureConfig {
        &self.config
    }

    /// Frames returned unchanged during warm-up.
    pub fn passthrough_frames(&self) -> u64 {
        self.passthrough_frames
    }

    /// Frames produced by blending.
    pub fn blended_frames(&self) -> u64 {
        self.blended_frames
    }

    /// Clears the history; the next `capacity` frames pass through again.
    pub fn reset(&mut self) {
        self.history.reset();
        self.passthrough_frames = 0;
        self.blended_frames = 0;
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        let config = ExposureConfig::default();
        Self {
            history: FrameHistory::new(config.capacity),
            weights: config.weights(),
            config,
            passthrough_frames: 0,
            blended_frames: 0,
        }
    }
}
