//! Per-frame effects and the dispatcher that feeds them.
//!
//! The filters in this module are stateless functions of one frame (or
//! three, for [`difference`]). [`EffectProcessor`] owns whatever history
//! the selected effect needs and turns one input frame into one output.

mod filters;
mod kernel;
mod motion;

pub use filters::{
    difference, edge_filter, edge_filter_wide, edge_filter_wide_with_border,
    edge_filter_with_border, negate, sharpen, sharpen_with_border,
};
pub use kernel::{convolve, BorderPolicy, Kernel3x3};
pub use motion::MotionDifferencer;

use crate::capture::{ConfigError, Frame, FrameError};
use crate::exposure::{Accumulator, ExposureConfig, FrameHistory};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Frames kept for the three-frame difference.
const DIFFERENCE_WINDOW: usize = 3;

/// Effect applied to each incoming frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effect {
    /// Frames are returned unchanged.
    Passthrough,
    /// Rolling weighted blend of recent frames.
    #[default]
    LongExposure,
    /// Four-neighbour Laplacian.
    Edge,
    /// Eight-neighbour Laplacian.
    EdgeWide,
    /// Frame minus its Laplacian.
    Sharpen,
    /// Signed reinterpretation and negation.
    Negate,
    /// Newest frame minus the frame two steps back.
    Difference,
    /// Previous frame minus current frame.
    Motion,
}

impl Effect {
    pub const ALL: [Effect; 8] = [
        Effect::Passthrough,
        Effect::LongExposure,
        Effect::Edge,
        Effect::EdgeWide,
        Effect::Sharpen,
        Effect::Negate,
        Effect::Difference,
        Effect::Motion,
    ];

    /// Name used in configuration files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Effect::Passthrough => "passthrough",
            Effect::LongExposure => "long-exposure",
            Effect::Edge => "edge",
            Effect::EdgeWide => "edge-wide",
            Effect::Sharpen => "sharpen",
            Effect::Negate => "negate",
            Effect::Difference => "difference",
            Effect::Motion => "motion",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Effect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Effect::ALL
            .into_iter()
            .find(|effect| effect.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Effect::ALL.iter().map(|e| e.name()).collect();
                format!("unknown effect '{s}' (expected one of {})", names.join(", "))
            })
    }
}

/// Runs one selected effect over a stream of frames.
///
/// Stateful effects pass frames through until they have enough history:
/// `long-exposure` until the accumulator is warm, `difference` until three
/// frames are held, `motion` for the very first frame.
#[derive(Debug)]
pub struct EffectProcessor {
    effect: Effect,
    border: BorderPolicy,
    accumulator: Accumulator,
    window: FrameHistory,
    motion: MotionDifferencer,
    frames_processed: u64,
}

impl EffectProcessor {
    pub fn new(
        effect: Effect,
        border: BorderPolicy,
        exposure: ExposureConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            effect,
            border,
            accumulator: Accumulator::new(exposure)?,
            window: FrameHistory::new(DIFFERENCE_WINDOW),
            motion: MotionDifferencer::new(),
            frames_processed: 0,
        })
    }

    /// Applies the selected effect to `frame`.
    pub fn process(&mut self, frame: Frame) -> Result<Frame, FrameError> {
        let output = match self.effect {
            Effect::Passthrough => frame,
            Effect::LongExposure => self.accumulator.accumulate(frame)?,
            Effect::Edge => edge_filter_with_border(&frame, self.border),
            Effect::EdgeWide => edge_filter_wide_with_border(&frame, self.border),
            Effect::Sharpen => sharpen_with_border(&frame, self.border),
            Effect::Negate => negate(&frame),
            Effect::Difference => {
                self.window.push(frame)?;
                match (self.window.get(2), self.window.get(1), self.window.get(0)) {
                    (Some(prev2), Some(prev1), Some(current)) => {
                        difference(prev2, prev1, current)?
                    }
                    _ => self.window.most_recent()?.clone(),
                }
            }
            Effect::Motion => self.motion.process(frame)?,
        };

        self.frames_processed += 1;
        tracing::trace!(
            effect = %self.effect,
            sequence = output.sequence(),
            "Processed frame"
        );
        Ok(output)
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn border(&self) -> BorderPolicy {
        self.border
    }

    /// The long-exposure accumulator (idle unless that effect is selected).
    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Frames successfully processed since creation or reset.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Drops all held history.
    pub fn reset(&mut self) {
        self.accumulator.reset();
        self.window.reset();
        self.motion.reset();
        self.frames_processed = 0;
    }
}
