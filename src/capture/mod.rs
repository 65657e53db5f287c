//! Frame representation, frame sources and configuration.
//!
//! Real camera capture lives outside this crate. A [`FrameSource`] only
//! has to hand out [`Frame`]s of a consistent shape; [`MockSource`]
//! synthesizes them for demos and tests.

mod config;
mod frame;
mod sample;
mod source;

pub use config::{CaptureConfig, ConfigError, EffectsConfig, FileConfig, OutputConfig};
pub use frame::{ElementType, Frame, FrameError, FrameShape, PixelData};
pub use source::{FrameSource, MockSource, SourceError};
