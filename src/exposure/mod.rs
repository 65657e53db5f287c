//! Rolling long-exposure accumulation.
//!
//! A [`FrameHistory`] keeps the most recent frames; the [`Accumulator`]
//! blends them into a single output frame once the history is full.

mod accumulator;
mod history;

pub use accumulator::{Accumulator, BlendPolicy, ExposureConfig};
pub use history::{FrameHistory, DEFAULT_CAPACITY};
