//! Long Exposure Video Effects Library
//!
//! Simple real-time effects for a camera feed: a rolling long-exposure
//! accumulator, Laplacian edge and sharpen filters, a signed negative and
//! frame-difference motion effects.
//!
//! # Architecture
//!
//! ```text
//! frame source → effect processor → caller (display / encoding)
//!                  ├─ exposure (history + accumulator)
//!                  └─ effects  (filters, difference, motion)
//! ```
//!
//! # Design Principles
//!
//! - **Frames are immutable**: every effect returns a new frame
//! - **No wraparound**: integer results saturate to the element range
//! - **Explicit state**: history lives in owned values, never in statics
//! - **Fail fast**: frames whose shape changes mid-stream are rejected
//!
//! # Example
//!
//! ```
//! use long_exposure::{
//!     capture::{CaptureConfig, FrameSource, MockSource},
//!     exposure::{Accumulator, ExposureConfig},
//! };
//!
//! let mut source = MockSource::new();
//! source.open(&CaptureConfig::with_dimensions(64, 48)).unwrap();
//!
//! let mut accumulator = Accumulator::new(ExposureConfig {
//!     capacity: 5,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! for _ in 0..10 {
//!     let frame = source.capture().unwrap();
//!     let exposure = accumulator.accumulate(frame).unwrap();
//!     assert_eq!(exposure.width(), 64);
//! }
//! assert!(accumulator.is_warm());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod effects;
pub mod exposure;
pub mod metrics;

// Re-export commonly used types at crate root
pub use capture::{CaptureConfig, ElementType, FileConfig, Frame, FrameError, FrameShape, MockSource};
pub use effects::{BorderPolicy, Effect, EffectProcessor};
pub use exposure::{Accumulator, BlendPolicy, ExposureConfig, FrameHistory};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
