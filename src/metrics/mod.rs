//! Prometheus metrics for the effect pipeline.
//!
//! # Metrics Exposed
//!
//! - `long_exposure_frames_total` - Frames processed by the selected effect
//! - `long_exposure_passthrough_frames_total` - Frames passed through during warm-up
//! - `long_exposure_blended_frames_total` - Frames produced by blending
//! - `long_exposure_history_filled` - Filled history slots
//! - `long_exposure_history_capacity` - History capacity
//! - `long_exposure_history_warm` - Whether the history is full (1=warm, 0=warming up)
//!
//! # Example
//!
//! ```
//! use long_exposure::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     frames_processed: 42,
//!     passthrough_frames: 20,
//!     blended_frames: 22,
//!     history_filled: 20,
//!     history_capacity: 20,
//!     is_warm: true,
//! };
//!
//! registry.update(&snapshot);
//! assert!(registry.encode().unwrap().contains("long_exposure_history_warm 1"));
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
