//! Metrics collection and registry.

use crate::effects::EffectProcessor;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of pipeline state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Frames processed by the selected effect.
    pub frames_processed: u64,
    /// Frames returned unchanged while the history filled.
    pub passthrough_frames: u64,
    /// Frames produced by blending the history.
    pub blended_frames: u64,
    /// Filled history slots.
    pub history_filled: usize,
    /// History capacity.
    pub history_capacity: usize,
    /// Whether the history is full.
    pub is_warm: bool,
}

/// Prometheus metrics registry for the effect pipeline.
pub struct MetricsRegistry {
    registry: Registry,

    frames_total: IntCounter,

    // Accumulator metrics
    passthrough_total: IntCounter,
    blended_total: IntCounter,

    // History metrics
    history_filled: IntGauge,
    history_capacity: IntGauge,
    history_warm: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all pipeline metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_total = IntCounter::new(
            "long_exposure_frames_total",
            "Total number of frames processed",
        )?;

        let passthrough_total = IntCounter::new(
            "long_exposure_passthrough_frames_total",
            "Frames passed through unchanged while the history filled",
        )?;
        let blended_total = IntCounter::new(
            "long_exposure_blended_frames_total",
            "Frames produced by blending the frame history",
        )?;

        let history_filled = IntGauge::new(
            "long_exposure_history_filled",
            "Number of filled frame history slots",
        )?;
        let history_capacity = IntGauge::new(
            "long_exposure_history_capacity",
            "Frame history capacity",
        )?;
        let history_warm = IntGauge::new(
            "long_exposure_history_warm",
            "Whether the frame history is full (1=warm, 0=warming up)",
        )?;

        registry.register(Box::new(frames_total.clone()))?;
        registry.register(Box::new(passthrough_total.clone()))?;
        registry.register(Box::new(blended_total.clone()))?;
        registry.register(Box::new(history_filled.clone()))?;
        registry.register(Box::new(history_capacity.clone()))?;
        registry.register(Box::new(history_warm.clone()))?;

        Ok(Self {
            registry,
            frames_total,
            passthrough_total,
            blended_total,
            history_filled,
            history_capacity,
            history_warm,
        })
    }

    /// Updates all metrics from a snapshot of pipeline state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward; apply the difference.
        advance(&self.frames_total, snapshot.frames_processed);
        advance(&self.passthrough_total, snapshot.passthrough_frames);
        advance(&self.blended_total, snapshot.blended_frames);

        self.history_filled.set(snapshot.history_filled as i64);
        self.history_capacity.set(snapshot.history_capacity as i64);
        self.history_warm.set(if snapshot.is_warm { 1 } else { 0 });
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

impl MetricsSnapshot {
    /// Creates a snapshot from the current state of a processor.
    pub fn from_processor(processor: &EffectProcessor) -> Self {
        let accumulator = processor.accumulator();
        let history = accumulator.history();

        Self {
            frames_processed: processor.frames_processed(),
            passthrough_frames: accumulator.passthrough_frames(),
            blended_frames: accumulator.blended_frames(),
            history_filled: history.len(),
            history_capacity: history.capacity(),
            is_warm: accumulator.is_warm(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Frame, FrameShape};
    use crate::effects::{BorderPolicy, Effect};
    use crate::exposure::ExposureConfig;

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        let snapshot = MetricsSnapshot {
            frames_processed: 25,
            passthrough_frames: 19,
            blended_frames: 6,
            history_filled: 20,
            history_capacity: 20,
            is_warm: true,
        };

        registry.update(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("long_exposure_frames_total 25"));
        assert!(output.contains("long_exposure_blended_frames_total 6"));
        assert!(output.contains("long_exposure_history_warm 1"));
    }

    #[test]
    fn test_counters_never_decrease() {
        let registry = MetricsRegistry::new().unwrap();

        registry.update(&MetricsSnapshot {
            frames_processed: 10,
            ..Default::default()
        });
        // A reset processor reports smaller totals.
        registry.update(&MetricsSnapshot {
            frames_processed: 3,
            ..Default::default()
        });

        let output = registry.encode().unwrap();
        assert!(output.contains("long_exposure_frames_total 10"));
    }

    #[test]
    fn test_snapshot_from_processor() {
        let exposure = ExposureConfig {
            capacity: 4,
            ..Default::default()
        };
        let mut processor =
            EffectProcessor::new(Effect::LongExposure, BorderPolicy::Replicate, exposure).unwrap();
        for seq in 0..6 {
            let frame = Frame::filled(FrameShape::gray(2, 2), 1.0, seq).unwrap();
            processor.process(frame).unwrap();
        }

        let snapshot = MetricsSnapshot::from_processor(&processor);
        assert_eq!(snapshot.frames_processed, 6);
        assert_eq!(snapshot.passthrough_frames, 3);
        assert_eq!(snapshot.blended_frames, 3);
        assert_eq!(snapshot.history_filled, 4);
        assert_eq!(snapshot.history_capacity, 4);
        assert!(snapshot.is_warm);
    }

    #[test]
    fn test_metrics_encode() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.encode().unwrap();

        assert!(output.contains("long_exposure_frames_total"));
        assert!(output.contains("long_exposure_history_capacity"));
    }
}
