//! Capture and run configuration.
//!
//! Every section has defaults, so a configuration file only needs to
//! name the values it changes.

use super::frame::{ElementType, FrameShape};
use crate::effects::{BorderPolicy, Effect};
use crate::exposure::ExposureConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the frame source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Interleaved channels per pixel.
    pub channels: u8,
    /// Sample storage type.
    pub element: ElementType,
    /// Target frames per second when running continuously.
    pub fps: u32,
    /// Seed for the synthetic source's noise.
    pub seed: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            channels: 1,
            element: ElementType::U8,
            fps: 30,
            seed: 0,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Shape of the frames this configuration produces.
    pub fn shape(&self) -> FrameShape {
        FrameShape::new(self.width, self.height, self.channels, self.element)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.channels == 0 || self.channels > 4 {
            return Err(ConfigError::InvalidChannels(self.channels));
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    #[error("invalid channel count {0} (must be 1-4)")]
    InvalidChannels(u8),
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    #[error("history capacity must be at least 1")]
    InvalidCapacity,
    #[error("blend divisor must be finite and positive, got {0}")]
    InvalidDivisor(f64),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub exposure: ExposureConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Effect selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Effect applied to every frame.
    pub effect: Effect,
    /// Border handling for the convolution filters.
    pub border: BorderPolicy,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Run continuously (true) or process fixed number of frames (false).
    pub continuous: bool,
    /// Number of frames to process if not continuous.
    pub frame_count: u32,
    /// Print Prometheus metrics after the run.
    pub print_metrics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            frame_count: 100,
            print_metrics: false,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        self.exposure.validate()
    }
}
