//! Engine configuration: set at construction, rarely changed afterwards.

use slopegen_core::gate::DEFAULT_GATE_THRESHOLD;
use slopegen_core::phase::{RampMode, SLOPE_MAX, SLOPE_MIN};
use slopegen_core::shaping::ShapeKind;
use thiserror::Error;

/// Default frequency range in Hz, applied before the frequency scale.
pub const DEFAULT_MIN_FREQUENCY: f64 = 1.0e-6;
pub const DEFAULT_MAX_FREQUENCY: f64 = 1000.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("sample rate must be positive and finite, got {0}")]
    SampleRate(f32),
    #[error("frequency scale must be positive and finite, got {0}")]
    FrequencyScale(f64),
    #[error("frequency range [{min}, {max}] is empty or not finite")]
    FrequencyRange { min: f64, max: f64 },
    #[error("slope limits [{min}, {max}] must satisfy 0.001 <= min <= max <= 0.999")]
    SlopeLimits { min: f32, max: f32 },
    #[error("gate threshold must be finite, got {0}")]
    GateThreshold(f32),
}

/// Static voice settings.
///
/// Build with [`EngineConfig::new`] or [`Default`], adjust with the `with_*`
/// methods, then hand to [`crate::Engine::new`], which validates it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Multiplies the clamped frequency; values below 1 stretch cycles out to
    /// days or years.
    pub frequency_scale: f64,
    pub min_frequency: f64,
    pub max_frequency: f64,
    pub slope_min: f32,
    pub slope_max: f32,
    pub gate_threshold: f32,
    pub shape: ShapeKind,
    pub initial_mode: RampMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            frequency_scale: 1.0,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            slope_min: SLOPE_MIN,
            slope_max: SLOPE_MAX,
            gate_threshold: DEFAULT_GATE_THRESHOLD,
            shape: ShapeKind::Table,
            initial_mode: RampMode::Loop,
        }
    }
}

impl EngineConfig {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate, ..Self::default() }
    }

    #[must_use]
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    #[must_use]
    pub fn with_frequency_scale(mut self, scale: f64) -> Self {
        self.frequency_scale = scale;
        self
    }

    #[must_use]
    pub fn with_frequency_range(mut self, min: f64, max: f64) -> Self {
        self.min_frequency = min;
        self.max_frequency = max;
        self
    }

    #[must_use]
    pub fn with_slope_limits(mut self, min: f32, max: f32) -> Self {
        self.slope_min = min;
        self.slope_max = max;
        self
    }

    #[must_use]
    pub fn with_gate_threshold(mut self, threshold: f32) -> Self {
        self.gate_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_shape(mut self, shape: ShapeKind) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RampMode) -> Self {
        self.initial_mode = mode;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::SampleRate(self.sample_rate));
        }
        if !(self.frequency_scale.is_finite() && self.frequency_scale > 0.0) {
            return Err(ConfigError::FrequencyScale(self.frequency_scale));
        }
        let (min, max) = (self.min_frequency, self.max_frequency);
        if !(min.is_finite() && max.is_finite() && min >= 0.0 && min <= max) {
            return Err(ConfigError::FrequencyRange { min, max });
        }
        let (min, max) = (self.slope_min, self.slope_max);
        if !(min >= SLOPE_MIN && min <= max && max <= SLOPE_MAX) {
            return Err(ConfigError::SlopeLimits { min, max });
        }
        if !self.gate_threshold.is_finite() {
            return Err(ConfigError::GateThreshold(self.gate_threshold));
        }
        Ok(())
    }
}
