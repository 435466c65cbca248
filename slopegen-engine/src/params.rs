//! Per-sample parameters and the provider trait that feeds them.
//!
//! The host decides where each value comes from (a live signal, a held knob,
//! a sequencer); the engine only ever sees one resolved [`Frame`] per sample.

use slopegen_core::dsp::sanitize;
use slopegen_core::phase::RampMode;

use crate::config::EngineConfig;

/// Resolved parameter values for one sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Params {
    /// Hz, before the frequency scale.
    pub frequency: f64,
    /// Attack fraction of the cycle, kept inside the configured slope limits.
    pub slope: f32,
    /// Shape morph in `[0, 1]`.
    pub shape: f32,
    /// Smoothness in `[0, 1]`; 0.5 is dry.
    pub smoothness: f32,
    /// Phase offset in cycles, `[0, 1]`.
    pub shift: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self { frequency: 1.0, slope: 0.5, shape: 0.0, smoothness: 0.5, shift: 0.0 }
    }
}

impl Params {
    #[must_use]
    pub fn with_frequency(mut self, hz: f64) -> Self { self.frequency = hz; self }
    #[must_use]
    pub fn with_slope(mut self, slope: f32) -> Self { self.slope = slope; self }
    #[must_use]
    pub fn with_shape(mut self, shape: f32) -> Self { self.shape = shape; self }
    #[must_use]
    pub fn with_smoothness(mut self, smoothness: f32) -> Self { self.smoothness = smoothness; self }
    #[must_use]
    pub fn with_shift(mut self, shift: f32) -> Self { self.shift = shift; self }

    /// Clamp every field into its domain.
    ///
    /// Frequency is clamped to the configured range and then multiplied by the
    /// frequency scale. NaN goes to the lower bound, infinities to the matching
    /// one. The flag is true when any field had to move.
    pub fn sanitized(&self, cfg: &EngineConfig) -> (Params, bool) {
        let frequency = sanitize(self.frequency, cfg.min_frequency, cfg.max_frequency);
        let slope = sanitize(self.slope, cfg.slope_min, cfg.slope_max);
        let shape = sanitize(self.shape, 0.0, 1.0);
        let smoothness = sanitize(self.smoothness, 0.0, 1.0);
        let shift = sanitize(self.shift, 0.0, 1.0);

        // NaN != NaN, so non-finite input always counts as clamped
        #[allow(clippy::float_cmp)]
        let clamped = frequency != self.frequency
            || slope != self.slope
            || shape != self.shape
            || smoothness != self.smoothness
            || shift != self.shift;

        let out = Params {
            frequency: frequency * cfg.frequency_scale,
            slope,
            shape,
            smoothness,
            shift,
        };
        (out, clamped)
    }
}

/// Everything the engine consumes for one sample.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub params: Params,
    /// Gate/trigger sample; `None` keeps the last gate level with no edges.
    pub trigger: Option<f32>,
    /// Reset the phase to 0 on this sample.
    pub reset: bool,
    /// Switch to this mode before processing the sample (ignored if already active).
    pub mode: Option<RampMode>,
}

impl Frame {
    pub fn new(params: Params) -> Self {
        Self { params, ..Self::default() }
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: f32) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn with_reset(mut self) -> Self {
        self.reset = true;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RampMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

impl From<Params> for Frame {
    fn from(params: Params) -> Self {
        Frame::new(params)
    }
}

/// Supplies one [`Frame`] per sample.
pub trait ParameterSource {
    fn next_frame(&mut self) -> Frame;
}

/// A fixed frame. Reset and mode requests fire on the first sample only.
impl ParameterSource for Frame {
    #[inline]
    fn next_frame(&mut self) -> Frame {
        let frame = *self;
        self.reset = false;
        self.mode = None;
        frame
    }
}

/// Fixed parameters with no trigger.
impl ParameterSource for Params {
    #[inline]
    fn next_frame(&mut self) -> Frame {
        Frame::new(*self)
    }
}

impl<F> ParameterSource for F
where
    F: FnMut() -> Frame,
{
    #[inline]
    fn next_frame(&mut self) -> Frame {
        self()
    }
}
