//! One slope-generator voice.
//!
//! Per sample: gate detection → phase accumulator → phase offset → shape
//! morph → smoothness stage → clamp to `[-1, 1]`.
//!
//! Loop mode is bipolar. The envelope modes are unipolar: exactly 0 at rest,
//! 1 at the attack peak.
//!
//! The per-sample path neither allocates nor logs. Configuration changes,
//! mode changes and resets emit `tracing` debug events.

use slopegen_core::dsp::{clamp, wrap_unit};
use slopegen_core::gate::GateDetector;
use slopegen_core::phase::{PhaseAccumulator, RampMode, Stage};
use slopegen_core::shaping::{ShapeEngine, ShapeKind};
use slopegen_core::smoothness::SmoothnessProcessor;
use slopegen_core::tables::ShapeTableBank;

use crate::config::{ConfigError, EngineConfig};
use crate::diagnostics::{Diagnostics, EngineSnapshot};
use crate::params::{Frame, ParameterSource, Params};

#[derive(Clone, Debug)]
pub struct Engine {
    config: EngineConfig,
    shape: ShapeEngine<'static>,
    phase: PhaseAccumulator,
    gate: GateDetector,
    smooth: SmoothnessProcessor,
    clamp_events: u64,
}

impl Engine {
    /// Validate `config` and build a voice at rest.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(
            sample_rate = config.sample_rate,
            frequency_scale = config.frequency_scale,
            shape = ?config.shape,
            mode = ?config.initial_mode,
            "slope engine created"
        );
        Ok(Self {
            config,
            shape: shape_engine(config.shape),
            phase: PhaseAccumulator::new(config.sample_rate, config.initial_mode),
            gate: GateDetector::new(config.gate_threshold),
            smooth: SmoothnessProcessor::new(config.sample_rate),
            clamp_events: 0,
        })
    }

    #[inline] pub fn config(&self) -> &EngineConfig { &self.config }
    #[inline] pub fn mode(&self) -> RampMode { self.phase.mode() }
    #[inline] pub fn stage(&self) -> Stage { self.phase.stage() }
    #[inline] pub fn sample_rate(&self) -> f32 { self.config.sample_rate }

    /// Swap in a new configuration.
    ///
    /// Phase, stage, mode and filter state are kept; only future increments,
    /// the cutoff mapping, gate threshold and shaping strategy change. On error
    /// the engine is left untouched.
    pub fn reconfigure(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        tracing::debug!(
            sample_rate = config.sample_rate,
            frequency_scale = config.frequency_scale,
            shape = ?config.shape,
            "slope engine reconfigured"
        );
        self.phase.set_sample_rate(config.sample_rate);
        self.smooth.set_sample_rate(config.sample_rate);
        self.gate.set_threshold(config.gate_threshold);
        if config.shape != self.config.shape {
            self.shape = shape_engine(config.shape);
        }
        self.config = config;
        Ok(())
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), ConfigError> {
        self.reconfigure(self.config.with_sample_rate(sample_rate))
    }

    /// Switch timing regime.
    ///
    /// Any switch except `Loop → Loop` restarts from rest (phase 0, `Idle`).
    pub fn set_mode(&mut self, mode: RampMode) {
        tracing::debug!(from = ?self.phase.mode(), to = ?mode, "mode change");
        self.phase.set_mode(mode);
    }

    /// Phase goes to 0 at the start of the next processed sample.
    pub fn request_phase_reset(&mut self) {
        tracing::debug!("phase reset requested");
        self.phase.request_reset();
    }

    /// Back to power-on state: initial mode, phase 0, gate low, filter cleared,
    /// clamp counter zeroed. Configuration is kept.
    pub fn reinitialize(&mut self) {
        tracing::debug!(mode = ?self.config.initial_mode, "slope engine reinitialized");
        self.phase.set_mode(self.config.initial_mode);
        self.phase.reinit();
        self.gate.reset();
        self.smooth.reset();
        self.clamp_events = 0;
    }

    /// Produce one sample.
    ///
    /// `trigger` feeds the gate detector; `None` holds the previous gate level
    /// without generating edges. Parameters are clamped into their domains.
    #[inline]
    pub fn process(&mut self, params: &Params, trigger: Option<f32>) -> f32 {
        let (p, clamped) = params.sanitized(&self.config);
        if clamped {
            self.clamp_events = self.clamp_events.saturating_add(1);
        }

        let gate = match trigger {
            Some(t) => self.gate.process(t),
            None => self.gate.hold(),
        };
        let ramp = self.phase.advance(p.frequency, p.slope, gate);

        let shaped = if self.phase.mode().is_envelope() {
            if ramp.stage == Stage::Idle {
                0.0
            } else {
                self.shape.apply_envelope(ramp.value, ramp.rising, p.shape)
            }
        } else {
            let position = wrap_unit(ramp.value + f64::from(p.shift));
            let rising = position < f64::from(p.slope);
            self.shape.apply(position, rising, p.slope, p.shape)
        };

        let y = self.smooth.process(shaped, p.smoothness);
        if y.is_nan() { 0.0 } else { clamp(y, -1.0, 1.0) }
    }

    /// Apply a frame's requests (mode switch, reset), then process it.
    ///
    /// A frame mode equal to the current one is ignored, so sources may
    /// repeat it every sample.
    #[inline]
    pub fn process_frame(&mut self, frame: Frame) -> f32 {
        if let Some(mode) = frame.mode {
            if mode != self.phase.mode() {
                self.set_mode(mode);
            }
        }
        if frame.reset {
            self.phase.request_reset();
        }
        self.process(&frame.params, frame.trigger)
    }

    /// Fill `out`, pulling one frame per sample from `source`.
    pub fn render<S: ParameterSource + ?Sized>(&mut self, source: &mut S, out: &mut [f32]) {
        for y in out.iter_mut() {
            *y = self.process_frame(source.next_frame());
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            sample_rate: self.config.sample_rate,
            mode: self.phase.mode(),
            stage: self.phase.stage(),
            phase: self.phase.phase(),
            gate_high: self.gate.is_high(),
            reset_pending: self.phase.reset_pending(),
            clamp_events: self.clamp_events,
        }
    }

    /// Hand the current snapshot to a diagnostics sink.
    pub fn report<D: Diagnostics + ?Sized>(&self, sink: &mut D) {
        sink.report(&self.snapshot());
    }

    /// Filter state `(z1, z2)` of the smoothness stage.
    #[inline]
    pub fn filter_state(&self) -> (f32, f32) {
        self.smooth.filter_state()
    }

    #[inline]
    pub fn shape_kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Morph value at which the current strategy yields the plain ramp.
    #[inline]
    pub fn identity_shape(&self) -> f32 {
        self.shape.identity_morph()
    }
}

fn shape_engine(kind: ShapeKind) -> ShapeEngine<'static> {
    ShapeEngine::from_kind(kind, ShapeTableBank::shared())
}
