//! Phase accumulator with asymmetric slope and the three timing modes.
//!
//! - `Loop`          : free-running cycle, phase in `[0, 1)`
//! - `AttackDecay`   : one-shot envelope, runs to completion once triggered
//! - `AttackRelease` : gated envelope, holds at the peak while the gate is high
//!
//! The phase is kept in `f64` so sub-Hz (down to multi-year) rates still move
//! the accumulator by a representable amount every sample.
//!
//! Each call to [`PhaseAccumulator::advance`] reports the phase *before* it is
//! moved, so a freshly reset or freshly triggered voice starts exactly at 0.

use crate::dsp::{sanitize, wrap_unit};
use crate::gate::GateFlags;

/// Increment ceiling in cycles per sample (Nyquist).
pub const MAX_INCREMENT: f64 = 0.5;

/// Slope clamp used when a caller hands in a value at or past the singularities.
pub const SLOPE_MIN: f32 = 0.001;
pub const SLOPE_MAX: f32 = 0.999;

/// Timing regime.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RampMode {
    /// Free-running LFO.
    #[default]
    Loop,
    /// One-shot attack/decay envelope.
    AttackDecay,
    /// Gated attack/sustain/release envelope.
    AttackRelease,
}

impl RampMode {
    #[inline]
    pub fn is_envelope(self) -> bool {
        !matches!(self, RampMode::Loop)
    }
}

/// Envelope stage. Only meaningful outside `Loop`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Stage {
    #[default]
    Idle,
    Attack,
    DecayOrRelease,
}

/// One accumulator step.
///
/// In `Loop` mode `value` is the cycle position in `[0, 1)` and `rising` tells
/// whether it falls in the attack leg. In the envelope modes `value` is the
/// envelope level in `[0, 1]` and `rising` is true while attacking. `stage` is
/// the stage the value was produced in; in `Loop` it names the current leg.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ramp {
    pub value: f64,
    pub rising: bool,
    pub stage: Stage,
}

impl Ramp {
    pub const IDLE: Self = Self { value: 0.0, rising: false, stage: Stage::Idle };
}

#[derive(Copy, Clone, Debug)]
pub struct PhaseAccumulator {
    sr: f64,
    phase: f64,
    mode: RampMode,
    stage: Stage,
    reset_pending: bool,
}

impl PhaseAccumulator {
    #[inline]
    pub fn new(sr: f32, mode: RampMode) -> Self {
        Self {
            sr: f64::from(sr).max(1.0),
            phase: 0.0,
            mode,
            stage: Stage::Idle,
            reset_pending: false,
        }
    }

    /// Change the sample rate. Phase is kept; only future increments change.
    #[inline]
    pub fn set_sample_rate(&mut self, sr: f32) {
        self.sr = f64::from(sr).max(1.0);
    }

    #[inline] pub fn sample_rate(&self) -> f32 { self.sr as f32 }
    #[inline] pub fn mode(&self) -> RampMode { self.mode }
    #[inline] pub fn stage(&self) -> Stage { self.stage }
    #[inline] pub fn phase(&self) -> f64 { self.phase }
    #[inline] pub fn reset_pending(&self) -> bool { self.reset_pending }

    /// Switch timing regime.
    ///
    /// Anything other than a `Loop → Loop` push drops back to `Idle` at phase 0,
    /// so envelopes always start from rest and a running loop is not disturbed
    /// by repeated mode messages.
    #[inline]
    pub fn set_mode(&mut self, mode: RampMode) {
        if mode != RampMode::Loop || mode != self.mode {
            self.stage = Stage::Idle;
            self.phase = 0.0;
        }
        self.mode = mode;
    }

    /// Force phase to 0 at the start of the next `advance`.
    #[inline]
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    /// Back to power-on state, keeping mode and sample rate.
    #[inline]
    pub fn reinit(&mut self) {
        self.phase = 0.0;
        self.stage = Stage::Idle;
        self.reset_pending = false;
    }

    /// Phase increment in cycles per sample for `frequency_hz`, clamped to `[0, 0.5]`.
    #[inline]
    pub fn increment(&self, frequency_hz: f64) -> f64 {
        sanitize(frequency_hz / self.sr, 0.0, MAX_INCREMENT)
    }

    /// Move the accumulator by one sample.
    ///
    /// `slope` is the attack fraction; it is clamped into
    /// `[SLOPE_MIN, SLOPE_MAX]` here as a last line before the divisions.
    pub fn advance(&mut self, frequency_hz: f64, slope: f32, gate: GateFlags) -> Ramp {
        if self.reset_pending {
            self.phase = 0.0;
            self.reset_pending = false;
        }

        let inc = self.increment(frequency_hz);
        let slope = f64::from(sanitize(slope, SLOPE_MIN, SLOPE_MAX));

        match self.mode {
            RampMode::Loop => {
                let position = self.phase;
                self.phase = wrap_unit(self.phase + inc);
                let rising = position < slope;
                let stage = if rising { Stage::Attack } else { Stage::DecayOrRelease };
                Ramp { value: position, rising, stage }
            }
            RampMode::AttackDecay => {
                if gate.rising {
                    self.start_attack();
                }
                self.step_envelope(inc, slope, false)
            }
            RampMode::AttackRelease => {
                if gate.rising {
                    self.start_attack();
                }
                if self.stage == Stage::Attack && !gate.high {
                    self.stage = Stage::DecayOrRelease;
                }
                self.step_envelope(inc, slope, true)
            }
        }
    }

    #[inline]
    fn start_attack(&mut self) {
        self.stage = Stage::Attack;
        self.phase = 0.0;
    }

    /// One envelope step. With `hold`, the attack parks at 1 instead of
    /// rolling into the decay leg.
    fn step_envelope(&mut self, inc: f64, slope: f64, hold: bool) -> Ramp {
        let level = self.phase;
        let stage = self.stage;
        match stage {
            Stage::Idle => {
                self.phase = 0.0;
                return Ramp::IDLE;
            }
            Stage::Attack => {
                self.phase += inc / slope;
                if self.phase >= 1.0 {
                    self.phase = 1.0;
                    if !hold {
                        self.stage = Stage::DecayOrRelease;
                    }
                }
            }
            Stage::DecayOrRelease => {
                self.phase -= inc / (1.0 - slope);
                if self.phase <= 0.0 {
                    self.phase = 0.0;
                    self.stage = Stage::Idle;
                }
            }
        }
        Ramp { value: level, rising: stage == Stage::Attack, stage }
    }
}
