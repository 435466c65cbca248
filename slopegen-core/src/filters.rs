//! Filters for the smoothness stage.
//!
//! Contents
//! - `OnePoleTpt`     : zero-delay-feedback one-pole low-pass
//! - `TwoPoleLowpass` : two `OnePoleTpt` stages in series (12 dB/oct)
//!
//! Notes
//! - Both use the "g = tan(π fc / sr)" formulation with `G = g / (1 + g)`
//!   (Zavalishin, *The Art of VA Filter Design*). The response stays stable and
//!   well behaved under per-sample cutoff modulation.
//! - Cutoffs are clamped below Nyquist before the tangent, so `g` is always finite.

use crate::dsp::{kill_denormals, tpt_g};

/// Feed-forward gain `G = g / (1 + g)` for a cutoff.
#[inline]
pub fn tpt_gain(cut_hz: f32, sr: f32) -> f32 {
    let g = tpt_g(cut_hz, sr);
    g / (1.0 + g)
}

/// TPT one-pole low-pass.
///
/// Per sample: `v = (x - s)·G`, `y = v + s`, `s' = y + v`.
#[derive(Copy, Clone, Debug, Default)]
pub struct OnePoleTpt {
    s: f32,
}

impl OnePoleTpt {
    #[inline]
    pub fn new() -> Self {
        Self { s: 0.0 }
    }

    /// Process one sample with a precomputed gain from [`tpt_gain`].
    #[inline]
    pub fn process(&mut self, x: f32, gain: f32) -> f32 {
        let v = (x - self.s) * gain;
        let y = v + self.s;
        self.s = kill_denormals(y + v);
        y
    }

    #[inline] pub fn state(&self) -> f32 { self.s }
    #[inline] pub fn reset(&mut self) { self.s = 0.0; }
}

/// Two cascaded TPT one-poles sharing one cutoff.
///
/// The gain is cached against the last cutoff so a held knob does not pay for
/// a tangent every sample.
#[derive(Copy, Clone, Debug)]
pub struct TwoPoleLowpass {
    sr: f32,
    cut: f32,
    gain: f32,
    z1: OnePoleTpt,
    z2: OnePoleTpt,
}

impl TwoPoleLowpass {
    #[inline]
    pub fn new(sr: f32) -> Self {
        Self {
            sr: sr.max(1.0),
            cut: f32::NAN,
            gain: 0.0,
            z1: OnePoleTpt::new(),
            z2: OnePoleTpt::new(),
        }
    }

    /// Change the sample rate; state is kept, the gain is recomputed lazily.
    #[inline]
    pub fn set_sample_rate(&mut self, sr: f32) {
        self.sr = sr.max(1.0);
        self.cut = f32::NAN;
    }

    #[inline] pub fn sample_rate(&self) -> f32 { self.sr }

    #[inline]
    pub fn set_cutoff_hz(&mut self, cut_hz: f32) {
        // NaN never compares equal, so the first call always computes.
        if cut_hz != self.cut {
            self.cut = cut_hz;
            self.gain = tpt_gain(cut_hz, self.sr);
        }
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y1 = self.z1.process(x, self.gain);
        self.z2.process(y1, self.gain)
    }

    /// Internal state `(z1, z2)`.
    #[inline]
    pub fn state(&self) -> (f32, f32) {
        (self.z1.state(), self.z2.state())
    }

    #[inline]
    pub fn reset(&mut self) {
        self.z1.reset();
        self.z2.reset();
    }
}

// ------------------------------------ Tests --------------------------------------
