//! Smoothness post-processor: low-pass below the midpoint, wavefolder above.
//!
//! | smoothness `k` | effect                                                      |
//! |----------------|-------------------------------------------------------------|
//! | `< 0.5`        | two-pole low-pass, cutoff `20 Hz · 1000^(2k)` (bypass if `2k < 0.01`) |
//! | `== 0.5`       | identity                                                    |
//! | `> 0.5`        | gain `1 + 8·(2k - 1)` then triangle fold into `[-1, 1]`      |
//!
//! Both sides approach the dry signal at the midpoint: the cutoff runs up to
//! 20 kHz and the fold gain down to 1.

use crate::dsp::{exp_sweep, sanitize, triangle_fold};
use crate::filters::TwoPoleLowpass;

/// Lowest filter cutoff (Hz), at `k → 0`.
pub const MIN_CUTOFF_HZ: f32 = 20.0;
/// Cutoff ratio across the filter half (20 Hz → 20 kHz).
pub const CUTOFF_RATIO: f32 = 1000.0;
/// Cutoff fraction below which the filter is skipped.
pub const FILTER_BYPASS_BELOW: f32 = 0.01;
/// Extra fold gain at `k = 1`.
pub const MAX_FOLD_GAIN: f32 = 8.0;

/// Effect chosen for one smoothness value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SmoothMode {
    Bypass,
    Filter { cutoff_hz: f32 },
    Fold { gain: f32 },
}

impl SmoothMode {
    /// Map a smoothness value (clamped to `[0, 1]`, NaN → 0) to its effect.
    #[inline]
    pub fn resolve(smoothness: f32) -> Self {
        let k = sanitize(smoothness, 0.0, 1.0);
        if k < 0.5 {
            let c = k * 2.0;
            if c < FILTER_BYPASS_BELOW {
                SmoothMode::Bypass
            } else {
                SmoothMode::Filter { cutoff_hz: exp_sweep(MIN_CUTOFF_HZ, CUTOFF_RATIO, c) }
            }
        } else if k > 0.5 {
            let f = (k - 0.5) * 2.0;
            SmoothMode::Fold { gain: 1.0 + f * MAX_FOLD_GAIN }
        } else {
            SmoothMode::Bypass
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SmoothnessProcessor {
    lp: TwoPoleLowpass,
}

impl SmoothnessProcessor {
    #[inline]
    pub fn new(sr: f32) -> Self {
        Self { lp: TwoPoleLowpass::new(sr) }
    }

    #[inline] pub fn set_sample_rate(&mut self, sr: f32) { self.lp.set_sample_rate(sr); }

    /// Filter state `(z1, z2)`.
    #[inline] pub fn filter_state(&self) -> (f32, f32) { self.lp.state() }

    /// Clear filter state.
    #[inline] pub fn reset(&mut self) { self.lp.reset(); }

    /// Post-process one bipolar sample.
    ///
    /// Filter state only moves while the filter is engaged; bypassed and
    /// folded samples leave it where it was.
    #[inline]
    pub fn process(&mut self, x: f32, smoothness: f32) -> f32 {
        match SmoothMode::resolve(smoothness) {
            SmoothMode::Bypass => x,
            SmoothMode::Filter { cutoff_hz } => {
                self.lp.set_cutoff_hz(cutoff_hz);
                self.lp.process(x)
            }
            SmoothMode::Fold { gain } => triangle_fold(x * gain),
        }
    }
}
