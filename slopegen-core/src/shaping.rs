//! Shape-morph engine: ramp position + slope + morph → shaped sample.
//!
//! Two interchangeable strategies sit behind one [`ShapeEngine`]:
//! - [`ShapeStrategy::Table`]      : blends the five curves of a [`ShapeTableBank`];
//!   identity (plain ramp) at morph `0`.
//! - [`ShapeStrategy::PowerCurve`] : closed-form `n^(1+c)` / `1-(1-n)^(1+c)`;
//!   identity at morph `0.5`, exponential below, logarithmic above.
//!
//! Both are continuous in morph and position and monotonic within each leg.
//! The falling leg mirrors the rising one around the peak.

use num_traits::float::FloatCore;

use crate::dsp::{lerp, m_powf, sanitize};
use crate::tables::{Curve, ShapeTableBank};

/// Extra exponent at the ends of the power-curve morph range.
pub const POWER_CURVE_DEPTH: f32 = 2.0;

/// Strategy selector without the table borrow, for configs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    #[default]
    Table,
    PowerCurve,
}

#[derive(Copy, Clone, Debug)]
pub enum ShapeStrategy<'a> {
    Table(&'a ShapeTableBank),
    PowerCurve,
}

#[derive(Copy, Clone, Debug)]
pub struct ShapeEngine<'a> {
    strategy: ShapeStrategy<'a>,
}

impl<'a> ShapeEngine<'a> {
    #[inline]
    pub fn new(strategy: ShapeStrategy<'a>) -> Self {
        Self { strategy }
    }

    /// Build from a [`ShapeKind`]; `bank` is only read by the table strategy.
    #[inline]
    pub fn from_kind(kind: ShapeKind, bank: &'a ShapeTableBank) -> Self {
        match kind {
            ShapeKind::Table => Self::new(ShapeStrategy::Table(bank)),
            ShapeKind::PowerCurve => Self::new(ShapeStrategy::PowerCurve),
        }
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self.strategy {
            ShapeStrategy::Table(_) => ShapeKind::Table,
            ShapeStrategy::PowerCurve => ShapeKind::PowerCurve,
        }
    }

    /// Morph value at which the output is the plain ramp.
    #[inline]
    pub fn identity_morph(&self) -> f32 {
        match self.strategy {
            ShapeStrategy::Table(_) => 0.0,
            ShapeStrategy::PowerCurve => 0.5,
        }
    }

    /// Rising-oriented curve value for sub-phase `n ∈ [0, 1]`, in `[0, 1]`.
    #[inline]
    pub fn curve(&self, n: f32, morph: f32) -> f32 {
        let n = sanitize(n, 0.0, 1.0);
        let morph = sanitize(morph, 0.0, 1.0);
        match self.strategy {
            ShapeStrategy::Table(bank) => {
                let idx = morph * (Curve::COUNT - 1) as f32;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let a = idx as usize;
                let b = (a + 1).min(Curve::COUNT - 1);
                let mix = idx - a as f32;
                let va = bank.lookup(Curve::from_index(a), n);
                if mix == 0.0 {
                    va
                } else {
                    lerp(va, bank.lookup(Curve::from_index(b), n), mix)
                }
            }
            ShapeStrategy::PowerCurve => {
                let c = (morph - 0.5) * 2.0;
                let k = 1.0 + FloatCore::abs(c) * POWER_CURVE_DEPTH;
                if c < 0.0 {
                    m_powf(n, k)
                } else if c > 0.0 {
                    1.0 - m_powf(1.0 - n, k)
                } else {
                    n
                }
            }
        }
    }

    /// Unipolar leg value: `v` on the rising leg, `1 - v` on the falling leg,
    /// where `v = curve(n)` and `n` runs 0 → 1 along the leg.
    #[inline]
    pub fn leg(&self, n: f32, rising: bool, morph: f32) -> f32 {
        let v = self.curve(n, morph);
        if rising { v } else { 1.0 - v }
    }

    /// Bipolar sample for a loop cycle position.
    ///
    /// `position ∈ [0, 1)` is split at `slope` into the two legs, each
    /// normalized to its own `[0, 1]` sub-phase.
    #[inline]
    pub fn apply(&self, position: f64, rising: bool, slope: f32, morph: f32) -> f32 {
        let s = f64::from(slope);
        let n = if rising { position / s } else { (position - s) / (1.0 - s) };
        #[allow(clippy::cast_possible_truncation)]
        let n = sanitize(n, 0.0, 1.0) as f32;
        2.0 * self.leg(n, rising, morph) - 1.0
    }

    /// Unipolar sample for an envelope level `∈ [0, 1]`.
    ///
    /// The attack leg reads the curve at the level directly; the decay leg
    /// reads it mirrored so both legs bend the same way around the peak.
    #[inline]
    pub fn apply_envelope(&self, level: f64, rising: bool, morph: f32) -> f32 {
        #[allow(clippy::cast_possible_truncation)]
        let level = sanitize(level, 0.0, 1.0) as f32;
        let n = if rising { level } else { 1.0 - level };
        self.leg(n, rising, morph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engines(bank: &ShapeTableBank) -> [ShapeEngine<'_>; 2] {
        [
            ShapeEngine::from_kind(ShapeKind::Table, bank),
            ShapeEngine::from_kind(ShapeKind::PowerCurve, bank),
        ]
    }

    #[test]
    fn identity_morph_gives_plain_triangle() {
        let bank = ShapeTableBank::new();
        for eng in engines(&bank) {
            let m = eng.identity_morph();
            for slope in [0.1_f32, 0.5, 0.9] {
                for k in 0..1000 {
                    let pos = f64::from(k) / 1000.0;
                    let rising = pos < f64::from(slope);
                    let want = if rising {
                        2.0 * pos / f64::from(slope) - 1.0
                    } else {
                        2.0 * (1.0 - (pos - f64::from(slope)) / (1.0 - f64::from(slope))) - 1.0
                    };
                    let got = eng.apply(pos, rising, slope, m);
                    assert!((f64::from(got) - want).abs() < 1e-4, "{:?} slope={slope} pos={pos}", eng.kind());
                }
            }
        }
    }

    #[test]
    fn legs_meet_at_peak_and_trough() {
        let bank = ShapeTableBank::new();
        for eng in engines(&bank) {
            for morph in [0.0, 0.13, 0.5, 0.77, 1.0] {
                assert!((eng.leg(1.0, true, morph) - 1.0).abs() < 1e-6);
                assert!((eng.leg(0.0, false, morph) - 1.0).abs() < 1e-6);
                assert!(eng.leg(0.0, true, morph).abs() < 1e-6);
                assert!(eng.leg(1.0, false, morph).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn legs_are_monotonic() {
        let bank = ShapeTableBank::new();
        for eng in engines(&bank) {
            for morph in [0.0, 0.2, 0.375, 0.5, 0.6, 0.9, 1.0] {
                let mut prev_up = -1.0;
                let mut prev_down = 2.0;
                for k in 0..=500 {
                    let n = k as f32 / 500.0;
                    let up = eng.leg(n, true, morph);
                    let down = eng.leg(n, false, morph);
                    assert!(up >= prev_up - 1e-6, "{:?} morph={morph} n={n}", eng.kind());
                    assert!(down <= prev_down + 1e-6, "{:?} morph={morph} n={n}", eng.kind());
                    prev_up = up;
                    prev_down = down;
                }
            }
        }
    }

    #[test]
    fn morph_is_continuous() {
        let bank = ShapeTableBank::new();
        for eng in engines(&bank) {
            for k in 0..=100 {
                let n = k as f32 / 100.0;
                let mut m = 0.0_f32;
                while m < 1.0 {
                    let a = eng.curve(n, m);
                    let b = eng.curve(n, m + 1e-3);
                    assert!((a - b).abs() < 2e-2, "{:?} n={n} m={m}", eng.kind());
                    m += 1e-3;
                }
            }
        }
    }

    #[test]
    fn table_morph_hits_each_curve_exactly() {
        let bank = ShapeTableBank::new();
        let eng = ShapeEngine::new(ShapeStrategy::Table(&bank));
        for (i, c) in Curve::ALL.iter().enumerate() {
            let m = i as f32 / 4.0;
            assert_eq!(eng.curve(0.3, m), bank.lookup(*c, 0.3));
        }
    }

    #[test]
    fn power_curve_bends_both_ways() {
        let eng = ShapeEngine::new(ShapeStrategy::PowerCurve);
        assert!(eng.curve(0.5, 0.0) < 0.5);
        assert!(eng.curve(0.5, 1.0) > 0.5);
        assert!((eng.curve(0.5, 0.0) - 0.125).abs() < 1e-6);
    }

    #[test]
    fn envelope_runs_zero_to_one_and_back() {
        let bank = ShapeTableBank::new();
        for eng in engines(&bank) {
            for morph in [0.0, 0.5, 1.0] {
                assert!(eng.apply_envelope(0.0, true, morph).abs() < 1e-6);
                assert!((eng.apply_envelope(1.0, true, morph) - 1.0).abs() < 1e-6);
                assert!((eng.apply_envelope(1.0, false, morph) - 1.0).abs() < 1e-6);
                assert!(eng.apply_envelope(0.0, false, morph).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let bank = ShapeTableBank::new();
        for eng in engines(&bank) {
            for x in [f32::NAN, -4.0, 4.0, f32::INFINITY] {
                let y = eng.apply(0.25, true, 0.5, x);
                assert!((-1.0..=1.0).contains(&y));
                let y = eng.apply(f64::NAN, false, 0.5, 0.3);
                assert!((-1.0..=1.0).contains(&y));
            }
        }
    }
}
