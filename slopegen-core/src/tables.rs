//! Precomputed curve tables for the shape-morph engine.
//!
//! Five canonical rising curves, each sampled at [`TABLE_SIZE`] points over
//! `p ∈ [0, 1]` (both ends included):
//!
//! | id | curve         | formula                          |
//! |----|---------------|----------------------------------|
//! | 0  | `Linear`      | `p`                              |
//! | 1  | `Exponential` | `(1 - e^(-5p)) / (1 - e^(-5))`   |
//! | 2  | `Logarithmic` | `log(1 + 9p) / log(10)`          |
//! | 3  | `Sine`        | `sin(p·π/2)`                     |
//! | 4  | `ArcSine`     | `asin(p) / (π/2)`, `1` at `p = 1`|
//!
//! The bank is read-only after construction. With `std`, [`ShapeTableBank::shared`]
//! hands out one process-wide instance so every voice reads the same tables.

use crate::dsp::{fast_sin, lerp, m_asin, m_exp, m_ln, sanitize, HALF_PI};

/// Samples per curve.
pub const TABLE_SIZE: usize = 1024;

/// Curve family identifiers, in morph order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Curve {
    Linear = 0,
    Exponential = 1,
    Logarithmic = 2,
    Sine = 3,
    ArcSine = 4,
}

impl Curve {
    pub const COUNT: usize = 5;

    pub const ALL: [Curve; Curve::COUNT] = [
        Curve::Linear,
        Curve::Exponential,
        Curve::Logarithmic,
        Curve::Sine,
        Curve::ArcSine,
    ];

    /// Curve for a morph slot; indices past the end clamp to the last curve.
    #[inline]
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i.min(Self::COUNT - 1)]
    }

    /// Exact (un-tabulated) value of the curve at `p ∈ [0, 1]`.
    pub fn eval(self, p: f32) -> f32 {
        let p = sanitize(p, 0.0, 1.0);
        match self {
            Curve::Linear => p,
            Curve::Exponential => (1.0 - m_exp(-5.0 * p)) / (1.0 - m_exp(-5.0)),
            Curve::Logarithmic => m_ln(1.0 + 9.0 * p) / core::f32::consts::LN_10,
            Curve::Sine => fast_sin(p * HALF_PI),
            Curve::ArcSine => {
                if p < 1.0 { m_asin(p) / HALF_PI } else { 1.0 }
            }
        }
    }
}

/// Lookup tables for all curves.
#[derive(Clone)]
pub struct ShapeTableBank {
    tables: [[f32; TABLE_SIZE]; Curve::COUNT],
}

impl core::fmt::Debug for ShapeTableBank {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShapeTableBank")
            .field("curves", &Curve::COUNT)
            .field("size", &TABLE_SIZE)
            .finish()
    }
}

impl Default for ShapeTableBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTableBank {
    /// Build every table. Runs once per bank; not meant for the audio thread.
    pub fn new() -> Self {
        let mut tables = [[0.0_f32; TABLE_SIZE]; Curve::COUNT];
        let last = (TABLE_SIZE - 1) as f32;
        for curve in Curve::ALL {
            let t = &mut tables[curve as usize];
            for (i, slot) in t.iter_mut().enumerate() {
                *slot = curve.eval(i as f32 / last);
            }
            // Pin the end points so every curve meets the legs exactly.
            t[0] = 0.0;
            t[TABLE_SIZE - 1] = 1.0;
        }
        Self { tables }
    }

    /// Process-wide bank, built on first use.
    #[cfg(feature = "std")]
    pub fn shared() -> &'static ShapeTableBank {
        static BANK: std::sync::OnceLock<ShapeTableBank> = std::sync::OnceLock::new();
        BANK.get_or_init(ShapeTableBank::new)
    }

    /// Interpolated value of `curve` at `p ∈ [0, 1]` (clamped).
    #[inline]
    pub fn lookup(&self, curve: Curve, p: f32) -> f32 {
        let t = &self.tables[curve as usize];
        let pos = sanitize(p, 0.0, 1.0) * (TABLE_SIZE - 1) as f32;
        // truncation is floor here, pos >= 0
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut i = pos as usize;
        let mut frac = pos - i as f32;
        if i >= TABLE_SIZE - 1 {
            i = TABLE_SIZE - 1;
            frac = 0.0;
        }
        if frac == 0.0 {
            t[i]
        } else {
            lerp(t[i], t[i + 1], frac)
        }
    }

    /// Raw samples of one curve.
    #[inline]
    pub fn table(&self, curve: Curve) -> &[f32; TABLE_SIZE] {
        &self.tables[curve as usize]
    }
}
