//! Generic DSP utilities and math helpers.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Optional `fast-math` approximations for the non-hot paths (table build, cutoff map)
//! - Clean, side-effect free helpers that are easy to test
//!
//! Conventions:
//! - All functions are `#[inline]` where useful to help the optimizer.
//! - Generic helpers take `FloatCore` so the same code serves the `f64` phase
//!   and the `f32` signal path without pulling in `std`.

#![allow(clippy::excessive_precision)]

use core::f32::consts::PI;

use cfg_if::cfg_if;
use num_traits::float::FloatCore;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // micromath preferred if explicitly requested (works in no_std)
    if #[cfg(feature = "micromath")] {
        use micromath::F32Ext as _;
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { x.sin() }
        #[inline] pub(crate) fn m_cos(x: f32) -> f32 { x.cos() }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { x.exp() }
        #[inline] pub(crate) fn m_ln(x: f32) -> f32 { x.ln() }
        #[inline] pub(crate) fn m_asin(x: f32) -> f32 { x.asin() }
        #[inline] pub(crate) fn m_powf(x: f32, y: f32) -> f32 { x.powf(y) }
        #[inline] pub(crate) fn m_tan(x: f32) -> f32 { (x.sin()) / (x.cos()) }
    // libm (C math) in no_std
    } else if #[cfg(feature = "no-std")] {
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { libm::sinf(x) }
        #[inline] pub(crate) fn m_cos(x: f32) -> f32 { libm::cosf(x) }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { libm::expf(x) }
        #[inline] pub(crate) fn m_ln(x: f32) -> f32 { libm::logf(x) }
        #[inline] pub(crate) fn m_asin(x: f32) -> f32 { libm::asinf(x) }
        #[inline] pub(crate) fn m_powf(x: f32, y: f32) -> f32 { libm::powf(x, y) }
        #[inline] pub(crate) fn m_tan(x: f32) -> f32 { libm::tanf(x) }
    // std backend
    } else {
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { x.sin() }
        #[inline] pub(crate) fn m_cos(x: f32) -> f32 { x.cos() }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { x.exp() }
        #[inline] pub(crate) fn m_ln(x: f32) -> f32 { x.ln() }
        #[inline] pub(crate) fn m_asin(x: f32) -> f32 { x.asin() }
        #[inline] pub(crate) fn m_powf(x: f32, y: f32) -> f32 { x.powf(y) }
        #[inline] pub(crate) fn m_tan(x: f32) -> f32 { x.tan() }
    }
}

// --------------------------------- Constants -------------------------------------

/// 2π (commonly useful)
pub const TAU: f32 = 2.0 * PI;

/// π/2, the sine and arc-sine curve scale.
pub const HALF_PI: f32 = 0.5 * PI;

/// A very small epsilon used in denormal handling and safe divisions.
pub const EPS_SMALL: f32 = 1.0e-20;

/// Highest usable cutoff as a fraction of the sample rate.
pub const NYQUIST_FRACTION: f32 = 0.499;

// --------------------------------- Utilities -------------------------------------

/// Clamp `x` into `[lo, hi]`. NaN passes through; use [`sanitize`] for untrusted input.
#[inline]
pub fn clamp<T: FloatCore>(x: T, lo: T, hi: T) -> T {
    if x < lo { lo } else if x > hi { hi } else { x }
}

/// Clamp an untrusted value into `[lo, hi]`, mapping NaN to `lo`.
///
/// Infinities land on the matching boundary, so the result is always finite
/// whenever the bounds are.
#[inline]
pub fn sanitize<T: FloatCore>(x: T, lo: T, hi: T) -> T {
    if x.is_nan() { lo } else { clamp(x, lo, hi) }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap a phase into [0, 1).
#[inline]
pub fn wrap_unit<T: FloatCore>(p: T) -> T {
    let w = p - p.floor();
    // `p - floor(p)` can round up to exactly 1 for tiny negative inputs.
    if w >= T::one() { w - T::one() } else { w }
}

/// Kill denormal/subnormal values. Returns 0.0 if |x| < EPS_SMALL.
#[inline]
pub fn kill_denormals(x: f32) -> f32 {
    if FloatCore::abs(x) < EPS_SMALL { 0.0 } else { x }
}

// --------------------------------- Nonlinearities --------------------------------

/// Triangle fold into [-1, 1].
///
/// Equivalent to reflecting at the ±1 boundaries until the value is in range
/// (`v > 1 → 2 - v`, `v < -1 → -2 - v`), but closed-form so the cost does not
/// depend on the input magnitude.
#[inline]
pub fn triangle_fold(x: f32) -> f32 {
    if !x.is_finite() {
        return 0.0;
    }
    if (-1.0..=1.0).contains(&x) {
        return x;
    }
    // period 4, shifted so that [-1, 1] maps onto the rising segment [0, 2]
    let t = x + 1.0;
    let t = t - 4.0 * FloatCore::floor(t * 0.25);
    if t <= 2.0 { t - 1.0 } else { 3.0 - t }
}

// --------------------------------- Fast trig -------------------------------------

/// Fast sine with range reduction into [-π, π] and 5th-order minimax-style poly.
/// Max abs error ~1e-3 when `fast-math` is enabled; falls back to exact otherwise.
#[inline]
pub fn fast_sin(x: f32) -> f32 {
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            let mut xr = x;
            let k = FloatCore::round(xr / TAU);
            xr -= k * TAU;

            // 5th-order odd polynomial: sin(x) ≈ x * (a + b x^2 + c x^4)
            let x2 = xr * xr;
            xr * (0.999_979_313_3 + x2 * (-0.166_624_432_0 + x2 * 0.008_308_978_98))
        } else {
            m_sin(x)
        }
    }
}

#[inline]
pub fn fast_cos(x: f32) -> f32 {
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            // cos(x) = sin(x + π/2)
            fast_sin(x + HALF_PI)
        } else {
            m_cos(x)
        }
    }
}

// --------------------------------- Filter coefficients ---------------------------

/// Clamp a cutoff to `[0, NYQUIST_FRACTION * sr]`.
#[inline]
pub fn clamp_cutoff(cut_hz: f32, sr: f32) -> f32 {
    sanitize(cut_hz, 0.0, NYQUIST_FRACTION * sr)
}

/// TPT (Topology-Preserving Transform) `g = tan(π fc / sr)`.
///
/// The cutoff is clamped below Nyquist first, so `g` stays finite. With
/// `fast-math` the tangent is `sin/cos` of the polynomial approximations.
#[inline]
pub fn tpt_g(cut_hz: f32, sr: f32) -> f32 {
    let x = PI * (clamp_cutoff(cut_hz, sr) / sr);
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            let s = fast_sin(x);
            let c = fast_cos(x);
            s / c
        } else {
            m_tan(x)
        }
    }
}

/// Exponential sweep: `lo_hz * ratio^t` for `t ∈ [0, 1]`.
#[inline]
pub fn exp_sweep(lo_hz: f32, ratio: f32, t: f32) -> f32 {
    lo_hz * m_exp(m_ln(ratio) * t)
}

// --------------------------------- Tests (std only) ------------------------------
