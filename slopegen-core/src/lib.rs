#![cfg_attr(not(feature = "std"), no_std)]
//! Slopegen Core: no_std-ready building blocks of the asymmetric slope generator.
//!
//! Features
//! - `std`      : (default) use the Rust standard library, enables the shared table bank
//! - `no-std`   : build with `#![no_std]` and use the `libm` math backend
//! - `micromath`: use `micromath` instead of `libm`
//! - `fast-math`: polynomial sine/tangent for table building and cutoff mapping
//!
//! Modules
//! - [`dsp`]        : math backend, clamps, wrap, triangle fold, TPT coefficient
//! - [`tables`]     : five-curve lookup bank for the shape morph
//! - [`gate`]       : trigger edge/level detection
//! - [`phase`]      : phase accumulator with slope and Loop/AD/AR modes
//! - [`shaping`]    : shape-morph engine (table blend or power curve)
//! - [`filters`]    : TPT one-pole and two-pole low-pass
//! - [`smoothness`] : low-pass / wavefolder post-processor
//!
//! Design
//! - No heap allocations; every type is a plain `Copy` value except the table bank
//! - Nothing here fails: out-of-domain input is clamped to the nearest valid value
//! - Friendly to embedded / real-time targets

pub mod dsp;
pub mod filters;
pub mod gate;
pub mod phase;
pub mod shaping;
pub mod smoothness;
pub mod tables;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::dsp::{clamp, sanitize, triangle_fold, wrap_unit};
    pub use crate::gate::{GateDetector, GateFlags, DEFAULT_GATE_THRESHOLD};
    pub use crate::phase::{PhaseAccumulator, Ramp, RampMode, Stage, SLOPE_MAX, SLOPE_MIN};
    pub use crate::shaping::{ShapeEngine, ShapeKind, ShapeStrategy};
    pub use crate::smoothness::{SmoothMode, SmoothnessProcessor};
    pub use crate::tables::{Curve, ShapeTableBank};
}
