//! Slopegen Engine: one asymmetric slope-generator voice, ready for a host.
//!
//! Crate layout:
//! - [`config`]      : `EngineConfig` and its validation errors
//! - [`params`]      : per-sample `Params`/`Frame` and the `ParameterSource` trait
//! - [`engine`]      : `Engine`, the per-sample pipeline
//! - [`diagnostics`] : snapshot type and `Diagnostics` sinks (`tracing`, null, closures)
//! - [`graph`]       : `Generator` trait, `Runtime<G>` wrapper and `Voice<P>`
//!
//! The engine avoids heap allocations and logging in the audio thread.
//! Construction and reconfiguration are the only fallible operations.

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod graph;
pub mod params;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use config::{ConfigError, EngineConfig};
pub use diagnostics::{Diagnostics, EngineSnapshot, NullDiagnostics, TracingDiagnostics};
pub use engine::Engine;
pub use graph::{Generator, Runtime, Voice};
pub use params::{Frame, ParameterSource, Params};
pub use slopegen_core::phase::{RampMode, Stage};
pub use slopegen_core::shaping::ShapeKind;
