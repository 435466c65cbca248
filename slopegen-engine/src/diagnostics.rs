//! Diagnostics collaborator.
//!
//! The engine never logs from the per-sample path. Hosts call
//! [`crate::Engine::report`] at their own cadence (once per block, once per
//! second) and pass a sink implementing [`Diagnostics`].

use slopegen_core::phase::{RampMode, Stage};

/// Point-in-time view of one voice.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineSnapshot {
    pub sample_rate: f32,
    pub mode: RampMode,
    pub stage: Stage,
    pub phase: f64,
    pub gate_high: bool,
    pub reset_pending: bool,
    /// Samples since construction (or `reinitialize`) that carried at least
    /// one out-of-domain parameter.
    pub clamp_events: u64,
}

pub trait Diagnostics {
    fn report(&mut self, snapshot: &EngineSnapshot);
}

/// Discards every report.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    #[inline]
    fn report(&mut self, _snapshot: &EngineSnapshot) {}
}

/// Forwards reports to `tracing`.
///
/// Every snapshot goes out at `debug`. When the clamp counter grew by at least
/// `warn_after` since the previous report, a `warn` names the increase.
#[derive(Clone, Debug)]
pub struct TracingDiagnostics {
    warn_after: u64,
    last_clamps: u64,
}

impl Default for TracingDiagnostics {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TracingDiagnostics {
    pub fn new(warn_after: u64) -> Self {
        Self { warn_after: warn_after.max(1), last_clamps: 0 }
    }
}

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, s: &EngineSnapshot) {
        tracing::debug!(
            mode = ?s.mode,
            stage = ?s.stage,
            phase = s.phase,
            gate_high = s.gate_high,
            clamp_events = s.clamp_events,
            "slope voice"
        );
        // counter restarts on reinitialize
        let delta = s.clamp_events.saturating_sub(self.last_clamps);
        if delta >= self.warn_after {
            tracing::warn!(clamped_samples = delta, "parameters out of range were clamped");
        }
        self.last_clamps = s.clamp_events;
    }
}

impl<F> Diagnostics for F
where
    F: FnMut(&EngineSnapshot),
{
    #[inline]
    fn report(&mut self, snapshot: &EngineSnapshot) {
        self(snapshot);
    }
}
