//! Realtime runtime glue.
//!
//! This module defines the minimal `Generator` trait, a lightweight `Runtime<G>`
//! wrapper that owns a generator and tracks the host sample rate, and `Voice<P>`,
//! which drives an [`Engine`] from a [`ParameterSource`].
//!
//! Design goals
//! - No dynamic allocations in the audio thread
//! - SR changes handled lazily (if the host reconfigures), with cheap branching
//! - Generic over the generator type, so voices can be swapped without trait objects

use crate::engine::Engine;
use crate::params::ParameterSource;

/// Anything that can generate one sample at a time.
pub trait Generator {
    /// Called when the runtime is (re)initialized or when the sample rate changes.
    fn reset(&mut self, sr: f32);

    /// Generate the next mono sample. Implementations should assume the sample
    /// rate has been communicated via `reset`.
    fn next(&mut self) -> f32;
}

/// Owns a generator and forwards host sample-rate changes to it.
///
/// The audio callback calls `next(sr)` for every output sample. If the `sr`
/// reported by the host changes, `reset(sr)` is called on the generator once.
pub struct Runtime<G: Generator> {
    sr: f32,
    frames: u64,
    gen: G,
}

impl<G: Generator> Runtime<G> {
    /// Take ownership of `gen` and tell it the starting sample rate.
    #[inline]
    pub fn new(mut gen: G, sr: f32) -> Self {
        gen.reset(sr);
        Self { sr, frames: 0, gen }
    }

    /// Produce **one** mono sample at the given sample rate.
    #[inline]
    pub fn next(&mut self, sr: f32) -> f32 {
        if sr != self.sr {
            self.sr = sr;
            self.gen.reset(sr);
        }
        self.frames += 1;
        self.gen.next()
    }

    #[inline] pub fn sample_rate(&self) -> f32 { self.sr }

    /// Samples produced since construction.
    #[inline] pub fn frames(&self) -> u64 { self.frames }

    /// Elapsed time in seconds at the current sample rate.
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub fn time(&self) -> f64 {
        self.frames as f64 / f64::from(self.sr)
    }

    /// Replace the generator without allocating; the new one is reset to the
    /// current sample rate.
    #[inline]
    pub fn replace(&mut self, mut gen: G) -> G {
        gen.reset(self.sr);
        core::mem::replace(&mut self.gen, gen)
    }

    #[inline] pub fn generator(&self) -> &G { &self.gen }
    #[inline] pub fn generator_mut(&mut self) -> &mut G { &mut self.gen }
}

/// An engine paired with the source of its per-sample frames.
pub struct Voice<P: ParameterSource> {
    engine: Engine,
    source: P,
}

impl<P: ParameterSource> Voice<P> {
    pub fn new(engine: Engine, source: P) -> Self {
        Self { engine, source }
    }

    #[inline] pub fn engine(&self) -> &Engine { &self.engine }
    #[inline] pub fn engine_mut(&mut self) -> &mut Engine { &mut self.engine }
    #[inline] pub fn source_mut(&mut self) -> &mut P { &mut self.source }

    /// Fill `out` from the voice's own source.
    pub fn render(&mut self, out: &mut [f32]) {
        self.engine.render(&mut self.source, out);
    }

    pub fn into_parts(self) -> (Engine, P) {
        (self.engine, self.source)
    }
}

impl<P: ParameterSource> Generator for Voice<P> {
    /// Passes the rate to the engine; a rate the engine rejects is logged and
    /// the previous one kept.
    fn reset(&mut self, sr: f32) {
        if sr == self.engine.sample_rate() {
            return;
        }
        if let Err(err) = self.engine.set_sample_rate(sr) {
            tracing::warn!(%err, "sample rate change ignored");
        }
    }

    #[inline]
    fn next(&mut self) -> f32 {
        let frame = self.source.next_frame();
        self.engine.process_frame(frame)
    }
}
