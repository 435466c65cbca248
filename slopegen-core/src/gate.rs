//! Gate/trigger edge detection.
//!
//! Turns a raw trigger stream (nominally `[0, 1]`) into per-sample edge and
//! level flags for the envelope modes of the phase accumulator.

/// Default threshold on a nominal `[0, 1]` trigger range.
pub const DEFAULT_GATE_THRESHOLD: f32 = 0.5;

/// Edge and level flags for one sample.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GateFlags {
    /// Trigger crossed the threshold upwards on this sample.
    pub rising: bool,
    /// Trigger crossed the threshold downwards on this sample.
    pub falling: bool,
    /// Trigger is above the threshold.
    pub high: bool,
}

impl GateFlags {
    /// Flags for a gate that stays low with no edges.
    pub const LOW: Self = Self { rising: false, falling: false, high: false };
}

#[derive(Copy, Clone, Debug)]
pub struct GateDetector {
    threshold: f32,
    prev: f32,
}

impl Default for GateDetector {
    fn default() -> Self {
        Self::new(DEFAULT_GATE_THRESHOLD)
    }
}

impl GateDetector {
    #[inline]
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold.is_finite() { threshold } else { DEFAULT_GATE_THRESHOLD };
        Self { threshold, prev: 0.0 }
    }

    #[inline] pub fn threshold(&self) -> f32 { self.threshold }

    #[inline]
    pub fn set_threshold(&mut self, threshold: f32) {
        if threshold.is_finite() {
            self.threshold = threshold;
        }
    }

    /// Feed one trigger sample. NaN reads as a low gate.
    #[inline]
    pub fn process(&mut self, trigger: f32) -> GateFlags {
        let x = if trigger.is_nan() { 0.0 } else { trigger };
        let was_high = self.prev > self.threshold;
        let high = x > self.threshold;
        self.prev = x;
        GateFlags {
            rising: high && !was_high,
            falling: !high && was_high,
            high,
        }
    }

    /// Level of the last trigger sample, with no edges.
    ///
    /// Used on samples where the host supplies no trigger value.
    #[inline]
    pub fn hold(&self) -> GateFlags {
        GateFlags { rising: false, falling: false, high: self.prev > self.threshold }
    }

    #[inline] pub fn is_high(&self) -> bool { self.prev > self.threshold }

    /// Back to power-on state (gate low).
    #[inline]
    pub fn reset(&mut self) {
        self.prev = 0.0;
    }
}
