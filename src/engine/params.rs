//! Two-layer parameter model: user-set base values plus a live offset
//! from deadband-filtered modulation voltages, recomposed into effective
//! values once per tick.

use crate::engine::catalog::Variant;
use crate::engine::rng::Rng;

/// Change threshold below which a modulation input is held at its last
/// accepted value (volts).
pub const DEADBAND: f64 = 0.02;

/// Encoder detents needed to sweep a parameter across its full range.
const DETENTS_PER_SPAN: f64 = 200.0;

/// Pure hysteresis filter: an update smaller than the threshold keeps the
/// previous value, anything at or above it snaps. No smoothing, no rate
/// limiting, no cross-channel coupling.
pub struct Deadband {
  last: f64,
  threshold: f64,
}

impl Deadband {
  pub fn new(threshold: f64) -> Self {
    Self { last: 0.0, threshold }
  }

  #[inline]
  pub fn filter(&mut self, raw: f64) -> f64 {
    if (raw - self.last).abs() >= self.threshold {
      self.last = raw;
    }
    self.last
  }

  #[inline]
  pub fn value(&self) -> f64 { self.last }
}

pub struct ParamState {
  base: [f64; 3],
  raw_mod: [f64; 3],
  filters: [Deadband; 3],
  effective: [f64; 3],
}

impl ParamState {
  pub fn new(variant: Variant) -> Self {
    let mut p = Self {
      base: [0.0; 3],
      raw_mod: [0.0; 3],
      filters: [Deadband::new(DEADBAND), Deadband::new(DEADBAND), Deadband::new(DEADBAND)],
      effective: [0.0; 3],
    };
    p.load_defaults(variant);
    p
  }

  /// Reset base values to the variant's defaults. Modulation filters keep
  /// tracking the external voltages; those are not ours to reset.
  pub fn load_defaults(&mut self, variant: Variant) {
    for (i, spec) in variant.def().params.iter().enumerate() {
      self.base[i] = spec.default;
    }
    self.effective = self.base;
  }

  pub fn randomize(&mut self, variant: Variant, rng: &mut Rng) {
    for (i, spec) in variant.def().params.iter().enumerate() {
      self.base[i] = rng.range(spec.min, spec.max);
    }
    self.effective = self.base;
  }

  /// Encoder delta into a base value. Saturating; writes outside the
  /// range clamp rather than error. Slots the variant does not define
  /// are ignored.
  pub fn nudge(&mut self, variant: Variant, slot: usize, delta: i32) {
    let def = variant.def();
    if slot >= def.params.len() {
      return;
    }
    let spec = &def.params[slot];
    let step = spec.span() / DETENTS_PER_SPAN;
    self.base[slot] = spec.clamp(self.base[slot] + delta as f64 * step);
  }

  /// Latest raw modulation voltage for a channel (0-based). Stored as-is;
  /// the deadband is applied when effective values are recomposed at the
  /// start of the next tick.
  pub fn set_modulation(&mut self, channel: usize, volts: f64) {
    if channel < self.raw_mod.len() {
      self.raw_mod[channel] = volts;
    }
  }

  /// effective[i] = clamp(base[i] + filtered[i] * mod_depth[i], range).
  pub fn recompose(&mut self, variant: Variant) {
    let def = variant.def();
    for (i, spec) in def.params.iter().enumerate() {
      let filtered = self.filters[i].filter(self.raw_mod[i]);
      self.effective[i] = spec.clamp(self.base[i] + filtered * def.mod_depth[i]);
    }
  }

  #[inline]
  pub fn effective(&self) -> &[f64; 3] { &self.effective }

  #[inline]
  pub fn base(&self) -> &[f64; 3] { &self.base }
}
