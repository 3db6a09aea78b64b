//! State vector, fixed-step Euler integration with divergence detection,
//! and the bounded trail history.

use std::collections::VecDeque;

use crate::engine::catalog::Variant;

/// Hard clamp on every state axis; hitting it exactly is treated as
/// divergence and triggers a full randomized reset upstream.
pub const AXIS_LIMIT: f64 = 1000.0;

/// Time-step policy bounds, shared across variants. Defaults sit inside
/// this window per variant.
pub const DT_MIN: f64 = 0.0005;
pub const DT_MAX: f64 = 0.1;

pub const TRAIL_CAP: usize = 300;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct State {
  pub x: f64,
  pub y: f64,
  pub z: f64,
}

impl State {
  pub fn new(x: f64, y: f64, z: f64) -> Self {
    Self { x, y, z }
  }

  pub fn from_array(a: [f64; 3]) -> Self {
    Self { x: a[0], y: a[1], z: a[2] }
  }

  #[inline]
  pub fn norm(&self) -> f64 {
    (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
  }
}

/// One explicit Euler step: state += field(state, params) * dt, then a
/// saturating clamp per axis. Returns true when any axis landed on the
/// clamp bound. This is the engine's only stability mechanism; O(1) per
/// tick, no adaptive stepping.
pub fn step(variant: Variant, state: &mut State, params: &[f64; 3], dt: f64) -> bool {
  let d = variant.field([state.x, state.y, state.z], params);
  state.x = (state.x + d[0] * dt).clamp(-AXIS_LIMIT, AXIS_LIMIT);
  state.y = (state.y + d[1] * dt).clamp(-AXIS_LIMIT, AXIS_LIMIT);
  state.z = (state.z + d[2] * dt).clamp(-AXIS_LIMIT, AXIS_LIMIT);
  state.x.abs() == AXIS_LIMIT || state.y.abs() == AXIS_LIMIT || state.z.abs() == AXIS_LIMIT
}

/// Bounded FIFO of recent state snapshots, oldest first. Cleared on every
/// reset. Computes no geometry; the renderer consumes the points.
pub struct TrailBuffer {
  points: VecDeque<State>,
}

impl TrailBuffer {
  pub fn new() -> Self {
    Self { points: VecDeque::with_capacity(TRAIL_CAP) }
  }

  pub fn push(&mut self, s: State) {
    if self.points.len() == TRAIL_CAP {
      self.points.pop_front();
    }
    self.points.push_back(s);
  }

  pub fn clear(&mut self) {
    self.points.clear();
  }

  #[inline]
  pub fn len(&self) -> usize { self.points.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.points.is_empty() }

  /// Oldest-first iteration with an age index (0 = newest) for depth and
  /// brightness shading.
  pub fn iter(&self) -> impl Iterator<Item = (usize, &State)> {
    let newest = self.points.len().saturating_sub(1);
    self.points.iter().enumerate().map(move |(i, s)| (newest - i, s))
  }
}

impl Default for TrailBuffer {
  fn default() -> Self { Self::new() }
}
