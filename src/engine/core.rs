//! The engine aggregate: owns all simulation and interaction state and
//! exposes `tick()`, `fade_tick()` and `event()` as its only entry
//! points. Host callbacks enqueue `EngineMsg`s; the runtime applies them
//! between ticks.

use std::time::{Duration, Instant};

use crate::engine::catalog::Variant;
use crate::engine::interaction::{EncoderAction, Interaction, KeyAction};
use crate::engine::messages::EngineMsg;
use crate::engine::output::{CvDevice, MirrorDevice, OutputStage};
use crate::engine::params::ParamState;
use crate::engine::rng::Rng;
use crate::engine::sim::{self, State, TrailBuffer, DT_MAX, DT_MIN};
use crate::engine::state::{set_trail_snapshot, TrailPoint, TrailSnapshot};

/// Time-step change per encoder detent while key1 is held.
const DT_STEP: f64 = 0.0005;

/// Reset-input debounce window; rising edges inside it are ignored.
const DEBOUNCE: Duration = Duration::from_millis(50);

/// Randomized reset draws each axis from this window around the origin;
/// all four attractors pull the orbit in from there.
const RESET_SPREAD: f64 = 1.5;

pub struct SimulationEngine {
  variant: Variant,
  state: State,
  dt: f64,
  params: ParamState,
  trail: TrailBuffer,
  outputs: OutputStage,
  interaction: Interaction,
  rng: Rng,
  primary: Box<dyn CvDevice>,
  mirror: Option<Box<dyn MirrorDevice>>,
  last_reset_pulse: Option<Instant>,
}

impl SimulationEngine {
  pub fn new(primary: Box<dyn CvDevice>, mirror: Option<Box<dyn MirrorDevice>>, seed: u64) -> Self {
    let variant = Variant::Lorenz;
    let def = variant.def();
    Self {
      variant,
      state: State::from_array(def.initial_state),
      dt: def.default_dt,
      params: ParamState::new(variant),
      trail: TrailBuffer::new(),
      outputs: OutputStage::new(),
      interaction: Interaction::new(),
      rng: Rng::new(seed),
      primary,
      mirror,
      last_reset_pulse: None,
    }
  }

  /// One integration/output tick: recompose effective parameters, step
  /// the state, recover from divergence, record the trail, map and write
  /// voltages, publish the renderer snapshot.
  pub fn tick(&mut self) {
    self.params.recompose(self.variant);
    let diverged = sim::step(self.variant, &mut self.state, self.params.effective(), self.dt);
    if diverged {
      log::warn!("divergence on {}, randomized reset", self.variant.def().name);
      self.reset(true);
    } else {
      self.trail.push(self.state);
    }
    self.outputs.map(&self.variant.def().scale, &self.state);
    self.outputs.write(self.primary.as_mut(), self.mirror.as_deref_mut());
    self.publish_snapshot();
  }

  /// One step of the attenuation-display fade. Runs on its own cadence,
  /// independent of `tick()`; a no-op while no fade is active.
  pub fn fade_tick(&mut self) {
    self.interaction.fade_tick();
  }

  pub fn event(&mut self, msg: EngineMsg) {
    match msg {
      EngineMsg::Encoder { index, delta } => match self.interaction.on_encoder(index) {
        EncoderAction::Param(slot) => self.params.nudge(self.variant, slot, delta),
        EncoderAction::TimeStep => {
          self.dt = (self.dt + delta as f64 * DT_STEP).clamp(DT_MIN, DT_MAX);
        }
        EncoderAction::Attenuation => {
          self.outputs.nudge_attenuation(self.interaction.selected_output, delta);
        }
        EncoderAction::Ignore => {}
      },
      EngineMsg::Key { index, down } => match self.interaction.on_key(index, down) {
        KeyAction::CycleVariant => {
          self.variant = self.variant.next();
          self.dt = self.variant.def().default_dt;
          log::info!("variant -> {}", self.variant.def().name);
          self.reset(true);
        }
        KeyAction::Randomize => self.reset(true),
        KeyAction::None => {}
      },
      EngineMsg::Modulation { channel, volts } => {
        if (1..=3).contains(&channel) {
          self.params.set_modulation(channel as usize - 1, volts);
        }
      }
      EngineMsg::ResetPulse => {
        let now = Instant::now();
        let bounced = self
          .last_reset_pulse
          .map(|t| now.duration_since(t) < DEBOUNCE)
          .unwrap_or(false);
        if !bounced {
          self.last_reset_pulse = Some(now);
          self.reset(false);
        }
      }
      EngineMsg::SetSlew { seconds } => {
        self.outputs.slew = seconds.max(0.0);
      }
      EngineMsg::Quit => {}
    }
  }

  /// The single reset path. Randomized: fresh parameters and state for
  /// the current variant. Coordinate-only: state back to the variant's
  /// stored initial condition, parameters untouched. Both clear the
  /// trail; attenuations are a user setting and persist.
  pub fn reset(&mut self, randomize: bool) {
    if randomize {
      self.params.randomize(self.variant, &mut self.rng);
      self.state = State::new(
        self.rng.range(-RESET_SPREAD, RESET_SPREAD),
        self.rng.range(-RESET_SPREAD, RESET_SPREAD),
        self.rng.range(-RESET_SPREAD, RESET_SPREAD),
      );
    } else {
      self.state = State::from_array(self.variant.def().initial_state);
    }
    self.trail.clear();
  }

  fn publish_snapshot(&self) {
    let points = self
      .trail
      .iter()
      .map(|(age, s)| TrailPoint { x: s.x, y: s.y, z: s.z, age })
      .collect();
    set_trail_snapshot(TrailSnapshot {
      variant: self.variant.def().name,
      points,
      selected_output: self.interaction.selected_output,
      attenuation: self.outputs.attenuations(),
      fade: self.interaction.fade,
    });
  }

  // Read-side accessors for hosts and tests.

  #[inline]
  pub fn variant(&self) -> Variant { self.variant }
  #[inline]
  pub fn state(&self) -> State { self.state }
  #[inline]
  pub fn dt(&self) -> f64 { self.dt }
  #[inline]
  pub fn trail_len(&self) -> usize { self.trail.len() }
  #[inline]
  pub fn selected_output(&self) -> usize { self.interaction.selected_output }
  #[inline]
  pub fn attenuation(&self, channel: usize) -> f64 { self.outputs.attenuation(channel) }
  #[inline]
  pub fn effective_params(&self) -> [f64; 3] { *self.params.effective() }
  #[inline]
  pub fn base_params(&self) -> [f64; 3] { *self.params.base() }
  #[inline]
  pub fn fade(&self) -> f64 { self.interaction.fade }
}
