//! End-to-end checks of the engine's observable behavior through its
//! public entry points, with a recording CV device standing in for the
//! hardware layer.

use std::sync::{Arc, Mutex};

use chaoscv::engine::sim::{AXIS_LIMIT, DT_MAX, DT_MIN, TRAIL_CAP};
use chaoscv::{CvDevice, EngineMsg, MirrorDevice, SimulationEngine, Variant};

#[derive(Clone, Default)]
struct Recorder {
  writes: Arc<Mutex<Vec<(usize, f64, f64)>>>,
}

impl CvDevice for Recorder {
  fn set_volts(&mut self, channel: usize, volts: f64, slew_s: f64) {
    self.writes.lock().unwrap().push((channel, volts, slew_s));
  }
}

#[derive(Clone, Default)]
struct MirrorRecorder {
  writes: Arc<Mutex<Vec<(usize, f64)>>>,
  polls: Arc<Mutex<Vec<usize>>>,
}

impl MirrorDevice for MirrorRecorder {
  fn set_volts(&mut self, channel: usize, volts: f64) {
    self.writes.lock().unwrap().push((channel, volts));
  }
  fn request_input(&mut self, channel: usize) {
    self.polls.lock().unwrap().push(channel);
  }
}

fn engine() -> (SimulationEngine, Recorder) {
  let dev = Recorder::default();
  (SimulationEngine::new(Box::new(dev.clone()), None, 99), dev)
}

#[test]
fn tick_invariants_hold_under_event_pressure() {
  let (mut e, _dev) = engine();
  for i in 0..2000u32 {
    // stir the engine with a deterministic mix of events
    match i % 7 {
      0 => e.event(EngineMsg::Encoder { index: 1, delta: 3 }),
      1 => e.event(EngineMsg::Key { index: 2, down: true }),
      2 => e.event(EngineMsg::Encoder { index: 3, delta: -2 }),
      3 => e.event(EngineMsg::Key { index: 2, down: false }),
      4 => e.event(EngineMsg::Modulation { channel: 1, volts: (i as f64 * 0.01) % 5.0 }),
      5 => e.event(EngineMsg::Key { index: 3, down: true }),
      _ => e.event(EngineMsg::Key { index: 3, down: false }),
    }
    e.fade_tick();
    e.tick();

    let s = e.state();
    assert!(s.x.abs() <= AXIS_LIMIT && s.y.abs() <= AXIS_LIMIT && s.z.abs() <= AXIS_LIMIT);
    assert!((DT_MIN..=DT_MAX).contains(&e.dt()));
    for ch in 1..=4 {
      assert!((0.0..=1.0).contains(&e.attenuation(ch)));
    }
    assert!((1..=4).contains(&e.selected_output()));
    assert!(e.trail_len() <= TRAIL_CAP);
  }
}

#[test]
fn trail_caps_at_300() {
  let (mut e, _dev) = engine();
  for _ in 0..(TRAIL_CAP + 100) {
    e.tick();
  }
  assert_eq!(e.trail_len(), TRAIL_CAP);
}

#[test]
fn first_tick_from_lorenz_defaults_matches_euler_step() {
  let (mut e, dev) = engine();
  e.tick();
  let s = e.state();
  assert!((s.x - 0.095).abs() < 1e-12);
  assert!((s.y - 0.014).abs() < 1e-12);
  assert!(s.z.abs() < 1e-12);

  // channel 1 carries x through the Lorenz scale constant at unity
  // attenuation
  let writes = dev.writes.lock().unwrap();
  let scale = Variant::Lorenz.def().scale;
  let (ch, volts, _slew) = writes[0];
  assert_eq!(ch, 0);
  assert!((volts - s.x * scale[0]).abs() < 1e-12);
  assert_eq!(writes.len(), 4);
}

#[test]
fn slew_is_shared_across_channels() {
  let (mut e, dev) = engine();
  e.event(EngineMsg::SetSlew { seconds: 0.2 });
  e.tick();
  let writes = dev.writes.lock().unwrap();
  assert!(writes.iter().all(|(_, _, slew)| *slew == 0.2));
}

#[test]
fn mirror_gets_phase_inverted_copies_and_polls() {
  let dev = Recorder::default();
  let mirror = MirrorRecorder::default();
  let mut e = SimulationEngine::new(Box::new(dev.clone()), Some(Box::new(mirror.clone())), 99);
  e.tick();
  let primary = dev.writes.lock().unwrap();
  let mirrored = mirror.writes.lock().unwrap();
  assert_eq!(primary.len(), 4);
  assert_eq!(mirrored.len(), 4);
  for ((pc, pv, _), (mc, mv)) in primary.iter().zip(mirrored.iter()) {
    assert_eq!(pc, mc);
    assert_eq!(*mv, -*pv);
  }
  assert_eq!(*mirror.polls.lock().unwrap(), vec![0, 1]);
}

#[test]
fn key2_tap_advances_selection_hold_does_not() {
  let (mut e, _dev) = engine();
  assert_eq!(e.selected_output(), 1);

  // bare tap: press, release, nothing in between
  e.event(EngineMsg::Key { index: 2, down: true });
  e.event(EngineMsg::Key { index: 2, down: false });
  assert_eq!(e.selected_output(), 2);

  // press, turn encoder3, release: selection unchanged
  e.event(EngineMsg::Key { index: 2, down: true });
  e.event(EngineMsg::Encoder { index: 3, delta: 1 });
  e.event(EngineMsg::Key { index: 2, down: false });
  assert_eq!(e.selected_output(), 2);

  // four bare taps wrap around
  for _ in 0..4 {
    e.event(EngineMsg::Key { index: 2, down: true });
    e.event(EngineMsg::Key { index: 2, down: false });
  }
  assert_eq!(e.selected_output(), 2);
}

#[test]
fn attenuation_edits_target_the_selected_channel() {
  let (mut e, _dev) = engine();
  // advance selection to channel 2
  e.event(EngineMsg::Key { index: 2, down: true });
  e.event(EngineMsg::Key { index: 2, down: false });
  assert_eq!(e.selected_output(), 2);

  e.event(EngineMsg::Key { index: 2, down: true });
  e.event(EngineMsg::Encoder { index: 3, delta: -10 });
  e.event(EngineMsg::Key { index: 2, down: false });
  assert!((e.attenuation(2) - 0.9).abs() < 1e-12);
  assert_eq!(e.attenuation(1), 1.0);
}

#[test]
fn variant_cycle_visits_fixed_order() {
  let (mut e, _dev) = engine();
  let mut seen = vec![e.variant()];
  for _ in 0..5 {
    e.event(EngineMsg::Key { index: 2, down: true });
    e.event(EngineMsg::Key { index: 3, down: true });
    e.event(EngineMsg::Key { index: 3, down: false });
    e.event(EngineMsg::Key { index: 2, down: false });
    seen.push(e.variant());
  }
  assert_eq!(
    seen,
    vec![
      Variant::Lorenz,
      Variant::Rossler,
      Variant::SprottLinzF,
      Variant::Halvorsen,
      Variant::Lorenz,
      Variant::Rossler,
    ]
  );
  // cycling during the hold never advances the selection
  assert_eq!(e.selected_output(), 1);
}

#[test]
fn deadband_gates_modulation_offsets() {
  let (mut e, _dev) = engine();
  e.event(EngineMsg::Modulation { channel: 1, volts: 1.00 });
  e.tick();
  let eff = e.effective_params()[0];

  // 0.01 V below the 0.02 V deadband: held
  e.event(EngineMsg::Modulation { channel: 1, volts: 1.01 });
  e.tick();
  assert_eq!(e.effective_params()[0], eff);

  // 0.05 V: snaps
  e.event(EngineMsg::Modulation { channel: 1, volts: 1.05 });
  e.tick();
  assert!(e.effective_params()[0] > eff);
}

#[test]
fn encoder_deltas_move_base_not_effective_composition() {
  let (mut e, _dev) = engine();
  e.event(EngineMsg::Modulation { channel: 1, volts: 1.0 });
  e.event(EngineMsg::Encoder { index: 1, delta: 10 });
  e.tick();
  // base moved by the encoder, offset still composes on top
  let expected_base = 10.0 + 10.0 * (16.0 - 4.0) / 200.0;
  assert!((e.base_params()[0] - expected_base).abs() < 1e-12);
  assert!((e.effective_params()[0] - (expected_base + 1.2)).abs() < 1e-12);
}
