use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};

/// Snapshot published once per tick for the external renderer to poll.
/// The renderer computes projection and brightness itself; age and raw z
/// are provided for depth shading.
#[derive(Clone, Debug)]
pub struct TrailPoint {
  pub x: f64,
  pub y: f64,
  pub z: f64,
  /// 0 = newest point.
  pub age: usize,
}

#[derive(Clone, Debug)]
pub struct TrailSnapshot {
  pub variant: &'static str,
  pub points: Vec<TrailPoint>,
  pub selected_output: usize,
  pub attenuation: [f64; 4],
  pub fade: f64,
}

pub static TRAIL_STATE: OnceCell<Arc<Mutex<Option<TrailSnapshot>>>> = OnceCell::new();

pub fn init_trail_state() {
  TRAIL_STATE.get_or_init(|| Arc::new(Mutex::new(None)));
}

pub fn set_trail_snapshot(snapshot: TrailSnapshot) {
  if let Some(arc) = TRAIL_STATE.get() {
    if let Ok(mut v) = arc.lock() {
      *v = Some(snapshot);
    }
  }
}

pub fn get_trail_snapshot() -> Option<TrailSnapshot> {
  TRAIL_STATE.get()?.lock().ok()?.clone()
}
