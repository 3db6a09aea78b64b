//! chaoscv — chaotic attractor engine for analog control-voltage outputs.
//!
//! Four attractor variants integrate on a fixed 60 Hz tick and map their
//! state into per-channel voltages; encoders, modifier keys, and
//! modulation inputs steer the system live. Rendering and the physical
//! device layer are external collaborators behind the `state` snapshot
//! and the `CvDevice`/`MirrorDevice` traits.

pub mod engine {
  pub mod catalog;
  pub mod core;
  pub mod interaction;
  pub mod messages;
  pub mod output;
  pub mod params;
  pub mod rng;
  pub mod sim;
  pub mod state;
}
pub mod runtime;

pub use engine::catalog::Variant;
pub use engine::core::SimulationEngine;
pub use engine::messages::EngineMsg;
pub use engine::output::{CvDevice, MirrorDevice};
pub use engine::state::{get_trail_snapshot, TrailPoint, TrailSnapshot};
pub use runtime::{Engine, EngineError, TICK_HZ};
