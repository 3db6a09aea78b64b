use serde::Deserialize;

/// Events delivered by host callbacks (encoders, keys, modulation jacks,
/// the reset trigger input). Applied between ticks; effects become visible
/// on the next tick.
#[derive(Clone, Debug, Deserialize)]
pub enum EngineMsg {
  Encoder { index: u8, delta: i32 },
  Key { index: u8, down: bool },
  Modulation { channel: u8, volts: f64 },
  ResetPulse,
  SetSlew { seconds: f64 },
  Quit,
}
