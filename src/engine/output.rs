//! State-to-voltage mapping with per-channel attenuation, plus the device
//! seams. The engine treats every write as successful; retries and
//! fallbacks belong to the device layer.

use crate::engine::sim::State;

/// Primary CV hardware: 4 channels, one shared slew time applied
/// uniformly.
pub trait CvDevice: Send {
  fn set_volts(&mut self, channel: usize, volts: f64, slew_s: f64);
}

/// Optional secondary device fed the negated voltage of each primary
/// channel over a remote command channel. Its two analog inputs may be
/// polled best-effort; replies never affect core state.
pub trait MirrorDevice: Send {
  fn set_volts(&mut self, channel: usize, volts: f64);
  fn request_input(&mut self, channel: usize);
}

#[derive(Clone, Copy, Debug)]
pub struct OutputChannel {
  pub volts: f64,
  pub attenuation: f64,
}

pub struct OutputStage {
  pub channels: [OutputChannel; 4],
  /// Shared slew time in seconds, user-configurable.
  pub slew: f64,
}

impl OutputStage {
  pub fn new() -> Self {
    Self {
      channels: [OutputChannel { volts: 0.0, attenuation: 1.0 }; 4],
      slew: 0.0,
    }
  }

  /// Channels 1-3 map axes into [-5,5]; channel 4 maps the state norm
  /// into [0,5]. Attenuation applies after the clamp.
  pub fn map(&mut self, scale: &[f64; 4], state: &State) -> [f64; 4] {
    let raw = [
      (scale[0] * state.x).clamp(-5.0, 5.0),
      (scale[1] * state.y).clamp(-5.0, 5.0),
      (scale[2] * state.z).clamp(-5.0, 5.0),
      (scale[3] * state.norm()).clamp(0.0, 5.0),
    ];
    let mut out = [0.0; 4];
    for (i, ch) in self.channels.iter_mut().enumerate() {
      ch.volts = raw[i] * ch.attenuation;
      out[i] = ch.volts;
    }
    out
  }

  /// Write the current voltages to the primary device and, when present,
  /// the phase-inverted pair to the mirror. The mirror's input polls are
  /// fire-and-forget.
  pub fn write(&self, primary: &mut dyn CvDevice, mirror: Option<&mut (dyn MirrorDevice + '_)>) {
    for (i, ch) in self.channels.iter().enumerate() {
      primary.set_volts(i, ch.volts, self.slew);
    }
    if let Some(m) = mirror {
      for (i, ch) in self.channels.iter().enumerate() {
        m.set_volts(i, -ch.volts);
      }
      m.request_input(0);
      m.request_input(1);
    }
  }

  /// Encoder delta into a channel's attenuation (channel is 1-based),
  /// saturating to [0,1].
  pub fn nudge_attenuation(&mut self, channel: usize, delta: i32) {
    if (1..=4).contains(&channel) {
      let ch = &mut self.channels[channel - 1];
      ch.attenuation = (ch.attenuation + delta as f64 * 0.01).clamp(0.0, 1.0);
    }
  }

  #[inline]
  pub fn attenuation(&self, channel: usize) -> f64 {
    self.channels[channel - 1].attenuation
  }

  pub fn attenuations(&self) -> [f64; 4] {
    [
      self.channels[0].attenuation,
      self.channels[1].attenuation,
      self.channels[2].attenuation,
      self.channels[3].attenuation,
    ]
  }
}

impl Default for OutputStage {
  fn default() -> Self { Self::new() }
}
