//! Modifier-key state machine: reconciles key holds, encoder turns, and
//! edge-triggered presses into parameter, selection, and variant-switch
//! intents. Pure state transitions; the engine core applies the effects.

/// Which modifier key is currently held. Mutually exclusive: a second
/// modifier pressed while one is held is ignored until the first clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modifier {
  None,
  Key1,
  Key2,
}

/// What an encoder turn should do given the current modifier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncoderAction {
  /// Adjust base parameter for the given 0-based slot.
  Param(usize),
  /// Adjust the integration time step.
  TimeStep,
  /// Adjust attenuation of the selected output channel.
  Attenuation,
  /// No effect beyond suppressing the key2-release selection advance.
  Ignore,
}

/// Structural effect of a key transition that the core must carry out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
  None,
  /// Cycle to the next variant and perform a full randomized reset.
  CycleVariant,
  /// Randomized reset of the current variant.
  Randomize,
}

/// Ticks for the attenuation display to fade from 1 to 0 (1 s at 60 Hz).
pub const FADE_TICKS: u32 = 60;

pub struct Interaction {
  pub modifier: Modifier,
  /// 1-based selected output channel.
  pub selected_output: usize,
  /// Attenuation display brightness in [0,1].
  pub fade: f64,
  fade_active: bool,
  /// Set when anything happened during a key2 hold that should suppress
  /// the selection advance on release.
  adjusted: bool,
}

impl Interaction {
  pub fn new() -> Self {
    Self {
      modifier: Modifier::None,
      selected_output: 1,
      fade: 0.0,
      fade_active: false,
      adjusted: false,
    }
  }

  /// Classify an encoder turn (1-based index). Any turn during a key2
  /// hold marks the hold as adjusted, whether or not it changes anything.
  pub fn on_encoder(&mut self, index: u8) -> EncoderAction {
    match (self.modifier, index) {
      (Modifier::Key1, 1) => EncoderAction::TimeStep,
      (Modifier::Key2, 3) => {
        self.adjusted = true;
        EncoderAction::Attenuation
      }
      (Modifier::Key2, _) => {
        self.adjusted = true;
        EncoderAction::Ignore
      }
      (_, 1) => EncoderAction::Param(0),
      (_, 2) => EncoderAction::Param(1),
      (_, 3) => EncoderAction::Param(2),
      _ => EncoderAction::Ignore,
    }
  }

  /// Key transition (1-based index). Key3 is edge-triggered on press.
  pub fn on_key(&mut self, index: u8, down: bool) -> KeyAction {
    match (index, down) {
      (1, true) => {
        if self.modifier == Modifier::None {
          self.modifier = Modifier::Key1;
        }
        KeyAction::None
      }
      (1, false) => {
        if self.modifier == Modifier::Key1 {
          self.modifier = Modifier::None;
        }
        KeyAction::None
      }
      (2, true) => {
        if self.modifier == Modifier::None {
          self.modifier = Modifier::Key2;
          self.fade = 1.0;
          self.fade_active = false;
          self.adjusted = false;
        }
        KeyAction::None
      }
      (2, false) => {
        if self.modifier == Modifier::Key2 {
          self.modifier = Modifier::None;
          if !self.adjusted {
            self.selected_output = self.selected_output % 4 + 1;
          }
          self.fade_active = true;
        }
        KeyAction::None
      }
      (3, true) => {
        if self.modifier == Modifier::Key2 {
          // suppress the pending release advance
          self.adjusted = true;
          KeyAction::CycleVariant
        } else {
          KeyAction::Randomize
        }
      }
      _ => KeyAction::None,
    }
  }

  /// One step of the attenuation-display fade-out. Linear decay,
  /// self-stopping at 0; a no-op while no fade is running.
  pub fn fade_tick(&mut self) {
    if !self.fade_active {
      return;
    }
    self.fade -= 1.0 / FADE_TICKS as f64;
    if self.fade <= 0.0 {
      self.fade = 0.0;
      self.fade_active = false;
    }
  }

  #[inline]
  pub fn fade_running(&self) -> bool { self.fade_active }
}

impl Default for Interaction {
  fn default() -> Self { Self::new() }
}
