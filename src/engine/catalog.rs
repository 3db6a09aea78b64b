//! Static per-variant definitions: vector fields, parameter ranges,
//! defaults, and voltage-scale constants. All variant dispatch happens
//! here; the rest of the engine never branches on the variant kind.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
  Lorenz,
  Rossler,
  SprottLinzF,
  Halvorsen,
}

#[derive(Clone, Copy, Debug)]
pub struct ParamSpec {
  pub name: &'static str,
  pub min: f64,
  pub max: f64,
  pub default: f64,
}

impl ParamSpec {
  #[inline]
  pub fn span(&self) -> f64 { self.max - self.min }
  #[inline]
  pub fn clamp(&self, v: f64) -> f64 { v.clamp(self.min, self.max) }
}

pub struct VariantDef {
  pub name: &'static str,
  pub params: &'static [ParamSpec],
  pub initial_state: [f64; 3],
  pub default_dt: f64,
  /// Volts per state unit for channels 1..3, plus the norm coefficient
  /// for channel 4.
  pub scale: [f64; 4],
  /// Parameter offset per volt of filtered modulation, one gain per slot.
  pub mod_depth: [f64; 3],
}

static LORENZ: VariantDef = VariantDef {
  name: "lorenz",
  params: &[
    ParamSpec { name: "sigma", min: 4.0, max: 16.0, default: 10.0 },
    ParamSpec { name: "rho", min: 20.0, max: 50.0, default: 28.0 },
    ParamSpec { name: "beta", min: 1.0, max: 4.0, default: 8.0 / 3.0 },
  ],
  initial_state: [0.1, 0.0, 0.0],
  default_dt: 0.005,
  scale: [0.2, 0.2, 0.1, 0.09],
  mod_depth: [1.2, 3.0, 0.3],
};

static ROSSLER: VariantDef = VariantDef {
  name: "rossler",
  params: &[
    ParamSpec { name: "a", min: 0.1, max: 0.3, default: 0.2 },
    ParamSpec { name: "b", min: 0.1, max: 0.3, default: 0.2 },
    ParamSpec { name: "c", min: 4.0, max: 9.0, default: 5.7 },
  ],
  initial_state: [1.0, 0.0, 0.0],
  default_dt: 0.02,
  scale: [0.4, 0.4, 0.2, 0.18],
  mod_depth: [0.02, 0.02, 0.5],
};

static SPROTT_LINZ_F: VariantDef = VariantDef {
  name: "sprott-linz f",
  params: &[ParamSpec { name: "a", min: 0.3, max: 0.7, default: 0.5 }],
  initial_state: [0.1, 0.0, 0.0],
  default_dt: 0.05,
  scale: [1.0, 1.0, 1.0, 0.7],
  mod_depth: [0.04, 0.0, 0.0],
};

static HALVORSEN: VariantDef = VariantDef {
  name: "halvorsen",
  params: &[ParamSpec { name: "a", min: 1.1, max: 1.9, default: 1.4 }],
  initial_state: [1.0, 0.0, 0.0],
  default_dt: 0.01,
  scale: [0.4, 0.4, 0.4, 0.25],
  mod_depth: [0.08, 0.0, 0.0],
};

impl Variant {
  pub fn def(self) -> &'static VariantDef {
    match self {
      Variant::Lorenz => &LORENZ,
      Variant::Rossler => &ROSSLER,
      Variant::SprottLinzF => &SPROTT_LINZ_F,
      Variant::Halvorsen => &HALVORSEN,
    }
  }

  #[inline]
  pub fn param_count(self) -> usize { self.def().params.len() }

  /// Fixed cycle order used by the mode-switch key.
  pub fn next(self) -> Variant {
    match self {
      Variant::Lorenz => Variant::Rossler,
      Variant::Rossler => Variant::SprottLinzF,
      Variant::SprottLinzF => Variant::Halvorsen,
      Variant::Halvorsen => Variant::Lorenz,
    }
  }

  /// Vector field evaluation. Unused parameter slots are ignored.
  pub fn field(self, s: [f64; 3], p: &[f64; 3]) -> [f64; 3] {
    let [x, y, z] = s;
    match self {
      Variant::Lorenz => {
        let (sigma, rho, beta) = (p[0], p[1], p[2]);
        [sigma * (y - x), x * (rho - z) - y, x * y - beta * z]
      }
      Variant::Rossler => {
        let (a, b, c) = (p[0], p[1], p[2]);
        [-y - z, x + a * y, b + z * (x - c)]
      }
      Variant::SprottLinzF => {
        let a = p[0];
        [y + z, -x + a * y, x * x - z]
      }
      Variant::Halvorsen => {
        let a = p[0];
        [
          -a * x - 4.0 * y - 4.0 * z - y * y,
          -a * y - 4.0 * z - 4.0 * x - z * z,
          -a * z - 4.0 * x - 4.0 * y - x * x,
        ]
      }
    }
  }
}
