/// Small xorshift64* generator for randomized resets. Deterministic per
/// seed so tests can reproduce reset outcomes.
pub struct Rng {
  state: u64,
}

impl Rng {
  pub fn new(seed: u64) -> Self {
    // xorshift state must be nonzero
    Self { state: if seed == 0 { 0xD1B5_4A32_9C8E_2711 } else { seed } }
  }

  fn next_u64(&mut self) -> u64 {
    let mut x = self.state;
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    self.state = x;
    x.wrapping_mul(2685821657736338717)
  }

  /// Uniform in [0, 1).
  pub fn next_f64(&mut self) -> f64 {
    (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
  }

  /// Uniform in [lo, hi).
  pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * self.next_f64()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn range_stays_in_bounds() {
    let mut rng = Rng::new(42);
    for _ in 0..1000 {
      let v = rng.range(-1.5, 1.5);
      assert!((-1.5..1.5).contains(&v));
    }
  }

  #[test]
  fn zero_seed_is_replaced() {
    let mut rng = Rng::new(0);
    assert!(rng.next_f64() != rng.next_f64() || rng.next_f64() != 0.0);
  }
}
