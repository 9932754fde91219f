use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Injectable randomness source. One handle is threaded through battle
/// construction and every effect pipeline call, so a scripted
/// implementation makes whole turns reproducible.
pub trait BattleRng: fmt::Debug {
    /// Uniform draw over 0..=255.
    fn rand_u8(&mut self) -> u8;

    /// Uniform draw over the inclusive range `lo..=hi`.
    fn rand_range(&mut self, lo: u16, hi: u16) -> u16;
}

/// Convert a float percent to the engine's 0-255 chance domain.
pub fn percent_threshold(percent: f32) -> u8 {
    ((percent * 255.0) / 100.0) as u8
}

/// Roll a percent chance in the 0-255 domain: success iff the draw is
/// strictly below the converted threshold.
pub fn percent_roll(rng: &mut dyn BattleRng, percent: f32) -> bool {
    rng.rand_u8() < percent_threshold(percent)
}

/// 50/50 coin flip.
pub fn coin_flip(rng: &mut dyn BattleRng) -> bool {
    rng.rand_u8() < 128
}

/// Production source backed by a small PRNG. Seedable for reproducible
/// simulations.
#[derive(Debug)]
pub struct SystemRng {
    inner: SmallRng,
}

impl SystemRng {
    pub fn seeded(seed: u64) -> Self {
        SystemRng {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        SystemRng {
            inner: SmallRng::from_os_rng(),
        }
    }
}

impl BattleRng for SystemRng {
    fn rand_u8(&mut self) -> u8 {
        self.inner.random::<u8>()
    }

    fn rand_range(&mut self, lo: u16, hi: u16) -> u16 {
        self.inner.random_range(lo..=hi)
    }
}

/// Test source that replays a fixed script of byte values. Panics with
/// the draw's position when exhausted, which makes under-provisioned
/// tests fail loudly instead of silently reusing values.
#[derive(Debug)]
pub struct ScriptedRng {
    values: Vec<u8>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: Vec<u8>) -> Self {
        ScriptedRng { values, cursor: 0 }
    }

    fn next(&mut self) -> u8 {
        if self.cursor >= self.values.len() {
            panic!(
                "ScriptedRng exhausted after {} draws; script needs more values",
                self.values.len()
            );
        }
        let value = self.values[self.cursor];
        self.cursor += 1;
        value
    }
}

impl BattleRng for ScriptedRng {
    fn rand_u8(&mut self) -> u8 {
        self.next()
    }

    fn rand_range(&mut self, lo: u16, hi: u16) -> u16 {
        let span = hi - lo + 1;
        lo + (self.next() as u16) % span
    }
}
