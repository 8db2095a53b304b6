//! Uniform draws used by the synthesizer.
use rand::RngCore;

const UNIT_BITS: u32 = 24;
const UNIT_SCALE: f32 = 1.0 / (1u32 << UNIT_BITS) as f32;

/// Generate a random float in the range `[0, 1)`.
///
/// Only the top 24 bits of a `u32` are used so every result is exactly representable and
/// `1.0` is never returned.
#[inline]
pub fn rand01<R: RngCore + ?Sized>(rng: &mut R) -> f32 {
    (rng.next_u32() >> (32 - UNIT_BITS)) as f32 * UNIT_SCALE
}

/// Generate a random float in the range `[-1, 1)`.
#[inline]
pub fn rand_signed<R: RngCore + ?Sized>(rng: &mut R) -> f32 {
    rand01(rng) * 2.0 - 1.0
}

/// Replays a fixed list of unit draws, cycling when exhausted.
#[cfg(test)]
pub(crate) struct SequenceRng {
    values: Vec<u32>,
    next: usize,
}

#[cfg(test)]
impl SequenceRng {
    /// Each entry is the value [`rand01`] should return, in `[0, 1)`.
    pub(crate) fn from_draws(draws: &[f32]) -> Self {
        let values = draws
            .iter()
            .map(|&d| {
                assert!((0.0..1.0).contains(&d), "draw {d} outside [0, 1)");
                ((d * (1u32 << UNIT_BITS) as f32) as u32) << (32 - UNIT_BITS)
            })
            .collect();
        Self { values, next: 0 }
    }
}

#[cfg(test)]
impl RngCore for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u32() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let bytes = self.next_u32().to_le_bytes();
        for (i, b) in dest.iter_mut().enumerate() {
            *b = bytes[i % 4];
        }
    }
}

/// Fails the test if any randomness is consumed.
#[cfg(test)]
pub(crate) struct PanicRng;

#[cfg(test)]
impl RngCore for PanicRng {
    fn next_u32(&mut self) -> u32 {
        panic!("no randomness expected")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("no randomness expected")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("no randomness expected")
    }
}
