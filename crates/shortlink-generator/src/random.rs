use crate::clock::{Clock, SystemClock};
use crate::{GeneratedCode, Generator};
use jiff::Timestamp;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shortlink_core::{ShortCode, SHORT_CODE_ALPHABET, SHORT_CODE_LENGTH};

// Odd 64-bit constant (golden ratio) used to spread the call sequence across the seed.
const SEED_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Random short code generator seeded from the current Unix second.
///
/// Every call samples [`SHORT_CODE_LENGTH`] symbols, with repetition, from
/// [`SHORT_CODE_ALPHABET`]. The RNG is reseeded per call from the clock's
/// Unix-seconds reading mixed with a per-instance call sequence, so two
/// calls within the same second usually differ but are not guaranteed to.
/// Callers must check the code against storage.
pub struct RandomGenerator<C: Clock = SystemClock> {
    clock: C,
    sequence: Mutex<u64>,
}

impl RandomGenerator<SystemClock> {
    /// Creates a generator backed by the real system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for RandomGenerator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> RandomGenerator<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            sequence: Mutex::new(0),
        }
    }
}

impl<C: Clock + 'static> Generator for RandomGenerator<C> {
    fn generate(&self) -> GeneratedCode {
        // The whole call is serialized so the timestamp used for the seed is
        // the one returned to the caller.
        let mut sequence = self.sequence.lock();

        let now = self.clock.now();
        let unix = now.as_second();
        let seed = (unix as u64) ^ sequence.wrapping_mul(SEED_SPREAD);
        *sequence = sequence.wrapping_add(1);

        let mut rng = StdRng::seed_from_u64(seed);
        let code: String = (0..SHORT_CODE_LENGTH)
            .map(|_| SHORT_CODE_ALPHABET[rng.random_range(0..SHORT_CODE_ALPHABET.len())] as char)
            .collect();

        GeneratedCode {
            code: ShortCode::new_unchecked(code),
            created_at: Timestamp::from_second(unix).unwrap_or(now),
        }
    }
}
