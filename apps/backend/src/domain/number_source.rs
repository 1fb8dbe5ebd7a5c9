//! Where winning numbers come from when nobody supplies them.

use std::fmt::Debug;
use std::sync::Mutex;

use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::numbers::{WinningNumbers, MAX_NUMBER, MIN_NUMBER, WINNING_COUNT};

/// Produces a winning-number draw.
pub trait WinningNumberSource: Debug + Send + Sync {
    fn draw(&self) -> WinningNumbers;
}

fn draw_with<R: Rng + ?Sized>(rng: &mut R) -> WinningNumbers {
    let span = usize::from(MAX_NUMBER - MIN_NUMBER + 1);
    let mut picked = [0u8; WINNING_COUNT];
    for (slot, i) in picked.iter_mut().zip(sample(rng, span, WINNING_COUNT)) {
        *slot = MIN_NUMBER + i as u8;
    }
    WinningNumbers::from_distinct(picked)
}

/// Thread-local OS-seeded RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNumberSource;

impl WinningNumberSource for RandomNumberSource {
    fn draw(&self) -> WinningNumbers {
        draw_with(&mut rand::rng())
    }
}

/// Deterministic ChaCha8 stream; the same seed always yields the same draws.
#[derive(Debug)]
pub struct SeededNumberSource {
    rng: Mutex<ChaCha8Rng>,
}

impl SeededNumberSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl WinningNumberSource for SeededNumberSource {
    fn draw(&self) -> WinningNumbers {
        // a poisoned lock still holds a usable RNG state
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        draw_with(&mut *rng)
    }
}

/// Always returns the same numbers.
#[derive(Debug, Clone)]
pub struct FixedNumberSource(pub WinningNumbers);

impl WinningNumberSource for FixedNumberSource {
    fn draw(&self) -> WinningNumbers {
        self.0.clone()
    }
}
