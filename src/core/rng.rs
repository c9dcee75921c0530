//! Randomness for deck shuffles and dice.
//!
//! The engine never talks to a concrete generator. Everything random goes
//! through [`RandomSource`]:
//!
//! - [`GameRng`]: ChaCha8-backed, seeded, checkpointable. Used for real matches.
//! - [`ScriptedRolls`]: replays queued values. Used by tests and replays.
//!
//! ```
//! use dice_duel::core::{GameRng, RandomSource};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.sample(1, 6), b.sample(1, 6));
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Uniform integer sampling.
///
/// Object safe so it can sit behind `&mut dyn RandomSource` in the
/// resolution context.
pub trait RandomSource {
    /// Sample uniformly from the inclusive range `[min, max]`.
    fn sample(&mut self, min: i64, max: i64) -> i64;

    /// Pick an index uniformly from `[0, upper)`. `upper` must be non-zero.
    fn pick(&mut self, upper: usize) -> usize {
        self.sample(0, upper as i64 - 1) as usize
    }
}

/// Fisher-Yates shuffle driven by a [`RandomSource`].
///
/// Goes through `pick` so scripted sources control the order as well.
pub fn shuffle<T, R: RandomSource + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.pick(i + 1);
        items.swap(i, j);
    }
}

/// Deterministic RNG for matches.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
/// The same seed always produces the same match.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this generator started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl RandomSource for GameRng {
    fn sample(&mut self, min: i64, max: i64) -> i64 {
        let value = self.inner.gen_range(min..=max);
        log::trace!("rng sample [{min}, {max}] -> {value}");
        value
    }

    fn pick(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..upper)
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses the ChaCha8 word position, so capture and restore are O(1)
/// regardless of how many values were drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// A [`RandomSource`] that replays queued values.
///
/// `sample` pops the next queued value and falls back to `min` once the
/// queue is exhausted. `pick` always returns `upper - 1`, which turns
/// [`shuffle`] into the identity, so deck order stays predictable.
///
/// ```
/// use dice_duel::core::{RandomSource, ScriptedRolls};
///
/// let mut rolls = ScriptedRolls::new([5, 2]);
/// assert_eq!(rolls.sample(1, 6), 5);
/// assert_eq!(rolls.sample(1, 6), 2);
/// assert_eq!(rolls.sample(1, 6), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedRolls {
    queue: VecDeque<i64>,
    drawn: usize,
}

impl ScriptedRolls {
    /// Create a source that replays `values` in order.
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            queue: values.into_iter().collect(),
            drawn: 0,
        }
    }

    /// Queue more values behind the existing ones.
    pub fn push(&mut self, values: impl IntoIterator<Item = i64>) {
        self.queue.extend(values);
    }

    /// Number of values still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Number of `sample` calls served so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RandomSource for ScriptedRolls {
    fn sample(&mut self, min: i64, _max: i64) -> i64 {
        self.drawn += 1;
        self.queue.pop_front().unwrap_or(min)
    }

    fn pick(&mut self, upper: usize) -> usize {
        upper - 1
    }
}
