//! Luck-weighted percentage rolls.
//!
//! Everything chance-based in the engine (hit outcomes, side effects,
//! passive triggers) reduces to one primitive: a uniform roll in
//! [0, 100] tilted by the roller's luck. Each function has a
//! `_with_rng` variant accepting any [`Rng`] so tests and replays can
//! drive outcomes deterministically.

use rand::Rng;

/// Luck value at which rolls are perfectly fair.
pub const LUCK_BASELINE: f64 = 20.0;

/// How many percentage points one point of luck above or below the
/// baseline shifts a roll.
pub const LUCK_TILT: f64 = 0.5;

/// Roll a percentage weighted by `luck`, using the thread-local RNG.
pub fn percentage(luck: f64) -> f64 {
    percentage_with_rng(&mut rand::thread_rng(), luck)
}

/// Roll a percentage weighted by `luck` using the given RNG.
///
/// Baseline luck yields a uniform roll in [0, 100]. Off-baseline luck
/// shifts the whole range, so results may land outside [0, 100]: a roll
/// below zero can never crit, and one above 100 can never miss.
pub fn percentage_with_rng<R: Rng>(rng: &mut R, luck: f64) -> f64 {
    let roll: f64 = rng.gen_range(0.0..=100.0);
    roll + (luck - LUCK_BASELINE) * LUCK_TILT
}

/// Whether a roll beats a trigger chance given in percent. Triggers are
/// top-anchored: the roll must land in the top `chance_percent` of the
/// range, so lucky (higher) rolls trigger more.
pub fn triggers(roll: f64, chance_percent: f64) -> bool {
    roll > 100.0 - chance_percent
}
