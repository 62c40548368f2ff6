//! Action selection and value-update helpers shared by the learners.

use rand::seq::SliceRandom;
use rand::Rng;

/// Index of a maximal entry, chosen uniformly among all tied maxima.
pub fn argmax_random<R: Rng + ?Sized>(values: &[f64], rng: &mut R) -> usize {
    let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let ties: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, &v)| v == best)
        .map(|(i, _)| i)
        .collect();
    ties.choose(rng).copied().unwrap_or(0)
}

/// Draws an index from `probabilities` by cumulative sum against one uniform
/// draw. Rounding shortfall falls through to the last index.
pub fn sample_index<R: Rng + ?Sized>(probabilities: &[f64], rng: &mut R) -> usize {
    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (i, p) in probabilities.iter().enumerate() {
        cumulative += p;
        if draw < cumulative {
            return i;
        }
    }
    probabilities.len().saturating_sub(1)
}

/// Learning target `(1 − γ)·r + γ·V'`, with the discount term dropped on a
/// terminal transition.
pub fn td_target(reward: f64, gamma: f64, next_value: f64, done: bool) -> f64 {
    if done {
        (1.0 - gamma) * reward
    } else {
        (1.0 - gamma) * reward + gamma * next_value
    }
}

/// Convex step `(1 − α)·old + α·target`.
pub fn blend(old: f64, target: f64, alpha: f64) -> f64 {
    (1.0 - alpha) * old + alpha * target
}
