//! Bonus wheel
//!
//! Spun once per round, right after the secret word is accepted. The spin is
//! a pure function of the match seed, the round and the word length.

use super::player::Player;
use super::round::RoundState;
use super::seed;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coins the guesser gets from a coin bonus.
pub const COIN_BONUS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelOutcome {
    CoinBonus,
    ExtraGuess,
    FewerGuess,
    DoublePoints,
    LifelineReveal,
    LifelineRemove,
    LifelineRetry,
    Nothing,
}

/// Wheel slots, in spin order.
pub const WHEEL_OUTCOMES: [WheelOutcome; 8] = [
    WheelOutcome::CoinBonus,
    WheelOutcome::ExtraGuess,
    WheelOutcome::FewerGuess,
    WheelOutcome::DoublePoints,
    WheelOutcome::LifelineReveal,
    WheelOutcome::LifelineRemove,
    WheelOutcome::LifelineRetry,
    WheelOutcome::Nothing,
];

impl WheelOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            WheelOutcome::CoinBonus => "coin_bonus",
            WheelOutcome::ExtraGuess => "extra_guess",
            WheelOutcome::FewerGuess => "fewer_guess",
            WheelOutcome::DoublePoints => "double_points",
            WheelOutcome::LifelineReveal => "lifeline_reveal",
            WheelOutcome::LifelineRemove => "lifeline_remove",
            WheelOutcome::LifelineRetry => "lifeline_retry",
            WheelOutcome::Nothing => "nothing",
        }
    }

    /// Table announcement for this outcome.
    pub fn announcement(self, guesser_name: &str) -> String {
        match self {
            WheelOutcome::CoinBonus => {
                format!("Wheel: coin bonus. {} gains {} coins.", guesser_name, COIN_BONUS)
            }
            WheelOutcome::ExtraGuess => "Wheel: extra guess this round.".to_string(),
            WheelOutcome::FewerGuess => "Wheel: one fewer guess this round.".to_string(),
            WheelOutcome::DoublePoints => "Wheel: double points this round.".to_string(),
            WheelOutcome::LifelineReveal => {
                format!("Wheel: {} gains a reveal lifeline.", guesser_name)
            }
            WheelOutcome::LifelineRemove => {
                format!("Wheel: {} gains a remove-strike lifeline.", guesser_name)
            }
            WheelOutcome::LifelineRetry => {
                format!("Wheel: {} gains a retry-shield lifeline.", guesser_name)
            }
            WheelOutcome::Nothing => "Wheel: no bonus this round.".to_string(),
        }
    }
}

impl fmt::Display for WheelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the outcome for `round`, uniformly over the eight slots.
pub fn spin(match_seed: u64, round: u32, word_len: usize) -> WheelOutcome {
    let mut rng = seed::rng_for(seed::derive_wheel_seed(match_seed, round, word_len));
    WHEEL_OUTCOMES[rng.random_range(0..WHEEL_OUTCOMES.len())]
}

/// Apply `outcome` to the round and guesser, and record it on the round.
pub fn apply(outcome: WheelOutcome, round: &mut RoundState, guesser: &mut Player) {
    match outcome {
        WheelOutcome::CoinBonus => guesser.coins += COIN_BONUS,
        WheelOutcome::ExtraGuess => round.max_wrong_guesses += 1,
        WheelOutcome::FewerGuess => {
            round.max_wrong_guesses = round.max_wrong_guesses.saturating_sub(1).max(1)
        }
        WheelOutcome::DoublePoints => round.round_points_multiplier = 2,
        WheelOutcome::LifelineReveal => guesser.lifeline_reveal += 1,
        WheelOutcome::LifelineRemove => guesser.lifeline_remove += 1,
        WheelOutcome::LifelineRetry => guesser.lifeline_retry += 1,
        WheelOutcome::Nothing => {}
    }
    round.wheel_result = Some(outcome);
}
