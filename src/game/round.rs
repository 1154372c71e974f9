//! Round state and match phases

use super::wheel::WheelOutcome;
use super::LetterRack;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Placeholder for an unrevealed position in the mask.
pub const HIDDEN: char = '_';

/// Where the match is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Lobby,
    ChooseWord,
    Guessing,
    RoundEnd,
    GameEnd,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Lobby => "lobby",
            Phase::ChooseWord => "choose_word",
            Phase::Guessing => "guessing",
            Phase::RoundEnd => "round_end",
            Phase::GameEnd => "game_end",
        }
    }

    /// Whether turn actions can be taken at all.
    pub fn is_in_play(self) -> bool {
        match self {
            Phase::ChooseWord | Phase::Guessing => true,
            Phase::Lobby | Phase::RoundEnd | Phase::GameEnd => false,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything scoped to the current round.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: Phase,
    pub setter_id: String,
    pub guesser_id: String,
    pub rack: Vec<char>,
    pub secret_word: String,
    /// Same length as `secret_word`, [`HIDDEN`] where not yet revealed.
    pub masked_word: String,
    pub guessed_letters: BTreeSet<char>,
    pub wrong_guesses: u32,
    pub max_wrong_guesses: u32,
    pub wheel_result: Option<WheelOutcome>,
    pub round_points_multiplier: u32,
}

impl RoundState {
    /// Fresh state for a round waiting on the setter.
    pub fn begin(setter_id: &str, guesser_id: &str, rack: LetterRack) -> Self {
        Self {
            phase: Phase::ChooseWord,
            setter_id: setter_id.to_string(),
            guesser_id: guesser_id.to_string(),
            rack: rack.letters().to_vec(),
            round_points_multiplier: 1,
            ..Default::default()
        }
    }

    /// Install an accepted secret word. The strike budget is the base
    /// allowance plus one per letter.
    pub fn set_secret(&mut self, word: &str, base_wrong_guesses: u32) {
        self.secret_word = word.to_string();
        self.masked_word = std::iter::repeat(HIDDEN).take(word.len()).collect();
        self.max_wrong_guesses = base_wrong_guesses + word.len() as u32;
    }

    pub fn has_guessed(&self, letter: char) -> bool {
        self.guessed_letters.contains(&letter)
    }

    /// Reveal every position holding `letter`; returns how many were revealed.
    pub fn reveal(&mut self, letter: char) -> usize {
        let mut revealed = 0;
        self.masked_word = self
            .secret_word
            .chars()
            .zip(self.masked_word.chars())
            .map(|(secret, shown)| {
                if secret == letter && shown == HIDDEN {
                    revealed += 1;
                    secret
                } else {
                    shown
                }
            })
            .collect();
        revealed
    }

    pub fn reveal_all(&mut self) {
        self.masked_word = self.secret_word.clone();
    }

    pub fn hidden_positions(&self) -> Vec<usize> {
        self.masked_word
            .chars()
            .enumerate()
            .filter(|(_, c)| *c == HIDDEN)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn hidden_count(&self) -> usize {
        self.masked_word.chars().filter(|c| *c == HIDDEN).count()
    }

    pub fn is_solved(&self) -> bool {
        !self.secret_word.is_empty() && self.hidden_count() == 0
    }

    pub fn is_exhausted(&self) -> bool {
        self.wrong_guesses >= self.max_wrong_guesses
    }

    pub fn mistakes_left(&self) -> u32 {
        self.max_wrong_guesses.saturating_sub(self.wrong_guesses)
    }

    /// Guessed letters known to be absent: a present letter is always fully
    /// revealed in the mask, so anything guessed but not shown is absent.
    pub fn absent_letters(&self) -> BTreeSet<char> {
        self.guessed_letters
            .iter()
            .copied()
            .filter(|c| !self.masked_word.contains(*c))
            .collect()
    }

    /// Mask in speakable form: "blank, a, blank".
    pub fn spoken_mask(&self) -> String {
        self.masked_word
            .chars()
            .map(|c| if c == HIDDEN { "blank".to_string() } else { c.to_string() })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Guessed letters in upper case, alphabetical, or "none".
    pub fn spoken_guesses(&self) -> String {
        if self.guessed_letters.is_empty() {
            return "none".to_string();
        }
        self.guessed_letters
            .iter()
            .map(|c| c.to_ascii_uppercase().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
