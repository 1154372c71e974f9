//! Match options
//!
//! Options are fixed once a match starts. They deserialize from JSON with
//! per-field defaults, so a host can store only what it overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// How strictly the setter's word is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DictionaryMode {
    /// Rack letters and dictionary membership.
    Strict,
    /// Rack letters only.
    #[default]
    RackOnly,
    /// Nothing beyond characters and length.
    Off,
}

/// Difficulty bucket a bot setter picks its word from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Extreme,
}

impl BotDifficulty {
    pub const ALL: [BotDifficulty; 4] = [
        BotDifficulty::Easy,
        BotDifficulty::Medium,
        BotDifficulty::Hard,
        BotDifficulty::Extreme,
    ];

    /// Index of the quartile bucket for this difficulty.
    pub fn bucket_index(self) -> usize {
        match self {
            BotDifficulty::Easy => 0,
            BotDifficulty::Medium => 1,
            BotDifficulty::Hard => 2,
            BotDifficulty::Extreme => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BotDifficulty::Easy => "easy",
            BotDifficulty::Medium => "medium",
            BotDifficulty::Hard => "hard",
            BotDifficulty::Extreme => "extreme",
        }
    }

    /// Lenient parse: unknown values fall back to medium.
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BotDifficulty {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        BotDifficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == wanted)
            .ok_or(OptionsError::UnknownChoice {
                field: "bot_difficulty",
                value: wanted,
            })
    }
}

/// How eagerly a bot guesser commits to a full-word guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuessAggression {
    Safe,
    #[default]
    Balanced,
    Risky,
}

impl GuessAggression {
    /// Largest candidate count at which the bot guesses the whole word.
    pub fn word_guess_threshold(self) -> usize {
        match self {
            GuessAggression::Safe => 1,
            GuessAggression::Balanced => 2,
            GuessAggression::Risky => 4,
        }
    }
}

/// Errors in match options, reported before the match starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("minimum word length {min} is greater than maximum {max}")]
    MinLengthGreaterThanMax { min: usize, max: usize },
    #[error("rack size {rack_size} is smaller than maximum word length {max}")]
    RackSmallerThanMaxLength { rack_size: usize, max: usize },
    #[error("unknown {field} '{value}'")]
    UnknownChoice { field: &'static str, value: String },
    #[error("need exactly 2 players, got {count}")]
    PlayerCount { count: usize },
}

/// Per-match configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub starting_balloons: u32,
    pub rack_size: usize,
    pub min_word_length: usize,
    pub max_word_length: usize,
    pub base_wrong_guesses: u32,
    /// 0 means no round limit.
    pub max_rounds: u32,
    /// 0 means no score limit.
    pub max_score: u32,
    pub dictionary_mode: DictionaryMode,
    pub default_bot_difficulty: BotDifficulty,
    pub allow_full_word_guess: bool,
    pub spectators_see_all_actions: bool,
    pub bot_guess_aggression: GuessAggression,
    /// Word list tried before the standard locations.
    pub word_list_path: Option<PathBuf>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            starting_balloons: 5,
            rack_size: 12,
            min_word_length: 3,
            max_word_length: 8,
            base_wrong_guesses: 2,
            max_rounds: 0,
            max_score: 0,
            dictionary_mode: DictionaryMode::RackOnly,
            default_bot_difficulty: BotDifficulty::Medium,
            allow_full_word_guess: true,
            spectators_see_all_actions: true,
            bot_guess_aggression: GuessAggression::Balanced,
            word_list_path: None,
        }
    }
}

impl MatchOptions {
    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, crate::error::EngineError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Check every option, collecting all problems.
    pub fn validate(&self) -> Vec<OptionsError> {
        let mut errors = Vec::new();

        let ranges: [(&'static str, u64, u64, u64); 7] = [
            ("starting_balloons", self.starting_balloons as u64, 1, 10),
            ("rack_size", self.rack_size as u64, 8, 20),
            ("min_word_length", self.min_word_length as u64, 2, 8),
            ("max_word_length", self.max_word_length as u64, 3, 12),
            ("base_wrong_guesses", self.base_wrong_guesses as u64, 0, 10),
            ("max_rounds", self.max_rounds as u64, 0, 500),
            ("max_score", self.max_score as u64, 0, 500),
        ];
        for (field, value, min, max) in ranges {
            if value < min || value > max {
                errors.push(OptionsError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }

        if self.min_word_length > self.max_word_length {
            errors.push(OptionsError::MinLengthGreaterThanMax {
                min: self.min_word_length,
                max: self.max_word_length,
            });
        }
        if self.rack_size < self.max_word_length {
            errors.push(OptionsError::RackSmallerThanMaxLength {
                rack_size: self.rack_size,
                max: self.max_word_length,
            });
        }

        errors
    }

    /// Whether `len` is an acceptable secret word length.
    pub fn length_in_range(&self, len: usize) -> bool {
        (self.min_word_length..=self.max_word_length).contains(&len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(MatchOptions::default().validate().is_empty());
    }

    #[test]
    fn test_min_greater_than_max_reported() {
        let options = MatchOptions {
            min_word_length: 8,
            max_word_length: 5,
            ..Default::default()
        };
        let errors = options.validate();
        assert!(errors.contains(&OptionsError::MinLengthGreaterThanMax { min: 8, max: 5 }));
    }

    #[test]
    fn test_rack_smaller_than_max_length_reported() {
        let options = MatchOptions {
            rack_size: 8,
            max_word_length: 10,
            ..Default::default()
        };
        assert!(options
            .validate()
            .contains(&OptionsError::RackSmallerThanMaxLength { rack_size: 8, max: 10 }));
    }

    #[test]
    fn test_out_of_range_reported() {
        let options = MatchOptions {
            starting_balloons: 0,
            ..Default::default()
        };
        let errors = options.validate();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            OptionsError::OutOfRange { field: "starting_balloons", .. }
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: MatchOptions =
            serde_json::from_str(r#"{"rack_size": 16, "dictionary_mode": "strict"}"#).unwrap();
        assert_eq!(options.rack_size, 16);
        assert_eq!(options.dictionary_mode, DictionaryMode::Strict);
        assert_eq!(options.starting_balloons, 5);
        assert_eq!(options.bot_guess_aggression, GuessAggression::Balanced);
    }

    #[test]
    fn test_dictionary_mode_serializes_kebab_case() {
        let json = serde_json::to_string(&DictionaryMode::RackOnly).unwrap();
        assert_eq!(json, r#""rack-only""#);
    }

    #[test]
    fn test_difficulty_parse() {
        for difficulty in BotDifficulty::ALL {
            assert_eq!(difficulty.as_str().parse::<BotDifficulty>().unwrap(), difficulty);
        }
        match "Nightmare".parse::<BotDifficulty>() {
            Err(OptionsError::UnknownChoice { field, value }) => {
                assert_eq!(field, "bot_difficulty");
                assert_eq!(value, "nightmare");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_difficulty_normalize() {
        assert_eq!(BotDifficulty::normalize(" HARD "), BotDifficulty::Hard);
        assert_eq!(BotDifficulty::normalize("nightmare"), BotDifficulty::Medium);
    }

    #[test]
    fn test_aggression_thresholds() {
        assert_eq!(GuessAggression::Safe.word_guess_threshold(), 1);
        assert_eq!(GuessAggression::Balanced.word_guess_threshold(), 2);
        assert_eq!(GuessAggression::Risky.word_guess_threshold(), 4);
    }

    #[test]
    fn test_options_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"max_rounds": 6, "allow_full_word_guess": false}"#).unwrap();

        let options = MatchOptions::from_json_file(&path).unwrap();
        assert_eq!(options.max_rounds, 6);
        assert!(!options.allow_full_word_guess);
    }
}
