//! Secret word validation
//!
//! Checks a setter's submission in order, stopping at the first failure:
//! - letters only (after trimming and lower-casing)
//! - length within the configured bounds
//! - letter availability in rack (with multiplicity), unless the dictionary
//!   mode is `off`
//! - dictionary presence, in `strict` mode once the dictionary has loaded

use super::dictionary::Dictionary;
use super::missing_letters;
use crate::config::{DictionaryMode, MatchOptions};
use thiserror::Error;

/// Why a submitted word was turned down. The round is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordRejection {
    #[error("Word must contain letters only.")]
    InvalidCharacters,
    #[error("Word must be {min}-{max} letters.")]
    LengthOutOfRange { length: usize, min: usize, max: usize },
    #[error("Word must use only the rack letters.")]
    LettersNotInRack { missing: Vec<char> },
    #[error("Word must be in the dictionary for strict mode.")]
    NotInDictionary,
}

/// Trim and lower-case `raw`; `None` unless the result is purely alphabetic.
pub fn normalize_word(raw: &str) -> Option<String> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
        None
    } else {
        Some(word)
    }
}

/// Validate a setter's word against the rack and options.
///
/// `dictionary` is `None` until the dictionary has loaded, which disables the
/// strict membership check.
pub fn validate_word(
    raw: &str,
    rack: &[char],
    options: &MatchOptions,
    dictionary: Option<&Dictionary>,
) -> Result<String, WordRejection> {
    let word = normalize_word(raw).ok_or(WordRejection::InvalidCharacters)?;

    if !options.length_in_range(word.len()) {
        return Err(WordRejection::LengthOutOfRange {
            length: word.len(),
            min: options.min_word_length,
            max: options.max_word_length,
        });
    }

    if options.dictionary_mode != DictionaryMode::Off {
        let missing = missing_letters(&word, rack);
        if !missing.is_empty() {
            return Err(WordRejection::LettersNotInRack { missing });
        }
    }

    if options.dictionary_mode == DictionaryMode::Strict {
        if let Some(dictionary) = dictionary {
            if !dictionary.contains(&word) {
                return Err(WordRejection::NotInDictionary);
            }
        }
    }

    Ok(word)
}
