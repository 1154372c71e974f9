//! Guessing strategy for a bot guesser
//!
//! The bot only looks at what the guesser can see: the mask, the guessed
//! letters and its own lifelines. Candidates are dictionary words that fit
//! the revealed positions and avoid every letter known to be absent.

use crate::config::MatchOptions;
use crate::engine::actions::ActionId;
use crate::game::dictionary::Dictionary;
use crate::game::player::Player;
use crate::game::round::{RoundState, HIDDEN};
use std::collections::BTreeMap;

/// Reveal is only worth it with at least this many hidden positions.
pub const REVEAL_MIN_HIDDEN: usize = 4;

/// Dictionary words consistent with the mask, in dictionary order.
pub fn candidate_words<'a>(round: &RoundState, dictionary: &'a Dictionary) -> Vec<&'a str> {
    if round.secret_word.is_empty() {
        return Vec::new();
    }

    let absent = round.absent_letters();
    let pattern: Vec<char> = round.masked_word.chars().collect();

    dictionary
        .words()
        .iter()
        .map(String::as_str)
        .filter(|word| word.len() == pattern.len())
        .filter(|word| {
            word.chars().zip(&pattern).all(|(c, &shown)| {
                if shown == HIDDEN {
                    !absent.contains(&c)
                } else {
                    c == shown
                }
            })
        })
        .collect()
}

/// The unguessed letter found in the most candidates (each word counts a
/// letter once). Ties go to the later letter of the alphabet.
pub fn best_letter(round: &RoundState, candidates: &[&str]) -> Option<char> {
    let mut freqs: BTreeMap<char, usize> = BTreeMap::new();
    for word in candidates {
        let mut letters: Vec<char> = word.chars().collect();
        letters.sort_unstable();
        letters.dedup();
        for c in letters {
            if !round.has_guessed(c) {
                *freqs.entry(c).or_insert(0) += 1;
            }
        }
    }

    freqs
        .into_iter()
        .max_by_key(|&(c, count)| (count, c))
        .map(|(c, _)| c)
}

/// First letter of the alphabet not yet guessed.
pub fn first_unguessed(round: &RoundState) -> Option<char> {
    ('a'..='z').find(|c| !round.has_guessed(*c))
}

/// Pick the guesser's next action, in strict priority order.
pub fn decide(
    round: &RoundState,
    player: &Player,
    options: &MatchOptions,
    dictionary: &Dictionary,
) -> Option<ActionId> {
    let wrong = round.wrong_guesses;
    let max = round.max_wrong_guesses;

    if player.lifeline_remove > 0 && wrong >= max.saturating_sub(1).max(1) {
        return Some(ActionId::LifelineRemove);
    }
    if player.lifeline_retry > 0
        && !player.retry_shield_active
        && wrong >= max.saturating_sub(2).max(1)
    {
        return Some(ActionId::LifelineRetry);
    }
    if player.lifeline_reveal > 0 && round.hidden_count() >= REVEAL_MIN_HIDDEN {
        return Some(ActionId::LifelineReveal);
    }

    let candidates = candidate_words(round, dictionary);
    let threshold = options.bot_guess_aggression.word_guess_threshold();
    if options.allow_full_word_guess && !candidates.is_empty() && candidates.len() <= threshold {
        return Some(ActionId::GuessWord);
    }

    best_letter(round, &candidates)
        .or_else(|| first_unguessed(round))
        .map(ActionId::GuessLetter)
}

/// Text for a full-word guess: the first candidate, or the mask with blanks
/// filled in when nothing fits.
pub fn word_guess_input(round: &RoundState, dictionary: &Dictionary) -> String {
    if let Some(word) = candidate_words(round, dictionary).first() {
        return word.to_string();
    }
    let filled: String = round
        .masked_word
        .chars()
        .map(|c| if c == HIDDEN { 'a' } else { c })
        .collect();
    if filled.is_empty() {
        "aaa".to_string()
    } else {
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuessAggression;
    use crate::game::player::PlayerIdentity;
    use crate::game::LetterRack;

    fn dictionary() -> Dictionary {
        Dictionary::from_words(
            ["apple", "ample", "angle", "maple", "melon", "lemon", "cable", "table", "fable"],
            3,
            8,
        )
    }

    fn round(secret: &str, guesses: &[char]) -> RoundState {
        let mut round = RoundState::begin("s", "g", LetterRack::from_letters(vec![]));
        round.phase = crate::game::round::Phase::Guessing;
        round.set_secret(secret, 2);
        for &c in guesses {
            round.guessed_letters.insert(c);
            round.reveal(c);
        }
        round
    }

    fn bot() -> Player {
        Player::new(PlayerIdentity::bot("g", "Bot"))
    }

    #[test]
    fn test_candidates_match_revealed_positions() {
        let r = round("table", &['b', 'l', 'e']);
        let dict = dictionary();
        let candidates = candidate_words(&r, &dict);
        assert_eq!(candidates, vec!["cable", "fable", "table"]);
    }

    #[test]
    fn test_candidates_exclude_absent_letters() {
        let r = round("table", &['b', 'l', 'e', 'c']);
        let dict = dictionary();
        let candidates = candidate_words(&r, &dict);
        assert_eq!(candidates, vec!["fable", "table"]);
    }

    #[test]
    fn test_no_candidates_before_secret() {
        let r = RoundState::default();
        assert!(candidate_words(&r, &dictionary()).is_empty());
    }

    #[test]
    fn test_best_letter_counts_each_word_once() {
        let r = round("melon", &[]);
        // a, e, l, p in all three words; the double 'p' in "apple" counts once
        let best = best_letter(&r, &["apple", "ample", "maple"]);
        assert_eq!(best, Some('p'));
    }

    #[test]
    fn test_best_letter_skips_guessed() {
        let r = round("melon", &['p', 'l', 'e']);
        assert_eq!(best_letter(&r, &["apple", "ample", "maple"]), Some('a'));
    }

    #[test]
    fn test_remove_lifeline_has_priority() {
        let mut r = round("melon", &[]);
        r.wrong_guesses = 3;
        r.max_wrong_guesses = 4;
        let mut player = bot();
        player.lifeline_remove = 1;
        player.lifeline_retry = 1;
        player.lifeline_reveal = 1;
        assert_eq!(
            decide(&r, &player, &MatchOptions::default(), &dictionary()),
            Some(ActionId::LifelineRemove)
        );
    }

    #[test]
    fn test_retry_before_reveal_when_close() {
        let mut r = round("melon", &[]);
        r.wrong_guesses = 5;
        r.max_wrong_guesses = 7;
        let mut player = bot();
        player.lifeline_retry = 1;
        player.lifeline_reveal = 1;
        assert_eq!(
            decide(&r, &player, &MatchOptions::default(), &dictionary()),
            Some(ActionId::LifelineRetry)
        );

        player.retry_shield_active = true;
        assert_eq!(
            decide(&r, &player, &MatchOptions::default(), &dictionary()),
            Some(ActionId::LifelineReveal)
        );
    }

    #[test]
    fn test_no_lifeline_without_strikes() {
        let r = round("melon", &[]);
        let mut player = bot();
        player.lifeline_remove = 1;
        let action = decide(&r, &player, &MatchOptions::default(), &dictionary());
        assert!(matches!(action, Some(ActionId::GuessLetter(_))));
    }

    #[test]
    fn test_reveal_needs_four_hidden() {
        let r = round("melon", &['m', 'e']);
        let mut player = bot();
        player.lifeline_reveal = 1;
        let action = decide(&r, &player, &MatchOptions::default(), &dictionary());
        assert!(!matches!(action, Some(ActionId::LifelineReveal)));
    }

    #[test]
    fn test_word_guess_within_threshold() {
        let r = round("table", &['b', 'l', 'e', 'c']);
        let options = MatchOptions::default();
        assert_eq!(decide(&r, &bot(), &options, &dictionary()), Some(ActionId::GuessWord));

        let safe = MatchOptions {
            bot_guess_aggression: GuessAggression::Safe,
            ..Default::default()
        };
        assert!(matches!(
            decide(&r, &bot(), &safe, &dictionary()),
            Some(ActionId::GuessLetter(_))
        ));

        let disabled = MatchOptions {
            allow_full_word_guess: false,
            ..Default::default()
        };
        assert!(matches!(
            decide(&r, &bot(), &disabled, &dictionary()),
            Some(ActionId::GuessLetter(_))
        ));
    }

    #[test]
    fn test_fallback_letter_without_candidates() {
        let r = round("zzzzzz", &['a']);
        assert_eq!(
            decide(&r, &bot(), &MatchOptions::default(), &dictionary()),
            Some(ActionId::GuessLetter('b'))
        );
    }

    #[test]
    fn test_word_guess_input() {
        let r = round("table", &['b', 'l', 'e', 'c']);
        assert_eq!(word_guess_input(&r, &dictionary()), "fable");

        let r = round("zzzzz", &[]);
        let empty = Dictionary::from_words(Vec::<&str>::new(), 3, 8);
        assert_eq!(word_guess_input(&r, &empty), "aaaaa");
    }
}
