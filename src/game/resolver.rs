//! Guess resolution for the guessing phase
//!
//! These functions mutate the round and the guesser and report what
//! happened; announcing it is the orchestrator's job. Eligibility (phase,
//! acting player, lifeline counts) is checked before any of them run.

use super::player::Player;
use super::round::RoundState;
use super::seed;
use super::validation::{normalize_word, WordRejection};
use rand::seq::IndexedRandom;

/// What a wrong guess did to the guesser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    /// The retry shield took the hit and is now spent.
    Absorbed,
    /// One more wrong guess on the board.
    Recorded,
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    GuesserSolved,
    GuesserFailed,
}

/// Outcome of one letter or word guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReport {
    pub correct: bool,
    pub strike: Option<Strike>,
    pub resolution: Option<Resolution>,
    /// The guess came from a reveal lifeline rather than the guesser.
    pub from_lifeline: bool,
}

impl GuessReport {
    fn hit(resolution: Option<Resolution>, from_lifeline: bool) -> Self {
        Self {
            correct: true,
            strike: None,
            resolution,
            from_lifeline,
        }
    }

    fn miss(round: &RoundState, strike: Strike) -> Self {
        Self {
            correct: false,
            strike: Some(strike),
            resolution: round.is_exhausted().then_some(Resolution::GuesserFailed),
            from_lifeline: false,
        }
    }
}

/// Guess a single letter. `None` if it was already guessed.
pub fn guess_letter(
    round: &mut RoundState,
    guesser: &mut Player,
    letter: char,
) -> Option<GuessReport> {
    resolve_letter(round, guesser, letter, false)
}

fn resolve_letter(
    round: &mut RoundState,
    guesser: &mut Player,
    letter: char,
    from_lifeline: bool,
) -> Option<GuessReport> {
    if !round.guessed_letters.insert(letter) {
        return None;
    }

    if round.secret_word.contains(letter) {
        round.reveal(letter);
        guesser.correct_streak += 1;
        guesser.wrong_streak = 0;
        let resolution = round.is_solved().then_some(Resolution::GuesserSolved);
        return Some(GuessReport::hit(resolution, from_lifeline));
    }

    let strike = apply_strike(round, guesser);
    Some(GuessReport::miss(round, strike))
}

/// Guess the whole word. Anything but an exact match costs one strike.
pub fn guess_word(
    round: &mut RoundState,
    guesser: &mut Player,
    raw: &str,
) -> Result<GuessReport, WordRejection> {
    let guess = normalize_word(raw).ok_or(WordRejection::InvalidCharacters)?;

    if guess == round.secret_word {
        round.reveal_all();
        return Ok(GuessReport::hit(Some(Resolution::GuesserSolved), false));
    }

    let strike = apply_strike(round, guesser);
    Ok(GuessReport::miss(round, strike))
}

/// Charge a wrong guess, unless the retry shield is up.
pub fn apply_strike(round: &mut RoundState, guesser: &mut Player) -> Strike {
    if guesser.retry_shield_active {
        guesser.retry_shield_active = false;
        return Strike::Absorbed;
    }

    round.wrong_guesses += 1;
    guesser.wrong_streak += 1;
    guesser.correct_streak = 0;
    Strike::Recorded
}

/// Reveal one hidden position chosen from the round's reveal seed, then
/// resolve its letter as a guess. `None` if the lifeline is unavailable.
pub fn use_reveal(
    round: &mut RoundState,
    guesser: &mut Player,
    match_seed: u64,
    round_number: u32,
) -> Option<GuessReport> {
    if guesser.lifeline_reveal == 0 {
        return None;
    }
    let hidden = round.hidden_positions();
    let mut rng = seed::rng_for(seed::derive_reveal_seed(
        match_seed,
        round_number,
        round.guessed_letters.len(),
    ));
    let target = *hidden.choose(&mut rng)?;
    let letter = round.secret_word.chars().nth(target)?;

    guesser.lifeline_reveal -= 1;
    resolve_letter(round, guesser, letter, true)
}

/// Take back one strike. Does nothing (and keeps the lifeline) with no
/// strikes on the board.
pub fn use_remove(round: &mut RoundState, guesser: &mut Player) -> bool {
    if guesser.lifeline_remove == 0 || round.wrong_guesses == 0 {
        return false;
    }
    guesser.lifeline_remove -= 1;
    round.wrong_guesses = round.wrong_guesses.saturating_sub(1);
    true
}

/// Arm the retry shield for the next strike. Does nothing if already armed.
pub fn use_retry(guesser: &mut Player) -> bool {
    if guesser.lifeline_retry == 0 || guesser.retry_shield_active {
        return false;
    }
    guesser.lifeline_retry -= 1;
    guesser.retry_shield_active = true;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::PlayerIdentity;
    use crate::game::round::HIDDEN;
    use crate::game::LetterRack;
    use proptest::prelude::*;

    fn setup(word: &str, base: u32) -> (RoundState, Player) {
        let mut round = RoundState::begin("s", "g", LetterRack::from_letters(vec![]));
        round.set_secret(word, base);
        (round, Player::new(PlayerIdentity::human("g", "Guesser")))
    }

    #[test]
    fn test_correct_letter_reveals_and_streaks() {
        let (mut round, mut guesser) = setup("melon", 2);
        guesser.wrong_streak = 3;
        let report = guess_letter(&mut round, &mut guesser, 'e').unwrap();
        assert!(report.correct);
        assert_eq!(report.resolution, None);
        assert_eq!(round.masked_word, "_e___");
        assert_eq!(guesser.correct_streak, 1);
        assert_eq!(guesser.wrong_streak, 0);
    }

    #[test]
    fn test_repeated_letter_is_noop() {
        let (mut round, mut guesser) = setup("melon", 2);
        guess_letter(&mut round, &mut guesser, 'z');
        assert!(guess_letter(&mut round, &mut guesser, 'z').is_none());
        assert_eq!(round.wrong_guesses, 1);
    }

    #[test]
    fn test_last_letter_solves_on_same_guess() {
        let (mut round, mut guesser) = setup("aba", 2);
        guess_letter(&mut round, &mut guesser, 'a');
        let report = guess_letter(&mut round, &mut guesser, 'b').unwrap();
        assert_eq!(report.resolution, Some(Resolution::GuesserSolved));
    }

    #[test]
    fn test_seven_misses_fail_five_letter_word() {
        // base 2 + 5 letters
        let (mut round, mut guesser) = setup("melon", 2);
        assert_eq!(round.max_wrong_guesses, 7);

        for (i, letter) in ['a', 'b', 'c', 'd', 'f', 'g'].into_iter().enumerate() {
            let report = guess_letter(&mut round, &mut guesser, letter).unwrap();
            assert_eq!(report.strike, Some(Strike::Recorded));
            assert_eq!(report.resolution, None, "resolved early after {} misses", i + 1);
        }
        let report = guess_letter(&mut round, &mut guesser, 'h').unwrap();
        assert_eq!(report.resolution, Some(Resolution::GuesserFailed));
        assert_eq!(round.wrong_guesses, 7);
        assert_eq!(guesser.wrong_streak, 7);
    }

    #[test]
    fn test_shield_absorbs_exactly_one_strike() {
        let (mut round, mut guesser) = setup("melon", 2);
        guesser.lifeline_retry = 1;
        assert!(use_retry(&mut guesser));

        let first = guess_letter(&mut round, &mut guesser, 'x').unwrap();
        assert_eq!(first.strike, Some(Strike::Absorbed));
        assert_eq!(round.wrong_guesses, 0);
        assert!(!guesser.retry_shield_active);

        let second = guess_letter(&mut round, &mut guesser, 'y').unwrap();
        assert_eq!(second.strike, Some(Strike::Recorded));
        assert_eq!(round.wrong_guesses, 1);
    }

    #[test]
    fn test_retry_noop_when_armed() {
        let (_, mut guesser) = setup("melon", 2);
        guesser.lifeline_retry = 2;
        assert!(use_retry(&mut guesser));
        assert!(!use_retry(&mut guesser));
        assert_eq!(guesser.lifeline_retry, 1);
    }

    #[test]
    fn test_word_guess_exact_match_solves() {
        let (mut round, mut guesser) = setup("melon", 2);
        let report = guess_word(&mut round, &mut guesser, " MELON ").unwrap();
        assert_eq!(report.resolution, Some(Resolution::GuesserSolved));
        assert_eq!(round.masked_word, "melon");
    }

    #[test]
    fn test_wrong_word_costs_one_strike() {
        let (mut round, mut guesser) = setup("melon", 2);
        let report = guess_word(&mut round, &mut guesser, "lemon").unwrap();
        assert!(!report.correct);
        assert_eq!(round.wrong_guesses, 1);
    }

    #[test]
    fn test_wrong_word_at_threshold_fails() {
        let (mut round, mut guesser) = setup("cat", 0);
        round.wrong_guesses = 2;
        let report = guess_word(&mut round, &mut guesser, "cot").unwrap();
        assert_eq!(report.resolution, Some(Resolution::GuesserFailed));
    }

    #[test]
    fn test_word_guess_rejects_non_letters() {
        let (mut round, mut guesser) = setup("melon", 2);
        assert_eq!(
            guess_word(&mut round, &mut guesser, "mel0n"),
            Err(WordRejection::InvalidCharacters)
        );
        assert_eq!(round.wrong_guesses, 0);
    }

    #[test]
    fn test_remove_lifeline() {
        let (mut round, mut guesser) = setup("melon", 2);
        guesser.lifeline_remove = 1;
        assert!(!use_remove(&mut round, &mut guesser));
        assert_eq!(guesser.lifeline_remove, 1);

        round.wrong_guesses = 3;
        assert!(use_remove(&mut round, &mut guesser));
        assert_eq!(round.wrong_guesses, 2);
        assert_eq!(guesser.lifeline_remove, 0);
    }

    #[test]
    fn test_reveal_lifeline() {
        let (mut round, mut guesser) = setup("melon", 2);
        guesser.lifeline_reveal = 1;
        let report = use_reveal(&mut round, &mut guesser, 42, 1).unwrap();
        assert!(report.correct);
        assert!(report.from_lifeline);
        assert_eq!(round.hidden_count(), 4);
        assert_eq!(guesser.lifeline_reveal, 0);
        assert!(use_reveal(&mut round, &mut guesser, 42, 1).is_none());
    }

    #[test]
    fn test_reveal_is_reproducible() {
        let (mut a, mut ga) = setup("planet", 2);
        let (mut b, mut gb) = setup("planet", 2);
        ga.lifeline_reveal = 1;
        gb.lifeline_reveal = 1;
        use_reveal(&mut a, &mut ga, 9, 3);
        use_reveal(&mut b, &mut gb, 9, 3);
        assert_eq!(a.masked_word, b.masked_word);
    }

    proptest! {
        #[test]
        fn prop_mask_only_shows_secret_letters(
            word in "[a-z]{3,8}",
            guesses in proptest::collection::vec(proptest::char::range('a', 'z'), 0..26),
        ) {
            let (mut round, mut guesser) = setup(&word, 2);
            for letter in guesses {
                let Some(report) = guess_letter(&mut round, &mut guesser, letter) else {
                    continue;
                };
                for (shown, secret) in round.masked_word.chars().zip(round.secret_word.chars()) {
                    prop_assert!(shown == HIDDEN || shown == secret);
                }
                prop_assert!(round.wrong_guesses <= round.max_wrong_guesses);
                prop_assert_eq!(
                    report.resolution == Some(Resolution::GuesserSolved),
                    round.is_solved()
                );
                if report.resolution.is_some() {
                    break;
                }
            }
        }
    }
}
