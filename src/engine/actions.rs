//! Action identifiers, eligibility guards and the action table
//!
//! Each action has one guard and one handler. Guards are built from the small
//! checks below, called in sequence; the table pairing them is built once.

use super::host::Host;
use super::{Match, MatchState};
use crate::game::player::Player;
use crate::game::round::Phase;
use crate::game::validation::WordRejection;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every verb a player (or bot) can send to a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    ChooseWord,
    GuessLetter(char),
    GuessWord,
    LifelineReveal,
    LifelineRemove,
    LifelineRetry,
    SetBotDifficulty,
}

/// An action without its payload; the key of the action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ChooseWord,
    GuessLetter,
    GuessWord,
    LifelineReveal,
    LifelineRemove,
    LifelineRetry,
    SetBotDifficulty,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::ChooseWord,
        ActionKind::GuessLetter,
        ActionKind::GuessWord,
        ActionKind::LifelineReveal,
        ActionKind::LifelineRemove,
        ActionKind::LifelineRetry,
        ActionKind::SetBotDifficulty,
    ];
}

impl ActionId {
    pub fn kind(self) -> ActionKind {
        match self {
            ActionId::ChooseWord => ActionKind::ChooseWord,
            ActionId::GuessLetter(_) => ActionKind::GuessLetter,
            ActionId::GuessWord => ActionKind::GuessWord,
            ActionId::LifelineReveal => ActionKind::LifelineReveal,
            ActionId::LifelineRemove => ActionKind::LifelineRemove,
            ActionId::LifelineRetry => ActionKind::LifelineRetry,
            ActionId::SetBotDifficulty => ActionKind::SetBotDifficulty,
        }
    }

    /// Every concrete action, one per letter for letter guesses.
    pub fn all() -> impl Iterator<Item = ActionId> {
        std::iter::once(ActionId::ChooseWord)
            .chain(('a'..='z').map(ActionId::GuessLetter))
            .chain([
                ActionId::GuessWord,
                ActionId::LifelineReveal,
                ActionId::LifelineRemove,
                ActionId::LifelineRetry,
                ActionId::SetBotDifficulty,
            ])
    }

    /// Whether the action needs text input from the player.
    pub fn takes_input(self) -> bool {
        matches!(
            self,
            ActionId::ChooseWord | ActionId::GuessWord | ActionId::SetBotDifficulty
        )
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionId::ChooseWord => f.write_str("choose_word"),
            ActionId::GuessLetter(letter) => write!(f, "guess_letter_{}", letter),
            ActionId::GuessWord => f.write_str("guess_word"),
            ActionId::LifelineReveal => f.write_str("lifeline_reveal"),
            ActionId::LifelineRemove => f.write_str("lifeline_remove"),
            ActionId::LifelineRetry => f.write_str("lifeline_retry"),
            ActionId::SetBotDifficulty => f.write_str("set_bot_difficulty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for ActionId {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "choose_word" => Ok(ActionId::ChooseWord),
            "guess_word" => Ok(ActionId::GuessWord),
            "lifeline_reveal" => Ok(ActionId::LifelineReveal),
            "lifeline_remove" => Ok(ActionId::LifelineRemove),
            "lifeline_retry" => Ok(ActionId::LifelineRetry),
            "set_bot_difficulty" => Ok(ActionId::SetBotDifficulty),
            other => {
                let mut rest = other.strip_prefix("guess_letter_").unwrap_or("").chars();
                match (rest.next(), rest.next()) {
                    (Some(c), None) if c.is_ascii_lowercase() => Ok(ActionId::GuessLetter(c)),
                    _ => Err(UnknownAction(other.to_string())),
                }
            }
        }
    }
}

/// Why an action was dropped. These are never shown to players.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ineligible {
    #[error("unknown player '{0}'")]
    UnknownPlayer(String),
    #[error("not available during {0}")]
    WrongPhase(Phase),
    #[error("not this player's turn")]
    NotYourTurn,
    #[error("'{0}' is not a lower-case letter")]
    NotALetter(char),
    #[error("'{0}' was already guessed")]
    AlreadyGuessed(char),
    #[error("full-word guessing is disabled")]
    FullWordGuessDisabled,
    #[error("no {0} lifeline left")]
    NoLifeline(&'static str),
    #[error("no strikes to remove")]
    NoStrikes,
    #[error("retry shield is already active")]
    ShieldActive,
    #[error("only the host can do that")]
    NotHost,
    #[error("no bots at the table")]
    NoBots,
    #[error("no bot named '{0}'")]
    UnknownBot(String),
    #[error("no handler for {0:?}")]
    Unsupported(ActionKind),
}

/// What [`Match::execute`] did with an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    /// Soft rejection, already reported to the player.
    Rejected(WordRejection),
    /// Structural misuse; nothing happened.
    Ignored(Ineligible),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

pub type Guard = fn(&MatchState, &Player, ActionId) -> Result<(), Ineligible>;
pub type Handler = fn(&mut Match, &mut dyn Host, &str, ActionId, &str) -> ActionOutcome;

#[derive(Clone, Copy)]
pub struct ActionEntry {
    pub guard: Guard,
    pub handler: Handler,
}

fn pair(guard: Guard, handler: Handler) -> ActionEntry {
    ActionEntry { guard, handler }
}

static ACTION_TABLE: Lazy<HashMap<ActionKind, ActionEntry>> = Lazy::new(|| {
    HashMap::from([
        (
            ActionKind::ChooseWord,
            pair(choose_word_guard, Match::handle_choose_word),
        ),
        (
            ActionKind::GuessLetter,
            pair(guess_letter_guard, Match::handle_guess_letter),
        ),
        (
            ActionKind::GuessWord,
            pair(guess_word_guard, Match::handle_guess_word),
        ),
        (
            ActionKind::LifelineReveal,
            pair(lifeline_reveal_guard, Match::handle_lifeline_reveal),
        ),
        (
            ActionKind::LifelineRemove,
            pair(lifeline_remove_guard, Match::handle_lifeline_remove),
        ),
        (
            ActionKind::LifelineRetry,
            pair(lifeline_retry_guard, Match::handle_lifeline_retry),
        ),
        (
            ActionKind::SetBotDifficulty,
            pair(set_bot_difficulty_guard, Match::handle_set_bot_difficulty),
        ),
    ])
});

/// Table entry for an action.
pub fn entry(kind: ActionKind) -> Result<&'static ActionEntry, Ineligible> {
    ACTION_TABLE.get(&kind).ok_or(Ineligible::Unsupported(kind))
}

// Building blocks

pub fn in_phase(state: &MatchState, phase: Phase) -> Result<(), Ineligible> {
    if state.round.phase == phase {
        Ok(())
    } else {
        Err(Ineligible::WrongPhase(state.round.phase))
    }
}

pub fn is_setter(state: &MatchState, player: &Player) -> Result<(), Ineligible> {
    if state.round.setter_id == player.id() {
        Ok(())
    } else {
        Err(Ineligible::NotYourTurn)
    }
}

pub fn is_guesser(state: &MatchState, player: &Player) -> Result<(), Ineligible> {
    if state.round.guesser_id == player.id() {
        Ok(())
    } else {
        Err(Ineligible::NotYourTurn)
    }
}

/// The guesser's turn during the guessing phase.
pub fn guessing_turn(state: &MatchState, player: &Player) -> Result<(), Ineligible> {
    in_phase(state, Phase::Guessing)?;
    is_guesser(state, player)
}

pub fn letter_unguessed(state: &MatchState, letter: char) -> Result<(), Ineligible> {
    if !letter.is_ascii_lowercase() {
        return Err(Ineligible::NotALetter(letter));
    }
    if state.round.has_guessed(letter) {
        return Err(Ineligible::AlreadyGuessed(letter));
    }
    Ok(())
}

pub fn full_word_allowed(state: &MatchState) -> Result<(), Ineligible> {
    if state.options.allow_full_word_guess {
        Ok(())
    } else {
        Err(Ineligible::FullWordGuessDisabled)
    }
}

pub fn is_host(state: &MatchState, player: &Player) -> Result<(), Ineligible> {
    if state.host_id == player.id() {
        Ok(())
    } else {
        Err(Ineligible::NotHost)
    }
}

pub fn has_bots(state: &MatchState) -> Result<(), Ineligible> {
    if state.players.iter().any(Player::is_bot) {
        Ok(())
    } else {
        Err(Ineligible::NoBots)
    }
}

// Per-action guards

fn choose_word_guard(state: &MatchState, player: &Player, _: ActionId) -> Result<(), Ineligible> {
    in_phase(state, Phase::ChooseWord)?;
    is_setter(state, player)
}

fn guess_letter_guard(
    state: &MatchState,
    player: &Player,
    action: ActionId,
) -> Result<(), Ineligible> {
    guessing_turn(state, player)?;
    match action {
        ActionId::GuessLetter(letter) => letter_unguessed(state, letter),
        other => Err(Ineligible::Unsupported(other.kind())),
    }
}

fn guess_word_guard(state: &MatchState, player: &Player, _: ActionId) -> Result<(), Ineligible> {
    guessing_turn(state, player)?;
    full_word_allowed(state)
}

fn lifeline_reveal_guard(
    state: &MatchState,
    player: &Player,
    _: ActionId,
) -> Result<(), Ineligible> {
    guessing_turn(state, player)?;
    if player.lifeline_reveal == 0 {
        return Err(Ineligible::NoLifeline("reveal"));
    }
    Ok(())
}

fn lifeline_remove_guard(
    state: &MatchState,
    player: &Player,
    _: ActionId,
) -> Result<(), Ineligible> {
    guessing_turn(state, player)?;
    if player.lifeline_remove == 0 {
        return Err(Ineligible::NoLifeline("remove"));
    }
    if state.round.wrong_guesses == 0 {
        return Err(Ineligible::NoStrikes);
    }
    Ok(())
}

fn lifeline_retry_guard(
    state: &MatchState,
    player: &Player,
    _: ActionId,
) -> Result<(), Ineligible> {
    guessing_turn(state, player)?;
    if player.lifeline_retry == 0 {
        return Err(Ineligible::NoLifeline("retry"));
    }
    if player.retry_shield_active {
        return Err(Ineligible::ShieldActive);
    }
    Ok(())
}

fn set_bot_difficulty_guard(
    state: &MatchState,
    player: &Player,
    _: ActionId,
) -> Result<(), Ineligible> {
    in_phase(state, Phase::Lobby)?;
    is_host(state, player)?;
    has_bots(state)
}
