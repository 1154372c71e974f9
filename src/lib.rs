//! Hangin' with Friends: a two-player word-hanging round engine.
//!
//! One player sets a secret word from a letter rack, the other guesses it
//! letter by letter against a strike budget. Wrong guesses, lifelines and a
//! bonus wheel shape each round; losing a round costs a balloon, and the
//! match ends when someone runs out.

pub mod bot;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod storage;

pub use config::{BotDifficulty, DictionaryMode, MatchOptions};
pub use engine::actions::{ActionId, ActionOutcome};
pub use engine::host::Host;
pub use engine::{Match, MatchState};
pub use error::EngineError;
