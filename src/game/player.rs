//! Player records
//!
//! The host owns who a player is; the match owns how they are doing.

use crate::config::MatchOptions;
use serde::{Deserialize, Serialize};

/// Who a player is, as handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: String,
    pub name: String,
    pub is_bot: bool,
}

impl PlayerIdentity {
    pub fn human(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_bot: false,
        }
    }

    pub fn bot(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_bot: true,
        }
    }
}

/// A seated player and everything the match tracks about them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub identity: PlayerIdentity,
    pub balloons_remaining: i32,
    pub score: u32,
    pub coins: u32,
    pub level: u32,
    pub correct_streak: u32,
    pub wrong_streak: u32,
    pub lifeline_reveal: u32,
    pub lifeline_remove: u32,
    pub lifeline_retry: u32,
    /// Absorbs the next strike, then clears.
    pub retry_shield_active: bool,
}

impl Player {
    pub fn new(identity: PlayerIdentity) -> Self {
        Self {
            identity,
            balloons_remaining: 0,
            score: 0,
            coins: 0,
            level: 1,
            correct_streak: 0,
            wrong_streak: 0,
            lifeline_reveal: 0,
            lifeline_remove: 0,
            lifeline_retry: 0,
            retry_shield_active: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn is_bot(&self) -> bool {
        self.identity.is_bot
    }

    /// Reset everything to the match-start defaults.
    pub fn reset_for_match(&mut self, options: &MatchOptions) {
        *self = Self {
            balloons_remaining: options.starting_balloons as i32,
            ..Self::new(self.identity.clone())
        };
    }

    pub fn is_out_of_balloons(&self) -> bool {
        self.balloons_remaining <= 0
    }

    /// One-line board summary for spectators.
    pub fn board(&self) -> String {
        format!(
            "{} board: score {}, balloons {}, coins {}, reveal {}, remove {}, retry {}.",
            self.name(),
            self.score,
            self.balloons_remaining,
            self.coins,
            self.lifeline_reveal,
            self.lifeline_remove,
            self.lifeline_retry
        )
    }
}
