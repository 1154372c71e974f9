//! Ranking and match termination

use super::player::Player;
use crate::config::MatchOptions;

/// Why a match ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndReason {
    /// These players ran out of balloons.
    BalloonsExhausted { loser_ids: Vec<String> },
    ScoreLimit { limit: u32 },
    RoundLimit { limit: u32 },
}

/// Verdict after a round resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchVerdict {
    Continue,
    Finished { winner_id: String, reason: EndReason },
}

/// Players by score, then balloons, highest first. Ties keep seating order.
pub fn rank(players: &[Player]) -> Vec<&Player> {
    let mut ranked: Vec<&Player> = players.iter().collect();
    ranked.sort_by(|a, b| {
        (b.score, b.balloons_remaining).cmp(&(a.score, a.balloons_remaining))
    });
    ranked
}

/// Decide whether the match is over after `rounds_played` rounds.
pub fn evaluate(players: &[Player], rounds_played: u32, options: &MatchOptions) -> MatchVerdict {
    let Some(leader) = rank(players).first().copied() else {
        return MatchVerdict::Continue;
    };
    let finished = |reason| MatchVerdict::Finished {
        winner_id: leader.id().to_string(),
        reason,
    };

    let loser_ids: Vec<String> = players
        .iter()
        .filter(|p| p.is_out_of_balloons())
        .map(|p| p.id().to_string())
        .collect();
    if !loser_ids.is_empty() {
        return finished(EndReason::BalloonsExhausted { loser_ids });
    }

    if options.max_score > 0 && leader.score >= options.max_score {
        return finished(EndReason::ScoreLimit {
            limit: options.max_score,
        });
    }

    if options.max_rounds > 0 && rounds_played >= options.max_rounds {
        return finished(EndReason::RoundLimit {
            limit: options.max_rounds,
        });
    }

    MatchVerdict::Continue
}
