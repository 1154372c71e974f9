//! End-of-match results

use super::{MatchState, TICKS_PER_SECOND};
use crate::game::standings;
use crate::game::wheel::WheelOutcome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

pub const GAME_TYPE: &str = "hangin_with_friends";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub player_id: String,
    pub player_name: String,
    pub is_bot: bool,
}

/// Game-specific part of a result. Maps are keyed by player name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub winner_name: Option<String>,
    pub rounds_played: u32,
    pub scores: BTreeMap<String, u32>,
    pub balloons: BTreeMap<String, i32>,
    pub coins: BTreeMap<String, u32>,
    /// Wheel outcome of the last round played.
    pub wheel_result: Option<WheelOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_type: String,
    /// Unix time (milliseconds) the result was built.
    pub timestamp_ms: u64,
    pub duration_ticks: u64,
    pub player_results: Vec<PlayerResult>,
    pub summary: MatchSummary,
}

impl GameResult {
    pub fn from_state(state: &MatchState) -> Self {
        let players = &state.players;
        let winner_name = standings::rank(players)
            .first()
            .map(|p| p.name().to_string());

        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            game_type: GAME_TYPE.to_string(),
            timestamp_ms,
            duration_ticks: state.tick,
            player_results: players
                .iter()
                .map(|p| PlayerResult {
                    player_id: p.id().to_string(),
                    player_name: p.name().to_string(),
                    is_bot: p.is_bot(),
                })
                .collect(),
            summary: MatchSummary {
                winner_name,
                rounds_played: state.round_number,
                scores: players.iter().map(|p| (p.name().to_string(), p.score)).collect(),
                balloons: players
                    .iter()
                    .map(|p| (p.name().to_string(), p.balloons_remaining))
                    .collect(),
                coins: players.iter().map(|p| (p.name().to_string(), p.coins)).collect(),
                wheel_result: state.round.wheel_result,
            },
        }
    }

    /// Match length as "m:ss".
    pub fn duration_text(&self) -> String {
        let seconds = self.duration_ticks / TICKS_PER_SECOND;
        format!("{}:{:02}", seconds / 60, seconds % 60)
    }

    /// Lines for the end screen: one per player by name, then the winner.
    pub fn format_end_screen(&self) -> Vec<String> {
        let summary = &self.summary;
        let mut lines = vec!["Final scores:".to_string()];
        for (name, score) in &summary.scores {
            lines.push(format!(
                "{}: score {}, balloons {}, coins {}",
                name,
                score,
                summary.balloons.get(name).copied().unwrap_or(0),
                summary.coins.get(name).copied().unwrap_or(0)
            ));
        }
        if let Some(winner) = &summary.winner_name {
            lines.push(format!("Winner: {}", winner));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(winner: Option<&str>) -> GameResult {
        GameResult {
            game_type: GAME_TYPE.to_string(),
            timestamp_ms: 0,
            duration_ticks: 1_500,
            player_results: vec![],
            summary: MatchSummary {
                winner_name: winner.map(str::to_string),
                rounds_played: 4,
                scores: BTreeMap::from([("Zed".to_string(), 1), ("Amy".to_string(), 3)]),
                balloons: BTreeMap::from([("Zed".to_string(), 0), ("Amy".to_string(), 2)]),
                coins: BTreeMap::from([("Zed".to_string(), 12), ("Amy".to_string(), 6)]),
                wheel_result: Some(WheelOutcome::DoublePoints),
            },
        }
    }

    #[test]
    fn test_end_screen_sorted_by_name() {
        let lines = result(Some("Amy")).format_end_screen();
        assert_eq!(
            lines,
            vec![
                "Final scores:",
                "Amy: score 3, balloons 2, coins 6",
                "Zed: score 1, balloons 0, coins 12",
                "Winner: Amy",
            ]
        );
    }

    #[test]
    fn test_end_screen_without_winner() {
        let lines = result(None).format_end_screen();
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_duration_text() {
        // 1500 ticks at 20 per second
        assert_eq!(result(None).duration_text(), "1:15");
    }

    #[test]
    fn test_result_serializes() {
        let json = serde_json::to_string(&result(Some("Amy"))).unwrap();
        assert!(json.contains(r#""wheel_result":"double_points""#));
        let back: GameResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result(Some("Amy")));
    }
}
