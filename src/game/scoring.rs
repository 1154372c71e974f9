//! Round scoring and levels

use super::player::Player;
use super::resolver::Resolution;

/// Points needed per level.
pub const POINTS_PER_LEVEL: u32 = 5;

/// Coins earned per point.
pub const COINS_PER_POINT: u32 = 2;

/// Level for a score: one level every five points, starting at 1.
pub fn level_for_score(score: u32) -> u32 {
    1 + score / POINTS_PER_LEVEL
}

/// Add points (and their coins) to a player. Returns the new level when the
/// award crossed a level boundary; levels never go down.
pub fn award(player: &mut Player, points: u32) -> Option<u32> {
    player.score += points;
    player.coins += points * COINS_PER_POINT;

    let target = level_for_score(player.score);
    if target <= player.level {
        return None;
    }
    player.level = target;
    Some(target)
}

/// What settling a round did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub winner_id: String,
    pub loser_id: String,
    pub points: u32,
    pub level_up: Option<u32>,
}

/// Score a resolved round: the winner takes `multiplier` points, the loser
/// pops a balloon. The setter wins when the guesser fails.
pub fn settle(
    setter: &mut Player,
    guesser: &mut Player,
    resolution: Resolution,
    multiplier: u32,
) -> Settlement {
    let (winner, loser) = match resolution {
        Resolution::GuesserSolved => (guesser, setter),
        Resolution::GuesserFailed => (setter, guesser),
    };

    loser.balloons_remaining -= 1;
    let level_up = award(winner, multiplier);

    Settlement {
        winner_id: winner.id().to_string(),
        loser_id: loser.id().to_string(),
        points: multiplier,
        level_up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::PlayerIdentity;

    fn player(id: &str) -> Player {
        let mut p = Player::new(PlayerIdentity::human(id, id));
        p.balloons_remaining = 5;
        p
    }

    #[test]
    fn test_level_formula() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(4), 1);
        assert_eq!(level_for_score(5), 2);
        assert_eq!(level_for_score(14), 3);
    }

    #[test]
    fn test_award_points_and_coins() {
        let mut p = player("a");
        assert_eq!(award(&mut p, 2), None);
        assert_eq!(p.score, 2);
        assert_eq!(p.coins, 4);
    }

    #[test]
    fn test_level_up_reported_once() {
        let mut p = player("a");
        p.score = 4;
        assert_eq!(award(&mut p, 1), Some(2));
        assert_eq!(award(&mut p, 1), None);
        assert_eq!(p.level, 2);
    }

    #[test]
    fn test_level_never_decreases() {
        let mut p = player("a");
        p.level = 4;
        assert_eq!(award(&mut p, 1), None);
        assert_eq!(p.level, 4);
    }

    #[test]
    fn test_settle_guesser_solved() {
        let mut setter = player("s");
        let mut guesser = player("g");
        let settlement = settle(&mut setter, &mut guesser, Resolution::GuesserSolved, 2);

        assert_eq!(settlement.winner_id, "g");
        assert_eq!(settlement.loser_id, "s");
        assert_eq!(guesser.score, 2);
        assert_eq!(guesser.coins, 4);
        assert_eq!(setter.balloons_remaining, 4);
        assert_eq!(guesser.balloons_remaining, 5);
    }

    #[test]
    fn test_settle_guesser_failed() {
        let mut setter = player("s");
        let mut guesser = player("g");
        let settlement = settle(&mut setter, &mut guesser, Resolution::GuesserFailed, 1);

        assert_eq!(settlement.winner_id, "s");
        assert_eq!(setter.score, 1);
        assert_eq!(guesser.balloons_remaining, 4);
    }
}
