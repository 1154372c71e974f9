//! The host side of a match
//!
//! The engine never talks to users directly. Everything it wants said or
//! played goes through a [`Host`], which the table framework implements.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

const SOUND_DIR: &str = "game_hangin_with_friends";

/// Volume used when a cue has no explicit level.
pub const FULL_VOLUME: u8 = 100;

/// Sound and music cues, resolved to asset paths with [`SoundCue::path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Music,
    Lava,
    Click,
    Click2,
    Avatar,
    Balloon,
    Shuffle,
    BuyPoints,
    Drop,
    EnterWheel,
    Win,
    Lose,
    HistoryCorrect,
    HistoryIncorrect,
    LevelUp,
    LevelUpMissions,
    LifelineBounce,
    LifelineSlide,
    MenuOpen,
    MenuClose,
    Popup,
    Multiplier,
    Pickup,
    Roulette,
    RoulettePing,
    ScoreFlyup,
    SubmitInvalid,
    SubmitValid,
    UseLifeline,
    /// Step 1..=8 of the rising correct-guess jingle.
    CorrectSequence(u8),
    /// Step 1..=8 of the falling wrong-guess jingle.
    IncorrectSequence(u8),
}

impl SoundCue {
    /// Jingle step for a streak; streaks past eight stay on the last step.
    pub fn correct_step(streak: u32) -> Self {
        SoundCue::CorrectSequence(streak.clamp(1, 8) as u8)
    }

    pub fn incorrect_step(streak: u32) -> Self {
        SoundCue::IncorrectSequence(streak.clamp(1, 8) as u8)
    }

    fn file_name(self) -> String {
        let name = match self {
            SoundCue::Music => "music_lavascene1.ogg",
            SoundCue::Lava => "bg_lava5.ogg",
            SoundCue::Click => "click.ogg",
            SoundCue::Click2 => "sfx_click2.ogg",
            SoundCue::Avatar => "sfx_avatarpicker3.ogg",
            SoundCue::Balloon => "sfx_balloonflyoff3_250ms.ogg",
            SoundCue::Shuffle => "sfx_bloopshuffle5.ogg",
            SoundCue::BuyPoints => "sfx_buypoints1.ogg",
            SoundCue::Drop => "sfx_dropbloop.ogg",
            SoundCue::EnterWheel => "sfx_entermissions.ogg",
            SoundCue::Win => "sfx_gamewon1.ogg",
            SoundCue::Lose => "sfx_gamelost1.ogg",
            SoundCue::HistoryCorrect => "sfx_historycorrect1.ogg",
            SoundCue::HistoryIncorrect => "sfx_historyincorrect1.ogg",
            SoundCue::LevelUp => "sfx_levelup1.ogg",
            SoundCue::LevelUpMissions => "sfx_levelupmissions.ogg",
            SoundCue::LifelineBounce => "sfx_lifeline_bounce.ogg",
            SoundCue::LifelineSlide => "sfx_lifeline_slide.ogg",
            SoundCue::MenuOpen => "sfx_menuopen3.ogg",
            SoundCue::MenuClose => "sfx_menuclose3.ogg",
            SoundCue::Popup => "sfx_missioncompletepopup.ogg",
            SoundCue::Multiplier => "sfx_multiplybadge4_1s.ogg",
            SoundCue::Pickup => "sfx_pickupbloop1.ogg",
            SoundCue::Roulette => "sfx_roulette4.ogg",
            SoundCue::RoulettePing => "sfx_roulette4_ping.ogg",
            SoundCue::ScoreFlyup => "sfx_scoreflyup5_pointscharge.ogg",
            SoundCue::SubmitInvalid => "sfx_submitwordinvalid6.ogg",
            SoundCue::SubmitValid => "sfx_submitwordvalid4_3.ogg",
            SoundCue::UseLifeline => "sfx_uselifeline1.ogg",
            SoundCue::CorrectSequence(step) => {
                return format!("sfx_correctsequence1_{}.ogg", step.clamp(1, 8));
            }
            SoundCue::IncorrectSequence(step) => {
                // the last step has no balloon pop mixed in
                return match step.clamp(1, 8) {
                    8 => "sfx_incorrectsequence1_8noballoon.ogg".to_string(),
                    n => format!("sfx_incorrectsequence1_{}.ogg", n),
                };
            }
        };
        name.to_string()
    }

    /// Asset path relative to the host's sound root.
    pub fn path(self) -> String {
        format!("{}/{}", SOUND_DIR, self.file_name())
    }
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A cue waiting for a later tick. Kept in the match state so pending
/// sounds survive a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSound {
    pub at_tick: u64,
    pub cue: SoundCue,
    pub volume: u8,
}

/// Delivery primitives the table framework provides.
///
/// Sound is fire-and-forget; nothing in the engine depends on it being heard.
pub trait Host {
    /// Say something to everyone at the table.
    fn broadcast(&mut self, text: &str);

    /// Say something to one player only.
    fn speak_to(&mut self, player_id: &str, text: &str);

    /// Say something to spectators only.
    fn speak_to_spectators(&mut self, text: &str);

    /// Play a cue for the whole table.
    fn play_sound(&mut self, cue: SoundCue, volume: u8);

    /// Play a cue for one player.
    fn play_sound_for(&mut self, player_id: &str, cue: SoundCue);

    /// Start the table's background music.
    fn play_music(&mut self, cue: SoundCue);
}

/// One call made on a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Broadcast(String),
    Private { player_id: String, text: String },
    Spectators(String),
    Sound { cue: SoundCue, volume: u8 },
    SoundFor { player_id: String, cue: SoundCue },
    Music(SoundCue),
}

/// Host that remembers every call, in order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broadcasts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Broadcast(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Private messages sent to `player_id`.
    pub fn private_to(&self, player_id: &str) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Private { player_id: to, text } if to == player_id => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect()
    }

    pub fn spectator_messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Spectators(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Table-wide sound cues, in play order.
    pub fn sounds(&self) -> Vec<SoundCue> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Sound { cue, .. } => Some(*cue),
                _ => None,
            })
            .collect()
    }
}

impl Host for RecordingHost {
    fn broadcast(&mut self, text: &str) {
        self.events.push(HostEvent::Broadcast(text.to_string()));
    }

    fn speak_to(&mut self, player_id: &str, text: &str) {
        self.events.push(HostEvent::Private {
            player_id: player_id.to_string(),
            text: text.to_string(),
        });
    }

    fn speak_to_spectators(&mut self, text: &str) {
        self.events.push(HostEvent::Spectators(text.to_string()));
    }

    fn play_sound(&mut self, cue: SoundCue, volume: u8) {
        self.events.push(HostEvent::Sound { cue, volume });
    }

    fn play_sound_for(&mut self, player_id: &str, cue: SoundCue) {
        self.events.push(HostEvent::SoundFor {
            player_id: player_id.to_string(),
            cue,
        });
    }

    fn play_music(&mut self, cue: SoundCue) {
        self.events.push(HostEvent::Music(cue));
    }
}

/// Host that turns table output into log events. Speech is logged at info,
/// sound at debug.
#[derive(Debug, Default)]
pub struct TracingHost;

impl Host for TracingHost {
    fn broadcast(&mut self, text: &str) {
        info!(target: "hangin::table", "{}", text);
    }

    fn speak_to(&mut self, player_id: &str, text: &str) {
        info!(target: "hangin::table", to = player_id, "{}", text);
    }

    fn speak_to_spectators(&mut self, text: &str) {
        debug!(target: "hangin::table", to = "spectators", "{}", text);
    }

    fn play_sound(&mut self, cue: SoundCue, volume: u8) {
        debug!(target: "hangin::sound", %cue, volume, "play");
    }

    fn play_sound_for(&mut self, player_id: &str, cue: SoundCue) {
        debug!(target: "hangin::sound", %cue, to = player_id, "play");
    }

    fn play_music(&mut self, cue: SoundCue) {
        debug!(target: "hangin::sound", %cue, "music");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_paths() {
        assert_eq!(SoundCue::Lava.path(), "game_hangin_with_friends/bg_lava5.ogg");
        assert_eq!(
            SoundCue::correct_step(3).path(),
            "game_hangin_with_friends/sfx_correctsequence1_3.ogg"
        );
        assert_eq!(
            SoundCue::incorrect_step(12).path(),
            "game_hangin_with_friends/sfx_incorrectsequence1_8noballoon.ogg"
        );
    }

    #[test]
    fn test_streak_steps_clamp() {
        assert_eq!(SoundCue::correct_step(0), SoundCue::CorrectSequence(1));
        assert_eq!(SoundCue::correct_step(9), SoundCue::CorrectSequence(8));
    }

    #[test]
    fn test_recording_host_filters() {
        let mut host = RecordingHost::new();
        host.broadcast("hello");
        host.speak_to("p1", "secret");
        host.speak_to("p2", "other");
        host.play_sound(SoundCue::Click, FULL_VOLUME);
        host.speak_to_spectators("rack");

        assert_eq!(host.broadcasts(), vec!["hello"]);
        assert_eq!(host.private_to("p1"), vec!["secret"]);
        assert_eq!(host.sounds(), vec![SoundCue::Click]);
        assert_eq!(host.spectator_messages(), vec!["rack"]);

        host.events.clear();
        assert!(host.events.is_empty());
    }

    #[test]
    fn test_scheduled_sound_serializes() {
        let sound = ScheduledSound {
            at_tick: 24,
            cue: SoundCue::RoulettePing,
            volume: FULL_VOLUME,
        };
        let json = serde_json::to_string(&sound).unwrap();
        assert!(json.contains("roulette_ping"));
        assert_eq!(serde_json::from_str::<ScheduledSound>(&json).unwrap(), sound);
    }
}
