//! Match orchestration
//!
//! [`Match`] owns the players and the round state and is the only thing that
//! mutates them. Phases run `lobby -> choose_word -> guessing -> round_end`,
//! looping back to `choose_word` until a match-end rule fires and the match
//! settles in `game_end`.
//!
//! Every action goes through [`Match::execute`], which runs the action's
//! guard from the action table immediately before its handler. An action
//! that fails its guard is dropped without side effects.

pub mod actions;
pub mod host;
pub mod result;

use crate::bot;
use crate::config::{BotDifficulty, MatchOptions, OptionsError};
use crate::error::EngineError;
use crate::game::dictionary::Dictionary;
use crate::game::player::{Player, PlayerIdentity};
use crate::game::resolver::{self, GuessReport, Resolution, Strike};
use crate::game::round::{Phase, RoundState};
use crate::game::standings::{self, EndReason, MatchVerdict};
use crate::game::validation::validate_word;
use crate::game::wheel::{self, WheelOutcome};
use crate::game::{scoring, seed, LetterRack};
use actions::{ActionId, ActionOutcome, Ineligible};
use host::{Host, ScheduledSound, SoundCue, FULL_VOLUME};
use rand::Rng;
use result::GameResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Scheduler ticks per second.
pub const TICKS_PER_SECOND: u64 = 20;

/// Seats at a table.
pub const PLAYER_COUNT: usize = 2;

/// Upper bound for a randomly drawn match seed.
pub const MAX_RANDOM_SEED: u64 = 2_147_483_647;

const ROULETTE_PING_DELAYS: [u64; 3] = [8, 16, 24];
const LAVA_VOLUME: u8 = 55;

/// Everything needed to resume a match. Serialized as a whole for snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub options: MatchOptions,
    /// Seating order; setter and guesser rotate over it.
    pub players: Vec<Player>,
    pub host_id: String,
    /// Rounds started so far (the current round's number once started).
    pub round_number: u32,
    pub round: RoundState,
    /// 0 until the match starts.
    pub rng_seed: u64,
    /// Bot id to difficulty; every bot has an entry.
    pub bot_difficulties: BTreeMap<String, BotDifficulty>,
    pub tick: u64,
    pub lava_next_tick: u64,
    pub scheduled_sounds: Vec<ScheduledSound>,
}

/// One match at one table.
#[derive(Debug, Clone)]
pub struct Match {
    state: MatchState,
    dictionary: Option<Arc<Dictionary>>,
}

impl Match {
    /// A match in the lobby. The first human (or the first player, if all
    /// are bots) hosts it.
    pub fn new(identities: Vec<PlayerIdentity>, options: MatchOptions) -> Self {
        let host_id = identities
            .iter()
            .find(|p| !p.is_bot)
            .or(identities.first())
            .map(|p| p.id.clone())
            .unwrap_or_default();

        let mut game = Self {
            state: MatchState {
                options,
                players: identities.into_iter().map(Player::new).collect(),
                host_id,
                round_number: 0,
                round: RoundState::default(),
                rng_seed: 0,
                bot_difficulties: BTreeMap::new(),
                tick: 0,
                lava_next_tick: 0,
                scheduled_sounds: Vec::new(),
            },
            dictionary: None,
        };
        game.sync_bot_difficulties();
        game
    }

    /// Fix the match seed instead of drawing one at start.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.state.rng_seed = seed;
        self
    }

    /// Use an already loaded dictionary instead of loading one at start.
    pub fn with_dictionary(mut self, dictionary: Arc<Dictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.round.phase
    }

    pub fn round(&self) -> &RoundState {
        &self.state.round
    }

    pub fn options(&self) -> &MatchOptions {
        &self.state.options
    }

    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.state.players.iter().find(|p| p.id() == id)
    }

    pub fn seed(&self) -> u64 {
        self.state.rng_seed
    }

    pub fn is_finished(&self) -> bool {
        self.state.round.phase == Phase::GameEnd
    }

    /// The match dictionary, loaded on first use.
    pub fn dictionary(&mut self) -> Arc<Dictionary> {
        let options = &self.state.options;
        self.dictionary
            .get_or_insert_with(|| Arc::new(Dictionary::load(options)))
            .clone()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.state.players.iter().position(|p| p.id() == id)
    }

    // Lobby

    /// Seat a player. Only in the lobby, and ids must be unique.
    pub fn add_player(&mut self, identity: PlayerIdentity) -> bool {
        if self.phase() != Phase::Lobby || self.index_of(&identity.id).is_some() {
            return false;
        }
        self.state.players.push(Player::new(identity));
        self.sync_bot_difficulties();
        true
    }

    /// Unseat a player. Only in the lobby.
    pub fn remove_player(&mut self, id: &str) -> bool {
        if self.phase() != Phase::Lobby {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.state.players.remove(index);
        self.sync_bot_difficulties();
        true
    }

    /// Drop overrides for departed bots and give new bots the default.
    fn sync_bot_difficulties(&mut self) {
        let bot_ids: BTreeSet<String> = self
            .state
            .players
            .iter()
            .filter(|p| p.is_bot())
            .map(|p| p.id().to_string())
            .collect();
        let default = self.state.options.default_bot_difficulty;

        let overrides = &mut self.state.bot_difficulties;
        overrides.retain(|id, _| bot_ids.contains(id));
        for id in bot_ids {
            overrides.entry(id).or_insert(default);
        }
    }

    /// Difficulty a bot plays at: its override, else the match default.
    pub fn effective_difficulty(&self, player_id: &str) -> BotDifficulty {
        self.state
            .bot_difficulties
            .get(player_id)
            .copied()
            .unwrap_or(self.state.options.default_bot_difficulty)
    }

    /// Problems that keep the match from starting.
    pub fn prestart_validate(&self) -> Vec<OptionsError> {
        let mut errors = self.state.options.validate();
        if self.state.players.len() != PLAYER_COUNT {
            errors.push(OptionsError::PlayerCount {
                count: self.state.players.len(),
            });
        }
        errors
    }

    // Host entry points

    /// Reset the players, fix the seed, load the dictionary and deal the
    /// first round. Does nothing outside the lobby.
    pub fn on_start(&mut self, host: &mut dyn Host) {
        if self.phase() != Phase::Lobby {
            debug!(phase = %self.phase(), "start ignored");
            return;
        }

        let options = self.state.options.clone();
        for player in &mut self.state.players {
            player.reset_for_match(&options);
        }
        self.state.round_number = 0;
        if self.state.rng_seed == 0 {
            self.state.rng_seed = rand::rng().random_range(1..=MAX_RANDOM_SEED);
        }
        let dictionary = self.dictionary();
        self.sync_bot_difficulties();

        info!(
            seed = self.state.rng_seed,
            words = dictionary.len(),
            players = self.state.players.len(),
            "match started"
        );

        host.play_music(SoundCue::Music);
        self.schedule_lava(true);
        self.start_round(host);
    }

    /// Advance the scheduler by one tick. Plays due cues and ambience; never
    /// touches game state.
    pub fn on_tick(&mut self, host: &mut dyn Host) {
        self.state.tick += 1;
        let tick = self.state.tick;

        let (due, pending): (Vec<ScheduledSound>, Vec<ScheduledSound>) =
            std::mem::take(&mut self.state.scheduled_sounds)
                .into_iter()
                .partition(|s| s.at_tick <= tick);
        self.state.scheduled_sounds = pending;
        for sound in due {
            host.play_sound(sound.cue, sound.volume);
        }

        if self.phase().is_in_play() && tick >= self.state.lava_next_tick {
            host.play_sound(SoundCue::Lava, LAVA_VOLUME);
            self.schedule_lava(false);
        }
    }

    fn schedule_lava(&mut self, initial: bool) {
        let tick = self.state.tick;
        let mut rng = seed::rng_for(seed::derive_ambience_seed(self.state.rng_seed, tick));
        let jitter = if initial {
            rng.random_range(80..=180)
        } else {
            rng.random_range(140..=320)
        };
        self.state.lava_next_tick = tick + jitter;
    }

    fn schedule_sound(&mut self, cue: SoundCue, delay_ticks: u64) {
        self.state.scheduled_sounds.push(ScheduledSound {
            at_tick: self.state.tick + delay_ticks,
            cue,
            volume: FULL_VOLUME,
        });
    }

    /// Whether `player_id` may take `action` right now.
    pub fn is_enabled(&self, player_id: &str, action: ActionId) -> Result<(), Ineligible> {
        let player = self
            .player(player_id)
            .ok_or_else(|| Ineligible::UnknownPlayer(player_id.to_string()))?;
        let entry = actions::entry(action.kind())?;
        (entry.guard)(&self.state, player, action)
    }

    /// Every action `player_id` may take right now.
    pub fn available_actions(&self, player_id: &str) -> Vec<ActionId> {
        ActionId::all()
            .filter(|action| self.is_enabled(player_id, *action).is_ok())
            .collect()
    }

    /// Run one action. `input` is the typed text for actions that take it
    /// and is ignored otherwise.
    pub fn execute(
        &mut self,
        host: &mut dyn Host,
        player_id: &str,
        action: ActionId,
        input: &str,
    ) -> ActionOutcome {
        if let Err(reason) = self.is_enabled(player_id, action) {
            debug!(player = player_id, %action, %reason, "action ignored");
            return ActionOutcome::Ignored(reason);
        }
        match actions::entry(action.kind()) {
            Ok(entry) => (entry.handler)(self, host, player_id, action, input),
            Err(reason) => ActionOutcome::Ignored(reason),
        }
    }

    // Bots

    /// The next action for a bot, if it has one.
    pub fn bot_think(&mut self, player_id: &str) -> Option<ActionId> {
        let round = &self.state.round;
        if round.phase == Phase::ChooseWord && round.setter_id == player_id {
            return Some(ActionId::ChooseWord);
        }
        if round.phase != Phase::Guessing || round.guesser_id != player_id {
            return None;
        }

        let dictionary = self.dictionary();
        let player = self.player(player_id)?;
        bot::guesser::decide(&self.state.round, player, &self.state.options, &dictionary)
    }

    /// Text a bot types for `action`.
    pub fn bot_input(&mut self, player_id: &str, action: ActionId) -> String {
        let dictionary = self.dictionary();
        match action {
            ActionId::ChooseWord => {
                let rack = LetterRack::from_letters(self.state.round.rack.clone());
                bot::setter::choose_word(
                    &dictionary,
                    &rack,
                    self.effective_difficulty(player_id),
                    self.state.options.min_word_length,
                    self.state.options.max_word_length,
                )
            }
            ActionId::GuessWord => bot::guesser::word_guess_input(&self.state.round, &dictionary),
            _ => String::new(),
        }
    }

    /// Think, type and act for a bot in one go.
    pub fn play_bot_turn(&mut self, host: &mut dyn Host, player_id: &str) -> Option<ActionOutcome> {
        let action = self.bot_think(player_id)?;
        let input = if action.takes_input() {
            self.bot_input(player_id, action)
        } else {
            String::new()
        };
        Some(self.execute(host, player_id, action, &input))
    }

    // Results and snapshots

    pub fn build_game_result(&self) -> GameResult {
        GameResult::from_state(&self.state)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(&self.state)?)
    }

    /// Restore a match. The dictionary is reloaded on first use.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let state: MatchState = serde_json::from_str(json)?;
        Ok(Self {
            state,
            dictionary: None,
        })
    }

    // Action handlers, reached through the action table

    pub(crate) fn handle_choose_word(
        &mut self,
        host: &mut dyn Host,
        player_id: &str,
        _action: ActionId,
        input: &str,
    ) -> ActionOutcome {
        host.play_sound(SoundCue::Click, FULL_VOLUME);
        let dictionary = self.dictionary();
        let checked = validate_word(
            input,
            &self.state.round.rack,
            &self.state.options,
            Some(dictionary.as_ref()),
        );

        match checked {
            Ok(word) => {
                self.accept_word(host, &word);
                ActionOutcome::Applied
            }
            Err(rejection) => {
                debug!(player = player_id, %rejection, "word rejected");
                host.play_sound(SoundCue::SubmitInvalid, FULL_VOLUME);
                host.speak_to(player_id, &rejection.to_string());
                ActionOutcome::Rejected(rejection)
            }
        }
    }

    pub(crate) fn handle_guess_letter(
        &mut self,
        host: &mut dyn Host,
        _player_id: &str,
        action: ActionId,
        _input: &str,
    ) -> ActionOutcome {
        let ActionId::GuessLetter(letter) = action else {
            return ActionOutcome::Ignored(Ineligible::Unsupported(action.kind()));
        };
        let Some(g) = self.index_of(&self.state.round.guesser_id) else {
            return ActionOutcome::Ignored(Ineligible::NotYourTurn);
        };

        host.play_sound(SoundCue::Click2, 80);
        let guesser = &mut self.state.players[g];
        match resolver::guess_letter(&mut self.state.round, guesser, letter) {
            Some(report) => {
                self.report_guess(host, g, Some(letter), report);
                ActionOutcome::Applied
            }
            None => ActionOutcome::Ignored(Ineligible::AlreadyGuessed(letter)),
        }
    }

    pub(crate) fn handle_guess_word(
        &mut self,
        host: &mut dyn Host,
        player_id: &str,
        _action: ActionId,
        input: &str,
    ) -> ActionOutcome {
        let Some(g) = self.index_of(player_id) else {
            return ActionOutcome::Ignored(Ineligible::UnknownPlayer(player_id.to_string()));
        };

        host.play_sound(SoundCue::Click, FULL_VOLUME);
        let guesser = &mut self.state.players[g];
        let report = match resolver::guess_word(&mut self.state.round, guesser, input) {
            Ok(report) => report,
            Err(rejection) => {
                host.speak_to(player_id, "Word guess must contain letters only.");
                return ActionOutcome::Rejected(rejection);
            }
        };

        if report.correct {
            host.play_sound(SoundCue::HistoryCorrect, FULL_VOLUME);
            self.resolve_round(host, Resolution::GuesserSolved);
            return ActionOutcome::Applied;
        }

        self.report_strike(host, g, report.strike);
        let name = self.state.players[g].name().to_string();
        host.broadcast(&format!(
            "{} guessed the wrong word. {} mistakes left.",
            name,
            self.state.round.mistakes_left()
        ));
        match report.resolution {
            Some(resolution) => self.resolve_round(host, resolution),
            None => self.announce_guess_state(host),
        }
        ActionOutcome::Applied
    }

    pub(crate) fn handle_lifeline_reveal(
        &mut self,
        host: &mut dyn Host,
        player_id: &str,
        _action: ActionId,
        _input: &str,
    ) -> ActionOutcome {
        let Some(g) = self.index_of(player_id) else {
            return ActionOutcome::Ignored(Ineligible::UnknownPlayer(player_id.to_string()));
        };
        let (seed, round_number) = (self.state.rng_seed, self.state.round_number);
        let guesser = &mut self.state.players[g];
        let Some(report) = resolver::use_reveal(&mut self.state.round, guesser, seed, round_number)
        else {
            return ActionOutcome::Ignored(Ineligible::NoLifeline("reveal"));
        };

        host.play_sound(SoundCue::UseLifeline, FULL_VOLUME);
        host.play_sound(SoundCue::LifelineSlide, FULL_VOLUME);
        host.broadcast(&format!("{} used reveal lifeline.", self.state.players[g].name()));
        self.report_guess(host, g, None, report);
        ActionOutcome::Applied
    }

    pub(crate) fn handle_lifeline_remove(
        &mut self,
        host: &mut dyn Host,
        player_id: &str,
        _action: ActionId,
        _input: &str,
    ) -> ActionOutcome {
        let Some(g) = self.index_of(player_id) else {
            return ActionOutcome::Ignored(Ineligible::UnknownPlayer(player_id.to_string()));
        };
        if !resolver::use_remove(&mut self.state.round, &mut self.state.players[g]) {
            return ActionOutcome::Ignored(Ineligible::NoStrikes);
        }

        host.play_sound(SoundCue::UseLifeline, FULL_VOLUME);
        host.play_sound(SoundCue::LifelineBounce, FULL_VOLUME);
        host.broadcast(&format!(
            "{} removed one strike with a lifeline.",
            self.state.players[g].name()
        ));
        self.announce_guess_state(host);
        ActionOutcome::Applied
    }

    pub(crate) fn handle_lifeline_retry(
        &mut self,
        host: &mut dyn Host,
        player_id: &str,
        _action: ActionId,
        _input: &str,
    ) -> ActionOutcome {
        let Some(g) = self.index_of(player_id) else {
            return ActionOutcome::Ignored(Ineligible::UnknownPlayer(player_id.to_string()));
        };
        if !resolver::use_retry(&mut self.state.players[g]) {
            return ActionOutcome::Ignored(Ineligible::ShieldActive);
        }

        host.play_sound(SoundCue::UseLifeline, FULL_VOLUME);
        host.play_sound(SoundCue::LifelineBounce, FULL_VOLUME);
        host.broadcast(&format!(
            "{} activated retry shield lifeline.",
            self.state.players[g].name()
        ));
        ActionOutcome::Applied
    }

    /// Input is `"<bot name>|<difficulty>"`; unknown difficulties become medium.
    pub(crate) fn handle_set_bot_difficulty(
        &mut self,
        host: &mut dyn Host,
        _player_id: &str,
        _action: ActionId,
        input: &str,
    ) -> ActionOutcome {
        let Some((bot_name, difficulty)) = input.split_once('|') else {
            return ActionOutcome::Ignored(Ineligible::UnknownBot(input.to_string()));
        };
        let Some(bot) = self
            .state
            .players
            .iter()
            .find(|p| p.is_bot() && p.name() == bot_name)
        else {
            return ActionOutcome::Ignored(Ineligible::UnknownBot(bot_name.to_string()));
        };

        let bot_id = bot.id().to_string();
        let selected = BotDifficulty::normalize(difficulty);
        self.state.bot_difficulties.insert(bot_id, selected);
        info!(bot = bot_name, difficulty = %selected, "bot difficulty set");

        host.play_sound(SoundCue::Click, FULL_VOLUME);
        host.broadcast(&format!("{} bot difficulty set to {}.", bot_name, selected));
        ActionOutcome::Applied
    }

    // Round flow

    fn start_round(&mut self, host: &mut dyn Host) {
        let n = self.state.players.len();
        if n < PLAYER_COUNT {
            return;
        }

        self.state.round_number += 1;
        let round_number = self.state.round_number;
        let s = (round_number as usize - 1) % n;
        let g = round_number as usize % n;

        let rack = LetterRack::for_round(
            self.state.rng_seed,
            round_number,
            self.state.options.rack_size,
        );
        let spoken_rack = rack.spoken();
        let (setter_id, setter_name) = {
            let p = &self.state.players[s];
            (p.id().to_string(), p.name().to_string())
        };
        let guesser_name = self.state.players[g].name().to_string();

        self.state.round = RoundState::begin(&setter_id, self.state.players[g].id(), rack);
        self.state.players[s].retry_shield_active = false;
        self.state.players[g].retry_shield_active = false;

        info!(
            round = round_number,
            setter = %setter_name,
            guesser = %guesser_name,
            "round started"
        );

        host.play_sound(SoundCue::MenuOpen, FULL_VOLUME);
        host.play_sound(SoundCue::Avatar, 70);
        host.play_sound(SoundCue::Shuffle, 85);
        host.broadcast(&format!(
            "Round {}. {} is choosing a word, {} will guess.",
            round_number, setter_name, guesser_name
        ));
        host.speak_to(&setter_id, &format!("Your rack is: {}", spoken_rack));
        self.tell_spectators(host, &format!("Setter rack ({}): {}", setter_name, spoken_rack));
        self.show_boards(host);
    }

    fn accept_word(&mut self, host: &mut dyn Host, word: &str) {
        let (Some(s), Some(g)) = (
            self.index_of(&self.state.round.setter_id),
            self.index_of(&self.state.round.guesser_id),
        ) else {
            return;
        };

        self.state
            .round
            .set_secret(word, self.state.options.base_wrong_guesses);
        host.play_sound(SoundCue::SubmitValid, FULL_VOLUME);
        host.play_sound(SoundCue::MenuClose, FULL_VOLUME);
        self.spin_wheel(host, g);

        self.state.round.phase = Phase::Guessing;
        let max_wrong = self.state.round.max_wrong_guesses;
        info!(
            round = self.state.round_number,
            length = word.len(),
            max_wrong,
            "secret word accepted"
        );

        host.broadcast(&format!(
            "Word selected. The word has {} letters. Wrong guesses allowed: {}.",
            word.len(),
            max_wrong
        ));
        let setter_name = self.state.players[s].name().to_string();
        self.tell_spectators(
            host,
            &format!("Secret word chosen by {}: {}", setter_name, word.to_uppercase()),
        );
        self.announce_guess_state(host);
    }

    fn spin_wheel(&mut self, host: &mut dyn Host, g: usize) {
        host.play_sound(SoundCue::EnterWheel, FULL_VOLUME);
        host.play_sound(SoundCue::Roulette, FULL_VOLUME);
        for delay in ROULETTE_PING_DELAYS {
            self.schedule_sound(SoundCue::RoulettePing, delay);
        }

        let outcome = wheel::spin(
            self.state.rng_seed,
            self.state.round_number,
            self.state.round.secret_word.len(),
        );
        let guesser = &mut self.state.players[g];
        wheel::apply(outcome, &mut self.state.round, guesser);
        info!(round = self.state.round_number, %outcome, "wheel spun");

        host.play_sound(SoundCue::Drop, FULL_VOLUME);
        for cue in wheel_cues(outcome) {
            host.play_sound(*cue, FULL_VOLUME);
        }
        host.broadcast(&outcome.announcement(self.state.players[g].name()));
    }

    /// Announce a letter guess (typed or from a reveal) and end the round if
    /// it resolved.
    fn report_guess(
        &mut self,
        host: &mut dyn Host,
        g: usize,
        letter: Option<char>,
        report: GuessReport,
    ) {
        if report.correct {
            let streak = self.state.players[g].correct_streak;
            host.play_sound(SoundCue::HistoryCorrect, FULL_VOLUME);
            host.play_sound(SoundCue::correct_step(streak), FULL_VOLUME);
            if let (Some(letter), false) = (letter, report.from_lifeline) {
                host.broadcast(&format!(
                    "Correct. {} is in the word.",
                    letter.to_ascii_uppercase()
                ));
            }
        } else {
            self.report_strike(host, g, report.strike);
            if let Some(letter) = letter {
                host.broadcast(&format!(
                    "Wrong. {} is not in the word. {} mistakes left.",
                    letter.to_ascii_uppercase(),
                    self.state.round.mistakes_left()
                ));
            }
        }

        match report.resolution {
            Some(resolution) => self.resolve_round(host, resolution),
            None => self.announce_guess_state(host),
        }
    }

    fn report_strike(&mut self, host: &mut dyn Host, g: usize, strike: Option<Strike>) {
        match strike {
            Some(Strike::Absorbed) => {
                host.play_sound(SoundCue::LifelineBounce, FULL_VOLUME);
                host.play_sound(SoundCue::HistoryIncorrect, FULL_VOLUME);
                host.broadcast("Retry shield blocked the strike.");
            }
            Some(Strike::Recorded) => {
                let streak = self.state.players[g].wrong_streak;
                host.play_sound(SoundCue::HistoryIncorrect, FULL_VOLUME);
                host.play_sound(SoundCue::incorrect_step(streak), FULL_VOLUME);
            }
            None => {}
        }
    }

    fn resolve_round(&mut self, host: &mut dyn Host, resolution: Resolution) {
        let (Some(s), Some(g)) = (
            self.index_of(&self.state.round.setter_id),
            self.index_of(&self.state.round.guesser_id),
        ) else {
            return;
        };

        self.state.round.phase = Phase::RoundEnd;
        let multiplier = self.state.round.round_points_multiplier;
        let Some((setter, guesser)) = pair_mut(&mut self.state.players, s, g) else {
            return;
        };
        let setter_name = setter.name().to_string();
        let guesser_name = guesser.name().to_string();
        let settlement = scoring::settle(setter, guesser, resolution, multiplier);
        let winner_name = match resolution {
            Resolution::GuesserSolved => &guesser_name,
            Resolution::GuesserFailed => &setter_name,
        };

        host.play_sound(SoundCue::ScoreFlyup, FULL_VOLUME);
        host.play_sound(SoundCue::BuyPoints, FULL_VOLUME);
        if let Some(level) = settlement.level_up {
            info!(player = %winner_name, level, "level up");
            host.play_sound(SoundCue::LevelUp, FULL_VOLUME);
            host.play_sound(SoundCue::LevelUpMissions, FULL_VOLUME);
            host.play_sound(SoundCue::Popup, FULL_VOLUME);
            host.broadcast(&format!("{} reached level {}.", winner_name, level));
        }

        let secret = &self.state.round.secret_word;
        match resolution {
            Resolution::GuesserSolved => {
                host.play_sound(SoundCue::CorrectSequence(8), FULL_VOLUME);
                host.play_sound(SoundCue::Balloon, FULL_VOLUME);
                host.broadcast(&format!(
                    "{} solved '{}'. {} loses a balloon.",
                    guesser_name, secret, setter_name
                ));
            }
            Resolution::GuesserFailed => {
                host.play_sound(SoundCue::IncorrectSequence(8), FULL_VOLUME);
                host.play_sound(SoundCue::Balloon, FULL_VOLUME);
                host.broadcast(&format!(
                    "{} failed to solve '{}'. {} loses a balloon.",
                    guesser_name, secret, guesser_name
                ));
            }
        }
        info!(
            round = self.state.round_number,
            ?resolution,
            winner = %settlement.winner_id,
            points = settlement.points,
            "round resolved"
        );
        self.announce_balloons(host);

        let verdict = standings::evaluate(
            &self.state.players,
            self.state.round_number,
            &self.state.options,
        );
        match verdict {
            MatchVerdict::Continue => self.start_round(host),
            MatchVerdict::Finished { winner_id, reason } => self.finish(host, &winner_id, reason),
        }
    }

    fn finish(&mut self, host: &mut dyn Host, winner_id: &str, reason: EndReason) {
        self.state.round.phase = Phase::GameEnd;
        let winner_name = self
            .player(winner_id)
            .map(|p| p.name().to_string())
            .unwrap_or_default();

        let message = match &reason {
            EndReason::BalloonsExhausted { loser_ids } => {
                let names: Vec<&str> = loser_ids
                    .iter()
                    .filter_map(|id| self.player(id))
                    .map(Player::name)
                    .collect();
                format!(
                    "{} ran out of balloons. {} wins the match.",
                    names.join(", "),
                    winner_name
                )
            }
            EndReason::ScoreLimit { limit } => {
                format!("Score limit {} reached. {} wins the match.", limit, winner_name)
            }
            EndReason::RoundLimit { limit } => {
                format!("Round limit {} reached. {} wins the match.", limit, winner_name)
            }
        };

        info!(
            winner = %winner_name,
            rounds = self.state.round_number,
            ?reason,
            "match finished"
        );
        host.broadcast(&message);
        for player in &self.state.players {
            let cue = if player.id() == winner_id {
                SoundCue::Win
            } else {
                SoundCue::Lose
            };
            host.play_sound_for(player.id(), cue);
        }
    }

    // Announcements

    fn announce_guess_state(&self, host: &mut dyn Host) {
        let round = &self.state.round;
        host.broadcast(&format!(
            "Word: {}. Guessed letters: {}. Wrong {}/{}.",
            round.spoken_mask(),
            round.spoken_guesses(),
            round.wrong_guesses,
            round.max_wrong_guesses
        ));
        self.show_boards(host);
    }

    fn announce_balloons(&self, host: &mut dyn Host) {
        let parts: Vec<String> = self
            .state
            .players
            .iter()
            .map(|p| format!("{}: {} balloons", p.name(), p.balloons_remaining))
            .collect();
        host.broadcast(&parts.join(" | "));
    }

    fn tell_spectators(&self, host: &mut dyn Host, text: &str) {
        if self.state.options.spectators_see_all_actions {
            host.speak_to_spectators(text);
        }
    }

    fn show_boards(&self, host: &mut dyn Host) {
        for player in &self.state.players {
            self.tell_spectators(host, &player.board());
        }
    }
}

/// Extra cues that go with a wheel outcome.
fn wheel_cues(outcome: WheelOutcome) -> &'static [SoundCue] {
    match outcome {
        WheelOutcome::CoinBonus => &[SoundCue::BuyPoints, SoundCue::Pickup],
        WheelOutcome::ExtraGuess => &[SoundCue::Pickup],
        WheelOutcome::FewerGuess => &[SoundCue::Drop],
        WheelOutcome::DoublePoints => &[SoundCue::Multiplier],
        WheelOutcome::LifelineReveal => &[SoundCue::Pickup, SoundCue::LifelineSlide],
        WheelOutcome::LifelineRemove | WheelOutcome::LifelineRetry => {
            &[SoundCue::Pickup, SoundCue::LifelineBounce]
        }
        WheelOutcome::Nothing => &[SoundCue::Click2],
    }
}

/// Two distinct players, mutably.
fn pair_mut(players: &mut [Player], a: usize, b: usize) -> Option<(&mut Player, &mut Player)> {
    if a == b || a >= players.len() || b >= players.len() {
        return None;
    }
    if a < b {
        let (left, right) = players.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = players.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}
