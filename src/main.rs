//! hangin-sim - run bot-vs-bot Hangin' matches from the command line.
//!
//! Matches are seeded, so a seed and an options file reproduce a match
//! exactly. Table output goes to the log; final scores go to stdout.

use clap::Parser;
use hangin::config::{BotDifficulty, MatchOptions};
use hangin::engine::actions::{ActionId, ActionOutcome};
use hangin::engine::host::TracingHost;
use hangin::engine::result::GameResult;
use hangin::engine::Match;
use hangin::game::dictionary::Dictionary;
use hangin::game::player::PlayerIdentity;
use hangin::storage::SnapshotStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hangin-sim")]
#[command(about = "Play Hangin' with Friends matches between two bots")]
struct Args {
    /// Number of matches to play
    #[arg(short, long, default_value = "1")]
    matches: u32,

    /// Seed of the first match; later matches count up from it. Omit for
    /// random seeds
    #[arg(long)]
    seed: Option<u64>,

    /// Match options as JSON (missing fields take defaults)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Difficulty for the first bot
    #[arg(long, default_value = "medium")]
    first: BotDifficulty,

    /// Difficulty for the second bot
    #[arg(long, default_value = "medium")]
    second: BotDifficulty,

    /// Give up on a match after this many bot actions
    #[arg(long, default_value = "5000")]
    max_turns: u32,

    /// Record results (and final snapshots) in the local database
    #[arg(long)]
    record: bool,

    /// Database path, instead of the data directory
    #[arg(long, requires = "record")]
    db: Option<PathBuf>,

    /// Debug logging: sounds, spectator output and ignored actions
    #[arg(short, long)]
    verbose: bool,
}

const BOT_NAMES: [&str; 2] = ["Ada", "Bix"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let options = match &args.options {
        Some(path) => MatchOptions::from_json_file(path)?,
        None => MatchOptions::default(),
    };
    let problems = options.validate();
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("invalid option: {}", problem);
        }
        return Err(format!("{} invalid option(s)", problems.len()).into());
    }

    let store = if args.record {
        Some(match &args.db {
            Some(path) => SnapshotStore::open_at(path)?,
            None => SnapshotStore::open()?,
        })
    } else {
        None
    };

    let dictionary = Arc::new(Dictionary::load(&options));
    info!(words = dictionary.len(), source = ?dictionary.source(), "dictionary loaded");

    let mut wins = [0u32; 2];
    for index in 0..args.matches {
        let seed = args.seed.map(|s| s.wrapping_add(index as u64));
        let mut game = new_match(&options, &dictionary, seed, [args.first, args.second]);

        let errors = game.prestart_validate();
        if !errors.is_empty() {
            return Err(format!("cannot start match: {:?}", errors).into());
        }

        let finished = play(&mut game, args.max_turns);
        let result = game.build_game_result();
        print_result(index + 1, game.seed(), finished, &result);

        if let Some(winner) = &result.summary.winner_name {
            if let Some(slot) = BOT_NAMES.iter().position(|name| name == winner) {
                wins[slot] += 1;
            }
        }

        if let Some(store) = &store {
            store.save_snapshot(&format!("sim-{}", game.seed()), &game)?;
            if finished {
                store.record_result(&result)?;
            }
        }
    }

    if args.matches > 1 {
        println!(
            "Totals: {} {} wins ({}), {} {} wins ({})",
            BOT_NAMES[0], wins[0], args.first, BOT_NAMES[1], wins[1], args.second
        );
    }
    Ok(())
}

/// Two bots in the lobby, difficulties set through the host's action.
fn new_match(
    options: &MatchOptions,
    dictionary: &Arc<Dictionary>,
    seed: Option<u64>,
    difficulties: [BotDifficulty; 2],
) -> Match {
    let bots = BOT_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| PlayerIdentity::bot(format!("bot-{}", i + 1), *name))
        .collect();
    let mut game = Match::new(bots, options.clone()).with_dictionary(Arc::clone(dictionary));
    if let Some(seed) = seed {
        game = game.with_seed(seed);
    }

    let mut host = TracingHost;
    let host_id = game.state().host_id.clone();
    for (name, difficulty) in BOT_NAMES.iter().zip(difficulties) {
        let input = format!("{}|{}", name, difficulty);
        game.execute(&mut host, &host_id, ActionId::SetBotDifficulty, &input);
    }
    game
}

/// Tick the match and let each bot act until it ends. Returns false if the
/// turn limit ran out first.
fn play(game: &mut Match, max_turns: u32) -> bool {
    let mut host = TracingHost;
    let ids: Vec<String> = game.players().iter().map(|p| p.id().to_string()).collect();

    game.on_start(&mut host);
    let mut turns = 0;
    while !game.is_finished() {
        game.on_tick(&mut host);
        for id in &ids {
            let Some(outcome) = game.play_bot_turn(&mut host, id) else {
                continue;
            };
            turns += 1;
            if !matches!(outcome, ActionOutcome::Applied) {
                debug!(player = %id, ?outcome, "bot action not applied");
            }
        }
        if turns >= max_turns {
            warn!(seed = game.seed(), turns, "turn limit reached, abandoning match");
            return false;
        }
    }
    true
}

fn print_result(number: u32, seed: u64, finished: bool, result: &GameResult) {
    let status = if finished { "" } else { " (abandoned)" };
    println!(
        "Match {} (seed {}){}: {} rounds in {}",
        number,
        seed,
        status,
        result.summary.rounds_played,
        result.duration_text()
    );
    for line in result.format_end_screen() {
        println!("  {}", line);
    }
}
