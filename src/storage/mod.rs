//! Persistent storage using SQLite (rusqlite)
//!
//! Holds match snapshots (the serialized [`MatchState`](crate::engine::MatchState)
//! keyed by a caller-chosen match id) and an append-only log of finished
//! match results. The database lives in the OS-standard data directory
//! unless a path is given.

use crate::engine::result::GameResult;
use crate::engine::Match;
use crate::error::EngineError;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info};

/// Current schema version. Bump this when making schema changes.
const SCHEMA_VERSION: u32 = 1;

const DB_FILE: &str = "hangin.db";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("could not determine data directory")]
    NoDataDirectory,
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(std::io::Error),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] EngineError),
    #[error("result encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// OS-standard data directory:
/// - Linux: `$XDG_DATA_HOME/hangin/` or `~/.local/share/hangin/`
/// - macOS: `~/Library/Application Support/hangin/`
pub fn data_dir() -> Result<PathBuf, StorageError> {
    ProjectDirs::from("", "", "hangin")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(StorageError::NoDataDirectory)
}

/// A stored snapshot, without its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub match_id: String,
    /// Unix timestamp (milliseconds) of the last save
    pub updated_at: i64,
}

pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open or create the database in the data directory.
    pub fn open() -> Result<Self, StorageError> {
        let dir = data_dir()?;
        std::fs::create_dir_all(&dir).map_err(StorageError::CreateDirFailed)?;
        Self::open_at(&dir.join(DB_FILE))
    }

    /// Open or create the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(StorageError::CreateDirFailed)?;
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.initialize_schema()?;
        debug!(path = %path.display(), "snapshot store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Save (or overwrite) the snapshot for `match_id`.
    pub fn save_snapshot(&self, match_id: &str, game: &Match) -> Result<(), StorageError> {
        let state = game.to_json()?;
        self.conn.execute(
            "INSERT INTO snapshots (match_id, state, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(match_id)
             DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at",
            params![match_id, state, now_ms()],
        )?;
        debug!(match_id, round = game.state().round_number, "snapshot saved");
        Ok(())
    }

    /// Restore the match saved under `match_id`, if any.
    pub fn load_snapshot(&self, match_id: &str) -> Result<Option<Match>, StorageError> {
        let state: Option<String> = self
            .conn
            .query_row(
                "SELECT state FROM snapshots WHERE match_id = ?1",
                params![match_id],
                |row| row.get(0),
            )
            .optional()?;

        match state {
            Some(json) => Ok(Some(Match::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Returns true if a snapshot was deleted.
    pub fn delete_snapshot(&self, match_id: &str) -> Result<bool, StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM snapshots WHERE match_id = ?1", params![match_id])?;
        Ok(deleted > 0)
    }

    /// Every snapshot, most recently saved first.
    pub fn list_snapshots(&self) -> Result<Vec<SnapshotInfo>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT match_id, updated_at FROM snapshots ORDER BY updated_at DESC, match_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SnapshotInfo {
                match_id: row.get(0)?,
                updated_at: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Append a finished match to the results log. Returns its row id.
    pub fn record_result(&self, result: &GameResult) -> Result<i64, StorageError> {
        let payload = serde_json::to_string(result)?;
        self.conn.execute(
            "INSERT INTO results (game_type, winner_name, rounds_played, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &result.game_type,
                &result.summary.winner_name,
                result.summary.rounds_played,
                payload,
                now_ms()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(
            id,
            winner = result.summary.winner_name.as_deref().unwrap_or("-"),
            rounds = result.summary.rounds_played,
            "result recorded"
        );
        Ok(id)
    }

    /// All recorded results, oldest first.
    pub fn results(&self) -> Result<Vec<GameResult>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT payload FROM results ORDER BY id")?;
        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(payloads.len());
        for payload in payloads {
            results.push(serde_json::from_str(&payload)?);
        }
        Ok(results)
    }

    /// Wins per player name across all recorded results, most wins first.
    pub fn win_counts(&self) -> Result<Vec<(String, i64)>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT winner_name, COUNT(*) AS wins FROM results
             WHERE winner_name IS NOT NULL
             GROUP BY winner_name ORDER BY wins DESC, winner_name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // Schema

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema()?;
        } else if current_version > SCHEMA_VERSION {
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: Option<u32> = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| row.get(0))
            .optional()?;
        Ok(version.unwrap_or(0))
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Latest state per match; overwritten on every save
            CREATE TABLE snapshots (
                match_id TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );

            -- Append-only; one row per finished match
            CREATE TABLE results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                game_type TEXT NOT NULL,
                winner_name TEXT,
                rounds_played INTEGER NOT NULL,
                payload TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX idx_results_winner ON results (winner_name);
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_ms()],
        )?;
        Ok(())
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchOptions;
    use crate::engine::actions::ActionId;
    use crate::engine::host::RecordingHost;
    use crate::game::dictionary::Dictionary;
    use crate::game::player::PlayerIdentity;
    use std::sync::Arc;

    fn started_match() -> Match {
        let mut game = Match::new(
            vec![PlayerIdentity::human("a", "Ann"), PlayerIdentity::bot("b", "Bolt")],
            MatchOptions::default(),
        )
        .with_seed(42)
        .with_dictionary(Arc::new(Dictionary::from_words(["cat", "tea"], 3, 8)));
        game.on_start(&mut RecordingHost::new());
        game
    }

    fn finished_match() -> Match {
        let mut game = Match::new(
            vec![PlayerIdentity::human("a", "Ann"), PlayerIdentity::bot("b", "Bolt")],
            MatchOptions {
                starting_balloons: 1,
                dictionary_mode: crate::config::DictionaryMode::Off,
                ..Default::default()
            },
        )
        .with_seed(42)
        .with_dictionary(Arc::new(Dictionary::from_words(["cat"], 3, 8)));
        let mut host = RecordingHost::new();
        game.on_start(&mut host);
        game.execute(&mut host, "a", ActionId::ChooseWord, "cat");
        game.execute(&mut host, "b", ActionId::GuessWord, "cat");
        assert!(game.is_finished());
        game
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let store = SnapshotStore::open_in_memory().unwrap();
        let game = started_match();

        store.save_snapshot("table-1", &game).unwrap();
        let restored = store.load_snapshot("table-1").unwrap().unwrap();
        assert_eq!(restored.state(), game.state());
    }

    #[test]
    fn test_missing_snapshot() {
        let store = SnapshotStore::open_in_memory().unwrap();
        assert!(store.load_snapshot("nope").unwrap().is_none());
        assert!(!store.delete_snapshot("nope").unwrap());
    }

    #[test]
    fn test_save_overwrites() {
        let store = SnapshotStore::open_in_memory().unwrap();
        let mut game = started_match();
        store.save_snapshot("t", &game).unwrap();

        game.on_tick(&mut RecordingHost::new());
        store.save_snapshot("t", &game).unwrap();

        let listed = store.list_snapshots().unwrap();
        assert_eq!(listed.len(), 1);
        let restored = store.load_snapshot("t").unwrap().unwrap();
        assert_eq!(restored.state().tick, 1);
    }

    #[test]
    fn test_delete_snapshot() {
        let store = SnapshotStore::open_in_memory().unwrap();
        store.save_snapshot("a", &started_match()).unwrap();
        store.save_snapshot("b", &started_match()).unwrap();

        assert!(store.delete_snapshot("a").unwrap());
        let ids: Vec<String> = store
            .list_snapshots()
            .unwrap()
            .into_iter()
            .map(|s| s.match_id)
            .collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn test_results_log() {
        let store = SnapshotStore::open_in_memory().unwrap();
        let result = finished_match().build_game_result();

        let first = store.record_result(&result).unwrap();
        let second = store.record_result(&result).unwrap();
        assert!(second > first);

        let results = store.results().unwrap();
        assert_eq!(results, vec![result.clone(), result]);
        assert_eq!(store.win_counts().unwrap(), vec![("Bolt".to_string(), 2)]);
    }

    #[test]
    fn test_reopen_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(DB_FILE);
        let game = started_match();
        {
            let store = SnapshotStore::open_at(&path).unwrap();
            store.save_snapshot("t", &game).unwrap();
        }

        let store = SnapshotStore::open_at(&path).unwrap();
        let restored = store.load_snapshot("t").unwrap().unwrap();
        assert_eq!(restored.state(), game.state());
    }

    #[test]
    fn test_fresh_schema() {
        let store = SnapshotStore::open_in_memory().unwrap();
        assert_eq!(store.get_schema_version().unwrap(), 1);
        let tables: Vec<String> = store
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(["meta", "results", "snapshots"]
            .iter()
            .all(|t| tables.iter().any(|name| name == t)));
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DB_FILE);
        SnapshotStore::open_at(&path).unwrap();

        let store = SnapshotStore::open_at(&path).unwrap();
        assert_eq!(store.get_schema_version().unwrap(), SCHEMA_VERSION);
        let rows: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM meta", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_future_schema_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DB_FILE);
        {
            let store = SnapshotStore::open_at(&path).unwrap();
            store
                .conn
                .execute("UPDATE meta SET schema_version = 99", [])
                .unwrap();
        }

        assert!(matches!(
            SnapshotStore::open_at(&path),
            Err(StorageError::FutureSchemaVersion {
                found: 99,
                supported: SCHEMA_VERSION
            })
        ));
    }

    #[test]
    fn test_data_dir() {
        if let Ok(path) = data_dir() {
            assert!(path.to_string_lossy().contains("hangin"));
        }
    }
}
