//! Crate-level errors.
//!
//! Game-play problems never surface here: rejected words come back as
//! [`WordRejection`](crate::game::validation::WordRejection) and ineligible
//! actions are dropped. These errors cover loading and saving.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
