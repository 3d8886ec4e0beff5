//! Error types for game construction and data ingestion
//!
//! Unknown difficulty or sentiment names never reach here: those fall back
//! to defaults with a warning.

use std::fmt;

#[derive(Debug)]
pub enum GameError {
    /// The canvas element or its 2D context could not be obtained
    SurfaceUnavailable(String),
    /// No playable enemies remained after building from the comments
    NoEnemies,
    /// Game data JSON did not match the expected shape
    InvalidGameData(String),
    /// Subreddit listing JSON did not match the expected shape
    InvalidListing(String),
    /// Tuning override JSON did not merge into the balance tables
    InvalidTuning(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::SurfaceUnavailable(what) => {
                write!(f, "drawing surface unavailable: {}", what)
            }
            GameError::NoEnemies => write!(f, "no comments to turn into enemies"),
            GameError::InvalidGameData(reason) => write!(f, "invalid game data: {}", reason),
            GameError::InvalidListing(reason) => {
                write!(f, "invalid subreddit listing: {}", reason)
            }
            GameError::InvalidTuning(reason) => write!(f, "invalid tuning override: {}", reason),
        }
    }
}

impl std::error::Error for GameError {}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::InvalidGameData(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(GameError::NoEnemies.to_string(), "no comments to turn into enemies");
        assert_eq!(
            GameError::SurfaceUnavailable("canvas #game".into()).to_string(),
            "drawing surface unavailable: canvas #game"
        );
    }

    #[test]
    fn test_json_error_converts_to_game_data_error() {
        let err: GameError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GameError::InvalidGameData(_)));
    }
}
