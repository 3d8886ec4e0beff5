//! Sentiment Invaders - comments fall as enemies, shaped by their sentiment
//!
//! Core modules:
//! - `sim`: Simulation core (entities, collisions, weapon progression, game state)
//! - `renderer`: 2D canvas painting and HUD derivation
//! - `driver`: Animation loop that ties input, simulation and painting together
//! - `platform`: Clock and input abstraction
//! - `sentiment`: Lexicon-based text scoring
//! - `ingest`: Subreddit listings and pasted text to comment records
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod error;
pub mod ingest;
mod lexicon;
pub mod platform;
pub mod renderer;
pub mod sentiment;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::{FrameTicket, LoopDriver};
pub use error::GameError;
pub use session::{LaunchOptions, Session};
pub use settings::{ControlPreference, Settings};
pub use sim::{GameData, GameSnapshot, SentimentGame};
pub use tuning::{Difficulty, Tuning, WeaponKind};

/// Game configuration constants
pub mod consts {
    /// Logical canvas resolution
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player spawn offset from the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;

    /// Spread shot fan (degrees, 0 = straight up)
    pub const SPREAD_ANGLES: [f32; 3] = [-15.0, 0.0, 15.0];

    /// Viewports wider than this use keyboard controls
    pub const DESKTOP_MIN_WIDTH: f64 = 768.0;

    /// Label used when a record carries no subreddit
    pub const UNKNOWN_SUBREDDIT: &str = "Unknown";
    pub const UNTITLED_POST: &str = "Untitled";
}

/// Elapsed milliseconds as `m:ss`
pub fn format_time(elapsed_ms: f64) -> String {
    let total = (elapsed_ms.max(0.0) / 1000.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9_999.0), "0:09");
        assert_eq!(format_time(61_000.0), "1:01");
        assert_eq!(format_time(600_000.0), "10:00");
        assert_eq!(format_time(-5.0), "0:00");
    }
}
