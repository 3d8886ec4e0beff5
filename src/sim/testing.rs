//! Fixtures shared by simulation, driver and renderer tests

use std::rc::Rc;

use super::{GameData, SentimentGame};
use crate::ingest::CommentRecord;
use crate::platform::ManualClock;
use crate::tuning::{Difficulty, Tuning};

pub(crate) fn record(text: &str, sentiment: &str) -> CommentRecord {
    CommentRecord {
        sentiment: Some(sentiment.to_string()),
        ..CommentRecord::new(text)
    }
}

/// One positive, one negative and one neutral comment
pub(crate) fn scenario_data() -> GameData {
    GameData::single(
        vec![
            record("great job", "positive"),
            record("terrible", "negative"),
            record("ok", "neutral"),
        ],
        Some("test".into()),
    )
}

pub(crate) fn game_from(data: &GameData) -> (SentimentGame, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new(1000.0));
    let game = SentimentGame::new(data, Difficulty::Normal, Tuning::default(), clock.clone(), 42)
        .expect("game builds");
    (game, clock)
}

pub(crate) fn game_with(records: Vec<CommentRecord>) -> (SentimentGame, Rc<ManualClock>) {
    game_from(&GameData::single(records, Some("test".into())))
}

pub(crate) fn new_game() -> (SentimentGame, Rc<ManualClock>) {
    game_from(&scenario_data())
}
