//! Host-owned game session
//!
//! Holds at most one loop driver. Starting a new game always cleans up the
//! previous one first.

use crate::driver::{FrameTicket, LoopDriver};
use crate::error::GameError;
use crate::platform::{ControlScheme, InputAdapter, SharedClock};
use crate::renderer::{HudModel, Surface};
use crate::settings::PaintOptions;
use crate::sim::{GameData, GameSnapshot, SentimentGame};
use crate::tuning::{Difficulty, Tuning};

/// Everything needed to build a game besides its comments and surface
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub difficulty: Difficulty,
    pub tuning: Tuning,
    pub scheme: ControlScheme,
    pub paint: PaintOptions,
    pub seed: u64,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            tuning: Tuning::default(),
            scheme: ControlScheme::Keyboard,
            paint: PaintOptions::default(),
            seed: 0,
        }
    }
}

#[derive(Default)]
pub struct Session {
    driver: Option<LoopDriver>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and start a game, replacing any running one
    pub fn start_game(
        &mut self,
        game_data: &GameData,
        surface: Box<dyn Surface>,
        clock: SharedClock,
        options: LaunchOptions,
    ) -> Result<FrameTicket, GameError> {
        self.cleanup();

        let bindings = options.tuning.controls.clone();
        let mut game = SentimentGame::new(
            game_data,
            options.difficulty,
            options.tuning,
            clock,
            options.seed,
        )?;
        game.start();

        let input = InputAdapter::new(bindings, options.scheme);
        let mut driver = LoopDriver::new(game, surface, input, options.paint);
        let ticket = driver.begin();
        self.driver = Some(driver);
        Ok(ticket)
    }

    /// Reset the current game and run it again
    pub fn restart(&mut self) -> Option<FrameTicket> {
        let driver = self.driver.as_mut()?;
        log::info!("Restarting game");
        driver.restart()
    }

    pub fn toggle_pause(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            driver.game_mut().pause();
        }
    }

    pub fn frame(&mut self, ticket: FrameTicket, now_ms: f64) -> bool {
        self.driver
            .as_mut()
            .is_some_and(|d| d.frame(ticket, now_ms))
    }

    /// Stop the loop and drop the game
    pub fn cleanup(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            driver.cleanup();
        }
    }

    pub fn is_active(&self) -> bool {
        self.driver.is_some()
    }

    pub fn driver(&self) -> Option<&LoopDriver> {
        self.driver.as_ref()
    }

    pub fn driver_mut(&mut self) -> Option<&mut LoopDriver> {
        self.driver.as_mut()
    }

    pub fn input_mut(&mut self) -> Option<&mut InputAdapter> {
        self.driver.as_mut().map(|d| d.input_mut())
    }

    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.driver.as_ref().map(|d| d.game().snapshot())
    }

    pub fn hud(&self) -> Option<HudModel> {
        self.driver.as_ref().map(|d| d.hud())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualClock;
    use crate::renderer::RecordingSurface;
    use crate::sim::Phase;
    use crate::sim::testing::scenario_data;
    use std::rc::Rc;

    fn launch(session: &mut Session, clock: &Rc<ManualClock>) -> Result<FrameTicket, GameError> {
        session.start_game(
            &scenario_data(),
            Box::new(RecordingSurface::new()),
            clock.clone(),
            LaunchOptions::default(),
        )
    }

    #[test]
    fn test_start_game_runs() {
        let clock = Rc::new(ManualClock::new(0.0));
        let mut session = Session::new();
        let ticket = launch(&mut session, &clock).expect("starts");
        let snap = session.snapshot().expect("active");
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.max_possible_score, 175);
        assert!(session.frame(ticket, 16.0));
    }

    #[test]
    fn test_second_game_retires_first() {
        let clock = Rc::new(ManualClock::new(0.0));
        let mut session = Session::new();
        let first = launch(&mut session, &clock).expect("first");
        let second = launch(&mut session, &clock).expect("second");
        assert_ne!(first, second);
        assert!(!session.frame(first, 16.0));
        assert!(session.frame(second, 16.0));
    }

    #[test]
    fn test_empty_game_rejected() {
        let clock = Rc::new(ManualClock::new(0.0));
        let mut session = Session::new();
        let result = session.start_game(
            &GameData::single(Vec::new(), None),
            Box::new(RecordingSurface::new()),
            clock,
            LaunchOptions::default(),
        );
        assert!(matches!(result, Err(GameError::NoEnemies)));
        assert!(!session.is_active());
    }

    #[test]
    fn test_toggle_pause_and_restart() {
        let clock = Rc::new(ManualClock::new(0.0));
        let mut session = Session::new();
        let first = launch(&mut session, &clock).expect("starts");
        session.toggle_pause();
        assert!(session.snapshot().is_some_and(|s| s.paused));
        session.toggle_pause();
        assert!(session.snapshot().is_some_and(|s| !s.paused));

        let restarted = session.restart().expect("restarts");
        assert!(!session.frame(first, 16.0));
        assert!(session.frame(restarted, 16.0));
    }

    #[test]
    fn test_tuning_override_reaches_game() {
        let clock = Rc::new(ManualClock::new(0.0));
        let mut session = Session::new();
        let tuning = Tuning::from_json(r#"{"player":{"starting_health":40}}"#).expect("valid override");
        session
            .start_game(
                &scenario_data(),
                Box::new(RecordingSurface::new()),
                clock,
                LaunchOptions {
                    tuning,
                    ..LaunchOptions::default()
                },
            )
            .expect("starts");
        let snap = session.snapshot().expect("active");
        assert_eq!(snap.health, 40.0);
        assert_eq!(snap.max_possible_score, 175);
    }

    #[test]
    fn test_cleanup_is_final() {
        let clock = Rc::new(ManualClock::new(0.0));
        let mut session = Session::new();
        let ticket = launch(&mut session, &clock).expect("starts");
        session.cleanup();
        session.cleanup();
        assert!(!session.is_active());
        assert!(!session.frame(ticket, 16.0));
        assert!(session.restart().is_none());
        assert!(session.hud().is_none());
    }
}
