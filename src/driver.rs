//! Animation loop driver
//!
//! Owns one game, one drawing surface and the input adapter. The host calls
//! `frame()` once per display refresh with the ticket returned by `start()`;
//! a ticket stops working as soon as the loop is stopped or restarted, so a
//! callback that fires late exits without touching anything.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::platform::{InputAdapter, InputState, SharedClock};
use crate::renderer::{HudModel, Surface, paint_frame};
use crate::settings::PaintOptions;
use crate::sim::{Phase, SentimentGame};
use crate::sentiment::Sentiment;

/// Tickets are unique across every driver in the process
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one scheduled frame chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket(u64);

impl FrameTicket {
    fn issue() -> Self {
        FrameTicket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

pub struct LoopDriver {
    game: SentimentGame,
    surface: Box<dyn Surface>,
    clock: SharedClock,
    input: InputAdapter,
    options: PaintOptions,
    /// `Some` while running
    ticket: Option<FrameTicket>,
    last_frame_ms: f64,
    frames: u64,
    autopilot: bool,
}

impl LoopDriver {
    pub fn new(
        game: SentimentGame,
        surface: Box<dyn Surface>,
        input: InputAdapter,
        options: PaintOptions,
    ) -> Self {
        let clock = game.clock().clone();
        Self {
            game,
            surface,
            clock,
            input,
            options,
            ticket: None,
            last_frame_ms: 0.0,
            frames: 0,
            autopilot: false,
        }
    }

    /// Begin a frame chain. Returns `None` if one is already running.
    pub fn start(&mut self) -> Option<FrameTicket> {
        if self.ticket.is_some() {
            log::warn!("Loop already running");
            return None;
        }
        Some(self.begin())
    }

    /// Issue a new ticket, retiring any current chain
    pub(crate) fn begin(&mut self) -> FrameTicket {
        let ticket = FrameTicket::issue();
        self.ticket = Some(ticket);
        self.last_frame_ms = self.clock.now_ms();
        log::info!("Loop started");
        ticket
    }

    pub fn stop(&mut self) {
        if self.ticket.take().is_some() {
            log::info!("Loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticket.is_some()
    }

    /// Run one frame. Returns false (and does nothing) for a stale ticket.
    pub fn frame(&mut self, ticket: FrameTicket, now_ms: f64) -> bool {
        if self.ticket != Some(ticket) {
            return false;
        }

        let delta = now_ms - self.last_frame_ms;
        self.last_frame_ms = now_ms;

        if self.input.take_pause() {
            self.game.pause();
        }

        if self.game.phase() == Phase::Running {
            let input = if self.autopilot {
                autopilot(&self.game)
            } else {
                self.input.state()
            };
            let speed = self.game.player().speed;
            if input.left {
                self.game.move_player(-speed);
            }
            if input.right {
                self.game.move_player(speed);
            }
            if input.shoot {
                self.game.shoot(now_ms);
            }
        }

        self.game.update(delta, now_ms);
        paint_frame(self.surface.as_mut(), &self.game, now_ms, &self.options);
        self.frames += 1;
        true
    }

    /// Reset the game and begin a fresh frame chain
    pub fn restart(&mut self) -> Option<FrameTicket> {
        self.stop();
        self.game.reset();
        self.game.start();
        self.start()
    }

    /// Stop and release the input adapter
    pub fn cleanup(&mut self) {
        self.stop();
        self.input.detach();
        log::info!("Loop cleaned up after {} frames", self.frames);
    }

    pub fn hud(&self) -> HudModel {
        HudModel::from_snapshot(&self.game.snapshot(), &self.game.tuning().streaks)
    }

    pub fn game(&self) -> &SentimentGame {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut SentimentGame {
        &mut self.game
    }

    pub fn input_mut(&mut self) -> &mut InputAdapter {
        &mut self.input
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn set_paint_options(&mut self, options: PaintOptions) {
        self.options = options;
    }

    /// Let `autopilot()` steer instead of the input adapter
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }
}

/// Demo steering: dodge a hostile bubble about to land on the ship,
/// otherwise line up under the lowest bubble on screen and keep firing.
pub fn autopilot(game: &SentimentGame) -> InputState {
    let player = game.player();
    let center = player.pos.x + player.size.x / 2.0;
    let on_screen = game
        .enemies()
        .iter()
        .filter(|e| e.active && e.pos.y + e.size.y > 0.0);

    let threat = on_screen
        .clone()
        .filter(|e| e.sentiment == Sentiment::Negative)
        .filter(|e| e.pos.y + e.size.y > player.pos.y - player.size.y * 2.0)
        .find(|e| e.pos.x < player.pos.x + player.size.x && e.pos.x + e.size.x > player.pos.x);

    if let Some(e) = threat {
        let enemy_center = e.pos.x + e.size.x / 2.0;
        let go_left = center < enemy_center;
        return InputState {
            left: go_left,
            right: !go_left,
            shoot: true,
        };
    }

    let target = on_screen.max_by(|a, b| {
        (a.pos.y + a.size.y)
            .partial_cmp(&(b.pos.y + b.size.y))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let Some(target) = target else {
        return InputState {
            shoot: true,
            ..InputState::default()
        };
    };

    let dx = target.pos.x + target.size.x / 2.0 - center;
    InputState {
        left: dx < -player.speed,
        right: dx > player.speed,
        shoot: true,
    }
}
