//! The game object: construction, lifecycle and player actions
//!
//! Per-frame advancement lives in `tick.rs`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::factory::{build_enemies, spawn_y};
use super::state::{Bullet, Enemy, Explosion, GameSnapshot, Phase, Player, WeaponState};
use super::streak::{KillStreak, WeaponPath};
use crate::consts::{SPREAD_ANGLES, UNKNOWN_SUBREDDIT};
use crate::error::GameError;
use crate::ingest::CommentRecord;
use crate::platform::SharedClock;
use crate::tuning::{Difficulty, Tuning, WeaponKind};

/// One wave of comments from a single subreddit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Wave {
    pub subreddit: Option<String>,
    pub comments: Vec<CommentRecord>,
}

/// Comments handed to a new game by the host page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum GameData {
    Single {
        #[serde(default)]
        comments: Vec<CommentRecord>,
        #[serde(default)]
        subreddit: Option<String>,
    },
    /// Only the first wave is played
    Waves {
        #[serde(default)]
        waves: Vec<Wave>,
        #[serde(default)]
        subreddit: Option<String>,
    },
}

impl GameData {
    pub fn single(comments: Vec<CommentRecord>, subreddit: Option<String>) -> Self {
        GameData::Single {
            comments,
            subreddit,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn comments(&self) -> &[CommentRecord] {
        match self {
            GameData::Single { comments, .. } => comments,
            GameData::Waves { waves, .. } => waves.first().map(|w| w.comments.as_slice()).unwrap_or(&[]),
        }
    }

    pub fn subreddit(&self) -> Option<&str> {
        match self {
            GameData::Single { subreddit, .. } => subreddit.as_deref(),
            GameData::Waves { waves, subreddit } => subreddit
                .as_deref()
                .or_else(|| waves.first().and_then(|w| w.subreddit.as_deref())),
        }
    }
}

/// Authoritative state of one game
pub struct SentimentGame {
    pub(super) tuning: Tuning,
    pub(super) difficulty: Difficulty,
    pub(super) clock: SharedClock,
    pub(super) rng: Pcg32,
    pub(super) width: f32,
    pub(super) height: f32,

    pub(super) player: Player,
    /// Live enemies; inactive ones are dropped on the next enemy pass
    pub(super) enemies: Vec<Enemy>,
    /// Every enemy as constructed, restored by `reset()`
    pub(super) roster: Vec<Enemy>,
    pub(super) bullets: Vec<Bullet>,
    pub(super) explosions: Vec<Explosion>,
    pub(super) weapon: WeaponState,
    pub(super) streak: KillStreak,

    pub(super) score: u64,
    pub(super) combo: u32,
    pub(super) combo_timer_ms: f64,
    pub(super) max_possible_score: u64,
    pub(super) total_enemies: usize,

    pub(super) phase: Phase,
    pub(super) started_at: f64,
    pub(super) ended_at: Option<f64>,
    pub(super) elapsed_ms: f64,
    pub(super) victory: bool,
    pub(super) subreddit: String,
}

impl SentimentGame {
    /// Build a game from scored comments. Fails when no comment yields an enemy.
    pub fn new(
        game_data: &GameData,
        difficulty: Difficulty,
        tuning: Tuning,
        clock: SharedClock,
        seed: u64,
    ) -> Result<Self, GameError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let subreddit = game_data
            .subreddit()
            .unwrap_or(UNKNOWN_SUBREDDIT)
            .to_string();
        let profile = tuning.difficulty(difficulty);
        log::info!(
            "Initializing game: {} difficulty, r/{}, {} comments",
            profile.name,
            subreddit,
            game_data.comments().len()
        );

        let enemies = build_enemies(
            game_data.comments(),
            profile,
            &tuning,
            Some(&subreddit),
            &mut rng,
        );
        if enemies.is_empty() {
            return Err(GameError::NoEnemies);
        }

        let max_possible_score = enemies.iter().map(|e| u64::from(e.points)).sum();
        let total_enemies = enemies.len();
        let width = tuning.canvas.width;
        let height = tuning.canvas.height;

        let game = Self {
            player: Player::spawn(&tuning.player, width, height),
            weapon: WeaponState::new(tuning.weapon(WeaponKind::Normal).clone()),
            roster: enemies.clone(),
            enemies,
            bullets: Vec::new(),
            explosions: Vec::new(),
            streak: KillStreak::default(),
            score: 0,
            combo: 0,
            combo_timer_ms: 0.0,
            max_possible_score,
            total_enemies,
            phase: Phase::Ready,
            started_at: 0.0,
            ended_at: None,
            elapsed_ms: 0.0,
            victory: false,
            subreddit,
            tuning,
            difficulty,
            clock,
            rng,
            width,
            height,
        };
        log::info!(
            "Game initialized: {} enemies, max possible score {}",
            game.total_enemies,
            game.max_possible_score
        );
        Ok(game)
    }

    /// `Ready -> Running`
    pub fn start(&mut self) {
        if self.phase != Phase::Ready {
            log::warn!("start() ignored in {:?}", self.phase);
            return;
        }
        self.phase = Phase::Running;
        self.started_at = self.clock.now_ms();
        self.ended_at = None;
        self.elapsed_ms = 0.0;
        self.victory = false;
        log::info!("Game started");
    }

    /// Toggle `Running <-> Paused`
    pub fn pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => {
                log::debug!("pause() ignored in {:?}", other);
                return;
            }
        };
        log::info!(
            "{}",
            if self.phase == Phase::Paused {
                "Paused"
            } else {
                "Resumed"
            }
        );
    }

    /// Back to `Ready` with the constructed enemy set
    pub fn reset(&mut self) {
        self.player = Player::spawn(&self.tuning.player, self.width, self.height);
        self.weapon = WeaponState::new(self.tuning.weapon(WeaponKind::Normal).clone());
        self.streak = KillStreak::default();
        self.score = 0;
        self.combo = 0;
        self.combo_timer_ms = 0.0;
        self.bullets.clear();
        self.explosions.clear();
        self.phase = Phase::Ready;
        self.started_at = 0.0;
        self.ended_at = None;
        self.elapsed_ms = 0.0;
        self.victory = false;

        let stagger = self.tuning.flow.spawn_stagger;
        let mut enemies = self.roster.clone();
        for enemy in &mut enemies {
            enemy.pos.y = spawn_y(enemy.size.y, stagger, &mut self.rng);
            enemy.active = true;
            enemy.health = enemy.max_health;
        }
        self.enemies = enemies;
        log::info!("Game reset: {} enemies restored", self.enemies.len());
    }

    /// Shift the player horizontally if it stays inside the side margins
    pub fn move_player(&mut self, dx: f32) {
        let margin = self.tuning.canvas.margin;
        let new_x = self.player.pos.x + dx;
        if new_x >= margin && new_x <= self.width - self.player.size.x - margin {
            self.player.pos.x = new_x;
        }
    }

    /// Fire the equipped weapon if its fire-rate interval has passed
    pub fn shoot(&mut self, now_ms: f64) -> bool {
        let stats = &self.weapon.stats;
        if now_ms - self.weapon.last_shot_ms < stats.fire_rate_ms {
            return false;
        }

        let angles: &[f32] = if self.weapon.kind == WeaponKind::SpreadShot {
            &SPREAD_ANGLES
        } else {
            &[0.0]
        };
        let origin = glam::Vec2::new(
            self.player.pos.x + self.player.size.x / 2.0,
            self.player.pos.y,
        );
        for &angle_deg in angles {
            self.bullets.push(Bullet {
                pos: origin,
                size: stats.bullet_size * 2.0,
                speed: stats.bullet_speed,
                damage: stats.damage,
                color: stats.bullet_color.clone(),
                angle_deg,
                active: true,
            });
        }
        self.weapon.last_shot_ms = now_ms;
        log::debug!(
            "{} fired ({} bullets active)",
            self.weapon.stats.name,
            self.bullets.len()
        );
        true
    }

    /// Record the outcome. Only the first call has any effect.
    pub fn end_game(&mut self, victory: bool) {
        if self.ended_at.is_some() {
            log::debug!("end_game() already triggered");
            return;
        }
        let now = self.clock.now_ms();
        self.ended_at = Some(now);
        self.elapsed_ms = now - self.started_at;
        self.phase = Phase::Over;
        self.victory = victory;
        log::info!(
            "{}: score {}/{} ({}%) in {}, {}",
            if victory { "VICTORY" } else { "GAME OVER" },
            self.score,
            self.max_possible_score,
            self.score_percentage(),
            crate::format_time(self.elapsed_ms),
            self.tuning.endgame.tier(self.score_percentage()).rating_label()
        );
    }

    /// Replace the whole weapon. Re-equipping the current kind is a no-op.
    pub(super) fn upgrade_weapon(&mut self, kind: WeaponKind, path: WeaponPath) {
        if self.weapon.kind == kind {
            log::debug!("Already using {:?}, no change", kind);
            return;
        }
        let old = self.weapon.kind;
        self.weapon.kind = kind;
        self.weapon.stats = self.tuning.weapon(kind).clone();
        self.weapon.path = path;
        self.weapon.expires_at = None;
        log::info!("Weapon upgrade: {:?} -> {:?} ({} path)", old, kind, path.as_str());
    }

    /// Timed weapon from collecting a positive comment
    pub(super) fn grant_power_up(&mut self, now_ms: f64) {
        let next = match self.weapon.kind {
            WeaponKind::Normal => WeaponKind::FasterFireRate,
            WeaponKind::FasterFireRate => WeaponKind::BiggerBullets,
            _ => WeaponKind::Ultimate,
        };
        self.weapon.kind = next;
        self.weapon.stats = self.tuning.weapon(next).clone();
        self.weapon.expires_at = self.weapon.stats.duration_ms.map(|d| now_ms + d);
        log::info!("Power-up: {}", self.weapon.stats.name);
    }

    pub(super) fn add_score(&mut self, points: u64) {
        self.score = (self.score + points).min(self.max_possible_score);
    }

    pub fn score_percentage(&self) -> u32 {
        if self.max_possible_score == 0 {
            return 0;
        }
        (self.score as f64 / self.max_possible_score as f64 * 100.0).round() as u32
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let percentage = self.score_percentage();
        let tier = self.tuning.endgame.tier(percentage);
        let now = self.clock.now_ms();
        GameSnapshot {
            score: self.score,
            health: self.player.health,
            max_health: self.player.max_health,
            weapon: self.weapon.kind,
            weapon_name: self.weapon.stats.name.clone(),
            weapon_icon: self.weapon.stats.icon.clone(),
            power_up_remaining_ms: self.weapon.expires_at.map(|t| (t - now).max(0.0)),
            combo: self.combo,
            phase: self.phase,
            game_over: self.phase == Phase::Over,
            paused: self.phase == Phase::Paused,
            started: matches!(self.phase, Phase::Running | Phase::Paused),
            elapsed_seconds: self.elapsed_ms / 1000.0,
            formatted_time: crate::format_time(self.elapsed_ms),
            victory: self.victory,
            max_possible_score: self.max_possible_score,
            score_percentage: percentage,
            tier,
            performance_rating: tier.rating_label().to_string(),
            active_enemies: self.enemies.iter().filter(|e| e.active).count(),
            total_enemies: self.total_enemies,
            negative_kills: self.streak.negative,
            positive_kills: self.streak.positive,
            neutral_kills: self.streak.neutral,
            weapon_path: self.weapon.path,
            subreddit: self.subreddit.clone(),
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn weapon(&self) -> &WeaponState {
        &self.weapon
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn max_possible_score(&self) -> u64 {
        self.max_possible_score
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualClock;
    use crate::sim::testing::new_game;
    use std::rc::Rc;

    #[test]
    fn test_scenario_three_comments() {
        let (game, _) = new_game();
        assert_eq!(game.enemies().len(), 3);
        assert_eq!(game.max_possible_score(), 175);
        assert_eq!(game.phase(), Phase::Ready);
        assert_eq!(game.subreddit(), "test");
    }

    #[test]
    fn test_empty_comments_rejected() {
        let clock: SharedClock = Rc::new(ManualClock::new(0.0));
        let data = GameData::single(vec![CommentRecord::new("  ")], None);
        let result = SentimentGame::new(&data, Difficulty::Easy, Tuning::default(), clock, 1);
        assert!(matches!(result, Err(GameError::NoEnemies)));
    }

    #[test]
    fn test_start_twice_is_once() {
        let (mut game, clock) = new_game();
        game.start();
        assert_eq!(game.started_at(), 1000.0);
        clock.advance(500.0);
        game.start();
        assert_eq!(game.started_at(), 1000.0);
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn test_pause_only_while_playing() {
        let (mut game, _) = new_game();
        game.pause();
        assert_eq!(game.phase(), Phase::Ready);
        game.start();
        game.pause();
        assert_eq!(game.phase(), Phase::Paused);
        game.pause();
        assert_eq!(game.phase(), Phase::Running);
        game.end_game(false);
        game.pause();
        assert_eq!(game.phase(), Phase::Over);
    }

    #[test]
    fn test_end_game_first_call_wins() {
        let (mut game, clock) = new_game();
        game.start();
        clock.advance(3_000.0);
        game.end_game(true);
        clock.advance(3_000.0);
        game.end_game(false);
        let snap = game.snapshot();
        assert!(snap.victory);
        assert!(snap.game_over);
        assert_eq!(snap.formatted_time, "0:03");
    }

    #[test]
    fn test_move_player_respects_margins() {
        let (mut game, _) = new_game();
        let start = game.player().pos.x;
        game.move_player(6.0);
        assert_eq!(game.player().pos.x, start + 6.0);
        game.move_player(1000.0);
        assert_eq!(game.player().pos.x, start + 6.0);
        game.move_player(-start);
        assert_eq!(game.player().pos.x, start + 6.0);
        game.move_player(-(start + 6.0 - 20.0));
        assert_eq!(game.player().pos.x, 20.0);
    }

    #[test]
    fn test_fire_rate_limits_shots() {
        let (mut game, _) = new_game();
        assert!(game.shoot(1000.0));
        assert_eq!(game.bullets().len(), 1);
        assert!(!game.shoot(1150.0));
        assert_eq!(game.bullets().len(), 1);
        assert!(game.shoot(1200.0));
        assert_eq!(game.bullets().len(), 2);
    }

    #[test]
    fn test_spread_shot_fires_three() {
        let (mut game, _) = new_game();
        game.upgrade_weapon(WeaponKind::SpreadShot, WeaponPath::Positive);
        assert!(game.shoot(0.0));
        let angles: Vec<f32> = game.bullets().iter().map(|b| b.angle_deg).collect();
        assert_eq!(angles, vec![-15.0, 0.0, 15.0]);
        assert!(game.bullets().iter().all(|b| b.size == 14.0));
    }

    #[test]
    fn test_bullet_spawns_top_center() {
        let (mut game, _) = new_game();
        let p = game.player().clone();
        game.shoot(0.0);
        let b = &game.bullets()[0];
        assert_eq!(b.pos, glam::Vec2::new(p.pos.x + p.size.x / 2.0, p.pos.y));
        assert_eq!(b.size, 12.0);
    }

    #[test]
    fn test_power_up_chain() {
        let (mut game, _) = new_game();
        game.grant_power_up(0.0);
        assert_eq!(game.weapon().kind, WeaponKind::FasterFireRate);
        assert_eq!(game.weapon().expires_at, Some(5000.0));
        game.grant_power_up(100.0);
        assert_eq!(game.weapon().kind, WeaponKind::BiggerBullets);
        game.grant_power_up(200.0);
        assert_eq!(game.weapon().kind, WeaponKind::Ultimate);
        game.grant_power_up(300.0);
        assert_eq!(game.weapon().kind, WeaponKind::Ultimate);
        assert_eq!(game.weapon().expires_at, Some(5300.0));
    }

    #[test]
    fn test_streak_upgrade_clears_expiry() {
        let (mut game, _) = new_game();
        game.grant_power_up(0.0);
        game.upgrade_weapon(WeaponKind::SpreadShot, WeaponPath::Positive);
        assert_eq!(game.weapon().expires_at, None);
        assert_eq!(game.weapon().path, WeaponPath::Positive);
    }

    #[test]
    fn test_score_is_clamped() {
        let (mut game, _) = new_game();
        game.add_score(150);
        game.add_score(150);
        assert_eq!(game.score(), 175);
        assert_eq!(game.score_percentage(), 100);
    }

    #[test]
    fn test_waves_mode_plays_first_wave() {
        let json = r#"{
            "mode": "waves",
            "waves": [
                {"subreddit": "first", "comments": [{"text": "a", "sentiment": "negative"}]},
                {"subreddit": "second", "comments": [{"text": "b"}, {"text": "c"}]}
            ]
        }"#;
        let data = GameData::from_json(json).expect("valid game data");
        assert_eq!(data.comments().len(), 1);
        assert_eq!(data.subreddit(), Some("first"));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = GameData::from_json(r#"{"mode": "endless"}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidGameData(_)));
    }
}
