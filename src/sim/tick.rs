//! Per-frame simulation step
//!
//! Movement is in pixels per frame; timers (explosions, combo, power-ups,
//! invulnerability) run on milliseconds from the caller.

use super::game::SentimentGame;
use super::state::{Explosion, Phase};
use crate::sentiment::Sentiment;
use crate::tuning::WeaponKind;

impl SentimentGame {
    /// Advance one frame. Does nothing unless the game is running.
    pub fn update(&mut self, delta_ms: f64, now_ms: f64) {
        if self.phase != Phase::Running {
            return;
        }

        self.elapsed_ms = now_ms - self.started_at;

        self.update_bullets();
        self.update_enemies();
        self.update_explosions(delta_ms);
        self.resolve_collisions(now_ms);
        self.update_power_up(now_ms);
        self.update_combo(delta_ms);

        self.check_win();
        if self.player.health <= 0.0 {
            self.end_game(false);
        }
    }

    fn update_bullets(&mut self) {
        let width = self.width;
        for bullet in &mut self.bullets {
            bullet.advance();
        }
        self.bullets
            .retain(|b| b.pos.y >= -b.size && b.pos.x >= 0.0 && b.pos.x <= width);
    }

    fn update_enemies(&mut self) {
        // Deactivated last frame (destroyed, collected or escaped)
        self.enemies.retain(|e| e.active);

        let height = self.height;
        for enemy in &mut self.enemies {
            enemy.pos.y += enemy.speed;
            if enemy.pos.y > height {
                enemy.active = false;
                log::debug!("Enemy {} fell off screen", enemy.id);
            }
        }
    }

    fn update_explosions(&mut self, delta_ms: f64) {
        let duration = self.tuning.effects.explosion_duration_ms;
        for explosion in &mut self.explosions {
            explosion.step(delta_ms);
        }
        self.explosions.retain(|e| e.age_ms < duration);
    }

    fn resolve_collisions(&mut self, now_ms: f64) {
        // Newest first on both sides. Each bullet hits at most one enemy
        // and is spent either way.
        for bi in (0..self.bullets.len()).rev() {
            let bounds = self.bullets[bi].bounds();
            let Some(ei) = self
                .enemies
                .iter()
                .rposition(|e| e.active && e.bounds().overlaps(&bounds))
            else {
                continue;
            };

            self.bullets[bi].active = false;
            let enemy = &mut self.enemies[ei];
            enemy.health -= self.bullets[bi].damage;
            if enemy.health <= 0.0 {
                self.destroy_enemy(ei);
            }
        }
        self.bullets.retain(|b| b.active);

        if !self.player.invulnerable {
            let bounds = self.player.bounds();
            if let Some(ei) = self
                .enemies
                .iter()
                .rposition(|e| e.active && e.bounds().overlaps(&bounds))
            {
                self.handle_player_hit(ei, now_ms);
            }
        }
    }

    pub(super) fn destroy_enemy(&mut self, index: usize) {
        let enemy = &mut self.enemies[index];
        enemy.active = false;
        let sentiment = enemy.sentiment;
        let points = enemy.points;
        let center = enemy.bounds().center();
        let color = enemy.palette.stroke.clone();
        let id = enemy.id;

        let multiplier = 1.0 + f64::from(self.combo) * f64::from(self.tuning.scoring.combo_step);
        let awarded = (f64::from(points) * multiplier).floor() as u64;
        self.add_score(awarded);
        self.combo += 1;
        self.combo_timer_ms = self.tuning.scoring.combo_window_ms;

        let fx = &self.tuning.effects;
        self.explosions.push(Explosion::burst(
            center,
            &color,
            fx.explosion_particles,
            fx.particle_speed,
            fx.particle_size,
            fx.particle_fade,
        ));

        log::debug!(
            "Enemy {} ({}) destroyed: +{} (score {}, combo {})",
            id,
            sentiment.as_str(),
            awarded,
            self.score,
            self.combo
        );
        self.track_kill(sentiment);
    }

    fn track_kill(&mut self, sentiment: Sentiment) {
        self.streak.record(sentiment);
        for (kind, path) in self.streak.upgrades(&self.tuning.streaks) {
            self.upgrade_weapon(kind, path);
        }
    }

    fn handle_player_hit(&mut self, index: usize, now_ms: f64) {
        let enemy = &mut self.enemies[index];
        enemy.active = false;
        let (sentiment, points, damage) = (enemy.sentiment, enemy.points, enemy.damage);

        match sentiment {
            Sentiment::Positive => {
                self.grant_power_up(now_ms);
                self.add_score(u64::from(points));
                log::info!("Positive comment collected");
            }
            Sentiment::Neutral => {
                self.add_score(u64::from(points));
                log::debug!("Neutral comment absorbed");
            }
            Sentiment::Negative => {
                self.player.health = (self.player.health - damage).max(0.0);
                self.player.invulnerable = true;
                self.player.invulnerable_until = now_ms + self.tuning.player.invulnerability_ms;
                log::info!("Player hit, health {}", self.player.health);
            }
        }
    }

    fn update_power_up(&mut self, now_ms: f64) {
        if let Some(expires_at) = self.weapon.expires_at {
            if now_ms >= expires_at {
                self.weapon.kind = WeaponKind::Normal;
                self.weapon.stats = self.tuning.weapon(WeaponKind::Normal).clone();
                self.weapon.expires_at = None;
                log::info!("Power-up expired");
            }
        }

        if self.player.invulnerable && now_ms >= self.player.invulnerable_until {
            self.player.invulnerable = false;
        }
    }

    fn update_combo(&mut self, delta_ms: f64) {
        if self.combo > 0 {
            self.combo_timer_ms -= delta_ms;
            if self.combo_timer_ms <= 0.0 {
                log::debug!("Combo broken at {}x", self.combo);
                self.combo = 0;
            }
        }
    }

    fn check_win(&mut self) {
        if self.enemies.is_empty() && self.total_enemies > 0 && self.phase != Phase::Over {
            self.end_game(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use crate::sim::state::{Bullet, Phase};
    use crate::sim::streak::WeaponPath;
    use crate::sim::testing::{game_with, new_game, record};
    use crate::sim::SentimentGame;
    use crate::tuning::WeaponKind;

    const FRAME_MS: f64 = 16.0;

    fn bullet_at(x: f32, y: f32, damage: f32) -> Bullet {
        Bullet {
            pos: Vec2::new(x, y),
            size: 12.0,
            speed: 10.0,
            damage,
            color: "#ffff00".into(),
            angle_deg: 0.0,
            active: true,
        }
    }

    fn place(game: &mut SentimentGame, index: usize, x: f32, y: f32) {
        game.enemies[index].pos = Vec2::new(x, y);
    }

    /// Park every enemy far above the screen so nothing collides by accident
    fn park_all(game: &mut SentimentGame) {
        for enemy in &mut game.enemies {
            enemy.pos = Vec2::new(0.0, -5_000.0);
        }
    }

    fn step(game: &mut SentimentGame, now: &mut f64) {
        *now += FRAME_MS;
        game.update(FRAME_MS, *now);
    }

    #[test]
    fn test_update_requires_running() {
        let (mut game, _) = new_game();
        let before: Vec<_> = game.enemies().iter().map(|e| e.pos).collect();
        game.update(FRAME_MS, 2000.0);
        let after: Vec<_> = game.enemies().iter().map(|e| e.pos).collect();
        assert_eq!(before, after);

        game.start();
        game.pause();
        game.update(FRAME_MS, 2000.0);
        let paused: Vec<_> = game.enemies().iter().map(|e| e.pos).collect();
        assert_eq!(before, paused);
    }

    #[test]
    fn test_bullet_hit_resolved_same_update() {
        let (mut game, _) = new_game();
        game.start();
        park_all(&mut game);
        place(&mut game, 1, 380.0, 300.0);
        game.bullets.push(bullet_at(400.0, 320.0, 10.0));

        game.update(FRAME_MS, 1016.0);
        assert!(game.bullets().is_empty());
        assert!(!game.enemies()[1].active);
        assert_eq!(game.score(), 100);
        assert_eq!(game.explosions().len(), 1);
        assert_eq!(game.explosions()[0].particles[0].color, "#ff0000");
        // removal happens on the next enemy pass
        assert_eq!(game.enemies().len(), 3);
        game.update(FRAME_MS, 1032.0);
        assert_eq!(game.enemies().len(), 2);
    }

    #[test]
    fn test_bullet_damages_one_enemy() {
        let long = "x".repeat(140);
        let (mut game, _) = game_with(vec![record(&long, "negative"), record(&long, "negative")]);
        game.start();
        place(&mut game, 0, 380.0, 300.0);
        place(&mut game, 1, 380.0, 300.0);
        game.bullets.push(bullet_at(400.0, 320.0, 1.0));

        game.update(FRAME_MS, 1016.0);
        let damaged = game
            .enemies()
            .iter()
            .filter(|e| e.health < e.max_health)
            .count();
        assert_eq!(damaged, 1);
        assert!(game.enemies().iter().all(|e| e.active));
        assert!(game.bullets().is_empty());
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_bullet_hits_newest_overlapping_enemy() {
        let long = "x".repeat(140);
        let (mut game, _) = game_with(vec![record(&long, "negative"), record(&long, "negative")]);
        game.start();
        place(&mut game, 0, 380.0, 300.0);
        place(&mut game, 1, 380.0, 300.0);
        game.bullets.push(bullet_at(400.0, 320.0, 1.0));

        game.update(FRAME_MS, 1016.0);
        let enemies = game.enemies();
        assert_eq!(enemies[0].health, enemies[0].max_health);
        assert!(enemies[1].health < enemies[1].max_health);
    }

    #[test]
    fn test_player_collides_with_newest_enemy() {
        let (mut game, _) = game_with(vec![record("ok", "neutral"), record("fine", "neutral")]);
        game.start();
        let (x, y) = (game.player().pos.x, game.player().pos.y);
        place(&mut game, 0, x, y);
        place(&mut game, 1, x, y);

        game.update(0.0, 1016.0);
        assert!(game.enemies()[0].active);
        assert!(!game.enemies()[1].active);
    }

    #[test]
    fn test_bullets_leave_playfield() {
        let (mut game, _) = new_game();
        game.start();
        park_all(&mut game);
        game.bullets.push(bullet_at(400.0, -5.0, 10.0));
        let mut angled = bullet_at(2.0, 300.0, 10.0);
        angled.angle_deg = -15.0;
        game.bullets.push(angled);
        game.update(FRAME_MS, 1016.0);
        assert!(game.bullets().is_empty());
    }

    #[test]
    fn test_fifteen_negative_kills_reach_ultimate() {
        let records = (0..15).map(|i| record(&format!("bad {i}"), "negative")).collect();
        let (mut game, _) = game_with(records);
        game.start();
        for i in 0..15 {
            game.destroy_enemy(i);
            let expected = match i + 1 {
                n if n >= 15 => WeaponKind::Ultimate,
                n if n >= 10 => WeaponKind::BiggerBullets,
                n if n >= 5 => WeaponKind::FasterFireRate,
                _ => WeaponKind::Normal,
            };
            assert_eq!(game.weapon().kind, expected, "after kill {}", i + 1);
        }
        assert_eq!(game.weapon().path, WeaponPath::Negative);
        assert_eq!(game.snapshot().negative_kills, 15);
    }

    #[test]
    fn test_neutral_streak_resets_weapon() {
        let mut records: Vec<_> = (0..5).map(|i| record(&format!("bad {i}"), "negative")).collect();
        records.extend((0..5).map(|i| record(&format!("ok {i}"), "neutral")));
        let (mut game, _) = game_with(records);
        game.start();
        for i in 0..5 {
            game.destroy_enemy(i);
        }
        assert_eq!(game.weapon().kind, WeaponKind::FasterFireRate);
        for i in 5..10 {
            game.destroy_enemy(i);
        }
        assert_eq!(game.weapon().kind, WeaponKind::Normal);
        assert_eq!(game.weapon().path, WeaponPath::None);
    }

    #[test]
    fn test_victory_when_no_enemies_left() {
        let (mut game, _) = new_game();
        game.start();
        game.enemies.clear();
        game.update(FRAME_MS, 1016.0);
        let snap = game.snapshot();
        assert!(snap.victory);
        assert!(snap.game_over);
        assert_eq!(game.phase(), Phase::Over);
    }

    #[test]
    fn test_defeat_when_health_depleted() {
        let (mut game, _) = game_with(vec![record("terrible", "negative"), record("awful", "negative")]);
        game.start();
        game.player.health = 20.0;
        place(&mut game, 0, 380.0, 520.0);
        place(&mut game, 1, 0.0, -5_000.0);

        game.update(FRAME_MS, 1016.0);
        assert_eq!(game.player().health, 0.0);
        let snap = game.snapshot();
        assert!(snap.game_over);
        assert!(!snap.victory);
    }

    #[test]
    fn test_victory_takes_precedence_over_defeat() {
        let (mut game, _) = game_with(vec![record("terrible", "negative")]);
        game.start();
        game.player.health = 0.0;
        game.enemies.clear();
        game.update(FRAME_MS, 1016.0);
        assert!(game.snapshot().victory);
    }

    #[test]
    fn test_invulnerability_window() {
        let (mut game, _) = game_with(vec![record("terrible", "negative"), record("awful", "negative")]);
        game.start();
        place(&mut game, 0, 380.0, 520.0);
        place(&mut game, 1, 380.0, 520.0);

        game.update(FRAME_MS, 1016.0);
        assert_eq!(game.player().health, 80.0);
        assert!(game.player().invulnerable);

        let hold = |game: &mut SentimentGame| {
            if let Some(enemy) = game.enemies.last_mut() {
                enemy.pos.y = 520.0;
            }
        };

        // second enemy still overlaps but the player is protected
        hold(&mut game);
        game.update(FRAME_MS, 1032.0);
        assert_eq!(game.enemies().len(), 1);
        assert_eq!(game.player().health, 80.0);

        // window ends at 1016 + 1500
        hold(&mut game);
        game.update(FRAME_MS, 2516.0);
        assert_eq!(game.player().health, 80.0);
        assert!(!game.player().invulnerable);
        hold(&mut game);
        game.update(FRAME_MS, 2532.0);
        assert_eq!(game.player().health, 60.0);
    }

    #[test]
    fn test_collecting_positive_grants_power_up() {
        let (mut game, _) = new_game();
        game.start();
        park_all(&mut game);
        place(&mut game, 0, 380.0, 520.0);
        game.update(FRAME_MS, 1016.0);
        assert_eq!(game.weapon().kind, WeaponKind::FasterFireRate);
        assert_eq!(game.score(), 50);
        assert_eq!(game.player().health, 100.0);

        game.update(FRAME_MS, 6015.0);
        assert_eq!(game.weapon().kind, WeaponKind::FasterFireRate);
        game.update(FRAME_MS, 6016.0);
        assert_eq!(game.weapon().kind, WeaponKind::Normal);
        assert_eq!(game.weapon().expires_at, None);
    }

    #[test]
    fn test_combo_bonus_and_decay() {
        let (mut game, _) = game_with(vec![
            record("terrible", "negative"),
            record("awful", "negative"),
            record("horrible", "negative"),
        ]);
        game.start();
        game.destroy_enemy(0);
        game.destroy_enemy(1);
        assert_eq!(game.score(), 100 + 110);
        assert_eq!(game.snapshot().combo, 2);

        park_all(&mut game);
        game.update(1_999.0, 3000.0);
        assert_eq!(game.snapshot().combo, 2);
        game.update(1.0, 3001.0);
        assert_eq!(game.snapshot().combo, 0);
    }

    #[test]
    fn test_escaped_enemy_scores_nothing() {
        let (mut game, _) = game_with(vec![record("terrible", "negative")]);
        game.start();
        place(&mut game, 0, 0.0, 599.5);
        game.update(FRAME_MS, 1016.0);
        assert!(!game.enemies()[0].active);
        game.update(FRAME_MS, 1032.0);
        assert!(game.enemies().is_empty());
        let snap = game.snapshot();
        assert_eq!(snap.score, 0);
        assert!(snap.victory);
        assert_eq!(snap.score_percentage, 0);
        assert_eq!(snap.performance_rating, "Try Again!");
    }

    #[test]
    fn test_explosions_expire() {
        let (mut game, _) = new_game();
        game.start();
        park_all(&mut game);
        game.destroy_enemy(2);
        game.update(399.0, 1399.0);
        assert_eq!(game.explosions().len(), 1);
        game.update(1.0, 1400.0);
        assert!(game.explosions().is_empty());
    }

    #[test]
    fn test_reset_restores_constructed_game() {
        let (mut game, clock) = new_game();
        game.start();
        game.destroy_enemy(1);
        game.player.health = 10.0;
        game.update(FRAME_MS, 1016.0);
        game.enemies.clear();
        game.update(FRAME_MS, 1032.0);
        assert_eq!(game.phase(), Phase::Over);

        game.reset();
        clock.advance(5_000.0);
        game.start();
        let snap = game.snapshot();
        assert_eq!(game.enemies().len(), 3);
        assert_eq!(snap.max_possible_score, 175);
        assert_eq!(snap.health, 100.0);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.phase, Phase::Running);
        assert!(!snap.victory);
        for e in game.enemies() {
            assert!(e.active);
            assert_eq!(e.health, e.max_health);
            assert!(e.pos.y < 0.0);
        }
    }

    #[test]
    fn test_elapsed_time_freezes_at_end() {
        let (mut game, clock) = new_game();
        game.start();
        park_all(&mut game);
        clock.set(62_000.0);
        game.update(FRAME_MS, 62_000.0);
        assert_eq!(game.snapshot().formatted_time, "1:01");
        game.end_game(false);
        clock.set(200_000.0);
        game.update(FRAME_MS, 200_000.0);
        assert_eq!(game.snapshot().formatted_time, "1:01");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn score_bounded_and_monotonic(
            frames in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..600),
        ) {
            let (mut game, clock) = game_with(vec![
                record("great job everyone", "positive"),
                record("terrible", "negative"),
                record("this is fine I guess", "neutral"),
                record("worst take ever, really bad", "negative"),
            ]);
            game.start();
            let mut now = 1000.0;
            let mut last = 0;
            for (left, right, fire) in frames {
                if left { game.move_player(-6.0); }
                if right { game.move_player(6.0); }
                if fire { game.shoot(now); }
                step(&mut game, &mut now);
                clock.set(now);

                let score = game.score();
                prop_assert!(score <= game.max_possible_score());
                prop_assert!(score >= last);
                last = score;
                let p = game.player();
                prop_assert!(p.health >= 0.0 && p.health <= p.max_health);
            }
        }
    }
}
