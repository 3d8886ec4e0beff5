//! Entity types and read-only game views

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::streak::WeaponPath;
use crate::sentiment::Sentiment;
use crate::tuning::{Palette, PerformanceTier, PlayerTuning, WeaponKind, WeaponStats};

/// Lifecycle of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Constructed or reset, waiting for `start()`
    Ready,
    Running,
    Paused,
    /// Victory or defeat recorded
    Over,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame while a move control is held
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub invulnerable: bool,
    pub invulnerable_until: f64,
}

impl Player {
    pub fn spawn(tuning: &PlayerTuning, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            pos: Vec2::new(
                canvas_width / 2.0,
                canvas_height - crate::consts::PLAYER_BOTTOM_OFFSET,
            ),
            size: Vec2::new(tuning.width, tuning.height),
            speed: tuning.speed,
            health: tuning.starting_health,
            max_health: tuning.max_health,
            invulnerable: false,
            invulnerable_until: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Where a comment came from, shown next to its text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub number: u32,
    pub subreddit: String,
    pub permalink: Option<String>,
    pub post_url: Option<String>,
    pub post_title: String,
}

/// A falling comment bubble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub text: String,
    pub sentiment: Sentiment,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Damage dealt to the player on contact
    pub damage: f32,
    pub points: u32,
    pub palette: Palette,
    pub active: bool,
    pub citation: Citation,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A player projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Side of the square collision box
    pub size: f32,
    /// Pixels per frame
    pub speed: f32,
    pub damage: f32,
    pub color: String,
    /// Degrees from straight up, positive to the right
    pub angle_deg: f32,
    pub active: bool,
}

impl Bullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.size))
    }

    /// Move one frame along the firing angle
    pub fn advance(&mut self) {
        if self.angle_deg == 0.0 {
            self.pos.y -= self.speed;
        } else {
            let rad = self.angle_deg.to_radians();
            self.pos += Vec2::new(rad.sin(), -rad.cos()) * self.speed;
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: String,
}

/// Particle burst left by a destroyed enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub origin: Vec2,
    pub age_ms: f64,
    pub particles: Vec<Particle>,
    /// Size multiplier applied to each particle per step
    pub decay: f32,
}

impl Explosion {
    /// Evenly spaced ring of particles flying outward
    pub fn burst(origin: Vec2, color: &str, count: usize, speed: f32, size: f32, decay: f32) -> Self {
        let particles = (0..count)
            .map(|i| {
                let angle = std::f32::consts::TAU / count as f32 * i as f32;
                Particle {
                    pos: origin,
                    vel: Vec2::from_angle(angle) * speed,
                    size,
                    color: color.to_string(),
                }
            })
            .collect();
        Self {
            origin,
            age_ms: 0.0,
            particles,
            decay,
        }
    }

    pub fn step(&mut self, delta_ms: f64) {
        self.age_ms += delta_ms;
        for p in &mut self.particles {
            p.pos += p.vel;
            p.size *= self.decay;
        }
    }
}

/// Equipped weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponState {
    pub kind: WeaponKind,
    pub stats: WeaponStats,
    /// Set for time-limited power-ups
    pub expires_at: Option<f64>,
    pub path: WeaponPath,
    pub last_shot_ms: f64,
}

impl WeaponState {
    pub fn new(stats: WeaponStats) -> Self {
        Self {
            kind: WeaponKind::Normal,
            stats,
            expires_at: None,
            path: WeaponPath::None,
            last_shot_ms: f64::NEG_INFINITY,
        }
    }
}

/// Read-only summary of a game, shared with the HUD and the host page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub score: u64,
    pub health: f32,
    pub max_health: f32,
    pub weapon: WeaponKind,
    pub weapon_name: String,
    pub weapon_icon: Option<String>,
    /// Remaining power-up time (ms), if the weapon is time-limited
    pub power_up_remaining_ms: Option<f64>,
    pub combo: u32,
    pub phase: Phase,
    pub game_over: bool,
    pub paused: bool,
    pub started: bool,
    pub elapsed_seconds: f64,
    pub formatted_time: String,
    pub victory: bool,
    pub max_possible_score: u64,
    pub score_percentage: u32,
    pub tier: PerformanceTier,
    pub performance_rating: String,
    pub active_enemies: usize,
    pub total_enemies: usize,
    pub negative_kills: u32,
    pub positive_kills: u32,
    pub neutral_kills: u32,
    pub weapon_path: WeaponPath,
    pub subreddit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullet(angle_deg: f32) -> Bullet {
        Bullet {
            pos: Vec2::new(100.0, 100.0),
            size: 12.0,
            speed: 10.0,
            damage: 10.0,
            color: "#ffff00".into(),
            angle_deg,
            active: true,
        }
    }

    #[test]
    fn test_bullet_straight_up() {
        let mut b = bullet(0.0);
        b.advance();
        assert_eq!(b.pos, Vec2::new(100.0, 90.0));
    }

    #[test]
    fn test_bullet_angled() {
        let mut right = bullet(15.0);
        let mut left = bullet(-15.0);
        right.advance();
        left.advance();
        assert!(right.pos.x > 100.0);
        assert!(left.pos.x < 100.0);
        assert!((right.pos.y - left.pos.y).abs() < 1e-4);
        let travelled = right.pos.distance(Vec2::new(100.0, 100.0));
        assert!((travelled - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_explosion_burst_ring() {
        let mut e = Explosion::burst(Vec2::new(50.0, 50.0), "#ff0000", 10, 4.0, 4.0, 0.95);
        assert_eq!(e.particles.len(), 10);
        assert!((e.particles[0].vel - Vec2::new(4.0, 0.0)).length() < 1e-5);
        e.step(16.0);
        assert_eq!(e.age_ms, 16.0);
        assert!((e.particles[0].size - 3.8).abs() < 1e-5);
        assert!((e.particles[0].pos.x - 54.0).abs() < 1e-5);
    }

    #[test]
    fn test_player_spawn_position() {
        let p = Player::spawn(&PlayerTuning::default(), 800.0, 600.0);
        assert_eq!(p.pos, Vec2::new(400.0, 540.0));
        assert_eq!(p.health, 100.0);
        assert!(!p.invulnerable);
    }
}
