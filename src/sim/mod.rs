//! Simulation core
//!
//! All gameplay logic lives here. This module has no rendering or platform
//! dependencies:
//! - Time comes from the injected clock and the caller's frame timestamps
//! - Randomness comes from a seeded RNG
//! - Entities are iterated in stable order

pub mod collision;
pub mod factory;
pub mod game;
pub mod state;
pub mod streak;
pub mod tick;

#[cfg(test)]
pub(crate) mod testing;

pub use collision::{Aabb, aabb_overlap};
pub use factory::{bubble_size, build_enemies};
pub use game::{GameData, SentimentGame, Wave};
pub use state::{
    Bullet, Citation, Enemy, Explosion, GameSnapshot, Particle, Phase, Player, WeaponState,
};
pub use streak::{KillStreak, WeaponPath, next_threshold};
