//! Comment records to enemies
//!
//! Size comes from text length. Speed, health, damage and points come from
//! the sentiment's enemy type scaled by the difficulty profile.

use glam::Vec2;
use rand::Rng;

use super::state::{Citation, Enemy};
use crate::consts::{UNKNOWN_SUBREDDIT, UNTITLED_POST};
use crate::ingest::CommentRecord;
use crate::tuning::{DifficultyProfile, EnemyType, TextTuning, Tuning};

/// Bubble dimensions for a comment of `chars` characters
pub fn bubble_size(chars: usize, enemy: &EnemyType, text: &TextTuning) -> Vec2 {
    let width = (enemy.min_width + (chars / 3) as f32).min(enemy.max_width);
    let lines = chars.div_ceil(text.max_chars_per_line.max(1)).max(1);
    let height = lines as f32 * text.line_height + 2.0 * text.padding;
    Vec2::new(width, height)
}

/// Starting y above the top edge, staggered so bubbles do not arrive together
pub fn spawn_y<R: Rng>(height: f32, stagger: f32, rng: &mut R) -> f32 {
    let jitter = if stagger > 0.0 {
        rng.random_range(0.0..stagger)
    } else {
        0.0
    };
    -height - jitter
}

/// Build one enemy per non-blank record, preserving input order
pub fn build_enemies<R: Rng>(
    records: &[CommentRecord],
    profile: &DifficultyProfile,
    tuning: &Tuning,
    subreddit: Option<&str>,
    rng: &mut R,
) -> Vec<Enemy> {
    let speed_scale = profile.enemy_speed_multiplier * tuning.balance.enemy_speed_multiplier;
    let canvas_width = tuning.canvas.width;

    let mut enemies = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if record.text.trim().is_empty() {
            log::warn!("Skipping comment {} with no text", index + 1);
            continue;
        }

        let sentiment = record.sentiment();
        let kind = tuning.enemy(sentiment);
        let chars = record.text.chars().count();
        let size = bubble_size(chars, kind, &tuning.text);
        let health = kind.health.health_for(chars);

        let span = canvas_width - size.x;
        let x = if span > 0.0 {
            rng.random_range(0.0..span)
        } else {
            0.0
        };
        let y = spawn_y(size.y, tuning.flow.spawn_stagger, rng);

        let citation = Citation {
            number: record.citation_number.unwrap_or(index as u32 + 1),
            subreddit: record
                .subreddit
                .clone()
                .or_else(|| subreddit.map(str::to_string))
                .unwrap_or_else(|| UNKNOWN_SUBREDDIT.to_string()),
            permalink: record.permalink.clone(),
            post_url: record.post_url.clone(),
            post_title: record
                .post_title
                .clone()
                .unwrap_or_else(|| UNTITLED_POST.to_string()),
        };

        enemies.push(Enemy {
            id: index as u32,
            text: record.text.clone(),
            sentiment,
            pos: Vec2::new(x, y),
            size,
            speed: kind.base_speed * speed_scale,
            health,
            max_health: health,
            damage: kind.damage * profile.player_damage_multiplier,
            points: kind.points,
            palette: kind.palette.clone(),
            active: true,
            citation,
        });
    }

    log::info!(
        "Enemies created: {} ({:.2} px/frame scale, {} difficulty)",
        enemies.len(),
        speed_scale,
        profile.name
    );
    enemies
}
