//! Frame painter
//!
//! Draws one frame from a `&SentimentGame`: background, player, bullets,
//! comment bubbles, explosions, then at most one overlay.

use super::surface::{Surface, TextAlign, TextBaseline};
use super::text::{display_text, wrap_text};
use crate::settings::PaintOptions;
use crate::sim::{Enemy, Phase, Player, SentimentGame};

/// Full-screen overlay drawn over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    GameOver,
    Paused,
    WaveBanner,
}

/// The one overlay for this frame, by priority
pub fn overlay_for(game: &SentimentGame, now_ms: f64, options: &PaintOptions) -> Option<Overlay> {
    match game.phase() {
        Phase::Over => Some(Overlay::GameOver),
        Phase::Paused => Some(Overlay::Paused),
        Phase::Running
            if options.wave_banner
                && now_ms - game.started_at() < game.tuning().flow.wave_delay_ms =>
        {
            Some(Overlay::WaveBanner)
        }
        _ => None,
    }
}

/// Blink off on even flash periods while invulnerable
pub fn player_visible(player: &Player, now_ms: f64, period_ms: f64, flash: bool) -> bool {
    if !(flash && player.invulnerable) || period_ms <= 0.0 {
        return true;
    }
    (now_ms / period_ms).floor().rem_euclid(2.0) != 0.0
}

/// `1234567` as `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn paint_frame(
    surface: &mut dyn Surface,
    game: &SentimentGame,
    now_ms: f64,
    options: &PaintOptions,
) {
    let tuning = game.tuning();
    surface.set_fill_style(&tuning.canvas.background);
    surface.fill_rect(0.0, 0.0, game.width() as f64, game.height() as f64);

    draw_player(surface, game, now_ms, options);
    draw_bullets(surface, game);
    for enemy in game.enemies().iter().filter(|e| e.active) {
        draw_bubble(surface, game, enemy);
    }
    if options.particles {
        draw_explosions(surface, game);
    }

    match overlay_for(game, now_ms, options) {
        Some(Overlay::GameOver) => draw_game_over(surface, game),
        Some(Overlay::Paused) => draw_paused(surface, game),
        Some(Overlay::WaveBanner) => draw_wave_banner(surface, game),
        None => {}
    }
}

fn draw_player(surface: &mut dyn Surface, game: &SentimentGame, now_ms: f64, options: &PaintOptions) {
    let p = game.player();
    let tuning = game.tuning();
    if !player_visible(
        p,
        now_ms,
        tuning.effects.flash_period_ms,
        options.flash_invulnerable,
    ) {
        return;
    }

    let (x, y) = (p.pos.x as f64, p.pos.y as f64);
    let (w, h) = (p.size.x as f64, p.size.y as f64);
    surface.set_fill_style(&tuning.player.color);
    surface.set_stroke_style(&tuning.player.stroke_color, tuning.player.stroke_width);
    surface.begin_path();
    surface.move_to(x + w / 2.0, y);
    surface.line_to(x, y + h);
    surface.line_to(x + w, y + h);
    surface.close_path();
    surface.fill();
    surface.stroke();
}

fn draw_bullets(surface: &mut dyn Surface, game: &SentimentGame) {
    for b in game.bullets() {
        surface.set_fill_style(&b.color);
        surface.begin_path();
        surface.circle(b.pos.x as f64, b.pos.y as f64, b.size as f64 / 2.0);
        surface.fill();
    }
}

fn rounded_rect(surface: &mut dyn Surface, x: f64, y: f64, w: f64, h: f64, r: f64) {
    surface.begin_path();
    surface.move_to(x + r, y);
    surface.line_to(x + w - r, y);
    surface.quadratic_curve_to(x + w, y, x + w, y + r);
    surface.line_to(x + w, y + h - r);
    surface.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
    surface.line_to(x + r, y + h);
    surface.quadratic_curve_to(x, y + h, x, y + h - r);
    surface.line_to(x, y + r);
    surface.quadratic_curve_to(x, y, x + r, y);
    surface.close_path();
}

fn draw_bubble(surface: &mut dyn Surface, game: &SentimentGame, enemy: &Enemy) {
    let text = &game.tuning().text;
    let (x, y) = (enemy.pos.x as f64, enemy.pos.y as f64);
    let (w, h) = (enemy.size.x as f64, enemy.size.y as f64);
    let palette = &enemy.palette;

    surface.set_fill_style(&palette.fill);
    surface.set_stroke_style(&palette.stroke, palette.stroke_width);
    rounded_rect(surface, x, y, w, h, text.corner_radius as f64);
    surface.fill();
    surface.stroke();

    let shown = display_text(
        &enemy.text,
        enemy.citation.number,
        text.max_comment_display_length,
    );
    surface.set_fill_style(&palette.text_color);
    surface.set_font(&format!("{}px {}", text.font_size, text.font));
    surface.set_text_layout(TextAlign::Center, TextBaseline::Top);

    let max_width = w - text.padding as f64 * 1.5;
    let lines = wrap_text(&shown, max_width, text.max_lines, |s| {
        surface.measure_text(s)
    });
    let line_height = text.line_height as f64;
    let start_y = y + (h - lines.len() as f64 * line_height) / 2.0;
    for (i, line) in lines.iter().enumerate() {
        surface.fill_text(line, x + w / 2.0, start_y + i as f64 * line_height);
    }
}

fn draw_explosions(surface: &mut dyn Surface, game: &SentimentGame) {
    for explosion in game.explosions() {
        for p in &explosion.particles {
            surface.set_fill_style(&p.color);
            surface.begin_path();
            surface.circle(p.pos.x as f64, p.pos.y as f64, p.size as f64);
            surface.fill();
        }
    }
}

/// Centered line, `dy` from the middle of the canvas
fn caption(surface: &mut dyn Surface, game: &SentimentGame, text: &str, dy: f64, font: &str, color: &str) {
    surface.set_fill_style(color);
    surface.set_font(font);
    surface.set_text_layout(TextAlign::Center, TextBaseline::Middle);
    surface.fill_text(
        text,
        game.width() as f64 / 2.0,
        game.height() as f64 / 2.0 + dy,
    );
}

fn dim(surface: &mut dyn Surface, game: &SentimentGame, color: &str) {
    surface.set_fill_style(color);
    surface.fill_rect(0.0, 0.0, game.width() as f64, game.height() as f64);
}

fn draw_game_over(surface: &mut dyn Surface, game: &SentimentGame) {
    let snap = game.snapshot();
    let msg = game
        .tuning()
        .endgame
        .message(snap.victory, snap.score_percentage);

    dim(surface, game, "rgba(0, 0, 0, 0.85)");
    caption(surface, game, &msg.title, -140.0, "bold 56px Arial", &msg.color);
    caption(surface, game, &msg.subtitle, -90.0, "bold 28px Arial", "#ffffff");
    caption(
        surface,
        game,
        &format!("⏱️ Time: {}", snap.formatted_time),
        -40.0,
        "24px Arial",
        "#00bcd4",
    );
    caption(
        surface,
        game,
        &format!(
            "{} / {}",
            group_thousands(snap.score),
            group_thousands(snap.max_possible_score)
        ),
        10.0,
        "bold 32px Arial",
        "#ffffff",
    );
    caption(
        surface,
        game,
        &format!("({}%)", snap.score_percentage),
        45.0,
        "28px Arial",
        "#ffeb3b",
    );
    caption(surface, game, &snap.performance_rating, 95.0, "bold 36px Arial", &msg.color);
    caption(surface, game, &msg.message, 140.0, "18px Arial", "#cccccc");
    caption(surface, game, "Click Restart to play again", 180.0, "16px Arial", "#999999");
}

fn draw_paused(surface: &mut dyn Surface, game: &SentimentGame) {
    dim(surface, game, "rgba(0, 0, 0, 0.5)");
    caption(surface, game, "PAUSED", 0.0, "bold 48px Arial", "#ffff00");
    caption(surface, game, "Press P to resume", 40.0, "20px Arial", "#ffffff");
}

fn draw_wave_banner(surface: &mut dyn Surface, game: &SentimentGame) {
    dim(surface, game, "rgba(0, 0, 50, 0.8)");
    caption(surface, game, "Wave 1", -60.0, "bold 64px Arial", "#00ffff");
    caption(
        surface,
        game,
        &format!("r/{}", game.subreddit()),
        0.0,
        "bold 36px Arial",
        "#ffff00",
    );
    caption(surface, game, "Wave Starting...", 50.0, "bold 28px Arial", "#ffffff");
    caption(surface, game, "Get Ready!", 100.0, "bold 32px Arial", "#00ff00");
}
