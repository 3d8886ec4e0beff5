//! HUD text and button states derived from a `GameSnapshot`

use crate::sim::{GameSnapshot, Phase, next_threshold};
use crate::tuning::{StreakTuning, WeaponKind};

/// Badge color while an upgraded weapon is equipped
pub const UPGRADED_BADGE: &str = "#ffc107";
pub const NORMAL_BADGE: &str = "#666";

/// One path's streak against its next milestone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillProgress {
    pub icon: &'static str,
    pub label: &'static str,
    pub count: u32,
    pub next: u32,
    pub color: &'static str,
}

impl KillProgress {
    pub fn text(&self) -> String {
        format!("{} {}: {}/{}", self.icon, self.label, self.count, self.next)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HudModel {
    pub score: String,
    pub health: String,
    pub time: String,
    pub weapon_label: String,
    pub weapon_upgraded: bool,
    pub kill_progress: [KillProgress; 3],
    pub restart_enabled: bool,
    pub pause_visible: bool,
    pub pause_label: &'static str,
    pub play_enabled: bool,
}

impl HudModel {
    pub fn from_snapshot(snap: &GameSnapshot, streaks: &StreakTuning) -> Self {
        let over = snap.phase == Phase::Over;
        Self {
            score: snap.score.to_string(),
            health: format!("{}", snap.health.max(0.0).round()),
            time: snap.formatted_time.clone(),
            weapon_label: format!("Weapon: {}", snap.weapon_name),
            weapon_upgraded: snap.weapon != WeaponKind::Normal,
            kill_progress: [
                KillProgress {
                    icon: "💀",
                    label: "Neg",
                    count: snap.negative_kills,
                    next: next_threshold(snap.negative_kills, streaks),
                    color: "#ff4444",
                },
                KillProgress {
                    icon: "💚",
                    label: "Pos",
                    count: snap.positive_kills,
                    next: next_threshold(snap.positive_kills, streaks),
                    color: "#44ff44",
                },
                KillProgress {
                    icon: "😐",
                    label: "Neu",
                    count: snap.neutral_kills,
                    next: streaks.neutral_reset,
                    color: "#4444ff",
                },
            ],
            restart_enabled: over,
            pause_visible: !over && snap.started,
            pause_label: if snap.paused {
                "▶️ Resume"
            } else {
                "⏸️ Pause"
            },
            play_enabled: snap.phase == Phase::Ready,
        }
    }

    pub fn weapon_badge_color(&self) -> &'static str {
        if self.weapon_upgraded {
            UPGRADED_BADGE
        } else {
            NORMAL_BADGE
        }
    }

    /// `💀 Neg: 3/5 | 💚 Pos: 0/5 | 😐 Neu: 0/5`
    pub fn kill_progress_text(&self) -> String {
        self.kill_progress
            .iter()
            .map(KillProgress::text)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
