//! Kill streaks and the weapon upgrade paths they drive
//!
//! Destroying enemies of one sentiment in a row advances a path:
//! - negative streaks: Rapid Fire -> Heavy Shot -> Ultimate
//! - positive streaks: Spread Shot -> Ultimate
//! - a neutral streak drops back to the normal weapon

use serde::{Deserialize, Serialize};

use crate::sentiment::Sentiment;
use crate::tuning::{StreakTuning, WeaponKind};

/// Upgrade track currently applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponPath {
    #[default]
    None,
    Negative,
    Positive,
}

impl WeaponPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponPath::None => "none",
            WeaponPath::Negative => "negative",
            WeaponPath::Positive => "positive",
        }
    }
}

/// Consecutive kills per sentiment. A kill zeroes the other two counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillStreak {
    pub negative: u32,
    pub positive: u32,
    pub neutral: u32,
}

impl KillStreak {
    pub fn record(&mut self, sentiment: Sentiment) {
        let count = match sentiment {
            Sentiment::Negative => self.negative + 1,
            Sentiment::Positive => self.positive + 1,
            Sentiment::Neutral => self.neutral + 1,
        };
        *self = KillStreak::default();
        match sentiment {
            Sentiment::Negative => self.negative = count,
            Sentiment::Positive => self.positive = count,
            Sentiment::Neutral => self.neutral = count,
        }
    }

    /// Weapon changes earned by the current counters, in the order they apply.
    /// A neutral reset short-circuits both paths.
    pub fn upgrades(&self, t: &StreakTuning) -> Vec<(WeaponKind, WeaponPath)> {
        if self.neutral >= t.neutral_reset {
            return vec![(WeaponKind::Normal, WeaponPath::None)];
        }

        let mut out = Vec::new();
        if self.negative >= t.tier3 {
            out.push((WeaponKind::Ultimate, WeaponPath::Negative));
        } else if self.negative >= t.tier2 {
            out.push((WeaponKind::BiggerBullets, WeaponPath::Negative));
        } else if self.negative >= t.tier1 {
            out.push((WeaponKind::FasterFireRate, WeaponPath::Negative));
        }

        if self.positive >= t.tier3 {
            out.push((WeaponKind::Ultimate, WeaponPath::Positive));
        } else if self.positive >= t.tier1 {
            out.push((WeaponKind::SpreadShot, WeaponPath::Positive));
        }
        out
    }
}

/// Next milestone shown in the HUD for a path counter
pub fn next_threshold(count: u32, t: &StreakTuning) -> u32 {
    if count < t.tier1 {
        t.tier1
    } else if count < t.tier2 {
        t.tier2
    } else {
        t.tier3
    }
}
