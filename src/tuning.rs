//! Data-driven game balance
//!
//! Every gameplay constant lives here so balance changes never touch the
//! simulation code. `Tuning::default()` holds the shipped tables; a JSON
//! document can override any subset of them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GameError;
use crate::sentiment::Sentiment;

/// Weapon identifiers. Exactly one is equipped at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeaponKind {
    #[default]
    Normal,
    FasterFireRate,
    BiggerBullets,
    SpreadShot,
    Ultimate,
}

impl WeaponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Normal => "normal",
            WeaponKind::FasterFireRate => "fasterFireRate",
            WeaponKind::BiggerBullets => "biggerBullets",
            WeaponKind::SpreadShot => "spreadShot",
            WeaponKind::Ultimate => "ultimate",
        }
    }
}

/// Difficulty profiles selectable at game construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Lookup that falls back to `Normal` for unknown names
    pub fn resolve(s: &str) -> Self {
        Self::from_name(s).unwrap_or_else(|| {
            log::warn!("Unknown difficulty '{}', using 'normal'", s);
            Difficulty::Normal
        })
    }
}

/// Performance tiers, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Perfect,
    Excellent,
    Great,
    Good,
    Fair,
    Poor,
}

impl PerformanceTier {
    /// Label shown on the end screen and in the HUD
    pub fn rating_label(&self) -> &'static str {
        match self {
            PerformanceTier::Perfect => "Perfect!",
            PerformanceTier::Excellent => "Excellent!",
            PerformanceTier::Great => "Great!",
            PerformanceTier::Good => "Good Job!",
            PerformanceTier::Fair => "Keep Practicing!",
            PerformanceTier::Poor => "Try Again!",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal pixels per frame while a move key is held
    pub speed: f32,
    pub max_health: f32,
    pub starting_health: f32,
    /// Invulnerability after a negative hit (ms)
    pub invulnerability_ms: f64,
    pub color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 40.0,
            speed: 6.0,
            max_health: 100.0,
            starting_health: 100.0,
            invulnerability_ms: 1500.0,
            color: "#00ffff".into(),
            stroke_color: "#ffffff".into(),
            stroke_width: 2.0,
        }
    }
}

/// Stat bundle for one weapon. Swapped as a whole on every weapon change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub name: String,
    /// Minimum interval between shots (ms)
    pub fire_rate_ms: f64,
    /// Pixels per frame
    pub bullet_speed: f32,
    /// Bullet radius; the collision box is `2 * bullet_size` square
    pub bullet_size: f32,
    pub bullet_color: String,
    pub damage: f32,
    /// How long the weapon lasts when granted as a power-up (ms)
    #[serde(default)]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTable {
    pub normal: WeaponStats,
    pub faster_fire_rate: WeaponStats,
    pub bigger_bullets: WeaponStats,
    pub spread_shot: WeaponStats,
    pub ultimate: WeaponStats,
}

impl WeaponTable {
    pub fn stats(&self, kind: WeaponKind) -> &WeaponStats {
        match kind {
            WeaponKind::Normal => &self.normal,
            WeaponKind::FasterFireRate => &self.faster_fire_rate,
            WeaponKind::BiggerBullets => &self.bigger_bullets,
            WeaponKind::SpreadShot => &self.spread_shot,
            WeaponKind::Ultimate => &self.ultimate,
        }
    }
}

impl Default for WeaponTable {
    fn default() -> Self {
        let timed = |name: &str, fire_rate_ms, bullet_speed, bullet_size, color: &str, damage, icon: &str| {
            WeaponStats {
                name: name.into(),
                fire_rate_ms,
                bullet_speed,
                bullet_size,
                bullet_color: color.into(),
                damage,
                duration_ms: Some(5000.0),
                icon: Some(icon.into()),
            }
        };
        Self {
            normal: WeaponStats {
                name: "Normal".into(),
                fire_rate_ms: 200.0,
                bullet_speed: 10.0,
                bullet_size: 6.0,
                bullet_color: "#ffff00".into(),
                damage: 10.0,
                duration_ms: None,
                icon: None,
            },
            faster_fire_rate: timed("Rapid Fire", 100.0, 10.0, 6.0, "#ff9900", 10.0, "⚡"),
            bigger_bullets: timed("Heavy Shot", 300.0, 8.0, 14.0, "#ff0099", 25.0, "💥"),
            spread_shot: timed("Spread Shot", 250.0, 10.0, 7.0, "#ffcc00", 12.0, "✨"),
            ultimate: timed("Ultimate", 80.0, 12.0, 18.0, "#00ff00", 35.0, "🔥"),
        }
    }
}

/// Enemy bubble colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub text_color: String,
}

/// How enemy health derives from comment length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum HealthRule {
    /// Always destroyed in one hit
    OneHit,
    /// `max(1, ceil(len / chars))`
    PerChars { chars: u32 },
}

impl HealthRule {
    pub fn health_for(&self, text_len: usize) -> f32 {
        match *self {
            HealthRule::OneHit => 1.0,
            HealthRule::PerChars { chars } => {
                let chars = chars.max(1) as usize;
                text_len.div_ceil(chars).max(1) as f32
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyType {
    /// Falling pixels per frame before multipliers
    pub base_speed: f32,
    /// Damage dealt to the player on contact
    pub damage: f32,
    pub points: u32,
    pub palette: Palette,
    pub health: HealthRule,
    pub min_width: f32,
    pub max_width: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub negative: EnemyType,
    pub positive: EnemyType,
    pub neutral: EnemyType,
}

impl EnemyTable {
    pub fn for_sentiment(&self, sentiment: Sentiment) -> &EnemyType {
        match sentiment {
            Sentiment::Negative => &self.negative,
            Sentiment::Positive => &self.positive,
            Sentiment::Neutral => &self.neutral,
        }
    }
}

impl Default for EnemyTable {
    fn default() -> Self {
        let palette = |fill: &str, stroke: &str, text: &str| Palette {
            fill: fill.into(),
            stroke: stroke.into(),
            stroke_width: 3.0,
            text_color: text.into(),
        };
        Self {
            negative: EnemyType {
                base_speed: 2.0,
                damage: 20.0,
                points: 100,
                palette: palette("#000000", "#ff0000", "#ffffff"),
                health: HealthRule::PerChars { chars: 50 },
                min_width: 100.0,
                max_width: 180.0,
            },
            positive: EnemyType {
                base_speed: 1.5,
                damage: 0.0,
                points: 50,
                palette: palette("#ffffff", "#00ff00", "#000000"),
                health: HealthRule::OneHit,
                min_width: 100.0,
                max_width: 180.0,
            },
            neutral: EnemyType {
                base_speed: 1.5,
                damage: 0.0,
                points: 25,
                palette: palette("#e8e8e8", "#0088ff", "#333333"),
                health: HealthRule::OneHit,
                min_width: 100.0,
                max_width: 180.0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub name: String,
    pub enemy_speed_multiplier: f32,
    /// Unused: every enemy is spawned at construction
    pub spawn_rate_ms: f64,
    /// Unused: every enemy is spawned at construction
    pub max_enemies: u32,
    pub player_damage_multiplier: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub easy: DifficultyProfile,
    pub normal: DifficultyProfile,
    pub hard: DifficultyProfile,
}

impl DifficultyTable {
    pub fn profile(&self, difficulty: Difficulty) -> &DifficultyProfile {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        let profile = |name: &str, speed, spawn, max, damage| DifficultyProfile {
            name: name.into(),
            enemy_speed_multiplier: speed,
            spawn_rate_ms: spawn,
            max_enemies: max,
            player_damage_multiplier: damage,
        };
        Self {
            easy: profile("Easy", 0.4, 2000.0, 8, 0.7),
            normal: profile("Normal", 0.6, 1200.0, 12, 1.0),
            hard: profile("Hard", 1.0, 800.0, 18, 1.3),
        }
    }
}

/// Global knobs applied on top of the difficulty profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceTuning {
    pub enemy_speed_multiplier: f32,
}

impl Default for BalanceTuning {
    fn default() -> Self {
        Self {
            enemy_speed_multiplier: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsTuning {
    pub explosion_duration_ms: f64,
    pub explosion_particles: usize,
    /// Particle pixels per frame
    pub particle_speed: f32,
    pub particle_size: f32,
    /// Size multiplier applied every frame
    pub particle_fade: f32,
    /// Invulnerability flash half-period (ms)
    pub flash_period_ms: f64,
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            explosion_duration_ms: 400.0,
            explosion_particles: 10,
            particle_speed: 4.0,
            particle_size: 4.0,
            particle_fade: 0.95,
            flash_period_ms: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasTuning {
    pub width: f32,
    pub height: f32,
    pub background: String,
    /// Player safe zone from the side edges
    pub margin: f32,
}

impl Default for CanvasTuning {
    fn default() -> Self {
        Self {
            width: crate::consts::CANVAS_WIDTH,
            height: crate::consts::CANVAS_HEIGHT,
            background: "#000000".into(),
            margin: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    /// Bonus per combo step (`points * (1 + combo * step)`)
    pub combo_step: f32,
    /// Time without a kill before the combo breaks (ms)
    pub combo_window_ms: f64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            combo_step: 0.1,
            combo_window_ms: 2000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowTuning {
    /// How long the wave-start banner stays up after `start()` (ms)
    pub wave_delay_ms: f64,
    /// Upper bound of the random extra height enemies start above the screen
    pub spawn_stagger: f32,
}

impl Default for FlowTuning {
    fn default() -> Self {
        Self {
            wave_delay_ms: 2000.0,
            spawn_stagger: 200.0,
        }
    }
}

/// Kill counts that move the weapon along its upgrade paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakTuning {
    pub neutral_reset: u32,
    pub tier1: u32,
    pub tier2: u32,
    pub tier3: u32,
}

impl Default for StreakTuning {
    fn default() -> Self {
        Self {
            neutral_reset: 5,
            tier1: 5,
            tier2: 10,
            tier3: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndgameMessage {
    pub title: String,
    pub subtitle: String,
    pub message: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierThresholds {
    pub perfect: u32,
    pub excellent: u32,
    pub great: u32,
    pub good: u32,
    pub fair: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSet {
    pub perfect: EndgameMessage,
    pub excellent: EndgameMessage,
    pub great: EndgameMessage,
    pub good: EndgameMessage,
    pub fair: EndgameMessage,
    pub poor: EndgameMessage,
}

impl MessageSet {
    pub fn for_tier(&self, tier: PerformanceTier) -> &EndgameMessage {
        match tier {
            PerformanceTier::Perfect => &self.perfect,
            PerformanceTier::Excellent => &self.excellent,
            PerformanceTier::Great => &self.great,
            PerformanceTier::Good => &self.good,
            PerformanceTier::Fair => &self.fair,
            PerformanceTier::Poor => &self.poor,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndgameTuning {
    pub thresholds: TierThresholds,
    pub victory: MessageSet,
    pub defeat: MessageSet,
}

impl EndgameTuning {
    /// Tier for a score percentage, by descending thresholds
    pub fn tier(&self, percentage: u32) -> PerformanceTier {
        let t = &self.thresholds;
        if percentage >= t.perfect {
            PerformanceTier::Perfect
        } else if percentage >= t.excellent {
            PerformanceTier::Excellent
        } else if percentage >= t.great {
            PerformanceTier::Great
        } else if percentage >= t.good {
            PerformanceTier::Good
        } else if percentage >= t.fair {
            PerformanceTier::Fair
        } else {
            PerformanceTier::Poor
        }
    }

    pub fn message(&self, victory: bool, percentage: u32) -> &EndgameMessage {
        let set = if victory { &self.victory } else { &self.defeat };
        set.for_tier(self.tier(percentage))
    }
}

fn msg(title: &str, subtitle: &str, message: &str, color: &str) -> EndgameMessage {
    EndgameMessage {
        title: title.into(),
        subtitle: subtitle.into(),
        message: message.into(),
        color: color.into(),
    }
}

impl Default for EndgameTuning {
    fn default() -> Self {
        Self {
            thresholds: TierThresholds {
                perfect: 100,
                excellent: 90,
                great: 75,
                good: 60,
                fair: 40,
            },
            victory: MessageSet {
                perfect: msg(
                    "🏆 PERFECT VICTORY!",
                    "Flawless Vibe Mastery!",
                    "You neutralized every negative comment! Incredible!",
                    "#ffd700",
                ),
                excellent: msg(
                    "⭐ EXCELLENT VICTORY!",
                    "Nearly Flawless!",
                    "Outstanding performance! Just a few points shy of perfection.",
                    "#4CAF50",
                ),
                great: msg(
                    "🌟 GREAT VICTORY!",
                    "Strong Performance!",
                    "Great job! You handled most of the negativity well.",
                    "#2196F3",
                ),
                good: msg(
                    "👍 VICTORY!",
                    "Solid Performance!",
                    "Good job! Keep practicing to improve your score.",
                    "#00BCD4",
                ),
                fair: msg(
                    "✅ VICTORY",
                    "Room for Improvement",
                    "You survived! Try to destroy more enemies next time.",
                    "#FF9800",
                ),
                poor: msg(
                    "🎮 VICTORY",
                    "Keep Practicing!",
                    "Victory! Focus on accuracy and timing to score higher.",
                    "#9E9E9E",
                ),
            },
            defeat: MessageSet {
                perfect: msg(
                    "💀 SO CLOSE!",
                    "Nearly Perfect Run!",
                    "Amazing score! One more try and you'll ace it!",
                    "#ffd700",
                ),
                excellent: msg(
                    "💀 IMPRESSIVE!",
                    "Great Effort!",
                    "Excellent score! The negatives got overwhelming.",
                    "#4CAF50",
                ),
                great: msg(
                    "💀 GAME OVER",
                    "Strong Attempt!",
                    "Great score! Just need to dodge a bit better.",
                    "#2196F3",
                ),
                good: msg(
                    "💀 GAME OVER",
                    "Good Try!",
                    "Solid attempt! Focus on dodging negative comments.",
                    "#00BCD4",
                ),
                fair: msg(
                    "💀 GAME OVER",
                    "Keep Going!",
                    "Don't give up! Practice makes perfect.",
                    "#FF9800",
                ),
                poor: msg(
                    "💀 GAME OVER",
                    "Try Again!",
                    "Keep practicing! You'll get better with each game.",
                    "#9E9E9E",
                ),
            },
        }
    }
}

/// Comment bubble text layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextTuning {
    pub font: String,
    pub font_size: f32,
    pub max_chars_per_line: usize,
    pub line_height: f32,
    pub padding: f32,
    pub corner_radius: f32,
    pub max_comment_display_length: usize,
    pub max_lines: usize,
}

impl Default for TextTuning {
    fn default() -> Self {
        Self {
            font: "Arial, sans-serif".into(),
            font_size: 13.0,
            max_chars_per_line: 25,
            line_height: 16.0,
            padding: 8.0,
            corner_radius: 10.0,
            max_comment_display_length: 85,
            max_lines: 3,
        }
    }
}

/// Keyboard bindings, matched against `KeyboardEvent.key`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub shoot: Vec<String>,
    pub pause: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |ks: &[&str]| ks.iter().map(|k| k.to_string()).collect();
        Self {
            left: keys(&["ArrowLeft", "a", "A"]),
            right: keys(&["ArrowRight", "d", "D"]),
            shoot: keys(&[" ", "ArrowUp", "w", "W"]),
            pause: keys(&["p", "P", "Escape"]),
        }
    }
}

/// All balance tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub weapons: WeaponTable,
    pub enemies: EnemyTable,
    pub difficulty: DifficultyTable,
    pub balance: BalanceTuning,
    pub effects: EffectsTuning,
    pub canvas: CanvasTuning,
    pub scoring: ScoringTuning,
    pub flow: FlowTuning,
    pub streaks: StreakTuning,
    pub endgame: EndgameTuning,
    pub text: TextTuning,
    pub controls: KeyBindings,
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    /// Objects merge key by key, so `{"weapons":{"normal":{"fire_rate_ms":100}}}`
    /// changes one stat and keeps the rest of that weapon.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let invalid = |e: serde_json::Error| GameError::InvalidTuning(e.to_string());
        let overrides: Value = serde_json::from_str(json).map_err(invalid)?;
        if !overrides.is_object() {
            return Err(GameError::InvalidTuning("expected a JSON object".into()));
        }
        let mut merged = serde_json::to_value(Tuning::default()).map_err(invalid)?;
        merge_json(&mut merged, overrides);
        let tuning: Tuning = serde_json::from_value(merged).map_err(invalid)?;
        log::info!(
            "Tuning loaded: canvas {}x{}, global enemy speed {}x",
            tuning.canvas.width,
            tuning.canvas.height,
            tuning.balance.enemy_speed_multiplier
        );
        Ok(tuning)
    }

    pub fn weapon(&self, kind: WeaponKind) -> &WeaponStats {
        self.weapons.stats(kind)
    }

    pub fn enemy(&self, sentiment: Sentiment) -> &EnemyType {
        self.enemies.for_sentiment(sentiment)
    }

    pub fn difficulty(&self, difficulty: Difficulty) -> &DifficultyProfile {
        self.difficulty.profile(difficulty)
    }
}

/// Overlay `patch` onto `base`: objects merge recursively, anything else replaces
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
