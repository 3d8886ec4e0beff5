//! Word and emoji valences for the sentiment scorer
//!
//! Values stay within -3..=3. Words are stored lowercase.

use std::collections::HashMap;
use std::sync::OnceLock;

pub(crate) const BOOSTERS: &[&str] = &["very", "really", "super", "extremely", "so"];

pub(crate) const NEGATIONS: &[&str] = &[
    "not", "isn't", "wasn't", "don't", "doesn't", "didn't", "never", "no", "cannot",
];

#[rustfmt::skip]
const ENTRIES: &[(&str, f32)] = &[
    // positives
    ("love", 3.0), ("loves", 3.0), ("loved", 3.0),
    ("great", 2.0), ("awesome", 3.0), ("amazing", 3.0), ("excellent", 3.0), ("fantastic", 3.0),
    ("good", 1.0), ("nice", 1.0), ("cool", 1.0), ("fun", 2.0), ("happy", 2.0), ("joy", 2.0),
    ("like", 1.0), ("liked", 1.0), ("likes", 1.0), ("enjoy", 2.0), ("enjoyed", 2.0), ("enjoys", 2.0),
    ("win", 2.0), ("wins", 2.0), ("won", 2.0), ("victory", 3.0), ("progress", 2.0),
    ("improve", 1.0), ("improved", 1.0), ("improving", 1.0),
    ("support", 1.0), ("supports", 1.0), ("supported", 1.0),
    ("approve", 1.0), ("approved", 1.0), ("approval", 1.0),
    ("safe", 1.0), ("safer", 1.0), ("safest", 2.0), ("secure", 1.0), ("peace", 2.0), ("peaceful", 2.0),
    ("ethical", 1.0), ("fair", 1.0), ("kind", 1.0), ("helpful", 2.0),
    ("help", 1.0), ("helps", 1.0), ("helped", 1.0),
    ("sustainable", 1.0), ("green", 1.0), ("clean", 1.0), ("healthy", 2.0),
    ("growth", 1.0), ("surge", 1.0), ("boom", 2.0), ("record", 1.0), ("gain", 1.0), ("gains", 1.0),
    ("bullish", 1.0),
    // negatives
    ("bad", -1.0), ("worse", -2.0), ("worst", -3.0),
    ("hate", -3.0), ("hates", -3.0), ("hated", -3.0),
    ("terrible", -3.0), ("awful", -3.0), ("horrible", -3.0), ("disaster", -3.0), ("catastrophe", -3.0),
    ("sad", -2.0), ("angry", -2.0), ("furious", -3.0), ("upset", -2.0), ("disgusting", -3.0),
    ("annoying", -2.0), ("boring", -1.0), ("meh", -1.0),
    ("fail", -2.0), ("fails", -2.0), ("failed", -2.0), ("failure", -3.0), ("collapse", -3.0),
    ("crash", -3.0), ("decline", -1.0), ("drop", -1.0), ("drops", -1.0), ("fell", -1.0),
    ("crime", -2.0), ("criminal", -2.0), ("scandal", -2.0), ("fraud", -3.0), ("scam", -3.0),
    ("corrupt", -3.0), ("corruption", -3.0),
    ("ban", -2.0), ("banned", -2.0), ("blocked", -1.0), ("block", -1.0),
    ("restrict", -1.0), ("restricted", -1.0),
    ("risk", -1.0), ("danger", -2.0), ("dangerous", -2.0), ("threat", -2.0), ("threats", -2.0),
    ("violent", -3.0), ("violence", -3.0),
    ("war", -3.0), ("invasion", -3.0), ("attack", -2.0), ("attacks", -2.0), ("bomb", -3.0),
    ("missile", -2.0), ("strike", -2.0),
    ("guilty", -2.0), ("lawsuit", -2.0), ("charges", -2.0), ("arrest", -2.0), ("arrested", -2.0),
    ("indicted", -2.0),
    ("toxic", -2.0), ("unsafe", -2.0), ("unethical", -2.0), ("lie", -2.0), ("lies", -2.0),
    ("lying", -2.0),
    // news and economy
    ("inflation", -1.0), ("recession", -2.0), ("debt", -1.0), ("deficit", -1.0),
    ("unemployment", -2.0), ("shortage", -1.0), ("outage", -1.0), ("leak", -1.0), ("breach", -2.0),
    ("recall", -1.0), ("boycott", -1.0), ("protest", -1.0),
    // headline verbs
    ("promise", 1.0), ("promises", 1.0), ("promised", 1.0),
    ("deliver", 1.0), ("delivers", 1.0), ("delivered", 1.0),
    ("boost", 1.0), ("boosts", 1.0), ("boosted", 1.0),
    ("cut", -1.0), ("cuts", -1.0), ("cutting", -1.0), ("slashed", -2.0),
    ("warn", -1.0), ("warns", -1.0), ("warning", -1.0),
    ("praise", 2.0), ("praised", 2.0), ("praises", 2.0),
    ("condemn", -2.0), ("condemns", -2.0), ("condemned", -2.0),
    // present but zero: counted as neutral tokens
    ("goodbye", 0.0), ("ok", 0.0), ("fine", 0.0), ("normal", 0.0),
    // emojis
    ("😊", 2.0), ("😀", 2.0), ("😃", 2.0), ("😄", 2.0), ("😉", 1.0), ("🙂", 1.0), ("😁", 2.0),
    ("🥳", 3.0), ("🎉", 3.0), ("😍", 3.0), ("❤", 3.0), ("💖", 3.0), ("💙", 2.0), ("💚", 2.0),
    ("🔥", 2.0), ("💯", 3.0), ("👍", 2.0), ("🙏", 1.0), ("😂", 2.0), ("😆", 2.0),
    ("😐", 0.0), ("😑", 0.0),
    ("😕", -1.0), ("🙁", -1.0), ("☹", -1.0), ("😞", -2.0), ("😔", -2.0), ("😢", -2.0), ("😭", -3.0),
    ("😡", -3.0), ("🤬", -3.0), ("😠", -2.0), ("😤", -2.0), ("🤮", -3.0), ("💔", -3.0), ("👎", -2.0),
    ("😱", -2.0), ("😨", -2.0), ("😰", -2.0), ("😓", -1.0), ("😵", -1.0), ("💀", -2.0), ("🤡", -2.0),
];

fn table() -> &'static HashMap<&'static str, f32> {
    static TABLE: OnceLock<HashMap<&'static str, f32>> = OnceLock::new();
    TABLE.get_or_init(|| ENTRIES.iter().copied().collect())
}

/// Valence of a lowercase word or an emoji glyph (variation selectors ignored)
pub(crate) fn valence(token: &str) -> Option<f32> {
    let table = table();
    table
        .get(token)
        .or_else(|| table.get(token.trim_end_matches('\u{FE0F}')))
        .copied()
}

pub(crate) fn is_booster(word: &str) -> bool {
    BOOSTERS.contains(&word)
}

pub(crate) fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word)
}
