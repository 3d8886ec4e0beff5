//! Rule-based sentiment scoring
//!
//! Lexicon lookup with context rules:
//! - boosters (`very`, `so`, ...) multiply the next scored word by 1.5
//! - negations (`not`, `never`, ...) flip the next scored word
//! - ALL-CAPS words count 1.3x
//! - each `!` pushes a non-zero score 0.2 further from zero (max 1.0)

use serde::{Deserialize, Serialize};

use crate::ingest::CommentRecord;
use crate::lexicon;

const BOOSTER_MULTIPLIER: f32 = 1.5;
const ALL_CAPS_MULTIPLIER: f32 = 1.3;
const EXCLAMATION_BOOST: f32 = 0.2;
const MAX_PUNCTUATION_BOOST: f32 = 1.0;

/// Polarity of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    /// Lookup that falls back to `Neutral` for unknown labels
    pub fn resolve(s: &str) -> Self {
        Self::from_label(s).unwrap_or_else(|| {
            log::warn!("Unknown sentiment '{}', treating as neutral", s);
            Sentiment::Neutral
        })
    }
}

/// >0 positive, <0 negative, otherwise neutral
pub fn classify(score: f32) -> Sentiment {
    if score > 0.0 {
        Sentiment::Positive
    } else if score < 0.0 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Token streams of one text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tokens<'a> {
    pub words: Vec<&'a str>,
    pub emojis: Vec<&'a str>,
    /// Runs of `!`, `?` and `.`
    pub punctuation: Vec<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub score: f32,
    pub positives: u32,
    pub negatives: u32,
    pub neutrals: u32,
    pub words_count: u32,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '\u{2019}'
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x231A..=0x231B
            | 0x23E9..=0x23F3
            | 0x23F8..=0x23FA
            | 0x2600..=0x27BF
            | 0x2B50
            | 0x2B55
            | 0x1F000..=0x1FAFF
    )
}

fn is_punctuation(c: char) -> bool {
    matches!(c, '!' | '?' | '.')
}

/// Split text into words, emoji glyphs and punctuation runs.
/// A trailing variation selector stays attached to its emoji.
pub fn tokenize(text: &str) -> Tokens<'_> {
    let mut tokens = Tokens::default();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let mut end = start + c.len_utf8();
        if is_word_char(c) {
            while let Some(&(i, next)) = chars.peek() {
                if !is_word_char(next) {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            tokens.words.push(&text[start..end]);
        } else if is_punctuation(c) {
            while let Some(&(i, next)) = chars.peek() {
                if !is_punctuation(next) {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            tokens.punctuation.push(&text[start..end]);
        } else if is_emoji(c) {
            if let Some(&(i, '\u{FE0F}')) = chars.peek() {
                end = i + '\u{FE0F}'.len_utf8();
                chars.next();
            }
            tokens.emojis.push(&text[start..end]);
        }
    }
    tokens
}

fn is_all_caps(word: &str) -> bool {
    word.chars().count() > 1 && word == word.to_uppercase()
}

fn punctuation_boost(punctuation: &[&str]) -> f32 {
    let bangs = punctuation
        .iter()
        .map(|run| run.matches('!').count())
        .sum::<usize>();
    (bangs as f32 * EXCLAMATION_BOOST).min(MAX_PUNCTUATION_BOOST)
}

/// Score one text
pub fn analyze(text: &str) -> Analysis {
    let tokens = tokenize(text);

    let mut score = 0.0f32;
    let mut positives = 0u32;
    let mut negatives = 0u32;
    let mut tally = |value: f32, score: &mut f32| {
        *score += value;
        if value > 0.0 {
            positives += 1;
        } else if value < 0.0 {
            negatives += 1;
        }
    };

    // Pending context applies to the next word with a non-zero valence
    let mut modifier = 1.0f32;
    let mut negated = false;

    for raw in &tokens.words {
        let word = raw.to_lowercase();
        if lexicon::is_booster(&word) {
            modifier = BOOSTER_MULTIPLIER;
            continue;
        }
        if lexicon::is_negation(&word) {
            negated = true;
            continue;
        }
        let Some(mut value) = lexicon::valence(&word) else {
            continue;
        };
        if value != 0.0 {
            if is_all_caps(raw) {
                value *= ALL_CAPS_MULTIPLIER;
            }
            if modifier > 1.0 {
                value *= modifier;
                modifier = 1.0;
            }
            if negated {
                value = -value;
                negated = false;
            }
        }
        tally(value, &mut score);
    }

    for emoji in &tokens.emojis {
        if let Some(value) = lexicon::valence(emoji) {
            tally(value, &mut score);
        }
    }

    let boost = punctuation_boost(&tokens.punctuation);
    if boost != 0.0 && score != 0.0 {
        score += boost.copysign(score);
    }

    let words_count = (tokens.words.len() + tokens.emojis.len()) as u32;
    Analysis {
        score,
        positives,
        negatives,
        neutrals: words_count.saturating_sub(positives + negatives),
        words_count,
    }
}

/// Score every record, filling `sentiment` and `score` and keeping the
/// citation metadata as-is. Values already on a record win.
pub fn score_segments(records: Vec<CommentRecord>) -> Vec<CommentRecord> {
    let scored: Vec<CommentRecord> = records
        .into_iter()
        .map(|mut record| {
            let analysis = analyze(&record.text);
            record
                .sentiment
                .get_or_insert_with(|| classify(analysis.score).as_str().to_string());
            record.score.get_or_insert(analysis.score);
            record
        })
        .collect();

    let count = |s: Sentiment| scored.iter().filter(|r| r.sentiment() == s).count();
    log::info!(
        "Scored {} segments: {} negative, {} positive, {} neutral",
        scored.len(),
        count(Sentiment::Negative),
        count(Sentiment::Positive),
        count(Sentiment::Neutral)
    );
    scored
}
