//! Comment ingestion
//!
//! Turns a subreddit listing (as returned by the proxy) or pasted text into
//! `CommentRecord`s, the one record shape every later stage consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::sentiment::Sentiment;

/// One comment plus the citation metadata that travels with it to the screen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentRecord {
    pub text: String,
    /// `positive`, `negative` or `neutral`; filled by the scorer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(alias = "citation_number", skip_serializing_if = "Option::is_none")]
    pub citation_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(alias = "post_url", skip_serializing_if = "Option::is_none")]
    pub post_url: Option<String>,
    #[serde(alias = "post_title", skip_serializing_if = "Option::is_none")]
    pub post_title: Option<String>,
}

impl CommentRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Sentiment label, resolved with a neutral fallback for unknown labels
    pub fn sentiment(&self) -> Sentiment {
        match self.sentiment.as_deref() {
            Some(label) => Sentiment::resolve(label),
            None => Sentiment::Neutral,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    #[serde(default)]
    data: Option<Post>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Post {
    title: Option<String>,
    selftext: Option<String>,
    permalink: Option<String>,
    url: Option<String>,
    post_hint: Option<String>,
    is_video: Option<bool>,
    is_gallery: Option<bool>,
    media: Option<serde_json::Value>,
    secure_media: Option<serde_json::Value>,
}

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];
const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".wav", ".ogg", ".m4a"];

impl Post {
    fn has_media(&self) -> bool {
        let hint = self.post_hint.as_deref().unwrap_or_default();
        let url = self.url.as_deref().unwrap_or_default();
        let url_lower = url.to_lowercase();
        let ends_with_any = |exts: &[&str]| exts.iter().any(|ext| url_lower.ends_with(ext));

        let image = hint == "image" || ends_with_any(IMAGE_EXTENSIONS);
        let video = self.is_video.unwrap_or(false) || hint == "video" || url.contains("v.redd.it");
        let gif = url.contains(".gif") || url.contains("gfycat");
        let audio = ends_with_any(AUDIO_EXTENSIONS);
        let youtube = url.contains("youtube.com") || url.contains("youtu.be");
        let embedded = self.is_gallery.unwrap_or(false) || self.media.is_some() || self.secure_media.is_some();

        image || video || gif || audio || youtube || embedded
    }
}

/// Normalize a user-entered subreddit: trims, drops a leading `r/`, and
/// rejects empty names or comma-separated lists
pub fn strip_subreddit_prefix(input: &str) -> Result<String, GameError> {
    let trimmed = input.trim();
    let name = trimmed.strip_prefix("r/").unwrap_or(trimmed);
    if name.is_empty() {
        return Err(GameError::InvalidListing("subreddit name is empty".into()));
    }
    if name.contains(',') {
        return Err(GameError::InvalidListing(
            "only one subreddit is supported per game".into(),
        ));
    }
    Ok(name.to_string())
}

/// Build records from a subreddit listing, skipping media posts
pub fn records_from_listing(json: &str, subreddit: &str) -> Result<Vec<CommentRecord>, GameError> {
    let listing: Listing =
        serde_json::from_str(json).map_err(|e| GameError::InvalidListing(e.to_string()))?;
    let total = listing.data.children.len();

    let records: Vec<CommentRecord> = listing
        .data
        .children
        .into_iter()
        .filter_map(|child| child.data)
        .filter(|post| !post.has_media())
        .enumerate()
        .map(|(index, post)| {
            let title = post.title.unwrap_or_default();
            let text = format!("{} {}", title, post.selftext.unwrap_or_default())
                .trim()
                .to_string();
            let permalink = post.permalink.filter(|p| !p.is_empty());
            CommentRecord {
                text,
                citation_number: Some(index as u32 + 1),
                subreddit: Some(subreddit.to_string()),
                post_url: permalink.as_ref().map(|p| format!("https://reddit.com{}", p)),
                permalink,
                post_title: Some(if title.is_empty() {
                    crate::consts::UNTITLED_POST.to_string()
                } else {
                    title
                }),
                ..Default::default()
            }
        })
        .collect();

    log::info!(
        "Filtered r/{}: {} posts -> {} text posts",
        subreddit,
        total,
        records.len()
    );
    Ok(records)
}

/// One record per non-empty line of pasted text
pub fn records_from_text(text: &str) -> Vec<CommentRecord> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| CommentRecord {
            text: line.to_string(),
            citation_number: Some(index as u32 + 1),
            subreddit: Some("Manual".into()),
            post_title: Some("Manual Entry".into()),
            ..Default::default()
        })
        .collect()
}

/// Sentiment tally for one cited post
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRow {
    /// `None` collects every record without a citation
    pub citation_number: Option<u32>,
    pub post_title: String,
    pub subreddit: String,
    pub permalink: Option<String>,
    pub post_url: Option<String>,
    pub segments: usize,
    pub negative: usize,
    pub positive: usize,
    pub neutral: usize,
}

/// Group scored records by citation number. Rows are ordered by citation,
/// uncited records last; post metadata comes from the first record of each.
pub fn source_table(records: &[CommentRecord]) -> Vec<SourceRow> {
    let mut rows: BTreeMap<(bool, Option<u32>), SourceRow> = BTreeMap::new();

    for record in records {
        let key = (record.citation_number.is_none(), record.citation_number);
        let row = rows.entry(key).or_insert_with(|| SourceRow {
            citation_number: record.citation_number,
            post_title: record
                .post_title
                .clone()
                .filter(|t| !t.is_empty())
                .or_else(|| Some(record.text.clone()).filter(|t| !t.is_empty()))
                .unwrap_or_else(|| crate::consts::UNTITLED_POST.to_string()),
            subreddit: record
                .subreddit
                .clone()
                .unwrap_or_else(|| crate::consts::UNKNOWN_SUBREDDIT.to_string()),
            permalink: record.permalink.clone(),
            post_url: record.post_url.clone(),
            segments: 0,
            negative: 0,
            positive: 0,
            neutral: 0,
        });
        row.segments += 1;
        match record.sentiment() {
            Sentiment::Negative => row.negative += 1,
            Sentiment::Positive => row.positive += 1,
            Sentiment::Neutral => row.neutral += 1,
        }
    }

    log::info!(
        "Grouped {} segments into {} sources",
        records.len(),
        rows.len()
    );
    rows.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(posts: &[serde_json::Value]) -> String {
        let children: Vec<_> = posts
            .iter()
            .map(|p| serde_json::json!({ "kind": "t3", "data": p }))
            .collect();
        serde_json::json!({ "data": { "children": children } }).to_string()
    }

    #[test]
    fn test_media_posts_filtered() {
        let json = listing(&[
            serde_json::json!({ "title": "Text post", "selftext": "body", "permalink": "/r/x/1" }),
            serde_json::json!({ "title": "Pic", "post_hint": "image", "url": "https://i.redd.it/a.png" }),
            serde_json::json!({ "title": "Clip", "is_video": true }),
            serde_json::json!({ "title": "Tune", "url": "https://host/song.MP3" }),
            serde_json::json!({ "title": "Vid", "url": "https://youtu.be/abc" }),
            serde_json::json!({ "title": "Album", "is_gallery": true }),
            serde_json::json!({ "title": "Embed", "media": { "type": "x" } }),
            serde_json::json!({ "title": "Second text", "media": null }),
        ]);
        let records = records_from_listing(&json, "rust").expect("valid listing");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "Text post body");
        assert_eq!(records[1].text, "Second text");
    }

    #[test]
    fn test_citations_numbered_in_kept_order() {
        let json = listing(&[
            serde_json::json!({ "title": "a", "permalink": "/r/rust/comments/1" }),
            serde_json::json!({ "title": "gif", "url": "https://x/y.gif" }),
            serde_json::json!({ "title": "b" }),
        ]);
        let records = records_from_listing(&json, "rust").expect("valid listing");
        let numbers: Vec<_> = records.iter().map(|r| r.citation_number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2)]);
        assert_eq!(
            records[0].post_url.as_deref(),
            Some("https://reddit.com/r/rust/comments/1")
        );
        assert_eq!(records[1].post_url, None);
        assert_eq!(records[1].subreddit.as_deref(), Some("rust"));
    }

    #[test]
    fn test_untitled_fallback() {
        let json = listing(&[serde_json::json!({ "selftext": "only a body" })]);
        let records = records_from_listing(&json, "rust").expect("valid listing");
        assert_eq!(records[0].post_title.as_deref(), Some("Untitled"));
        assert_eq!(records[0].text, "only a body");
    }

    #[test]
    fn test_malformed_listing_rejected() {
        let err = records_from_listing("{\"kind\": \"Listing\"}", "rust").unwrap_err();
        assert!(matches!(err, GameError::InvalidListing(_)));
    }

    #[test]
    fn test_records_from_text() {
        let records = records_from_text("  first line \n\n\r\nsecond\n   \n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "first line");
        assert_eq!(records[1].citation_number, Some(2));
        assert_eq!(records[1].subreddit.as_deref(), Some("Manual"));
        assert_eq!(records[1].post_title.as_deref(), Some("Manual Entry"));
    }

    #[test]
    fn test_strip_subreddit_prefix() {
        assert_eq!(strip_subreddit_prefix(" r/rust ").unwrap(), "rust");
        assert_eq!(strip_subreddit_prefix("gaming").unwrap(), "gaming");
        assert!(strip_subreddit_prefix("r/").is_err());
        assert!(strip_subreddit_prefix("rust,gaming").is_err());
    }

    #[test]
    fn test_camel_case_record_fields() {
        let record: CommentRecord = serde_json::from_str(
            r#"{"text":"hi","citationNumber":4,"postTitle":"T","sentiment":"positive"}"#,
        )
        .expect("valid record");
        assert_eq!(record.citation_number, Some(4));
        assert_eq!(record.post_title.as_deref(), Some("T"));
        assert_eq!(record.sentiment(), Sentiment::Positive);
    }

    fn cited(text: &str, citation: Option<u32>, sentiment: &str) -> CommentRecord {
        CommentRecord {
            citation_number: citation,
            sentiment: Some(sentiment.into()),
            ..CommentRecord::new(text)
        }
    }

    #[test]
    fn test_source_table_groups_by_citation() {
        let mut first = cited("good post", Some(2), "positive");
        first.post_title = Some("Second thread".into());
        first.subreddit = Some("rust".into());
        let records = vec![
            first,
            cited("no source", None, "negative"),
            cited("bad take", Some(1), "negative"),
            cited("meh", Some(2), "neutral"),
            cited("worse take", Some(2), "negative"),
            cited("", None, "mixed"),
        ];

        let rows = source_table(&records);
        let order: Vec<_> = rows.iter().map(|r| r.citation_number).collect();
        assert_eq!(order, vec![Some(1), Some(2), None]);

        assert_eq!(rows[0].post_title, "bad take");
        assert_eq!(rows[0].subreddit, "Unknown");
        assert_eq!((rows[0].negative, rows[0].positive, rows[0].neutral), (1, 0, 0));

        assert_eq!(rows[1].post_title, "Second thread");
        assert_eq!(rows[1].subreddit, "rust");
        assert_eq!(rows[1].segments, 3);
        assert_eq!((rows[1].negative, rows[1].positive, rows[1].neutral), (1, 1, 1));

        // unknown labels count as neutral
        assert_eq!(rows[2].segments, 2);
        assert_eq!((rows[2].negative, rows[2].neutral), (1, 1));
        assert_eq!(rows[2].post_title, "no source");
    }

    #[test]
    fn test_source_table_empty() {
        assert!(source_table(&[]).is_empty());
    }

    #[test]
    fn test_null_media_flags_accepted() {
        let json = listing(&[
            serde_json::json!({ "title": "Plain", "is_video": null, "is_gallery": null }),
            serde_json::json!({ "title": "Clip", "is_video": true, "is_gallery": null }),
        ]);
        let records = records_from_listing(&json, "rust").expect("null flags are fine");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Plain");
    }
}
