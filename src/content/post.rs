use crate::content::frontmatter::{parse_document, Achievement};
use crate::content::resolver::{MatchStage, Resolution};
use crate::content::toc::{extract_toc, TocItem};
use crate::i18n::Language;
use serde::Serialize;

/// Assumed reading speed when none is configured.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadingStats {
    pub words: usize,
    pub minutes: u32,
}

/// Word count and reading time of a body.
///
/// Words are whitespace-separated tokens. Minutes are rounded to the nearest
/// integer and never below 1.
pub fn reading_stats(body: &str, words_per_minute: u32) -> ReadingStats {
    let words = body.split_whitespace().count();
    let speed = if words_per_minute == 0 {
        DEFAULT_WORDS_PER_MINUTE
    } else {
        words_per_minute
    };
    let minutes = (words as f64 / speed as f64).round().max(1.0) as u32;
    ReadingStats { words, minutes }
}

/// Listing-level metadata of one post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMeta {
    pub slug: String,
    /// Language of the file that was resolved; `None` for unqualified files
    pub language: Option<Language>,
    pub title: String,
    pub date: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievement: Option<Achievement>,
    pub words: usize,
    pub minutes: u32,
}

impl PostMeta {
    pub fn from_source(
        slug: &str,
        language: Option<Language>,
        source: &str,
        words_per_minute: u32,
    ) -> PostMeta {
        let (frontmatter, body) = parse_document(source);
        let stats = reading_stats(body, words_per_minute);
        PostMeta {
            slug: slug.to_string(),
            language,
            title: frontmatter.title,
            date: frontmatter.date,
            categories: frontmatter.categories,
            tags: frontmatter.tags,
            cover: frontmatter.cover,
            achievement: frontmatter.achievement,
            words: stats.words,
            minutes: stats.minutes,
        }
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag == name)
    }

    pub fn in_category(&self, name: &str) -> bool {
        self.categories.iter().any(|category| category == name)
    }
}

/// A resolved post: metadata, raw body and headings for the TOC.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub meta: PostMeta,
    /// How the slug was resolved for the requested language
    pub stage: MatchStage,
    pub body: String,
    pub toc: Vec<TocItem>,
}

impl Post {
    pub fn from_source(resolution: &Resolution, source: &str, words_per_minute: u32) -> Post {
        let location = &resolution.location;
        let meta = PostMeta::from_source(&location.slug, location.language, source, words_per_minute);
        let (_, body) = parse_document(source);
        Post {
            meta,
            stage: resolution.stage,
            toc: extract_toc(body),
            body: body.to_string(),
        }
    }
}
