//! Table of contents derived from body headings.
//!
//! Anchor ids follow GitHub-style slugging so they match the ids a markdown
//! renderer puts on headings. Every heading takes part in id de-duplication,
//! but only level 2 and 3 headings make it into the TOC.

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocItem {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// A level-2 section and the level-3 items under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocGroup {
    pub key: String,
    pub title: TocItem,
    pub children: Vec<TocItem>,
}

const ORPHAN_GROUP_KEY: &str = "__orphan";

static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static UNDERSCORE_EMPHASIS_REGEX: OnceLock<Regex> = OnceLock::new();

/// Produces unique anchor ids, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slug(&mut self, text: &str) -> String {
        let original = slugify(text);
        let mut result = original.clone();
        while self.occurrences.contains_key(&result) {
            let count = self.occurrences.entry(original.clone()).or_insert(0);
            *count += 1;
            result = format!("{}-{}", original, count);
        }
        self.occurrences.insert(result.clone(), 0);
        result
    }
}

/// Lowercase, drop punctuation except `-` and `_`, spaces become `-`.
pub fn slugify(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// `(level, text)` of an ATX heading line, if it is one.
fn parse_heading(line: &str) -> Option<(u8, String)> {
    let trimmed = line.trim();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut text = rest.trim();
    let without_closing = text.trim_end_matches('#');
    if without_closing.is_empty() || without_closing.ends_with(char::is_whitespace) {
        text = without_closing.trim_end();
    }

    Some((level as u8, clean_inline(text)))
}

/// Reduce inline markup to the visible text.
fn clean_inline(text: &str) -> String {
    let link = LINK_REGEX.get_or_init(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap());
    // `_x_` and `__x__` only at word boundaries, so snake_case survives
    let emphasis = UNDERSCORE_EMPHASIS_REGEX
        .get_or_init(|| Regex::new(r"\b_{1,2}([^_\s][^_]*?)_{1,2}\b").unwrap());

    let text = link.replace_all(text, "$1");
    emphasis
        .replace_all(&text, "$1")
        .chars()
        .filter(|c| !matches!(c, '`' | '*'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Level 2 and 3 headings of `body`, outside fenced code blocks.
pub fn extract_toc(body: &str) -> Vec<TocItem> {
    let mut slugger = Slugger::new();
    let mut in_fence = false;
    let mut items = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let Some((level, text)) = parse_heading(line) else {
            continue;
        };
        let id = slugger.slug(&text);
        if level == 2 || level == 3 {
            items.push(TocItem { id, text, level });
        }
    }

    items
}

/// Group TOC items under their level-2 sections.
///
/// Level-3 items that appear before any level-2 item are collected into one
/// group titled `fallback_title`.
pub fn group_toc(items: &[TocItem], fallback_title: &str) -> Vec<TocGroup> {
    let mut groups: Vec<TocGroup> = Vec::new();
    let mut current: Option<usize> = None;
    let mut orphan: Option<usize> = None;

    for item in items {
        if item.level == 2 {
            let key = if item.id.is_empty() {
                format!("h2-{}", groups.len())
            } else {
                item.id.clone()
            };
            groups.push(TocGroup {
                key,
                title: item.clone(),
                children: Vec::new(),
            });
            current = Some(groups.len() - 1);
            continue;
        }

        let target = match current {
            Some(idx) => idx,
            None => {
                let idx = *orphan.get_or_insert_with(|| {
                    groups.push(TocGroup {
                        key: ORPHAN_GROUP_KEY.to_string(),
                        title: TocItem {
                            id: String::new(),
                            text: fallback_title.to_string(),
                            level: 2,
                        },
                        children: Vec::new(),
                    });
                    groups.len() - 1
                });
                current = Some(idx);
                idx
            }
        };
        groups[target].children.push(item.clone());
    }

    groups
}
