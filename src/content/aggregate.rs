use crate::content::post::PostMeta;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// One distinct category or tag and how many posts carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub name: String,
    pub count: usize,
}

/// Locale-aware name ordering.
///
/// Case-insensitive first; on a tie lowercase sorts before uppercase, then
/// plain code-point order decides.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Tally the terms `terms` picks from each post, sorted by name.
pub fn aggregate<'a, F>(posts: &'a [PostMeta], terms: F) -> Vec<TermCount>
where
    F: Fn(&'a PostMeta) -> &'a [String],
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for term in terms(post) {
            *counts.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let mut result: Vec<TermCount> = counts
        .into_iter()
        .map(|(name, count)| TermCount {
            name: name.to_string(),
            count,
        })
        .collect();
    result.sort_by(|a, b| locale_cmp(&a.name, &b.name));
    result
}

pub fn aggregate_categories(posts: &[PostMeta]) -> Vec<TermCount> {
    aggregate(posts, |post| post.categories.as_slice())
}

pub fn aggregate_tags(posts: &[PostMeta]) -> Vec<TermCount> {
    aggregate(posts, |post| post.tags.as_slice())
}
