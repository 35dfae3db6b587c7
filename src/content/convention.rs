//! File placement conventions for content files.
//!
//! Three layouts coexist under one content root:
//!
//! | Convention     | Path                          |
//! |----------------|-------------------------------|
//! | `Directory`    | `<root>/<lang>/<slug>.mdx`    |
//! | `LegacySuffix` | `<root>/<slug>.<lang>.mdx`    |
//! | `Unqualified`  | `<root>/<slug>.mdx`           |
//!
//! Variant order is precedence order: for the same slug and language a
//! `Directory` file is authoritative over a `LegacySuffix` one.

use crate::i18n::{Language, LanguageRegistry};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Extension shared by every content file.
pub const CONTENT_EXTENSION: &str = "mdx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    Directory,
    LegacySuffix,
    Unqualified,
}

impl Convention {
    /// Conventions that carry a language, in precedence order.
    pub const QUALIFIED: [Convention; 2] = [Convention::Directory, Convention::LegacySuffix];

    /// Where a file for `slug` would live under this convention.
    ///
    /// Qualified conventions need a language and return `None` without one;
    /// `Unqualified` ignores the language.
    pub fn path_for(&self, root: &Path, slug: &str, language: Option<Language>) -> Option<PathBuf> {
        match (self, language) {
            (Convention::Directory, Some(lang)) => Some(
                root.join(lang.code())
                    .join(format!("{}.{}", slug, CONTENT_EXTENSION)),
            ),
            (Convention::LegacySuffix, Some(lang)) => Some(root.join(format!(
                "{}.{}.{}",
                slug,
                lang.code(),
                CONTENT_EXTENSION
            ))),
            (Convention::Unqualified, _) => {
                Some(root.join(format!("{}.{}", slug, CONTENT_EXTENSION)))
            }
            _ => None,
        }
    }

    pub fn is_qualified(&self) -> bool {
        !matches!(self, Convention::Unqualified)
    }
}

static LEGACY_SUFFIX_REGEX: OnceLock<Regex> = OnceLock::new();

/// `^(.+)\.(id|en)\.mdx$`, built from the registry's language codes.
fn legacy_suffix_regex() -> &'static Regex {
    LEGACY_SUFFIX_REGEX.get_or_init(|| {
        let codes: Vec<String> = LanguageRegistry::get()
            .list()
            .iter()
            .map(|lang| regex::escape(lang.code))
            .collect();
        let pattern = format!(
            r"^(.+)\.({})\.{}$",
            codes.join("|"),
            regex::escape(CONTENT_EXTENSION)
        );
        Regex::new(&pattern).expect("legacy suffix pattern is built from static codes")
    })
}

/// Whether a directory entry name looks like a content file.
pub fn is_content_file_name(file_name: &str) -> bool {
    !file_name.starts_with('.') && strip_extension(file_name).is_some()
}

/// `post.mdx` -> `post`. `None` when the extension does not match or the
/// stem would be empty.
pub fn strip_extension(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(CONTENT_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
}

/// Classify a file that sits directly under the content root.
///
/// Returns the base slug, the convention and the language qualifier.
pub fn classify_root_file(file_name: &str) -> Option<(String, Convention, Option<Language>)> {
    if !is_content_file_name(file_name) {
        return None;
    }

    if let Some(caps) = legacy_suffix_regex().captures(file_name) {
        let language = Language::from_code(&caps[2]).ok();
        if language.is_some() {
            return Some((caps[1].to_string(), Convention::LegacySuffix, language));
        }
    }

    strip_extension(file_name).map(|slug| (slug.to_string(), Convention::Unqualified, None))
}
