//! Content discovery: a normalized in-memory index of every content file.
//!
//! The index is built once per run (or per request) by scanning the content
//! root, and is the only thing the resolver and the parity checker look at.

use crate::content::convention::{classify_root_file, is_content_file_name, strip_extension, Convention};
use crate::error::{ContentError, Result};
use crate::i18n::Language;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A resolved file reference: `(slug, language-or-none) -> path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentLocation {
    pub slug: String,
    /// `None` for unqualified legacy files, usable for either language
    pub language: Option<Language>,
    pub convention: Convention,
    pub path: PathBuf,
}

/// Both language variants of one slug, each at its authoritative location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPair<'a> {
    pub slug: &'a str,
    pub primary: &'a ContentLocation,
    pub secondary: &'a ContentLocation,
}

#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    root: PathBuf,
    entries: BTreeMap<String, Vec<ContentLocation>>,
}

impl ContentIndex {
    /// Scan `root` and index every content file under all conventions.
    ///
    /// A missing root yields an empty index.
    pub fn scan(root: impl AsRef<Path>) -> Result<ContentIndex> {
        let root = root.as_ref();
        let mut index = ContentIndex {
            root: root.to_path_buf(),
            entries: BTreeMap::new(),
        };

        if !root.is_dir() {
            debug!("Content root {} does not exist, index is empty", root.display());
            return Ok(index);
        }

        for language in Language::all() {
            let dir = root.join(language.code());
            for file_name in list_content_files(&dir)? {
                if let Some(slug) = strip_extension(&file_name) {
                    index.insert(slug.to_string(), Convention::Directory, Some(language));
                }
            }
        }

        for file_name in list_content_files(root)? {
            if let Some((slug, convention, language)) = classify_root_file(&file_name) {
                index.insert(slug, convention, language);
            }
        }

        debug!(
            "Indexed {} slugs ({} files) under {}",
            index.entries.len(),
            index.entries.values().map(Vec::len).sum::<usize>(),
            root.display()
        );

        Ok(index)
    }

    fn insert(&mut self, slug: String, convention: Convention, language: Option<Language>) {
        let Some(path) = convention.path_for(&self.root, &slug, language) else {
            return;
        };
        let locations = self.entries.entry(slug.clone()).or_default();
        if locations
            .iter()
            .any(|loc| loc.convention == convention && loc.language == language)
        {
            return;
        }
        locations.push(ContentLocation {
            slug,
            language,
            convention,
            path,
        });
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of distinct slugs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.entries.contains_key(slug)
    }

    /// Distinct base slugs in sorted order.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Each distinct base slug exactly once, however many variants it has.
    pub fn list_all_slugs(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Every physical file indexed for `slug`.
    pub fn locations(&self, slug: &str) -> &[ContentLocation] {
        self.entries.get(slug).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Exact lookup of one convention. `Unqualified` ignores `language`.
    pub fn lookup(
        &self,
        slug: &str,
        convention: Convention,
        language: Option<Language>,
    ) -> Option<&ContentLocation> {
        self.locations(slug).iter().find(|loc| {
            loc.convention == convention
                && (!convention.is_qualified() || loc.language == language)
        })
    }

    /// The authoritative file for `(slug, language)`: `Directory` beats
    /// `LegacySuffix`. Unqualified files are never authoritative for a
    /// specific language.
    pub fn authoritative(&self, slug: &str, language: Language) -> Option<&ContentLocation> {
        Convention::QUALIFIED
            .iter()
            .find_map(|convention| self.lookup(slug, *convention, Some(language)))
    }

    /// Slugs that exist in both the primary and the secondary language.
    pub fn translation_pairs(&self) -> Vec<TranslationPair<'_>> {
        let primary = Language::primary();
        let secondary = primary.opposite();
        self.slugs()
            .filter_map(|slug| {
                Some(TranslationPair {
                    slug,
                    primary: self.authoritative(slug, primary)?,
                    secondary: self.authoritative(slug, secondary)?,
                })
            })
            .collect()
    }
}

/// Content file names directly inside `dir`, sorted. Missing dir is empty.
fn list_content_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ContentError::io(dir, e))? {
        let entry = entry.map_err(|e| ContentError::io(dir, e))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if is_content_file_name(&name) && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
