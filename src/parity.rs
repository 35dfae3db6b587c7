//! Translation parity checks.
//!
//! Compares the structural shape (headings, code fences, paragraphs) of the
//! two language variants of every slug. A mismatch is a heuristic signal that
//! a translation dropped or added a section or code sample; it says nothing
//! about the meaning of the text.

use crate::content::{locale_cmp, split_frontmatter, ContentIndex, ContentLocation};
use crate::error::{ContentError, Result};
use crate::i18n::Language;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Structural counts of one file body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StructureStats {
    pub headings: usize,
    /// Fence lines, so a closed code block counts 2
    pub code_fences: usize,
    pub paragraphs: usize,
}

/// Count headings, code fence lines and paragraph lines after the frontmatter.
///
/// Every non-blank line that is neither a fence, a heading, a blockquote nor
/// a `<center>` tag counts as a paragraph, list items and table rows included.
pub fn stats_of(text: &str) -> StructureStats {
    let (_, body) = split_frontmatter(text);
    let mut stats = StructureStats::default();

    for line in body.lines() {
        let s = line.trim();
        if s.is_empty() {
            continue;
        }
        if s.starts_with("```") {
            stats.code_fences += 1;
            continue;
        }
        if s.starts_with('#') {
            stats.headings += 1;
            continue;
        }
        if !s.starts_with('>') && !s.starts_with("<center>") && !s.starts_with("</center>") {
            stats.paragraphs += 1;
        }
    }

    stats
}

/// Signed componentwise difference `other - baseline`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsDiff {
    pub headings: i64,
    pub code_fences: i64,
    pub paragraphs: i64,
}

impl StatsDiff {
    pub fn between(baseline: StructureStats, other: StructureStats) -> StatsDiff {
        StatsDiff {
            headings: other.headings as i64 - baseline.headings as i64,
            code_fences: other.code_fences as i64 - baseline.code_fences as i64,
            paragraphs: other.paragraphs as i64 - baseline.paragraphs as i64,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.headings == 0 && self.code_fences == 0 && self.paragraphs == 0
    }
}

/// Comparison of one slug's two variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParityRow {
    pub slug: String,
    pub primary: StructureStats,
    pub secondary: StructureStats,
    pub diff: StatsDiff,
}

impl ParityRow {
    pub fn new(slug: impl Into<String>, primary: StructureStats, secondary: StructureStats) -> Self {
        Self {
            slug: slug.into(),
            primary,
            secondary,
            diff: StatsDiff::between(primary, secondary),
        }
    }

    pub fn is_flagged(&self) -> bool {
        !self.diff.is_zero()
    }
}

/// Result of one parity run. Computed, printed, discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParityReport {
    pub primary: Language,
    pub secondary: Language,
    pub rows: Vec<ParityRow>,
}

impl ParityReport {
    /// Build a report from precomputed rows, sorted by slug.
    pub fn from_rows(mut rows: Vec<ParityRow>) -> Self {
        rows.sort_by(|a, b| locale_cmp(&a.slug, &b.slug));
        let primary = Language::primary();
        Self {
            primary,
            secondary: primary.opposite(),
            rows,
        }
    }

    /// Compare every slug of `index` that exists in both languages.
    pub fn from_index(index: &ContentIndex) -> Result<Self> {
        let pairs = index.translation_pairs();
        info!(
            "Checking {} translated post(s) of {} under {}",
            pairs.len(),
            index.len(),
            index.root().display()
        );

        let mut rows = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let row = ParityRow::new(pair.slug, read_stats(pair.primary)?, read_stats(pair.secondary)?);
            if row.is_flagged() {
                warn!("Structural mismatch in '{}': {:?}", row.slug, row.diff);
            } else {
                debug!("'{}' matches", row.slug);
            }
            rows.push(row);
        }

        Ok(Self::from_rows(rows))
    }

    pub fn flagged(&self) -> impl Iterator<Item = &ParityRow> {
        self.rows.iter().filter(|row| row.is_flagged())
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged().count()
    }

    pub fn has_mismatches(&self) -> bool {
        self.flagged_count() > 0
    }

    /// Process exit status: 0 when everything matches, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.has_mismatches() {
            1
        } else {
            0
        }
    }

    /// Tabular report: header, one row per slug, blank line, summary.
    pub fn render(&self) -> String {
        let (p, s) = (self.primary.code(), self.secondary.code());
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{:<28} Head({p}/{s}) Code({p}/{s}) Para({p}/{s}) Δhead Δcode Δpara",
            "Slug"
        );

        for row in &self.rows {
            let heads = format!("{}/{}", row.primary.headings, row.secondary.headings);
            let codes = format!("{}/{}", row.primary.code_fences, row.secondary.code_fences);
            let paras = format!("{}/{}", row.primary.paragraphs, row.secondary.paragraphs);
            let line = format!(
                "{:<28} {:<10} {:<11} {:<12} {:>5} {:>6} {:>6} {}",
                row.slug,
                heads,
                codes,
                paras,
                row.diff.headings,
                row.diff.code_fences,
                row.diff.paragraphs,
                if row.is_flagged() { "  !" } else { "" }
            );
            let _ = writeln!(out, "{}", line.trim_end());
        }

        let flagged = self.flagged_count();
        if flagged > 0 {
            let _ = writeln!(
                out,
                "\nFound {} post(s) with structural mismatches. {} posts should be direct translations only.",
                flagged,
                self.secondary.name()
            );
        } else {
            let _ = writeln!(out, "\nAll posts structurally match.");
        }

        out
    }
}

fn read_stats(location: &ContentLocation) -> Result<StructureStats> {
    let bytes = fs::read(&location.path).map_err(|e| ContentError::io(&location.path, e))?;
    Ok(stats_of(&String::from_utf8_lossy(&bytes)))
}

/// Scan `root` and compare every translated slug.
pub fn check_parity(root: impl AsRef<Path>) -> Result<ParityReport> {
    let index = ContentIndex::scan(root)?;
    ParityReport::from_index(&index)
}
