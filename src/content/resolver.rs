//! Slug resolution across languages and file conventions.
//!
//! Precedence is an explicit, ordered list of steps (the resolution plan)
//! instead of nested fallbacks. For a preferred language `p` with opposite
//! `o` the plan is:
//!
//! 1. `Directory(p)`, `LegacySuffix(p)`
//! 2. `Unqualified`
//! 3. `Directory(o)`, `LegacySuffix(o)`
//! 4. `Directory`/`LegacySuffix` for every language in registry order
//!
//! Without a preference step 1 is skipped and `o` is the primary language.
//! Duplicate steps are dropped, keeping the first occurrence.

use crate::content::convention::Convention;
use crate::content::index::{ContentIndex, ContentLocation};
use crate::i18n::Language;
use serde::Serialize;
use tracing::debug;

/// Which part of the plan produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    /// File qualified with the preferred language
    Preferred,
    /// Language-less legacy file
    Unqualified,
    /// File in the other language
    Opposite,
    /// Fixed-order scan over every language
    LastResort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionStep {
    pub stage: MatchStage,
    pub convention: Convention,
    pub language: Option<Language>,
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub location: ContentLocation,
    pub stage: MatchStage,
}

/// Build the ordered resolution plan for a preference.
pub fn resolution_plan(preferred: Option<Language>) -> Vec<ResolutionStep> {
    let mut candidates = Vec::new();
    let qualified = |stage: MatchStage, language: Language, out: &mut Vec<ResolutionStep>| {
        for convention in Convention::QUALIFIED {
            out.push(ResolutionStep {
                stage,
                convention,
                language: Some(language),
            });
        }
    };

    if let Some(language) = preferred {
        qualified(MatchStage::Preferred, language, &mut candidates);
    }

    candidates.push(ResolutionStep {
        stage: MatchStage::Unqualified,
        convention: Convention::Unqualified,
        language: None,
    });

    let opposite = preferred
        .map(|language| language.opposite())
        .unwrap_or_else(Language::primary);
    qualified(MatchStage::Opposite, opposite, &mut candidates);

    for language in Language::all() {
        qualified(MatchStage::LastResort, language, &mut candidates);
    }

    let mut plan: Vec<ResolutionStep> = Vec::with_capacity(candidates.len());
    for step in candidates {
        if !plan
            .iter()
            .any(|seen| seen.convention == step.convention && seen.language == step.language)
        {
            plan.push(step);
        }
    }
    plan
}

/// Resolve `slug` for `preferred`, or `None` when no convention has it.
pub fn resolve(index: &ContentIndex, slug: &str, preferred: Option<Language>) -> Option<Resolution> {
    let resolution = resolution_plan(preferred).into_iter().find_map(|step| {
        index
            .lookup(slug, step.convention, step.language)
            .map(|location| Resolution {
                location: location.clone(),
                stage: step.stage,
            })
    });

    match &resolution {
        Some(found) => debug!(
            "Resolved '{}' (preferred={:?}) to {} via {:?}",
            slug,
            preferred.map(|l| l.code()),
            found.location.path.display(),
            found.stage
        ),
        None => debug!(
            "No content for '{}' (preferred={:?})",
            slug,
            preferred.map(|l| l.code())
        ),
    }

    resolution
}
