//! Resolution metrics.
//!
//! Counts how often a requested language was served directly versus through
//! one of the fallbacks, which shows how much content still lacks a
//! translation.

use crate::content::resolver::MatchStage;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by every resolution performed through a store.
#[derive(Debug, Default)]
pub struct ResolutionMetrics {
    /// Served from a file in the preferred language
    preferred: AtomicUsize,

    /// Served from a language-less legacy file
    unqualified: AtomicUsize,

    /// Served from the other language
    opposite: AtomicUsize,

    /// Served by the final fixed-order scan
    last_resort: AtomicUsize,

    /// Nothing matched
    not_found: AtomicUsize,
}

impl ResolutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one resolution.
    pub fn record(&self, outcome: Option<MatchStage>) {
        let counter = match outcome {
            Some(MatchStage::Preferred) => &self.preferred,
            Some(MatchStage::Unqualified) => &self.unqualified,
            Some(MatchStage::Opposite) => &self.opposite,
            Some(MatchStage::LastResort) => &self.last_resort,
            None => &self.not_found,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn preferred(&self) -> usize {
        self.preferred.load(Ordering::Relaxed)
    }

    pub fn unqualified(&self) -> usize {
        self.unqualified.load(Ordering::Relaxed)
    }

    pub fn opposite(&self) -> usize {
        self.opposite.load(Ordering::Relaxed)
    }

    pub fn last_resort(&self) -> usize {
        self.last_resort.load(Ordering::Relaxed)
    }

    pub fn not_found(&self) -> usize {
        self.not_found.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let preferred = self.preferred();
        let unqualified = self.unqualified();
        let opposite = self.opposite();
        let last_resort = self.last_resort();
        let not_found = self.not_found();

        let resolved = preferred + unqualified + opposite + last_resort;
        let fallback_rate = if resolved > 0 {
            ((resolved - preferred) as f64 / resolved as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            preferred,
            unqualified,
            opposite,
            last_resort,
            not_found,
            total: resolved + not_found,
            fallback_rate,
        }
    }
}

/// Snapshot of the resolution counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub preferred: usize,
    pub unqualified: usize,
    pub opposite: usize,
    pub last_resort: usize,
    pub not_found: usize,

    /// All resolutions, found or not
    pub total: usize,

    /// Share of successful resolutions that needed a fallback (0-100)
    pub fallback_rate: f64,
}
