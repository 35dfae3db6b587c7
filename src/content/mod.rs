//! Content module - discovery, resolution and metadata of bilingual posts

pub mod aggregate;
pub mod convention;
pub mod frontmatter;
pub mod index;
pub mod metrics;
pub mod post;
pub mod resolver;
pub mod store;
pub mod toc;

pub use aggregate::{locale_cmp, TermCount};
pub use convention::{Convention, CONTENT_EXTENSION};
pub use frontmatter::{normalize_date, parse_document, split_frontmatter, Achievement, Frontmatter};
pub use index::{ContentIndex, ContentLocation, TranslationPair};
pub use metrics::{MetricsReport, ResolutionMetrics};
pub use post::{reading_stats, Post, PostMeta, ReadingStats, DEFAULT_WORDS_PER_MINUTE};
pub use resolver::{resolution_plan, resolve, MatchStage, Resolution, ResolutionStep};
pub use store::{ContentStore, Neighbors, PostPage, SitemapEntry, StoreSettings, DEFAULT_PAGE_SIZE};
pub use toc::{extract_toc, group_toc, TocGroup, TocItem};
