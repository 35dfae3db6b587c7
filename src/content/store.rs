//! Read-only access to the content root for renderers.
//!
//! Every operation scans the root afresh, so a store holds no content state
//! and can be shared freely across concurrent requests.

use crate::config::Config;
use crate::content::aggregate::{self, TermCount};
use crate::content::index::{ContentIndex, ContentLocation};
use crate::content::metrics::ResolutionMetrics;
use crate::content::post::{Post, PostMeta, DEFAULT_WORDS_PER_MINUTE};
use crate::content::resolver::{resolve, Resolution};
use crate::error::{ContentError, Result};
use crate::i18n::Language;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Routes listed in the sitemap besides the posts themselves.
const STATIC_ROUTES: [&str; 6] = ["", "/posts", "/categories", "/tags", "/links", "/about"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub words_per_minute: u32,
    pub page_size: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The posts around one post in date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Neighbors {
    /// Next older post
    pub previous: Option<PostMeta>,
    /// Next newer post
    pub next: Option<PostMeta>,
}

/// One page of the date-sorted listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPage {
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub posts: Vec<PostMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: String,
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    settings: StoreSettings,
    metrics: Arc<ResolutionMetrics>,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            settings: StoreSettings::default(),
            metrics: Arc::new(ResolutionMetrics::new()),
        }
    }

    pub fn with_settings(mut self, settings: StoreSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.content_root.clone()).with_settings(StoreSettings {
            words_per_minute: config.words_per_minute,
            page_size: config.page_size,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn metrics(&self) -> &ResolutionMetrics {
        &self.metrics
    }

    /// Scan the content root.
    pub fn index(&self) -> Result<ContentIndex> {
        ContentIndex::scan(&self.root)
    }

    /// Every distinct base slug across all conventions.
    pub fn list_all_slugs(&self) -> Result<Vec<String>> {
        Ok(self.index()?.list_all_slugs())
    }

    /// Resolve `slug` for a language preference. `Ok(None)` means not found.
    ///
    /// Single-post lookups go through here and are counted in the metrics;
    /// listing scans are not.
    pub fn resolve(&self, slug: &str, preferred: Option<Language>) -> Result<Option<Resolution>> {
        let index = self.index()?;
        let resolution = resolve(&index, slug, preferred);
        self.metrics
            .record(resolution.as_ref().map(|found| found.stage));
        Ok(resolution)
    }

    fn read(&self, location: &ContentLocation) -> Result<String> {
        let bytes = fs::read(&location.path).map_err(|e| ContentError::io(&location.path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Metadata of one post.
    pub fn post_meta(&self, slug: &str, preferred: Option<Language>) -> Result<Option<PostMeta>> {
        let Some(resolution) = self.resolve(slug, preferred)? else {
            return Ok(None);
        };
        self.meta_for(&resolution).map(Some)
    }

    fn meta_for(&self, resolution: &Resolution) -> Result<PostMeta> {
        let location = &resolution.location;
        let source = self.read(location)?;
        Ok(PostMeta::from_source(
            &location.slug,
            location.language,
            &source,
            self.settings.words_per_minute,
        ))
    }

    /// The body-plus-metadata bundle of one post.
    pub fn post(&self, slug: &str, preferred: Option<Language>) -> Result<Option<Post>> {
        let Some(resolution) = self.resolve(slug, preferred)? else {
            info!("Post '{}' not found", slug);
            return Ok(None);
        };
        let source = self.read(&resolution.location)?;
        Ok(Some(Post::from_source(
            &resolution,
            &source,
            self.settings.words_per_minute,
        )))
    }

    /// Metadata of every post, newest first.
    ///
    /// Each slug is resolved with the given preference, so posts missing that
    /// language fall back like single-post resolution does. Equal dates keep
    /// slug order.
    pub fn all_posts_meta(&self, preferred: Option<Language>) -> Result<Vec<PostMeta>> {
        let index = self.index()?;
        let mut metas = Vec::with_capacity(index.len());
        for slug in index.slugs() {
            if let Some(resolution) = resolve(&index, slug, preferred) {
                metas.push(self.meta_for(&resolution)?);
            }
        }
        metas.sort_by(|a, b| b.date.cmp(&a.date));
        debug!("Listed {} posts under {}", metas.len(), self.root.display());
        Ok(metas)
    }

    /// The next older and next newer post around `slug`.
    pub fn neighbors(&self, slug: &str, preferred: Option<Language>) -> Result<Neighbors> {
        let all = self.all_posts_meta(preferred)?;
        Ok(neighbors_in(&all, slug))
    }

    /// One page of the listing. Page numbers start at 1; 0 is treated as 1.
    pub fn page(&self, preferred: Option<Language>, page: usize) -> Result<PostPage> {
        let all = self.all_posts_meta(preferred)?;
        Ok(paginate(all, page, self.settings.page_size))
    }

    pub fn aggregate_categories(&self, preferred: Option<Language>) -> Result<Vec<TermCount>> {
        Ok(aggregate::aggregate_categories(
            &self.all_posts_meta(preferred)?,
        ))
    }

    pub fn aggregate_tags(&self, preferred: Option<Language>) -> Result<Vec<TermCount>> {
        Ok(aggregate::aggregate_tags(&self.all_posts_meta(preferred)?))
    }

    pub fn posts_in_category(&self, name: &str, preferred: Option<Language>) -> Result<Vec<PostMeta>> {
        let mut posts = self.all_posts_meta(preferred)?;
        posts.retain(|post| post.in_category(name));
        Ok(posts)
    }

    pub fn posts_with_tag(&self, name: &str, preferred: Option<Language>) -> Result<Vec<PostMeta>> {
        let mut posts = self.all_posts_meta(preferred)?;
        posts.retain(|post| post.has_tag(name));
        Ok(posts)
    }

    /// Static routes plus one entry per post.
    pub fn sitemap(&self, base_url: &str, preferred: Option<Language>) -> Result<Vec<SitemapEntry>> {
        let base = base_url.trim_end_matches('/');
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut entries: Vec<SitemapEntry> = STATIC_ROUTES
            .iter()
            .map(|route| SitemapEntry {
                url: format!("{}{}", base, route),
                last_modified: now.clone(),
            })
            .collect();

        entries.extend(
            self.all_posts_meta(preferred)?
                .into_iter()
                .map(|post| SitemapEntry {
                    url: format!("{}/posts/{}", base, post.slug),
                    last_modified: post.date,
                }),
        );

        Ok(entries)
    }
}

/// Neighbors of `slug` in a newest-first list.
pub fn neighbors_in(all: &[PostMeta], slug: &str) -> Neighbors {
    let Some(idx) = all.iter().position(|post| post.slug == slug) else {
        return Neighbors::default();
    };
    Neighbors {
        previous: all.get(idx + 1).cloned(),
        next: idx.checked_sub(1).and_then(|i| all.get(i)).cloned(),
    }
}

/// Slice a newest-first list into 1-based pages of `page_size`.
pub fn paginate(all: Vec<PostMeta>, page: usize, page_size: usize) -> PostPage {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total = all.len();
    let total_pages = total.div_ceil(page_size).max(1);
    let posts = all
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();

    PostPage {
        page,
        total_pages,
        total,
        posts,
    }
}
