//! JSON API over the content store.
//!
//! Renderers ask for posts, listings and taxonomy pages here instead of
//! touching the content root themselves. Every request rescans the root, so
//! the server never serves stale content and holds no content state.

use crate::config::Config;
use crate::content::{
    group_toc, ContentStore, MetricsReport, Neighbors, Post, PostMeta, PostPage, SitemapEntry,
    TermCount, TocGroup,
};
use crate::error::ContentError;
use crate::i18n::{Language, LanguageStrings};
use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Name of the cookie carrying the reader's language choice.
pub const LANGUAGE_COOKIE: &str = "lang";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(ContentStore::from_config(&config)),
            config: Arc::new(config),
        }
    }
}

/// Error body returned by every failing route.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "INVALID_REQUEST" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        error!("Content error: {}", err);
        ApiError::internal(err.to_string())
    }
}

/// Query parameters shared by the content routes.
#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    pub lang: Option<String>,
    /// Kept as text so a malformed page number falls back to page 1
    pub page: Option<String>,
}

impl ContentQuery {
    fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

/// Value of one cookie from the `Cookie` request headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
}

/// The request's language preference: `?lang=` first, then the cookie.
///
/// Unsupported codes count as no preference.
pub fn preferred_language(query: &ContentQuery, headers: &HeaderMap) -> Option<Language> {
    Language::parse_preference(query.lang.as_deref())
        .or_else(|| Language::parse_preference(cookie_value(headers, LANGUAGE_COOKIE)))
}

/// The language a request is served in, for resolution and labels alike.
///
/// Without a preference the configured default language applies.
#[derive(Debug, Clone, Copy)]
struct Locale {
    language: Language,
}

impl Locale {
    fn new(state: &AppState, query: &ContentQuery, headers: &HeaderMap) -> Self {
        Self {
            language: preferred_language(query, headers).unwrap_or(state.config.default_language),
        }
    }

    /// Preference handed to the resolver
    fn preference(&self) -> Option<Language> {
        Some(self.language)
    }

    fn labels(&self) -> &'static LanguageStrings {
        self.language.strings()
    }
}

/// Run blocking store work off the async runtime.
async fn with_store<T, F>(state: &AppState, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&ContentStore) -> crate::Result<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || work(&store))
        .await
        .map_err(|e| ApiError::internal(format!("Content task failed: {}", e)))?
        .map_err(ApiError::from)
}

// ==================== Responses ====================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub content_root: String,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub language: Language,
    pub labels: &'static LanguageStrings,
    #[serde(flatten)]
    pub page: PostPage,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub language: Language,
    pub labels: &'static LanguageStrings,
    /// Localized "N words · M min" line
    pub reading: String,
    pub post: Post,
    pub toc: Vec<TocGroup>,
    pub neighbors: Neighbors,
}

#[derive(Debug, Serialize)]
pub struct TermsResponse {
    pub language: Language,
    pub title: &'static str,
    pub terms: Vec<TermCount>,
}

#[derive(Debug, Serialize)]
pub struct TermPostsResponse {
    pub language: Language,
    pub name: String,
    pub posts: Vec<PostMeta>,
}

// ==================== Router ====================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/api/categories", get(list_categories))
        .route("/api/categories/:name", get(category_posts))
        .route("/api/tags", get(list_tags))
        .route("/api/tags/:name", get(tag_posts))
        .route("/api/sitemap", get(sitemap))
        .route("/api/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured port and serve until the process is stopped.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        "Serving content from {} on {}",
        config.content_root.display(),
        addr
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

// ==================== Handlers ====================

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        content_root: state.store.root().display().to_string(),
    })
}

async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
    headers: HeaderMap,
) -> Result<Json<PostListResponse>, ApiError> {
    let locale = Locale::new(&state, &query, &headers);
    let page_number = query.page();
    let page = with_store(&state, move |store| store.page(locale.preference(), page_number)).await?;

    Ok(Json(PostListResponse {
        language: locale.language,
        labels: locale.labels(),
        page,
    }))
}

async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ContentQuery>,
    headers: HeaderMap,
) -> Result<Json<PostResponse>, ApiError> {
    let locale = Locale::new(&state, &query, &headers);
    let lookup = slug.clone();
    let found = with_store(&state, move |store| {
        let Some(post) = store.post(&lookup, locale.preference())? else {
            return Ok(None);
        };
        let neighbors = store.neighbors(&lookup, locale.preference())?;
        Ok(Some((post, neighbors)))
    })
    .await?;

    let Some((post, neighbors)) = found else {
        return Err(ApiError::not_found(format!("Post '{}' not found", slug)));
    };

    let labels = locale.labels();
    Ok(Json(PostResponse {
        language: locale.language,
        labels,
        reading: labels.reading_line(post.meta.words, post.meta.minutes),
        toc: group_toc(&post.toc, labels.sections_fallback),
        post,
        neighbors,
    }))
}

async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
    headers: HeaderMap,
) -> Result<Json<TermsResponse>, ApiError> {
    let locale = Locale::new(&state, &query, &headers);
    let terms = with_store(&state, move |store| store.aggregate_categories(locale.preference())).await?;
    Ok(Json(TermsResponse {
        language: locale.language,
        title: locale.labels().categories,
        terms,
    }))
}

async fn category_posts(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ContentQuery>,
    headers: HeaderMap,
) -> Result<Json<TermPostsResponse>, ApiError> {
    let locale = Locale::new(&state, &query, &headers);
    let lookup = name.clone();
    let posts = with_store(&state, move |store| store.posts_in_category(&lookup, locale.preference())).await?;

    if posts.is_empty() {
        return Err(ApiError::not_found(format!("Category '{}' not found", name)));
    }
    Ok(Json(TermPostsResponse {
        language: locale.language,
        name,
        posts,
    }))
}

async fn list_tags(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
    headers: HeaderMap,
) -> Result<Json<TermsResponse>, ApiError> {
    let locale = Locale::new(&state, &query, &headers);
    let terms = with_store(&state, move |store| store.aggregate_tags(locale.preference())).await?;
    Ok(Json(TermsResponse {
        language: locale.language,
        title: locale.labels().tags,
        terms,
    }))
}

async fn tag_posts(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ContentQuery>,
    headers: HeaderMap,
) -> Result<Json<TermPostsResponse>, ApiError> {
    let locale = Locale::new(&state, &query, &headers);
    let lookup = name.clone();
    let posts = with_store(&state, move |store| store.posts_with_tag(&lookup, locale.preference())).await?;

    if posts.is_empty() {
        return Err(ApiError::not_found(format!("Tag '{}' not found", name)));
    }
    Ok(Json(TermPostsResponse {
        language: locale.language,
        name,
        posts,
    }))
}

async fn sitemap(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<SitemapEntry>>, ApiError> {
    let locale = Locale::new(&state, &query, &headers);
    let base_url = state.config.site_url.clone();
    let entries = with_store(&state, move |store| store.sitemap(&base_url, locale.preference())).await?;
    Ok(Json(entries))
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.store.metrics().report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderValue, Request};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt; // For oneshot()

    fn write(root: &std::path::Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn test_app() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "id/heap.mdx",
            "---\ntitle: Catatan Heap\ndate: 2024-02-01\ncategories: [pwn]\n---\n## Pendahuluan\nHalo\n",
        );
        write(
            dir.path(),
            "en/heap.mdx",
            "---\ntitle: Heap Notes\ndate: 2024-02-01\ncategories: [pwn]\n---\n## Intro\nHello\n",
        );
        write(
            dir.path(),
            "id/web.mdx",
            "---\ntitle: Web\ndate: 2024-01-01\ntags: [xss]\n---\nIsi\n",
        );

        let config = Config {
            content_root: dir.path().to_path_buf(),
            ..Config::default()
        };
        (dir, create_router(AppState::new(config)))
    }

    async fn get_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; lang=id"));
        assert_eq!(cookie_value(&headers, "lang"), Some("id"));
        assert_eq!(cookie_value(&headers, "theme"), Some("dark"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_preferred_language_query_beats_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("lang=id"));

        let query = ContentQuery {
            lang: Some("en".to_string()),
            page: None,
        };
        assert_eq!(preferred_language(&query, &headers), Some(Language::ENGLISH));
        assert_eq!(
            preferred_language(&ContentQuery::default(), &headers),
            Some(Language::INDONESIAN)
        );
        assert_eq!(preferred_language(&ContentQuery::default(), &HeaderMap::new()), None);
    }

    #[test]
    fn test_preferred_language_unsupported_is_none() {
        let query = ContentQuery {
            lang: Some("fr".to_string()),
            page: None,
        };
        assert_eq!(preferred_language(&query, &HeaderMap::new()), None);
    }

    #[test]
    fn test_query_page_falls_back_to_one() {
        let query = ContentQuery {
            lang: None,
            page: Some("abc".to_string()),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(ContentQuery::default().page(), 1);
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, app) = test_app();
        let (status, body) = get_json(app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_get_post_not_found() {
        let (_dir, app) = test_app();
        let (status, body) = get_json(app, get("/api/posts/missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_post_uses_query_language() {
        let (_dir, app) = test_app();
        let (status, body) = get_json(app, get("/api/posts/heap?lang=en")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["post"]["meta"]["title"], "Heap Notes");
        assert_eq!(body["post"]["stage"], "preferred");
        assert_eq!(body["toc"][0]["title"]["id"], "intro");
        assert_eq!(body["labels"]["previous"], "Previous");
    }

    #[tokio::test]
    async fn test_get_post_uses_cookie_language() {
        let (_dir, app) = test_app();
        let request = Request::builder()
            .uri("/api/posts/heap")
            .header(header::COOKIE, "lang=id")
            .body(Body::empty())
            .unwrap();
        let (status, body) = get_json(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["post"]["meta"]["title"], "Catatan Heap");
        assert_eq!(body["language"], "id");
        assert_eq!(body["neighbors"]["previous"]["slug"], "web");
    }

    #[tokio::test]
    async fn test_get_post_falls_back_to_other_language() {
        let (_dir, app) = test_app();
        let (status, body) = get_json(app, get("/api/posts/web?lang=en")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["post"]["meta"]["language"], "id");
        assert_eq!(body["post"]["stage"], "opposite");
    }

    #[tokio::test]
    async fn test_get_post_without_preference_uses_default_language() {
        let (_dir, app) = test_app();
        let (status, body) = get_json(app, get("/api/posts/heap")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["language"], "en");
        assert_eq!(body["post"]["meta"]["language"], "en");
        assert_eq!(body["post"]["meta"]["title"], "Heap Notes");
        assert_eq!(body["post"]["stage"], "preferred");
        assert_eq!(body["labels"]["previous"], "Previous");
    }

    #[tokio::test]
    async fn test_get_post_without_preference_follows_configured_default() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "id/heap.mdx", "---\ntitle: Catatan Heap\n---\nHalo\n");
        write(dir.path(), "en/heap.mdx", "---\ntitle: Heap Notes\n---\nHello\n");
        let config = Config {
            content_root: dir.path().to_path_buf(),
            default_language: Language::INDONESIAN,
            ..Config::default()
        };
        let app = create_router(AppState::new(config));

        let (status, body) = get_json(app, get("/api/posts/heap")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["language"], "id");
        assert_eq!(body["post"]["meta"]["title"], "Catatan Heap");
        assert_eq!(body["labels"]["previous"], "Sebelumnya");
    }

    #[tokio::test]
    async fn test_list_posts() {
        let (_dir, app) = test_app();
        let (status, body) = get_json(app, get("/api/posts?page=1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["total_pages"], 1);
        assert_eq!(body["language"], "en");
        assert_eq!(body["posts"][0]["slug"], "heap");
        assert_eq!(body["posts"][0]["title"], "Heap Notes");
        // web has no English file and falls back
        assert_eq!(body["posts"][1]["language"], "id");
    }

    #[tokio::test]
    async fn test_metrics_count_one_resolution_per_post_request() {
        let (_dir, app) = test_app();

        let (status, _) = get_json(app.clone(), get("/api/posts/heap?lang=en")).await;
        assert_eq!(status, StatusCode::OK);
        let (_, metrics) = get_json(app.clone(), get("/api/metrics")).await;
        assert_eq!(metrics["total"], 1);
        assert_eq!(metrics["preferred"], 1);
        assert_eq!(metrics["fallback_rate"], 0.0);

        // Listings and taxonomies resolve every slug but are not page resolutions
        get_json(app.clone(), get("/api/posts")).await;
        get_json(app.clone(), get("/api/categories")).await;
        get_json(app.clone(), get("/api/sitemap")).await;
        let (_, metrics) = get_json(app.clone(), get("/api/metrics")).await;
        assert_eq!(metrics["total"], 1);

        let (status, _) = get_json(app.clone(), get("/api/posts/missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, metrics) = get_json(app, get("/api/metrics")).await;
        assert_eq!(metrics["total"], 2);
        assert_eq!(metrics["not_found"], 1);
    }

    #[tokio::test]
    async fn test_categories_and_tags() {
        let (dir, app) = test_app();
        let (status, body) = get_json(app, get("/api/categories")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["terms"][0]["name"], "pwn");
        assert_eq!(body["terms"][0]["count"], 1);

        let config = Config {
            content_root: dir.path().to_path_buf(),
            ..Config::default()
        };
        let app = create_router(AppState::new(config));
        let (status, body) = get_json(app.clone(), get("/api/tags/xss")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["posts"][0]["slug"], "web");

        let (status, _) = get_json(app, get("/api/tags/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sitemap_lists_static_routes_and_posts() {
        let (_dir, app) = test_app();
        let (status, body) = get_json(app, get("/api/sitemap")).await;
        assert_eq!(status, StatusCode::OK);
        let urls: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["url"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(urls[0], "https://hadespwn.me");
        assert!(urls.contains(&"https://hadespwn.me/posts/heap".to_string()));
        assert_eq!(urls.len(), 8);
    }
}
