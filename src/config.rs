use crate::content::{DEFAULT_PAGE_SIZE, DEFAULT_WORDS_PER_MINUTE};
use crate::i18n::Language;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Content
    pub content_root: PathBuf,
    pub words_per_minute: u32,
    pub page_size: usize,

    // Language used for labels when a request states no preference
    pub default_language: Language,

    // Server
    pub site_url: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("content/posts"),
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            page_size: DEFAULT_PAGE_SIZE,
            default_language: Language::ENGLISH,
            site_url: "https://hadespwn.me".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let default_language = match std::env::var("DEFAULT_LANGUAGE") {
            Ok(code) => Language::from_code(code.trim())
                .with_context(|| format!("DEFAULT_LANGUAGE '{}' is not supported", code))?,
            Err(_) => defaults.default_language,
        };

        Ok(Self {
            // Content
            content_root: std::env::var("CONTENT_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.content_root),
            words_per_minute: std::env::var("WORDS_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.words_per_minute),
            page_size: std::env::var("PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.page_size),

            default_language,

            // Server
            site_url: std::env::var("SITE_URL").unwrap_or(defaults.site_url),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
        })
    }
}
