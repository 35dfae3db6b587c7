//! Preview binary - resolves one post and prints what a renderer would show
//!
//! Usage:
//!   cargo run --bin preview -- <slug>        # No language preference
//!   cargo run --bin preview -- <slug> en     # Prefer English
//!
//! Optional environment variables:
//! - CONTENT_ROOT (defaults to content/posts)
//! - WORDS_PER_MINUTE (defaults to 200)
//! - DEFAULT_LANGUAGE (labels when no language is given, defaults to en)

use anyhow::{bail, Result};
use blog_content::config::Config;
use blog_content::content::{group_toc, ContentStore, Post};
use blog_content::i18n::Language;
use std::process::ExitCode;
use tracing::info;

fn print_post(post: &Post, labels_language: Language) {
    let labels = labels_language.strings();
    let meta = &post.meta;

    println!("\n========== {} ==========", meta.title);
    println!("Slug:       {}", meta.slug);
    println!(
        "Language:   {} (resolved via {:?})",
        meta.language.map(|l| l.code()).unwrap_or("-"),
        post.stage
    );
    println!("Date:       {}", meta.date);
    println!("{}: {}", labels.categories, meta.categories.join(", "));
    println!("{}: {}", labels.tags, meta.tags.join(", "));
    if let Some(cover) = &meta.cover {
        println!("Cover:      {}", cover);
    }
    if let Some(achievement) = &meta.achievement {
        println!("Achievement: {}", achievement.label());
    }
    println!("{}", labels.reading_line(meta.words, meta.minutes));

    let groups = group_toc(&post.toc, labels.sections_fallback);
    if !groups.is_empty() {
        println!("\n{}", labels.table_of_contents);
        for group in groups {
            println!("  - {} (#{})", group.title.text, group.title.id);
            for child in group.children {
                println!("      - {} (#{})", child.text, child.id);
            }
        }
    }
    println!("==========================================\n");
}

fn run() -> Result<bool> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(slug) = args.first() else {
        bail!("Usage: preview <slug> [id|en]");
    };
    let preferred = match args.get(1) {
        Some(code) => Some(Language::from_code(code)?),
        None => None,
    };

    let config = Config::from_env()?;
    let store = ContentStore::from_config(&config);
    info!("Resolving '{}' under {}", slug, store.root().display());

    match store.post(slug, preferred)? {
        Some(post) => {
            print_post(&post, preferred.unwrap_or(config.default_language));
            Ok(true)
        }
        None => {
            println!("Post '{}' not found", slug);
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    // Load environment from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
