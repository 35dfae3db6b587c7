//! Bilingual blog content core.
//!
//! Resolves post slugs across languages and file conventions, extracts post
//! metadata, and checks that translations keep the structure of the original.

pub mod config;
pub mod content;
pub mod error;
pub mod i18n;
pub mod parity;
pub mod server;

pub use error::{ContentError, Result};
