//! Internationalization (i18n) module for bilingual content.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported content languages
//! - `language`: Type-safe Language type validated against the registry
//! - `strings`: Localized UI labels handed to renderers
//!
//! # Example
//!
//! ```rust
//! use blog_content::i18n::Language;
//!
//! let preferred = Language::parse_preference(Some("en"));
//! assert_eq!(preferred, Some(Language::ENGLISH));
//! assert_eq!(Language::ENGLISH.opposite(), Language::INDONESIAN);
//! ```

mod language;
mod registry;
mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::LanguageStrings;
