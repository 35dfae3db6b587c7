//! Language registry: Single source of truth for all supported content languages.
//!
//! The blog is bilingual. Registry order matters: the first entry is the
//! primary language, which is scanned first in every fixed-order lookup and
//! is the baseline for parity diffs.

use std::sync::OnceLock;

/// Configuration for a supported content language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code, also used as directory name and file suffix
    pub code: &'static str,

    /// English name of the language (e.g., "Indonesian")
    pub name: &'static str,

    /// Native name of the language (e.g., "Bahasa Indonesia")
    pub native_name: &'static str,

    /// Whether this is the primary language (only one should be true)
    pub is_primary: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all languages, in registry order.
    pub fn list(&self) -> &[LanguageConfig] {
        &self.languages
    }

    /// Get the primary language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one primary language.
    pub fn primary(&self) -> &LanguageConfig {
        let primary: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_primary)
            .collect();

        match primary.len() {
            0 => panic!("No primary language found in registry"),
            1 => primary[0],
            _ => panic!("Multiple primary languages found in registry"),
        }
    }
}

/// Indonesian first, English second.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "id",
            name: "Indonesian",
            native_name: "Bahasa Indonesia",
            is_primary: true,
        },
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_primary: false,
        },
    ]
}
