//! Language type: validated content language.
//!
//! Constructed only from registry entries, so a `Language` value always names
//! a supported language. Preferences arriving from outside (cookies,
//! query strings) go through [`Language::parse_preference`], which degrades
//! unknown values to "no preference".

use crate::error::ContentError;
use crate::i18n::{LanguageConfig, LanguageRegistry, LanguageStrings};
use serde::{Serialize, Serializer};
use std::fmt;

/// A validated content language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "id", "en")
    code: &'static str,
}

impl Language {
    /// Indonesian, the primary language.
    pub const INDONESIAN: Language = Language { code: "id" };

    /// English, the translation language.
    pub const ENGLISH: Language = Language { code: "en" };

    /// Create a Language from a language code string.
    ///
    /// # Errors
    /// Fails when the code is not in the registry.
    pub fn from_code(code: &str) -> Result<Language, ContentError> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => Err(ContentError::UnknownLanguage(code.to_string())),
        }
    }

    /// Interpret an untrusted preference value.
    ///
    /// Missing, blank or unknown codes all mean "no preference".
    pub fn parse_preference(value: Option<&str>) -> Option<Language> {
        value
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .and_then(|code| Language::from_code(code).ok())
    }

    /// The primary language (first in every fixed-order scan).
    pub fn primary() -> Language {
        Language {
            code: LanguageRegistry::get().primary().code,
        }
    }

    /// All languages in registry order.
    pub fn all() -> Vec<Language> {
        LanguageRegistry::get()
            .list()
            .iter()
            .map(|config| Language { code: config.code })
            .collect()
    }

    /// The other language of the pair.
    pub fn opposite(&self) -> Language {
        Language::all()
            .into_iter()
            .find(|lang| lang != self)
            .unwrap_or(*self)
    }

    /// ISO 639-1 code; doubles as directory name and legacy file suffix.
    pub fn code(&self) -> &'static str {
        self.code
    }

    fn config(&self) -> Option<&'static LanguageConfig> {
        LanguageRegistry::get().get_by_code(self.code)
    }

    /// English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().map(|config| config.name).unwrap_or(self.code)
    }

    /// Native name of the language.
    pub fn native_name(&self) -> &'static str {
        self.config()
            .map(|config| config.native_name)
            .unwrap_or(self.code)
    }

    pub fn is_primary(&self) -> bool {
        self.config().map(|config| config.is_primary).unwrap_or(false)
    }

    /// Localized UI labels for this language.
    pub fn strings(&self) -> &'static LanguageStrings {
        LanguageStrings::for_language(*self)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Language::INDONESIAN.code(), "id");
        assert_eq!(Language::ENGLISH.code(), "en");
        assert!(Language::INDONESIAN.is_primary());
        assert!(!Language::ENGLISH.is_primary());
    }

    #[test]
    fn test_from_code_valid() {
        assert_eq!(Language::from_code("en").unwrap(), Language::ENGLISH);
        assert_eq!(Language::from_code("id").unwrap(), Language::INDONESIAN);
    }

    #[test]
    fn test_from_code_invalid() {
        let err = Language::from_code("fr").unwrap_err();
        assert!(err.to_string().contains("Unknown"));
        assert!(Language::from_code("").is_err());
    }

    #[test]
    fn test_parse_preference() {
        assert_eq!(
            Language::parse_preference(Some("en")),
            Some(Language::ENGLISH)
        );
        assert_eq!(
            Language::parse_preference(Some(" id ")),
            Some(Language::INDONESIAN)
        );
        assert_eq!(Language::parse_preference(Some("de")), None);
        assert_eq!(Language::parse_preference(Some("")), None);
        assert_eq!(Language::parse_preference(None), None);
    }

    #[test]
    fn test_primary_and_order() {
        assert_eq!(Language::primary(), Language::INDONESIAN);
        assert_eq!(
            Language::all(),
            vec![Language::INDONESIAN, Language::ENGLISH]
        );
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Language::INDONESIAN.opposite(), Language::ENGLISH);
        assert_eq!(Language::ENGLISH.opposite(), Language::INDONESIAN);
    }

    #[test]
    fn test_names() {
        assert_eq!(Language::ENGLISH.name(), "English");
        assert_eq!(Language::INDONESIAN.native_name(), "Bahasa Indonesia");
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(Language::ENGLISH.to_string(), "en");
        let json = serde_json::to_string(&Language::INDONESIAN).unwrap();
        assert_eq!(json, "\"id\"");
    }
}
