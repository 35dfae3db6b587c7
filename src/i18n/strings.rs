use crate::i18n::Language;
use serde::Serialize;

/// All localized labels a renderer needs next to resolved content.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageStrings {
    // ==================== Section Titles ====================
    /// Title of the article listing
    pub articles: &'static str,

    /// Title of the category index
    pub categories: &'static str,

    /// Title of the tag index
    pub tags: &'static str,

    /// Heading of the latest-articles block on the home page
    pub latest: &'static str,

    // ==================== Navigation ====================
    /// Link to the next-older post / previous page
    pub previous: &'static str,

    /// Link to the next-newer post / next page
    pub next: &'static str,

    // ==================== Reading Stats ====================
    /// Unit after the word count
    pub words: &'static str,

    /// Unit after the reading time
    pub minutes: &'static str,

    // ==================== Table of Contents ====================
    /// Title of the table of contents
    pub table_of_contents: &'static str,

    /// Title of the group holding subsections that precede the first section
    pub sections_fallback: &'static str,

    // ==================== Errors ====================
    /// Shown when a slug resolves to nothing
    pub not_found: &'static str,
}

// ==================== Indonesian Strings ====================

pub const INDONESIAN_STRINGS: LanguageStrings = LanguageStrings {
    articles: "Artikel",
    categories: "Kategori",
    tags: "Tag",
    latest: "Artikel Terbaru",
    previous: "Sebelumnya",
    next: "Berikutnya",
    words: "kata",
    minutes: "menit",
    table_of_contents: "Daftar Isi",
    sections_fallback: "Bagian",
    not_found: "Halaman tidak ditemukan",
};

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    articles: "Articles",
    categories: "Categories",
    tags: "Tags",
    latest: "Latest Articles",
    previous: "Previous",
    next: "Next",
    words: "words",
    minutes: "min",
    table_of_contents: "Table of Contents",
    sections_fallback: "Sections",
    not_found: "Page not found",
};

impl LanguageStrings {
    pub fn for_language(language: Language) -> &'static LanguageStrings {
        match language.code() {
            "id" => &INDONESIAN_STRINGS,
            _ => &ENGLISH_STRINGS,
        }
    }

    /// Render the `<words> <unit> · <minutes> <unit>` reading line.
    pub fn reading_line(&self, words: usize, minutes: u32) -> String {
        format!("{} {} · {} {}", words, self.words, minutes, self.minutes)
    }
}
