//! Language type: closed set of locales supported by the console.
//!
//! Every language the console can display is listed here. The default
//! language (English) is embedded at build time; all others are resolved
//! through a [`BundleLoader`](crate::i18n::BundleLoader) on first use.

use crate::i18n::I18nError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported locale identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageCode {
    English,
    German,
    Spanish,
    French,
    ChineseSimplified,
}

impl LanguageCode {
    /// The built-in language, always available without loading.
    pub const DEFAULT: LanguageCode = LanguageCode::English;

    /// All supported languages, default first.
    pub const ALL: [LanguageCode; 5] = [
        LanguageCode::English,
        LanguageCode::German,
        LanguageCode::Spanish,
        LanguageCode::French,
        LanguageCode::ChineseSimplified,
    ];

    /// Get the locale code (e.g., "en", "zh-cn").
    ///
    /// This is the value persisted as the language preference and the file
    /// stem of the bundle resource.
    pub fn code(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::German => "de",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::ChineseSimplified => "zh-cn",
        }
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            LanguageCode::English => "English",
            LanguageCode::German => "German",
            LanguageCode::Spanish => "Spanish",
            LanguageCode::French => "French",
            LanguageCode::ChineseSimplified => "Chinese (Simplified)",
        }
    }

    /// Get the native name of the language.
    pub fn native_name(&self) -> &'static str {
        match self {
            LanguageCode::English => "English",
            LanguageCode::German => "Deutsch",
            LanguageCode::Spanish => "Español",
            LanguageCode::French => "Français",
            LanguageCode::ChineseSimplified => "简体中文",
        }
    }

    /// Check if this is the embedded default language.
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LanguageCode {
    type Err = I18nError;

    /// Parse a locale code. Matching is case-insensitive and accepts `_` as
    /// the region separator (`zh_CN` == `zh-cn`).
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let normalized = code.trim().to_ascii_lowercase().replace('_', "-");

        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.code() == normalized)
            .ok_or_else(|| I18nError::UnsupportedLanguage(code.to_string()))
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = I18nError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

impl From<LanguageCode> for String {
    fn from(lang: LanguageCode) -> Self {
        lang.code().to_string()
    }
}
