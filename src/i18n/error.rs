use crate::i18n::LanguageCode;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors raised while resolving, publishing or persisting a language.
#[derive(Error, Debug)]
pub enum I18nError {
    /// No bundle can be found for the requested code.
    #[error("unsupported language: `{0}`")]
    UnsupportedLanguage(String),

    /// The bundle exists but is not a JSON object of strings.
    #[error("invalid bundle for `{lang}`: {reason}")]
    InvalidBundle { lang: LanguageCode, reason: String },

    #[error("failed to read bundle for `{lang}`: {source}")]
    Io {
        lang: LanguageCode,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch bundle for `{lang}`: {source}")]
    Fetch {
        lang: LanguageCode,
        #[source]
        source: reqwest::Error,
    },

    /// Reading or writing the language preference failed.
    #[error("language preference storage failed: {0}")]
    Persistence(#[from] StorageError),
}

impl I18nError {
    pub fn unsupported(lang: LanguageCode) -> Self {
        Self::UnsupportedLanguage(lang.code().to_string())
    }

    pub fn invalid_bundle<S: Into<String>>(lang: LanguageCode, reason: S) -> Self {
        Self::InvalidBundle {
            lang,
            reason: reason.into(),
        }
    }
}
