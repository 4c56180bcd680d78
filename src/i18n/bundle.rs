//! Language bundles: translated strings for one language.
//!
//! A bundle is a JSON object whose leaves are strings. Nested objects group
//! related keys and are addressed with dotted paths (`"core.close"`).
//! Strings may contain `{name}` placeholders filled in by [`I18nBundle::format`].

use crate::i18n::{I18nError, LanguageCode};
use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};

/// Raw JSON of the default-language bundle, embedded at build time.
pub const DEFAULT_BUNDLE_JSON: &str = include_str!("../../i18n/en.json");

/// Parsed default bundle (initialized lazily, shared thereafter)
static DEFAULT_BUNDLE: OnceLock<Arc<I18nBundle>> = OnceLock::new();

/// All localized strings for a language, tagged with that language.
#[derive(Debug, Clone, PartialEq)]
pub struct I18nBundle {
    lang: LanguageCode,
    strings: Map<String, Value>,
}

impl I18nBundle {
    /// Get the embedded default-language bundle.
    ///
    /// # Panics
    /// Panics if the embedded JSON is not a valid bundle. The file is part of
    /// the crate sources and covered by tests, so this cannot happen at runtime.
    pub fn embedded_default() -> Arc<I18nBundle> {
        DEFAULT_BUNDLE
            .get_or_init(|| {
                let bundle = I18nBundle::from_json(LanguageCode::DEFAULT, DEFAULT_BUNDLE_JSON)
                    .expect("Embedded default bundle should always be valid");
                Arc::new(bundle)
            })
            .clone()
    }

    /// Parse a bundle from JSON text.
    ///
    /// A top-level `"lang"` entry is dropped: the bundle is always tagged with
    /// the language it was requested for.
    pub fn from_json(lang: LanguageCode, json: &str) -> Result<Self, I18nError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| I18nError::invalid_bundle(lang, e.to_string()))?;
        Self::from_value(lang, value)
    }

    /// Build a bundle from an already-parsed JSON value.
    pub fn from_value(lang: LanguageCode, value: Value) -> Result<Self, I18nError> {
        let Value::Object(mut strings) = value else {
            return Err(I18nError::invalid_bundle(lang, "expected a JSON object"));
        };

        strings.remove("lang");
        check_leaves(lang, &strings, "")?;

        Ok(Self { lang, strings })
    }

    /// The language this bundle represents.
    pub fn lang(&self) -> LanguageCode {
        self.lang
    }

    /// Look up a string by dotted key path.
    ///
    /// Returns `None` if the path is missing or points at a group rather
    /// than a string.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut parts = key.split('.');
        let mut node = self.strings.get(parts.next()?)?;
        for part in parts {
            node = node.as_object()?.get(part)?;
        }
        node.as_str()
    }

    /// Look up a string, falling back to the key itself when missing.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    /// Look up a string and fill in its `{name}` placeholders.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(self.t(key), args)
    }

    /// All string keys as sorted dotted paths.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_keys(&self.strings, "", &mut keys);
        keys.sort();
        keys
    }

    /// Number of strings in the bundle.
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Replace each `{name}` placeholder in `template` with its value.
///
/// Placeholders without a matching argument are left untouched.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), value)
    })
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn check_leaves(lang: LanguageCode, map: &Map<String, Value>, prefix: &str) -> Result<(), I18nError> {
    for (key, value) in map {
        match value {
            Value::String(_) => {}
            Value::Object(nested) => check_leaves(lang, nested, &join_key(prefix, key))?,
            _ => {
                return Err(I18nError::invalid_bundle(
                    lang,
                    format!("key `{}` is not a string", join_key(prefix, key)),
                ))
            }
        }
    }
    Ok(())
}

fn collect_keys(map: &Map<String, Value>, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in map {
        let path = join_key(prefix, key);
        match value {
            Value::Object(nested) => collect_keys(nested, &path, out),
            _ => out.push(path),
        }
    }
}
