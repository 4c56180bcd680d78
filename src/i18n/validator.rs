//! Bundle completeness validation.
//!
//! Compares a translated bundle against the default-language bundle to
//! find keys that were never translated, keys that no longer exist in the
//! default, and strings whose `{placeholders}` do not match.

use crate::i18n::I18nBundle;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Keys present in the reference bundle but missing from the candidate
    pub errors: Vec<String>,

    /// Non-critical issues (extra keys, placeholder drift, empty strings)
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for bundle completeness.
pub struct BundleValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl BundleValidator {
    /// Validate a candidate bundle against a reference bundle.
    ///
    /// This function checks that:
    /// - every reference key exists in the candidate (error otherwise)
    /// - the candidate has no keys unknown to the reference
    /// - shared strings use the same set of `{placeholders}`
    /// - no candidate string is empty
    pub fn validate(reference: &I18nBundle, candidate: &I18nBundle) -> ValidationReport {
        let mut report = ValidationReport::new();

        let reference_keys: BTreeSet<String> = reference.keys().into_iter().collect();
        let candidate_keys: BTreeSet<String> = candidate.keys().into_iter().collect();

        for key in reference_keys.difference(&candidate_keys) {
            report.errors.push(format!(
                "Missing key `{}` in `{}` bundle",
                key,
                candidate.lang()
            ));
        }

        for key in candidate_keys.difference(&reference_keys) {
            report.warnings.push(format!(
                "Unknown key `{}` in `{}` bundle",
                key,
                candidate.lang()
            ));
        }

        for key in reference_keys.intersection(&candidate_keys) {
            let (Some(original), Some(translated)) = (reference.get(key), candidate.get(key)) else {
                continue;
            };

            if translated.trim().is_empty() {
                report.warnings.push(format!("Empty translation for `{}`", key));
                continue;
            }

            let orig_placeholders = Self::extract_placeholders(original);
            let trans_placeholders = Self::extract_placeholders(translated);
            if orig_placeholders != trans_placeholders {
                report.warnings.push(format!(
                    "Placeholder mismatch for `{}`: default has {:?}, translation has {:?}",
                    key, orig_placeholders, trans_placeholders
                ));
            }
        }

        report
    }

    /// Extract the distinct `{name}` placeholders from a string
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX
            .get_or_init(|| Regex::new(r"\{([a-zA-Z0-9_]+)\}").expect("placeholder regex"));

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
