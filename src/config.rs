use anyhow::{bail, Result};
use std::path::PathBuf;

/// Where non-default language bundles come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleSource {
    /// Bundles compiled into the binary
    Embedded,
    /// `<base_url>/<code>.json` over HTTP
    Http(String),
    /// `<dir>/<code>.json` on disk
    Directory(PathBuf),
}

impl BundleSource {
    /// Parse `embedded`, an `http(s)://` base URL, or a directory path.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            bail!("BUNDLE_SOURCE is empty");
        }

        if value.eq_ignore_ascii_case("embedded") {
            Ok(Self::Embedded)
        } else if value.starts_with("http://") || value.starts_with("https://") {
            Ok(Self::Http(value.to_string()))
        } else {
            Ok(Self::Directory(PathBuf::from(value)))
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Preferences
    pub preferences_path: PathBuf,

    // Bundles
    pub bundle_source: BundleSource,
    pub cache_bundles: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Preferences
            preferences_path: std::env::var("PREFERENCES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/preferences.json")),

            // Bundles
            bundle_source: match std::env::var("BUNDLE_SOURCE") {
                Ok(value) => BundleSource::parse(&value)?,
                Err(_) => BundleSource::Embedded,
            },
            cache_bundles: std::env::var("CACHE_BUNDLES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("PREFERENCES_PATH");
        std::env::remove_var("BUNDLE_SOURCE");
        std::env::remove_var("CACHE_BUNDLES");
    }

    // ==================== BundleSource Tests ====================

    #[test]
    fn test_bundle_source_embedded() {
        assert_eq!(BundleSource::parse("embedded").unwrap(), BundleSource::Embedded);
        assert_eq!(BundleSource::parse("EMBEDDED").unwrap(), BundleSource::Embedded);
    }

    #[test]
    fn test_bundle_source_http() {
        assert_eq!(
            BundleSource::parse("https://console.example.com/i18n").unwrap(),
            BundleSource::Http("https://console.example.com/i18n".to_string())
        );
    }

    #[test]
    fn test_bundle_source_directory() {
        assert_eq!(
            BundleSource::parse("./i18n").unwrap(),
            BundleSource::Directory(PathBuf::from("./i18n"))
        );
    }

    #[test]
    fn test_bundle_source_empty_is_error() {
        assert!(BundleSource::parse("  ").is_err());
    }

    // ==================== from_env Tests ====================

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.preferences_path, PathBuf::from("data/preferences.json"));
        assert_eq!(config.bundle_source, BundleSource::Embedded);
        assert!(config.cache_bundles);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("PREFERENCES_PATH", "/tmp/console/prefs.json");
        std::env::set_var("BUNDLE_SOURCE", "http://localhost:5173/i18n");
        std::env::set_var("CACHE_BUNDLES", "false");

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.preferences_path, PathBuf::from("/tmp/console/prefs.json"));
        assert_eq!(
            config.bundle_source,
            BundleSource::Http("http://localhost:5173/i18n".to_string())
        );
        assert!(!config.cache_bundles);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_cache_flag_uses_default() {
        clear_env();
        std::env::set_var("CACHE_BUNDLES", "sometimes");

        let config = Config::from_env().expect("Should load");
        assert!(config.cache_bundles);

        clear_env();
    }
}
