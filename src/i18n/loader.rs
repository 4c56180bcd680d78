//! Bundle loaders: resolve a language code to its bundle.
//!
//! The default language never goes through a loader (the store serves the
//! embedded bundle directly), but every loader also answers for it so they
//! can be used standalone.

use crate::i18n::bundle::DEFAULT_BUNDLE_JSON;
use crate::i18n::{I18nBundle, I18nError, LanguageCode};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Resolves a language to its bundle, asynchronously.
///
/// Implementations fail with [`I18nError::UnsupportedLanguage`] when no
/// bundle exists for the requested language.
#[async_trait]
pub trait BundleLoader: Send + Sync {
    async fn resolve(&self, lang: LanguageCode) -> Result<Arc<I18nBundle>, I18nError>;
}

#[async_trait]
impl<L: BundleLoader + ?Sized> BundleLoader for Arc<L> {
    async fn resolve(&self, lang: LanguageCode) -> Result<Arc<I18nBundle>, I18nError> {
        (**self).resolve(lang).await
    }
}

#[async_trait]
impl<L: BundleLoader + ?Sized> BundleLoader for Box<L> {
    async fn resolve(&self, lang: LanguageCode) -> Result<Arc<I18nBundle>, I18nError> {
        (**self).resolve(lang).await
    }
}

// ==================== Embedded ====================

/// Bundle sources compiled into the binary, keyed by language.
static EMBEDDED_SOURCES: &[(LanguageCode, &str)] = &[
    (LanguageCode::English, DEFAULT_BUNDLE_JSON),
    (LanguageCode::German, include_str!("../../i18n/de.json")),
    (LanguageCode::Spanish, include_str!("../../i18n/es.json")),
    (LanguageCode::French, include_str!("../../i18n/fr.json")),
    (
        LanguageCode::ChineseSimplified,
        include_str!("../../i18n/zh-cn.json"),
    ),
];

/// Loader backed by the bundles embedded at build time.
///
/// Sources are parsed on each resolution; wrap in a [`CachingLoader`] to
/// parse each language once.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedBundles;

impl EmbeddedBundles {
    pub fn new() -> Self {
        Self
    }

    /// Languages with an embedded source.
    pub fn languages() -> Vec<LanguageCode> {
        EMBEDDED_SOURCES.iter().map(|(lang, _)| *lang).collect()
    }

    fn source(lang: LanguageCode) -> Option<&'static str> {
        EMBEDDED_SOURCES
            .iter()
            .find(|(candidate, _)| *candidate == lang)
            .map(|(_, json)| *json)
    }
}

#[async_trait]
impl BundleLoader for EmbeddedBundles {
    async fn resolve(&self, lang: LanguageCode) -> Result<Arc<I18nBundle>, I18nError> {
        if lang.is_default() {
            return Ok(I18nBundle::embedded_default());
        }

        let json = Self::source(lang).ok_or_else(|| I18nError::unsupported(lang))?;
        debug!("Parsing embedded bundle for {}", lang);
        Ok(Arc::new(I18nBundle::from_json(lang, json)?))
    }
}

// ==================== Directory ====================

/// Loader reading `<root>/<code>.json` from disk.
#[derive(Debug, Clone)]
pub struct DirectoryBundles {
    root: PathBuf,
}

impl DirectoryBundles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, lang: LanguageCode) -> PathBuf {
        self.root.join(format!("{}.json", lang.code()))
    }
}

#[async_trait]
impl BundleLoader for DirectoryBundles {
    async fn resolve(&self, lang: LanguageCode) -> Result<Arc<I18nBundle>, I18nError> {
        let path = self.path_for(lang);
        debug!("Reading bundle for {} from {}", lang, path.display());

        match tokio::fs::read_to_string(&path).await {
            Ok(json) => Ok(Arc::new(I18nBundle::from_json(lang, &json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(I18nError::unsupported(lang)),
            Err(source) => Err(I18nError::Io { lang, source }),
        }
    }
}

// ==================== HTTP ====================

/// Loader fetching `<base_url>/<code>.json` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBundles {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBundles {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, lang: LanguageCode) -> String {
        format!("{}/{}.json", self.base_url, lang.code())
    }
}

#[async_trait]
impl BundleLoader for HttpBundles {
    async fn resolve(&self, lang: LanguageCode) -> Result<Arc<I18nBundle>, I18nError> {
        let url = self.url_for(lang);
        debug!("Fetching bundle for {} from {}", lang, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| I18nError::Fetch { lang, source })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(I18nError::unsupported(lang));
        }

        let json = response
            .error_for_status()
            .map_err(|source| I18nError::Fetch { lang, source })?
            .text()
            .await
            .map_err(|source| I18nError::Fetch { lang, source })?;

        Ok(Arc::new(I18nBundle::from_json(lang, &json)?))
    }
}

// ==================== Caching ====================

/// Memoizes successful resolutions of an inner loader.
///
/// Failures are not cached, so a language that failed once is retried on
/// the next request.
pub struct CachingLoader<L> {
    inner: L,
    cache: Mutex<HashMap<LanguageCode, Arc<I18nBundle>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<L: BundleLoader> CachingLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Languages currently held in the cache, sorted.
    pub fn cached_languages(&self) -> Vec<LanguageCode> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let mut langs: Vec<_> = cache.keys().copied().collect();
        langs.sort();
        langs
    }
}

#[async_trait]
impl<L: BundleLoader> BundleLoader for CachingLoader<L> {
    async fn resolve(&self, lang: LanguageCode) -> Result<Arc<I18nBundle>, I18nError> {
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&lang)
            .cloned();

        if let Some(bundle) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Bundle cache hit for {}", lang);
            return Ok(bundle);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let bundle = self.inner.resolve(lang).await?;

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(lang, bundle.clone());

        Ok(bundle)
    }
}
