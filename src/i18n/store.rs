//! The language store: the single observable source of translated strings.
//!
//! The store starts on the embedded default bundle. `init` restores the
//! persisted language once at startup; `switch_lang` changes it on user
//! action. Both publish the resolved bundle to subscribers and then persist
//! the language. A failed resolution changes nothing.
//!
//! Overlapping calls are not ordered against each other: whichever
//! resolution completes last is the bundle subscribers end up with. Callers
//! that need strict ordering must await one call before starting the next.

use crate::i18n::observable::{Observable, Subscription};
use crate::i18n::{
    BundleLoader, BundleValidator, I18nBundle, I18nError, LanguageCode, MetricsReport,
    StoreMetrics,
};
use crate::storage::{PreferenceStore, LANG_KEY};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Observable language store.
///
/// Construct one per application and share it (e.g. behind an `Arc`) with
/// every consumer that renders translated text.
pub struct I18nStore {
    storage: Box<dyn PreferenceStore>,
    loader: Box<dyn BundleLoader>,
    bundle: Observable<Arc<I18nBundle>>,
    metrics: StoreMetrics,
}

impl I18nStore {
    /// Create a store on the embedded default bundle.
    ///
    /// Nothing is read or loaded until [`init`](Self::init) is called.
    pub fn new(storage: impl PreferenceStore + 'static, loader: impl BundleLoader + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            loader: Box::new(loader),
            bundle: Observable::new(I18nBundle::embedded_default()),
            metrics: StoreMetrics::new(),
        }
    }

    /// Register an observer of the current bundle.
    ///
    /// The observer is called with the current bundle before this returns,
    /// then once for every bundle published afterwards. Drop the returned
    /// [`Subscription`] (or call `unsubscribe`) to stop.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Arc<I18nBundle>) + Send + Sync + 'static,
    {
        self.bundle.subscribe(observer)
    }

    /// Subscribe through an unbounded channel.
    ///
    /// The receiver holds the current bundle immediately and every later
    /// one, none dropped. Notifications stop when the subscription is dropped.
    pub fn subscribe_channel(&self) -> (Subscription, mpsc::UnboundedReceiver<Arc<I18nBundle>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.bundle.subscribe(move |bundle| {
            // Receiver gone: nothing left to notify.
            let _ = tx.send(bundle.clone());
        });
        (subscription, rx)
    }

    /// The bundle currently visible to subscribers.
    pub fn current(&self) -> Arc<I18nBundle> {
        self.bundle.get()
    }

    pub fn current_language(&self) -> LanguageCode {
        self.current().lang()
    }

    /// Restore the persisted language.
    ///
    /// With the default language (or no preference) persisted, the store
    /// keeps its current bundle and only re-writes the preference; no
    /// bundle is loaded. Otherwise the persisted language is resolved,
    /// published and then persisted.
    pub async fn init(&self) -> Result<(), I18nError> {
        let lang = self.persisted_language()?;

        if lang.is_default() {
            self.persist(lang)?;
            debug!("Persisted language is the default, nothing to load");
            return Ok(());
        }

        let bundle = self.resolve(lang).await?;
        self.publish(bundle);
        self.persist(lang)?;

        info!("Restored language {}", lang);
        Ok(())
    }

    /// Switch to another language.
    ///
    /// The default language resolves immediately; any other is loaded on
    /// demand. The preference is written even when `lang` is already active.
    pub async fn switch_lang(&self, lang: LanguageCode) -> Result<(), I18nError> {
        let bundle = self.resolve(lang).await?;
        self.publish(bundle);
        self.persist(lang)?;

        info!("Switched language to {}", lang);
        Ok(())
    }

    /// Parse a locale code and switch to it.
    ///
    /// Unknown codes fail before anything is resolved or written.
    pub async fn switch_lang_code(&self, code: &str) -> Result<(), I18nError> {
        let lang: LanguageCode = code.parse()?;
        self.switch_lang(lang).await
    }

    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    /// Read the stored preference. Absent or unrecognized values mean the
    /// default language.
    fn persisted_language(&self) -> Result<LanguageCode, I18nError> {
        let Some(stored) = self.storage.get(LANG_KEY)? else {
            return Ok(LanguageCode::DEFAULT);
        };

        match stored.parse::<LanguageCode>() {
            Ok(lang) => Ok(lang),
            Err(_) => {
                warn!(
                    "Ignoring unrecognized stored language '{}', using {}",
                    stored,
                    LanguageCode::DEFAULT
                );
                Ok(LanguageCode::DEFAULT)
            }
        }
    }

    async fn resolve(&self, lang: LanguageCode) -> Result<Arc<I18nBundle>, I18nError> {
        if lang.is_default() {
            self.metrics.record_default_resolution();
            return Ok(I18nBundle::embedded_default());
        }

        self.metrics.record_load();
        let bundle = match self.loader.resolve(lang).await {
            Ok(bundle) => bundle,
            Err(e) => {
                self.metrics.record_load_failure();
                warn!("Failed to load bundle for {}: {}", lang, e);
                return Err(e);
            }
        };

        self.check_completeness(&bundle);
        Ok(bundle)
    }

    fn check_completeness(&self, bundle: &I18nBundle) {
        let report = BundleValidator::validate(&I18nBundle::embedded_default(), bundle);

        for error in &report.errors {
            warn!("{}", error);
        }
        for warning in &report.warnings {
            debug!("{}", warning);
        }
    }

    fn publish(&self, bundle: Arc<I18nBundle>) {
        self.metrics.record_publish();
        self.bundle.set(bundle);
    }

    fn persist(&self, lang: LanguageCode) -> Result<(), I18nError> {
        self.storage.set(LANG_KEY, lang.code())?;
        self.metrics.record_persist();
        Ok(())
    }
}
