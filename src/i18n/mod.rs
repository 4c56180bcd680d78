//! Internationalization (i18n) for the console.
//!
//! The console always starts in its embedded default language and loads any
//! other language bundle lazily, the first time a user picks it. The chosen
//! language is persisted so the next session restores it.
//!
//! # Architecture
//!
//! - `language`: closed set of supported locales
//! - `bundle`: translated strings for one language, with lookup and formatting
//! - `loader`: collaborators that resolve a language to its bundle
//! - `observable`: push-based value with replay to new subscribers
//! - `store`: the observable language store (`init` / `switch_lang`)
//! - `validator`: bundle completeness checks against the default language
//! - `metrics`: resolution and persistence counters
//!
//! # Example
//!
//! ```rust,ignore
//! use mission_console::i18n::{EmbeddedBundles, I18nStore, LanguageCode};
//! use mission_console::storage::FileStore;
//!
//! let store = I18nStore::new(FileStore::new("data/preferences.json"), EmbeddedBundles);
//! store.init().await?;
//!
//! let _sub = store.subscribe(|bundle| println!("{}", bundle.t("core.close")));
//! store.switch_lang(LanguageCode::French).await?;
//! ```

mod bundle;
mod error;
mod language;
mod loader;
mod metrics;
mod observable;
mod store;
mod validator;

pub use bundle::{interpolate, I18nBundle, DEFAULT_BUNDLE_JSON};
pub use error::I18nError;
pub use language::LanguageCode;
pub use loader::{BundleLoader, CachingLoader, DirectoryBundles, EmbeddedBundles, HttpBundles};
pub use metrics::{MetricsReport, StoreMetrics};
pub use observable::{Observable, Subscription};
pub use store::I18nStore;
pub use validator::{BundleValidator, ValidationReport};
