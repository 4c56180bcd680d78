//! Console language tool.
//!
//! Usage:
//!   mission-console                   # Restore the saved language and show it
//!   mission-console switch fr         # Switch language and save the choice
//!   mission-console languages         # List supported languages (* marks the default)
//!   mission-console check             # Validate embedded bundles against English
//!   mission-console modal '<json>'    # Validate a modal payload and show its title
//!
//! A saved language that cannot be restored is logged and the console falls
//! back to English; `switch` overwrites the saved choice.
//!
//! Optional environment variables:
//! - PREFERENCES_PATH (defaults to data/preferences.json)
//! - BUNDLE_SOURCE (embedded, an http(s) base URL, or a directory)
//! - CACHE_BUNDLES (defaults to true)

use anyhow::{bail, Context, Result};
use mission_console::config::{BundleSource, Config};
use mission_console::i18n::{
    BundleLoader, BundleValidator, CachingLoader, DirectoryBundles, EmbeddedBundles, HttpBundles,
    I18nBundle, I18nStore, LanguageCode,
};
use mission_console::modal::{ModalDetail, ModalRequest};
use mission_console::storage::FileStore;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mission_console=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("status") => print_status(&restore_store(&config).await),
        Some("switch") => {
            let code = args.get(1).context("Usage: mission-console switch <code>")?;
            let store = build_store(&config);
            store
                .switch_lang_code(code)
                .await
                .with_context(|| format!("Failed to switch language to '{}'", code))?;
            print_status(&store);
        }
        Some("languages") => print_languages(),
        Some("check") => check_bundles().await?,
        Some("modal") => {
            let json = args.get(1).context("Usage: mission-console modal '<json>'")?;
            print_modal(&restore_store(&config).await.current(), json)?;
        }
        Some(other) => bail!("Unknown command: {}", other),
    }

    Ok(())
}

fn build_loader(source: &BundleSource) -> Box<dyn BundleLoader> {
    match source {
        BundleSource::Embedded => Box::new(EmbeddedBundles::new()),
        BundleSource::Http(base_url) => Box::new(HttpBundles::new(base_url)),
        BundleSource::Directory(root) => Box::new(DirectoryBundles::new(root.clone())),
    }
}

fn build_store(config: &Config) -> I18nStore {
    info!(
        "Using preferences at {} with {:?} bundles",
        config.preferences_path.display(),
        config.bundle_source
    );

    let storage = FileStore::new(config.preferences_path.clone());
    let loader = build_loader(&config.bundle_source);

    if config.cache_bundles {
        I18nStore::new(storage, CachingLoader::new(loader))
    } else {
        I18nStore::new(storage, loader)
    }
}

/// Build the store and restore the saved language, staying on the default
/// bundle when it cannot be restored.
async fn restore_store(config: &Config) -> I18nStore {
    let store = build_store(config);
    if let Err(e) = store.init().await {
        warn!(
            "Failed to restore the saved language, using {}: {}",
            LanguageCode::DEFAULT,
            e
        );
    }
    store
}

fn print_status(store: &I18nStore) {
    let bundle = store.current();
    let lang = bundle.lang();

    println!("Language: {} ({})", lang.native_name(), lang);
    println!("  {}", bundle.t("satellites.title"));
    println!("  {}", bundle.t("mission_control.title"));
    println!("  {}", bundle.format("canisters.fee", &[("fee", "0.5 ICP")]));
}

fn print_languages() {
    for lang in LanguageCode::ALL {
        let marker = if lang.is_default() { "*" } else { " " };
        println!("{} {:<6} {} / {}", marker, lang.code(), lang.name(), lang.native_name());
    }
}

async fn check_bundles() -> Result<()> {
    let reference = I18nBundle::embedded_default();
    let mut failed = 0;

    for lang in LanguageCode::ALL.into_iter().filter(|lang| !lang.is_default()) {
        let bundle = EmbeddedBundles.resolve(lang).await?;
        let report = BundleValidator::validate(&reference, &bundle);

        if report.is_clean() {
            println!("✓ {} ({} strings)", lang, bundle.len());
            continue;
        }

        if report.has_errors() {
            failed += 1;
        }
        println!("✗ {}", lang);
        for error in &report.errors {
            println!("    error: {}", error);
        }
        for warning in &report.warnings {
            println!("    warning: {}", warning);
        }
    }

    if failed > 0 {
        bail!("{} bundle(s) are incomplete", failed);
    }
    Ok(())
}

fn print_modal(bundle: &I18nBundle, json: &str) -> Result<()> {
    let modal: ModalRequest = serde_json::from_str(json).context("Invalid modal payload")?;

    println!("{} [{}]", modal.title(bundle), modal.kind());
    match modal.detail() {
        None => println!("  (no detail)"),
        Some(ModalDetail::Satellite(detail)) => {
            let satellite = &detail.satellite;
            println!(
                "  {}: {}",
                bundle.t("satellites.name"),
                satellite.name().unwrap_or(&satellite.satellite_id)
            );
        }
        Some(ModalDetail::CreateSatellite(detail)) => {
            let fee = detail.fee.to_string();
            println!("  {}", bundle.format("canisters.fee", &[("fee", fee.as_str())]));
            if let Some(funds) = &detail.mission_control_balance {
                println!("  {}: {}", bundle.t("canisters.balance"), funds.balance);
                println!("  {}: {}", bundle.t("canisters.credits"), funds.credits);
            }
        }
    }

    Ok(())
}
