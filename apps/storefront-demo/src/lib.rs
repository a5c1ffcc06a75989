//! # Storefront Demo
//!
//! Drives every runtime unit once, the way the web demos do on page load.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (defaults → storefront.toml → environment)
//! 3. Open the storage file
//! 4. Theme resolver (OS appearance from `STOREFRONT_OS_DARK`)
//! 5. Language switcher (host locale from `LANG`)
//! 6. Fetch the catalog with the configured delay
//! 7. Put the first products in a cart and print the summary

use std::process::ExitCode;
use std::sync::Arc;

use storefront_core::{
    CartTotals, CatalogProduct, Direction, EffectiveTheme, Language, Product, ThemePreference,
};
use storefront_runtime::{
    CartStore, CatalogSource, DocumentMarkers, FetchStatus, FileStore, HttpCatalog, KeyValueStore,
    LanguageSwitcher, ManualAppearanceSignal, ProductFetcher, StorefrontConfig, ThemeResolver,
    Translations,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub mod error;

pub use error::{DemoError, DemoResult};

/// Environment variable holding the simulated OS dark-mode flag.
pub const ENV_OS_DARK: &str = "STOREFRONT_OS_DARK";

/// Products added to the demo cart.
const CART_SAMPLE_SIZE: usize = 3;

// =============================================================================
// Host Environment
// =============================================================================

/// Values a browser would get from the OS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnv {
    pub prefers_dark: bool,
    pub locale: Option<String>,
}

impl HostEnv {
    /// Reads `STOREFRONT_OS_DARK` and `LANG`.
    pub fn from_env() -> Self {
        HostEnv {
            prefers_dark: std::env::var(ENV_OS_DARK)
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            locale: std::env::var("LANG").ok().filter(|v| !v.is_empty()),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "dark"
    )
}

// =============================================================================
// Report
// =============================================================================

/// What the demo ended up with.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub preference: ThemePreference,
    pub effective_theme: EffectiveTheme,
    pub language: Language,
    pub direction: Direction,
    pub product_count: usize,
    pub totals: CartTotals,
    pub lines: Vec<String>,
}

// =============================================================================
// Entry Points
// =============================================================================

/// Runs the demo against the configured HTTP catalog.
pub fn run() -> ExitCode {
    init_tracing();

    info!("Starting storefront demo");

    match run_from_env() {
        Ok(report) => {
            for line in &report.lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Storefront demo failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_from_env() -> DemoResult<DemoReport> {
    let config = StorefrontConfig::load(None)?;

    let path = config
        .storage
        .resolved_path()
        .ok_or(DemoError::NoStoragePath)?;
    info!(?path, "Using storage file");
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(path));

    let catalog = HttpCatalog::<CatalogProduct>::from_config(&config.catalog)
        .map_err(|e| DemoError::Fetch(e.to_string()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_with(&config, store, catalog, HostEnv::from_env()))
}

/// Runs the demo with explicit collaborators.
pub async fn run_with<S>(
    config: &StorefrontConfig,
    store: Arc<dyn KeyValueStore>,
    catalog: S,
    host: HostEnv,
) -> DemoResult<DemoReport>
where
    S: CatalogSource<Item = CatalogProduct>,
{
    let markers = DocumentMarkers::new();
    let signal = ManualAppearanceSignal::new(host.prefers_dark);

    let theme = ThemeResolver::with_storage_key(
        Arc::clone(&store),
        Arc::new(signal),
        Arc::new(markers.clone()),
        config.storage.theme_key.clone(),
    );

    let detected = config
        .locale
        .default_language
        .map(|language| language.tag().to_string())
        .or(host.locale);
    let language = LanguageSwitcher::with_storage_key(
        Arc::clone(&store),
        Arc::new(markers.clone()),
        detected.as_deref(),
        config.storage.language_key.clone(),
    );

    let fetcher = ProductFetcher::new(catalog, config.catalog.delay());
    let mut state_rx = fetcher.subscribe();
    fetcher.start();

    let state = state_rx
        .wait_for(|state| !state.is_loading())
        .await
        .map_err(|_| DemoError::FetcherGone)?
        .clone();

    if state.status == FetchStatus::Error {
        let message = state.error.unwrap_or_else(|| "Failed to load products".to_string());
        return Err(DemoError::Fetch(message));
    }

    let cart = CartStore::new();
    let products: Vec<Product> = state.data.into_iter().map(Product::from).collect();
    for product in products.iter().take(CART_SAMPLE_SIZE) {
        cart.add_item(product);
    }
    if let Some(first) = products.first() {
        cart.add_item(first);
    }
    let totals = cart.totals();

    let translations = Translations::bundled()?;
    let active = language.language();
    let lines = vec![
        translations.translate(active, "welcome"),
        format!("products: {}", products.len()),
        format!(
            "{}: {}",
            translations.translate(active, "cart.title"),
            translations.translate_with(
                active,
                "cart.items",
                &[("count", &totals.total_items.to_string())]
            )
        ),
        translations.translate_with(
            active,
            "cart.total",
            &[("amount", &totals.total_price.to_string())]
        ),
        format!("theme: {} ({})", theme.preference(), theme.effective_theme()),
        format!("language: {} ({})", active, language.direction()),
    ];

    info!(
        products = products.len(),
        total_items = totals.total_items,
        total_price = %totals.total_price,
        "Demo complete"
    );

    Ok(DemoReport {
        preference: theme.preference(),
        effective_theme: theme.effective_theme(),
        language: active,
        direction: language.direction(),
        product_count: products.len(),
        totals,
        lines,
    })
}

/// Initializes the tracing subscriber.
///
/// Respects `RUST_LOG`; defaults to `info,storefront=debug`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
