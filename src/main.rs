//! i18n-sync - Example Page
//!
//! Renders the example page once the way a server would (language from the
//! cookie, one load) and once the way a client would (mounted handle over
//! the shared cache). An optional first argument switches the language.
//!
//! ```text
//! i18n-sync          render with the persisted language
//! i18n-sync en       switch to English, then render
//! ```

use anyhow::{Context, Result};
use i18n_sync::services::{
    DirectoryLoader, EmbeddedResources, FileCookieStore, ResourceCache, ResourceLoader, block_on,
};
use i18n_sync::states::{
    LanguageOptions, LanguageState, LanguageSwitch, LogReloader, TranslationHandle,
    get_server_translation,
};
use i18n_sync::{I18nConfig, vars};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const EXAMPLE_GROUP: &str = "example";

fn main() -> Result<()> {
    let config = I18nConfig::try_load().context("Failed to load config")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!("Starting i18n-sync example...");

    let loader: Arc<dyn ResourceLoader> = match &config.resource_dir {
        Some(dir) => {
            tracing::info!(dir = ?dir, "Using resource directory");
            Arc::new(DirectoryLoader::new(dir))
        }
        None => Arc::new(EmbeddedResources),
    };
    let cookie_path = I18nConfig::cookie_path().context("Failed to resolve cookie store")?;
    let store = Arc::new(FileCookieStore::new(cookie_path));

    block_on(render_server(&*store, &*loader));

    let state = LanguageState::new(store, Arc::new(LogReloader), LanguageOptions::from(&config));
    let cache = ResourceCache::with_loader(loader);
    let common = TranslationHandle::mount(&state, &cache, None, None);
    let page = TranslationHandle::mount(&state, &cache, None, Some(EXAMPLE_GROUP));

    let switch = LanguageSwitch::new(&common);
    let options: Vec<&str> = switch.options().iter().map(|option| option.code).collect();
    tracing::debug!(options = ?options, "Available languages");
    if let Some(raw) = std::env::args().nth(1) {
        switch.select(&raw, Some(Box::new(|| {})));
    }

    block_on(async { futures::join!(common.ready(), page.ready()) });
    println!("{}: {}", switch.label(), switch.selected().display_name());
    render_client(&page);

    Ok(())
}

async fn render_server(store: &FileCookieStore, loader: &dyn ResourceLoader) {
    let t = get_server_translation(store, loader, Some(EXAMPLE_GROUP)).await;

    println!("== server ({}) ==", t.language());
    println!("{}", t.translate("exampleText", None));
    for count in [1, 5] {
        println!("{}", t.translate("exampleVariable", Some(&vars! { "count" => count })));
    }
}

fn render_client(handle: &TranslationHandle) {
    println!("== client ({}) ==", handle.language());
    println!("{}", handle.translate("thisWasClient", None));
    for count in [1, 3] {
        println!(
            "{}",
            handle.translate("exampleConditional", Some(&vars! { "count" => count }))
        );
    }
}
