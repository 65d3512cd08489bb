//! Translation Handle
//!
//! Per-view translation consumer. A handle follows the shared
//! `LanguageState`, fetches its resource blob through the `ResourceCache`
//! and resolves keys against it.
//!
//! While the blob for the current language is still loading, `translate`
//! echoes the key and `load_state` reports `Pending` so views can suspend.

use crate::constants::DEFAULT_LANGUAGE_CODE;
use crate::i18n::{Language, ResourceBlob, Variables, convert_to_language_code, resolve};
use crate::services::{CacheKey, LoadState, ResourceCache};
use crate::states::language::{LanguageCallback, LanguageState, Subscription};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Client-side translation accessor bound to one resource group
pub struct TranslationHandle {
    state: LanguageState,
    cache: ResourceCache,
    group: Option<Arc<str>>,
    language: Mutex<Language>,
    subscription: Subscription,
}

impl TranslationHandle {
    /// Mount a handle.
    ///
    /// The handle starts with `initial_language` (the server-rendered one)
    /// and then adopts the persisted preference, persisting the base
    /// language when none exists.
    pub fn mount(
        state: &LanguageState,
        cache: &ResourceCache,
        initial_language: Option<&str>,
        group: Option<&str>,
    ) -> Self {
        let initial = convert_to_language_code(initial_language.unwrap_or(DEFAULT_LANGUAGE_CODE));
        let handle = Self {
            state: state.clone(),
            cache: cache.clone(),
            group: group.map(Arc::from),
            language: Mutex::new(initial),
            subscription: state.subscribe(),
        };

        let persisted = state.initialize();
        *handle.language.lock() = persisted;
        tracing::debug!(
            initial = %initial,
            language = %persisted,
            group = handle.group.as_deref().unwrap_or("-"),
            "Translation handle mounted"
        );
        handle
    }

    /// Current language, after applying pending change notifications
    pub fn language(&self) -> Language {
        let mut language = self.language.lock();
        if let Some(changed) = self.subscription.drain() {
            *language = changed;
        }
        *language
    }

    /// Resource group, `None` meaning the language's default file
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Cache key of the blob for the current language
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.language(), self.group.as_deref())
    }

    /// Loading state of the current blob; starts the load if needed
    pub fn load_state(&self) -> LoadState {
        self.cache.request(&self.cache_key())
    }

    /// Wait until the current blob has settled
    pub async fn ready(&self) -> ResourceBlob {
        let key = self.cache_key();
        self.cache.load(&key).await
    }

    /// Resolve `key` in the current language
    pub fn translate(&self, key: &str, variables: Option<&Variables>) -> String {
        match self.load_state() {
            LoadState::Pending => key.to_string(),
            LoadState::Ready(blob) | LoadState::Failed(blob) => resolve(&blob, key, variables),
        }
    }

    /// Switch the shared language; every mounted handle follows
    pub fn set_language(&self, language: Language, callback: Option<LanguageCallback>) {
        *self.language.lock() = language;
        self.state.set_language(language, callback);
    }

    /// Shared language state
    pub fn language_state(&self) -> &LanguageState {
        &self.state
    }
}

impl fmt::Debug for TranslationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationHandle")
            .field("language", &self.language())
            .field("group", &self.group)
            .finish()
    }
}
