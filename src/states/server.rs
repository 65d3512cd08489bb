//! Server-Side Translation
//!
//! Resolves the request language from its cookies and loads the resource
//! blob once, directly from the loader. The result is independent of the
//! client cache.

use crate::i18n::{Language, ResourceBlob, Variables, convert_to_language_code, resolve};
use crate::services::{PreferenceStore, ResourceLoader, default_group};

/// Translation context for one server-rendered request
#[derive(Debug, Clone, PartialEq)]
pub struct ServerTranslation {
    language: Language,
    blob: ResourceBlob,
}

impl ServerTranslation {
    /// Build from an already loaded blob
    pub fn new(language: Language, blob: ResourceBlob) -> Self {
        Self { language, blob }
    }

    /// Language of the request
    pub fn language(&self) -> Language {
        self.language
    }

    /// Loaded blob, empty if the load failed
    pub fn blob(&self) -> &ResourceBlob {
        &self.blob
    }

    /// Resolve `key` in the request language
    pub fn translate(&self, key: &str, variables: Option<&Variables>) -> String {
        resolve(&self.blob, key, variables)
    }
}

/// Load the translation context for a server-rendered view.
///
/// The language comes from the request's language cookie, falling back to
/// the base language. A failed load yields an empty blob so every key
/// translates to itself.
pub async fn get_server_translation(
    cookies: &dyn PreferenceStore,
    loader: &dyn ResourceLoader,
    group: Option<&str>,
) -> ServerTranslation {
    let language = cookies
        .language()
        .map(|raw| convert_to_language_code(&raw))
        .unwrap_or(Language::BASE);
    let group = default_group(language, group);

    let blob = match loader.load(language, group).await {
        Ok(blob) => blob,
        Err(e) => {
            tracing::warn!(
                language = %language,
                group,
                error = %e,
                "Server resource load failed, using empty translations"
            );
            ResourceBlob::empty()
        }
    };

    tracing::debug!(language = %language, group, keys = blob.len(), "Server translation ready");
    ServerTranslation::new(language, blob)
}
