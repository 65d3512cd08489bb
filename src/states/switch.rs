//! Language Switch
//!
//! Selector over the supported languages. Selecting an option goes through
//! the translation handle, so the change is persisted and broadcast like any
//! other.

use crate::constants::DEFAULT_LANGUAGE_CODE;
use crate::i18n::{Language, convert_to_language_code};
use crate::states::language::LanguageCallback;
use crate::states::translation::TranslationHandle;

/// Resource key of the selector label
pub const SWITCH_LABEL_KEY: &str = "switchLanguageLabel";

/// One selectable language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    pub language: Language,
    pub code: &'static str,
    pub label: &'static str,
}

impl From<Language> for LanguageOption {
    fn from(language: Language) -> Self {
        Self {
            language,
            code: language.code(),
            label: language.display_name(),
        }
    }
}

/// Language selector bound to a translation handle
#[derive(Debug)]
pub struct LanguageSwitch<'a> {
    handle: &'a TranslationHandle,
}

impl<'a> LanguageSwitch<'a> {
    pub fn new(handle: &'a TranslationHandle) -> Self {
        Self { handle }
    }

    /// Every supported language, in declaration order
    pub fn options(&self) -> Vec<LanguageOption> {
        Language::all().iter().copied().map(LanguageOption::from).collect()
    }

    /// Currently selected language
    pub fn selected(&self) -> Language {
        self.handle.language()
    }

    /// Translated selector label
    pub fn label(&self) -> String {
        self.handle.translate(SWITCH_LABEL_KEY, None)
    }

    /// Select a language from a raw option value.
    ///
    /// An empty value selects the default language; unknown codes fall
    /// back to the base language.
    pub fn select(&self, raw: &str, callback: Option<LanguageCallback>) -> Language {
        let raw = if raw.trim().is_empty() { DEFAULT_LANGUAGE_CODE } else { raw };
        let language = convert_to_language_code(raw);
        self.handle.set_language(language, callback);
        language
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{CookieJar, EmbeddedResources, PreferenceStore, ResourceCache};
    use crate::states::language::{LanguageOptions, LanguageState};
    use std::sync::Arc;

    fn mounted(jar: Arc<CookieJar>) -> (LanguageState, TranslationHandle) {
        let options = LanguageOptions {
            auto_refresh: false,
            ..Default::default()
        };
        let state = LanguageState::new(jar, Arc::new(|| {}), options);
        let cache = ResourceCache::new(EmbeddedResources);
        let handle = TranslationHandle::mount(&state, &cache, None, None);
        (state, handle)
    }

    #[test]
    fn test_options_cover_every_language() {
        let (_, handle) = mounted(Arc::new(CookieJar::new()));
        let switch = LanguageSwitch::new(&handle);

        let options = switch.options();
        assert_eq!(options.len(), Language::all().len());
        assert_eq!(options[0].code, "en");
        assert_eq!(options[0].label, Language::En.display_name());
        assert_eq!(switch.selected(), Language::En);
    }

    #[tokio::test]
    async fn test_label_is_translated() {
        let (_, handle) = mounted(Arc::new(CookieJar::new()));
        handle.ready().await;

        let switch = LanguageSwitch::new(&handle);
        assert_eq!(switch.label(), "Choose your language");
    }

    #[test]
    fn test_select_persists_and_notifies() {
        let jar = Arc::new(CookieJar::new());
        let (state, handle) = mounted(jar.clone());
        let observer = state.subscribe();

        let switch = LanguageSwitch::new(&handle);
        assert_eq!(switch.select(" EN ", Some(Box::new(|| {}))), Language::En);

        assert_eq!(jar.language(), Some("en".to_string()));
        assert_eq!(observer.drain(), Some(Language::En));
    }

    #[test]
    fn test_select_unknown_falls_back() {
        let (_, handle) = mounted(Arc::new(CookieJar::new()));
        let switch = LanguageSwitch::new(&handle);
        assert_eq!(switch.select("zz", Some(Box::new(|| {}))), Language::BASE);
        assert_eq!(switch.select("", Some(Box::new(|| {}))), Language::BASE);
    }
}
