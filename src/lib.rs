//! i18n-sync
//!
//! Key-based translation for views rendered either on a server or on a
//! client, with the active language kept in sync across every mounted view
//! and persisted as a `lang` cookie.
//!
//! ```text
//! i18n      pure core: Language, ResourceBlob, resolve()
//! services  loaders, client cache, cookie stores, runtime bridge
//! states    LanguageState, TranslationHandle, server translation, switch
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod helpers;
pub mod i18n;
pub mod services;
pub mod states;

pub use config::I18nConfig;
pub use error::{Error, Result};
pub use i18n::{Language, ResourceBlob, VarValue, Variables, convert_to_language_code, resolve};
pub use services::{
    CacheKey, CookieJar, DirectoryLoader, EmbeddedResources, FileCookieStore, LoadState,
    PreferenceStore, ResourceCache, ResourceLoader,
};
pub use states::{
    LanguageState, LanguageSwitch, ServerTranslation, TranslationHandle, get_server_translation,
};
