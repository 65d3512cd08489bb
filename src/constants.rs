//! Localization Constants
//!
//! Centralized names and timings shared by the server and client paths.

/// Name of the cookie holding the persisted language code
pub const LANG_COOKIE_KEY: &str = "lang";

/// Cookie path scope
pub const LANG_COOKIE_PATH: &str = "/";

/// Cookie lifetime (one year)
pub const LANG_COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

/// Suffix appended to a translation key to find its plural form
pub const PLURAL_SUFFIX: &str = "_plural";

/// Variable consulted first when choosing between singular and plural
pub const COUNT_VARIABLE: &str = "count";

/// Language used when no preference is available
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Delay before a full reload after a language change
pub const RELOAD_DELAY_MS: u64 = 200;

/// Whether a language change reloads the whole view by default
pub const AUTO_REFRESH_ON_LANG_CHANGE: bool = true;

/// Config file name inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "i18n-sync.toml";

/// Cookie file name inside the platform config directory
pub const COOKIE_FILE_NAME: &str = "cookies.toml";
