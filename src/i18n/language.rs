//! Language Codes
//!
//! The closed set of languages the application ships resources for.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported languages
///
/// Only English ships today. Every variant needs a matching
/// `locales/<code>/` resource directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// English
    #[default]
    #[serde(rename = "en")]
    En,
}

/// Languages offered by a language selector, in display order
pub const LANGUAGE_LIST: &[Language] = &[Language::En];

impl Language {
    /// Language used when nothing else is known
    pub const BASE: Language = Language::En;

    /// All supported languages
    pub fn all() -> &'static [Language] {
        LANGUAGE_LIST
    }

    /// Language code, also the name of its resource directory
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
        }
    }

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| Error::UnsupportedLanguage {
                code: s.to_string(),
            })
    }
}

/// Map arbitrary input (cookie value, selector value, markup attribute)
/// onto a supported language, falling back to [`Language::BASE`].
///
/// TODO: add a match arm per language once a second `locales/<code>/`
/// directory ships; until then every input resolves to English.
pub fn convert_to_language_code(raw: &str) -> Language {
    let code = raw.trim();
    if code.eq_ignore_ascii_case("en") {
        return Language::En;
    }

    tracing::debug!(input = raw, fallback = %Language::BASE, "Unrecognized language code");
    Language::BASE
}
