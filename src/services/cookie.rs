//! Language Preference Persistence
//!
//! The active language is persisted as a cookie-equivalent entry:
//! `lang=<code>; path=/; max-age=31536000`.

use crate::constants::{LANG_COOKIE_KEY, LANG_COOKIE_MAX_AGE_SECS, LANG_COOKIE_PATH};
use crate::error::Result;
use crate::i18n::Language;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A cookie to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub max_age: Duration,
}

impl Cookie {
    /// The language preference cookie
    pub fn language(language: Language) -> Self {
        Self {
            name: LANG_COOKIE_KEY.to_string(),
            value: language.code().to_string(),
            path: LANG_COOKIE_PATH.to_string(),
            max_age: Duration::from_secs(LANG_COOKIE_MAX_AGE_SECS),
        }
    }

    /// Render as a `document.cookie` assignment or `Set-Cookie` value
    pub fn to_header_value(&self) -> String {
        format!(
            "{}={}; path={}; max-age={}",
            self.name,
            self.value,
            self.path,
            self.max_age.as_secs()
        )
    }

    fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let max_age = chrono::Duration::from_std(self.max_age).unwrap_or(chrono::Duration::MAX);
        now.checked_add_signed(max_age).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_value())
    }
}

/// Split a `name=value; other=value` string into pairs, in order.
///
/// Spaces are ignored anywhere; entries without `=` are skipped.
fn parse_cookie_pairs(raw: &str) -> Vec<(String, String)> {
    let compact: String = raw.chars().filter(|c| *c != ' ').collect();
    compact
        .split(';')
        .filter_map(|entry| entry.split_once('='))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Find a cookie value in a `name=value; other=value` string.
///
/// Spaces are ignored and the first matching entry wins.
pub fn find_cookie(raw: &str, name: &str) -> Option<String> {
    parse_cookie_pairs(raw)
        .into_iter()
        .find(|(entry, _)| entry == name)
        .map(|(_, value)| value)
}

/// Key-value store holding the persisted language preference
pub trait PreferenceStore: Send + Sync {
    /// Current value of a cookie, if set and alive
    fn get(&self, name: &str) -> Option<String>;

    /// Write a cookie
    fn set(&self, cookie: &Cookie) -> Result<()>;

    /// Persisted language, if any
    fn language(&self) -> Option<String> {
        self.get(LANG_COOKIE_KEY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    path: String,
    expires_at: DateTime<Utc>,
}

impl StoredCookie {
    fn new(cookie: &Cookie, now: DateTime<Utc>) -> Self {
        Self {
            value: cookie.value.clone(),
            path: cookie.path.clone(),
            expires_at: cookie.expires_at(now),
        }
    }

    fn is_alive(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// In-memory cookie store, the equivalent of `document.cookie` or of the
/// cookies sent with one request
#[derive(Debug, Default)]
pub struct CookieJar {
    entries: RwLock<AHashMap<String, StoredCookie>>,
}

impl CookieJar {
    /// Create an empty jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a jar from a request `Cookie` header.
    ///
    /// Parsed like [`find_cookie`]: spaces are ignored and the first entry
    /// of a repeated name wins.
    pub fn from_header(raw: &str) -> Self {
        let jar = Self::new();
        let now = Utc::now();
        {
            let mut entries = jar.entries.write();
            for (name, value) in parse_cookie_pairs(raw) {
                let cookie = Cookie {
                    name,
                    value,
                    path: LANG_COOKIE_PATH.to_string(),
                    max_age: Duration::from_secs(LANG_COOKIE_MAX_AGE_SECS),
                };
                entries
                    .entry(cookie.name.clone())
                    .or_insert_with(|| StoredCookie::new(&cookie, now));
            }
        }
        jar
    }

    /// Render live cookies as a `name=value; name=value` header
    pub fn header(&self) -> String {
        let now = Utc::now();
        let entries = self.entries.read();
        let mut pairs: Vec<String> = entries
            .iter()
            .filter(|(_, stored)| stored.is_alive(now))
            .map(|(name, stored)| format!("{name}={}", stored.value))
            .collect();
        pairs.sort_unstable();
        pairs.join("; ")
    }

    /// Remove a cookie
    pub fn remove(&self, name: &str) -> bool {
        self.entries.write().remove(name).is_some()
    }
}

impl PreferenceStore for CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        let now = Utc::now();
        self.entries
            .read()
            .get(name)
            .filter(|stored| stored.is_alive(now))
            .map(|stored| stored.value.clone())
    }

    fn set(&self, cookie: &Cookie) -> Result<()> {
        let mut entries = self.entries.write();
        if cookie.max_age.is_zero() {
            entries.remove(&cookie.name);
        } else {
            entries.insert(cookie.name.clone(), StoredCookie::new(cookie, Utc::now()));
        }
        Ok(())
    }
}

/// TOML wrapper for the cookie file
#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieFile {
    #[serde(default)]
    cookies: BTreeMap<String, StoredCookie>,
}

/// Cookie store persisted to a TOML file, for runtimes without a browser
#[derive(Debug)]
pub struct FileCookieStore {
    path: PathBuf,
    lock: parking_lot::Mutex<()>,
}

impl FileCookieStore {
    /// Store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: parking_lot::Mutex::new(()),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<CookieFile> {
        if !self.path.exists() {
            return Ok(CookieFile::default());
        }
        let value = std::fs::read_to_string(&self.path)?;
        if value.trim().is_empty() {
            return Ok(CookieFile::default());
        }
        Ok(toml::from_str(&value)?)
    }
}

impl PreferenceStore for FileCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        let _guard = self.lock.lock();
        let file = match self.read_file() {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to read cookie file");
                return None;
            }
        };
        let now = Utc::now();
        file.cookies
            .get(name)
            .filter(|stored| stored.is_alive(now))
            .map(|stored| stored.value.clone())
    }

    fn set(&self, cookie: &Cookie) -> Result<()> {
        let _guard = self.lock.lock();
        let mut file = self.read_file()?;
        let now = Utc::now();
        file.cookies.retain(|_, stored| stored.is_alive(now));
        if cookie.max_age.is_zero() {
            file.cookies.remove(&cookie.name);
        } else {
            file.cookies
                .insert(cookie.name.clone(), StoredCookie::new(cookie, now));
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(&file)?)?;
        tracing::debug!(path = ?self.path, cookie = %cookie, "Cookie saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_cookie_header() {
        let cookie = Cookie::language(Language::En);
        assert_eq!(cookie.to_header_value(), "lang=en; path=/; max-age=31536000");
    }

    #[test]
    fn test_find_cookie() {
        assert_eq!(find_cookie("a=1; lang=en; b=2", "lang"), Some("en".to_string()));
        assert_eq!(find_cookie("lang=en;lang=fr", "lang"), Some("en".to_string()));
        assert_eq!(find_cookie("xlang=fr; b=2", "lang"), None);
        assert_eq!(find_cookie("", "lang"), None);
    }

    #[test]
    fn test_jar_round_trip() {
        let jar = CookieJar::new();
        assert_eq!(jar.language(), None);

        jar.set(&Cookie::language(Language::En)).expect("set");
        assert_eq!(jar.language(), Some("en".to_string()));
        assert_eq!(jar.header(), "lang=en");
    }

    #[test]
    fn test_jar_from_request_header() {
        let jar = CookieJar::from_header("session=abc; lang=en");
        assert_eq!(jar.get("lang"), Some("en".to_string()));
        assert_eq!(jar.get("session"), Some("abc".to_string()));
        assert_eq!(jar.header(), "lang=en; session=abc");
    }

    #[test]
    fn test_jar_parses_like_find_cookie() {
        for raw in [
            "x=1;lang = en ; lang=fr",
            "l ang=en; theme=dark",
            "lang=en=US; broken; =empty",
            "",
        ] {
            let jar = CookieJar::from_header(raw);
            assert_eq!(jar.get("lang"), find_cookie(raw, "lang"), "header {raw:?}");
        }

        let jar = CookieJar::from_header("x=1;lang = en ; lang=fr");
        assert_eq!(jar.language(), Some("en".to_string()));
    }

    #[test]
    fn test_zero_max_age_deletes() {
        let jar = CookieJar::from_header("lang=en");
        let mut cookie = Cookie::language(Language::En);
        cookie.max_age = Duration::ZERO;
        jar.set(&cookie).expect("set");
        assert_eq!(jar.language(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("cookies.toml");

        let store = FileCookieStore::new(&path);
        assert_eq!(store.language(), None);

        store.set(&Cookie::language(Language::En)).expect("set");
        assert!(path.exists());

        let reopened = FileCookieStore::new(&path);
        assert_eq!(reopened.language(), Some("en".to_string()));
    }
}
