//! Language State
//!
//! Owns the current language for one client runtime, persists it through a
//! `PreferenceStore` and broadcasts every change to all subscribers.
//!
//! ```text
//! set_language(lang)
//!   → current = lang
//!   → store.set(lang cookie)
//!   → broadcast Changed(lang) to every subscriber
//!   → callback()            (if supplied)
//!   → reload after delay    (auto-refresh, no callback)
//! ```

use crate::config::I18nConfig;
use crate::constants::{AUTO_REFRESH_ON_LANG_CHANGE, RELOAD_DELAY_MS};
use crate::i18n::{Language, convert_to_language_code};
use crate::services::{Cookie, PreferenceStore, spawn_delayed};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use uuid::Uuid;

/// Event delivered to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageEvent {
    /// The active language changed
    Changed(Language),
}

/// Completion callback for `set_language`
pub type LanguageCallback = Box<dyn FnOnce() + Send + 'static>;

/// Performs a full view reload
pub trait Reloader: Send + Sync {
    fn reload(&self);
}

impl<F> Reloader for F
where
    F: Fn() + Send + Sync,
{
    fn reload(&self) {
        self()
    }
}

/// Reloader for runtimes without a view to reload
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReloader;

impl Reloader for LogReloader {
    fn reload(&self) {
        tracing::info!("Full view reload requested");
    }
}

/// Behavior switches for `LanguageState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOptions {
    /// Language adopted when nothing is persisted
    pub base: Language,
    /// Reload the whole view after a change without callback
    pub auto_refresh: bool,
    /// Delay before that reload
    pub reload_delay: Duration,
}

impl Default for LanguageOptions {
    fn default() -> Self {
        Self {
            base: Language::BASE,
            auto_refresh: AUTO_REFRESH_ON_LANG_CHANGE,
            reload_delay: Duration::from_millis(RELOAD_DELAY_MS),
        }
    }
}

impl From<&I18nConfig> for LanguageOptions {
    fn from(config: &I18nConfig) -> Self {
        Self {
            base: config.base_language(),
            auto_refresh: config.auto_refresh_on_language_change,
            reload_delay: Duration::from_millis(config.reload_delay_ms),
        }
    }
}

struct Subscriber {
    id: Uuid,
    tx: Sender<LanguageEvent>,
}

struct LanguageInner {
    current: RwLock<Language>,
    store: Arc<dyn PreferenceStore>,
    subscribers: Mutex<Vec<Subscriber>>,
    reloader: Arc<dyn Reloader>,
    options: LanguageOptions,
}

impl LanguageInner {
    fn unsubscribe(&self, id: Uuid) {
        self.subscribers.lock().retain(|s| s.id != id);
    }
}

/// Language provider shared by every translation consumer of a runtime
#[derive(Clone)]
pub struct LanguageState {
    inner: Arc<LanguageInner>,
}

impl LanguageState {
    /// Create a provider; the current language starts at `options.base`
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        reloader: Arc<dyn Reloader>,
        options: LanguageOptions,
    ) -> Self {
        Self {
            inner: Arc::new(LanguageInner {
                current: RwLock::new(options.base),
                store,
                subscribers: Mutex::new(Vec::new()),
                reloader,
                options,
            }),
        }
    }

    /// Provider with default options that only logs reload requests
    pub fn with_store(store: Arc<dyn PreferenceStore>) -> Self {
        Self::new(store, Arc::new(LogReloader), LanguageOptions::default())
    }

    /// Current language
    pub fn current(&self) -> Language {
        *self.inner.current.read()
    }

    /// Options in effect
    pub fn options(&self) -> LanguageOptions {
        self.inner.options
    }

    /// Adopt the persisted preference, persisting the base language when
    /// nothing is stored yet.
    pub fn initialize(&self) -> Language {
        let mut current = self.inner.current.write();
        let language = match self.inner.store.language() {
            Some(raw) => convert_to_language_code(&raw),
            None => {
                let base = self.inner.options.base;
                self.persist(base);
                base
            }
        };

        *current = language;
        drop(current);
        tracing::debug!(language = %language, "Language initialized");
        language
    }

    /// Switch language, persist it and notify every subscriber.
    ///
    /// With a callback the caller handles the follow-up; without one and
    /// with auto-refresh on, a full reload is scheduled.
    ///
    /// The in-memory value, the persisted cookie and the broadcast are
    /// updated under one lock, so concurrent switches cannot leave them
    /// disagreeing.
    pub fn set_language(&self, language: Language, callback: Option<LanguageCallback>) {
        let mut current = self.inner.current.write();
        *current = language;
        self.persist(language);
        let notified = self.broadcast(language);
        drop(current);
        tracing::info!(language = %language, subscribers = notified, "Language changed");

        match callback {
            Some(callback) => callback(),
            None if self.inner.options.auto_refresh => {
                let reloader = self.inner.reloader.clone();
                spawn_delayed("reload", self.inner.options.reload_delay, async move {
                    reloader.reload();
                });
            }
            None => {}
        }
    }

    /// Register a subscriber; dropping the returned handle unsubscribes
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = crossbeam_channel::unbounded();
        let id = Uuid::now_v7();
        self.inner.subscribers.lock().push(Subscriber { id, tx });
        Subscription {
            id,
            rx,
            state: Arc::downgrade(&self.inner),
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    fn persist(&self, language: Language) {
        if let Err(e) = self.inner.store.set(&Cookie::language(language)) {
            tracing::warn!(language = %language, error = %e, "Failed to persist language");
        }
    }

    fn broadcast(&self, language: Language) -> usize {
        let mut subscribers = self.inner.subscribers.lock();
        subscribers.retain(|s| s.tx.send(LanguageEvent::Changed(language)).is_ok());
        subscribers.len()
    }
}

impl fmt::Debug for LanguageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageState")
            .field("current", &self.current())
            .field("subscribers", &self.subscriber_count())
            .field("options", &self.inner.options)
            .finish()
    }
}

/// Receiving end of a language subscription
pub struct Subscription {
    id: Uuid,
    rx: Receiver<LanguageEvent>,
    state: Weak<LanguageInner>,
}

impl Subscription {
    /// Next pending event, if any
    pub fn try_next(&self) -> Option<LanguageEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Consume every pending event and return the latest language
    pub fn drain(&self) -> Option<Language> {
        self.rx
            .try_iter()
            .last()
            .map(|LanguageEvent::Changed(language)| language)
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<LanguageEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Underlying channel, for select loops
    pub fn receiver(&self) -> &Receiver<LanguageEvent> {
        &self.rx
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.unsubscribe(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("pending", &self.rx.len())
            .finish()
    }
}
