//! State Layer
//!
//! Language state shared by every translation consumer of a runtime, plus
//! the server and client entry points built on it. Data flows one way:
//!
//! ```text
//! LanguageSwitch → TranslationHandle::set_language → LanguageState
//!     → persist cookie → broadcast Changed → every TranslationHandle
//!     → ResourceCache::request(new key) → re-render
//! ```

mod language;
mod server;
mod switch;
mod translation;

pub use language::*;
pub use server::*;
pub use switch::*;
pub use translation::*;
