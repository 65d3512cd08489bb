//! Service Layer
//!
//! Resource acquisition and preference persistence. The state layer only
//! talks to these through the `ResourceLoader` and `PreferenceStore` seams.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       State Layer                             │
//! │   LanguageState ── TranslationHandle ── ServerTranslation     │
//! └──────────────────────────────────────────────────────────────┘
//!          │                    │                     │
//!          ▼                    ▼                     ▼
//! ┌────────────────┐  ┌──────────────────┐  ┌──────────────────┐
//! │ PreferenceStore│  │  ResourceCache   │  │  ResourceLoader  │
//! │ (cookie)       │  │  (client, dedup) │  │  (server, once)  │
//! └────────────────┘  └──────────────────┘  └──────────────────┘
//! ```

mod cache;
mod cookie;
mod loader;
mod runtime;

pub use cache::*;
pub use cookie::*;
pub use loader::*;
pub use runtime::*;
