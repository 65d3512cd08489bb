//! i18n - Translation Core
//!
//! Language codes, resource blobs and the pure translator used by both the
//! server and client entry points.

mod language;
mod resource;
mod translator;

pub use language::*;
pub use resource::*;
pub use translator::*;
