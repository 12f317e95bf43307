//! Folio application library
//!
//! Project modules and the process bootstrap shared by the `folio-app` and
//! `folio` binaries.

pub mod bootstrap;
pub mod modules;

/// Re-export commonly used types
pub use modules::*;
