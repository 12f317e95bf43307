//! Kernel of the Folio module framework: the [`Module`] lifecycle trait, the
//! [`ModuleRegistry`] that drives it, and layered [`settings::Settings`].

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;

/// Handle to the document store shared by every module.
///
/// The `any` engine lets the configured endpoint pick the transport
/// (`ws://`, `http://`, `mem://`).
pub type DbClient = surrealdb::Surreal<surrealdb::engine::any::Any>;
