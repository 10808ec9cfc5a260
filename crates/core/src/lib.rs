//! depot-core: orchestration for the dependency bundler
//!
//! This crate provides everything between the CLI and the external build
//! tools: fetching and extracting source archives, patching vendored build
//! files, resolving architecture variants, running per-library recipes in
//! dependency order, merging variant trees into universal artifacts, and
//! packaging the published tree.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod package;
pub mod patch;
pub mod recipe;
pub mod recipes;
pub mod store;
pub mod tool;
pub mod variant;
pub mod wiring;

pub use config::BuildConfig;
pub use error::CoreError;
pub use store::Store;
pub use tool::{SystemRunner, ToolCommand, ToolRunner};
pub use variant::{Variant, VariantId};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
