//! Platform detection and on-disk layout for depot
//!
//! This crate provides:
//! - OS detection
//! - The output tree layout (work dir, per-platform trees, per-library slots)

mod error;
mod paths;
mod platform;

pub use error::PlatformError;
pub use paths::{DepotPaths, ROOT_ENV, SlotPaths};
pub use platform::Os;
