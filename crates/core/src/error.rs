//! Error types for depot-core
//!
//! Every failure is fatal for the run: the dispatcher stops at the first
//! error and a human re-invokes after fixing the cause. Each variant names
//! the step and file involved so the diagnostic is actionable on its own.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching, building, merging, or packaging
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Platform error: {0}")]
    Platform(#[from] depot_platform::PlatformError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Hash mismatch for '{path}': expected {expected}, got {actual}")]
    HashMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Unsupported archive format: {0}")]
    UnsupportedArchive(String),

    #[error("Failed to extract '{archive}': {message}")]
    Extract { archive: String, message: String },

    #[error("Patch target not found in '{file}': `{needle}`")]
    PatchTargetMissing { file: String, needle: String },

    #[error("Tool '{tool}' failed ({status})")]
    ToolFailed { tool: String, status: String },

    #[error("Expected build artifact is missing: {0}")]
    MissingArtifact(PathBuf),

    #[error("Prerequisite '{library}' has not been built for this variant: missing {path}")]
    MissingPrerequisite { library: String, path: PathBuf },

    #[error("Cannot merge variants of '{path}': {message}")]
    MergeConflict { path: String, message: String },

    #[error("Recipe error for '{library}': {message}")]
    Recipe { library: String, message: String },

    #[error("Registry configuration error: {0}")]
    Registry(String),

    #[error("Packaging error: {0}")]
    Package(String),
}
