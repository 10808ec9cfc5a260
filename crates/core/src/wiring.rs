//! Dependency wiring between recipes
//!
//! A dependent library's build consumes a prerequisite's already-published
//! slot for the *same* variant — a dependency built for one architecture
//! must never be linked into a build for another. Paths are validated on
//! disk before the child build is invoked; a missing prerequisite is a hard
//! error, never a silent empty-include build.

use std::path::PathBuf;

use crate::Result;
use crate::error::CoreError;
use crate::store::Store;
use crate::variant::Variant;

/// Resolved search paths into one prerequisite's published slot
#[derive(Debug, Clone)]
pub struct DepPaths {
    pub library: String,
    pub include: PathBuf,
    pub lib: PathBuf,
}

/// Resolve and validate the published slots of the given prerequisites
pub fn wire(store: &Store, variant: &Variant, deps: &[&str]) -> Result<Vec<DepPaths>> {
    deps.iter()
        .map(|name| {
            let slot = store.slot(variant, name);
            let include = slot.include();
            let lib = slot.lib();
            if !include.is_dir() {
                return Err(CoreError::MissingPrerequisite {
                    library: name.to_string(),
                    path: include,
                });
            }
            if !lib.is_dir() {
                return Err(CoreError::MissingPrerequisite {
                    library: name.to_string(),
                    path: lib,
                });
            }
            Ok(DepPaths {
                library: name.to_string(),
                include,
                lib,
            })
        })
        .collect()
}

/// `-I` flags for every prerequisite, in declaration order
pub fn include_flags(deps: &[DepPaths]) -> String {
    deps.iter()
        .map(|d| format!("-I{}", d.include.display()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `-L` flags for every prerequisite, in declaration order
pub fn lib_flags(deps: &[DepPaths]) -> String {
    deps.iter()
        .map(|d| format!("-L{}", d.lib.display()))
        .collect::<Vec<_>>()
        .join(" ")
}
