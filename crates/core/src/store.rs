//! The artifact store: scratch workspace plus published output trees
//!
//! All state shared between build steps is filesystem-resident. The store
//! owns two areas under one root:
//!
//! - `work/` — downloaded archives (kept across runs) and extracted source
//!   trees (deleted and re-created per recipe invocation)
//! - `<platform>[-<variant>]/<library>/{include,lib,bin,dist}` — the
//!   published output slots every downstream consumer reads from

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use depot_platform::{DepotPaths, Os, SlotPaths};

use crate::Result;
use crate::error::CoreError;
use crate::variant::Variant;

/// Accessor for the on-disk build state of one run
#[derive(Debug, Clone)]
pub struct Store {
    os: Os,
    paths: DepotPaths,
}

impl Store {
    pub fn new(os: Os, paths: DepotPaths) -> Self {
        Self { os, paths }
    }

    pub fn os(&self) -> Os {
        self.os
    }

    pub fn paths(&self) -> &DepotPaths {
        &self.paths
    }

    /// Create the scratch workspace if it does not exist yet
    pub fn init(&self) -> Result<()> {
        if !self.paths.work.exists() {
            info!("Creating work folder '{}'", self.paths.work.display());
            fs::create_dir_all(&self.paths.work)?;
        }
        Ok(())
    }

    pub fn work_dir(&self) -> &Path {
        &self.paths.work
    }

    pub fn work_path(&self, name: &str) -> PathBuf {
        self.paths.work.join(name)
    }

    /// Remove a stale extracted source tree; downloaded archives are kept
    /// so re-runs skip the download
    pub fn clean_work_entry(&self, name: &str) -> Result<()> {
        remove_path(&self.work_path(name))
    }

    /// Root of one variant's output tree, e.g. `<root>/macos-arm`
    pub fn variant_tree(&self, variant: &Variant) -> PathBuf {
        self.paths.tree(&variant.tree_name(self.os))
    }

    /// Root of the merged (or single-variant) tree, e.g. `<root>/macos`
    pub fn merged_tree(&self) -> PathBuf {
        self.paths.tree(self.os.as_str())
    }

    /// A library's output slot for one variant
    pub fn slot(&self, variant: &Variant, library: &str) -> SlotPaths {
        SlotPaths::new(&self.variant_tree(variant), library)
    }

    /// Remove a library's slot so the recipe starts from a clean slate
    pub fn clean_slot(&self, variant: &Variant, library: &str) -> Result<()> {
        let slot = self.slot(variant, library);
        debug!("Cleaning slot {}", slot.root.display());
        remove_path(&slot.root)
    }
}

/// Remove a file or directory tree if present
pub fn remove_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Copy a build artifact into a slot directory, keeping its file name
///
/// A missing source is a [`CoreError::MissingArtifact`]: the build tool
/// reported success but did not produce what the recipe expected.
pub fn publish_file(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    if !src.is_file() {
        return Err(CoreError::MissingArtifact(src.to_path_buf()));
    }
    fs::create_dir_all(dest_dir)?;
    let file_name = src
        .file_name()
        .ok_or_else(|| CoreError::MissingArtifact(src.to_path_buf()))?;
    let dest = dest_dir.join(file_name);
    fs::copy(src, &dest)?;
    debug!("Published {}", dest.display());
    Ok(dest)
}

/// Copy a directory tree of artifacts into a slot, creating `dest_dir`
pub fn publish_tree(src_dir: &Path, dest_dir: &Path) -> Result<()> {
    if !src_dir.is_dir() {
        return Err(CoreError::MissingArtifact(src_dir.to_path_buf()));
    }
    fs::create_dir_all(dest_dir)?;
    for entry in fs::read_dir(src_dir)? {
        let entry = entry?;
        let dest = dest_dir.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            publish_tree(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    debug!("Published tree {}", dest_dir.display());
    Ok(())
}
