//! On-disk layout for the build tree
//!
//! Everything this tool produces lives under one root:
//! ```text
//! <root>/
//! ├── work/                                  # scratch: downloads + extracted sources
//! ├── <platform>[-<variant>]/<library>/      # published per-library output slots
//! │   ├── include/
//! │   ├── lib/
//! │   ├── bin/
//! │   └── dist/                              # license / readme texts
//! ├── README.md
//! ├── version.txt                            # written at packaging time
//! └── depot-<platform>-<tag>.{zip,tar.gz}
//! ```

use crate::error::PlatformError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the tree root (used by tests for isolation)
pub const ROOT_ENV: &str = "DEPOT_ROOT";

/// Root paths for a single run
#[derive(Debug, Clone)]
pub struct DepotPaths {
    /// Root of the output tree (current directory unless overridden)
    pub root: PathBuf,
    /// Shared scratch workspace for downloads and extracted sources
    pub work: PathBuf,
}

impl DepotPaths {
    /// Build paths rooted at an explicit directory
    pub fn from_root<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        let work = root.join("work");
        Self { root, work }
    }

    /// Detect the tree root: `DEPOT_ROOT` if set, the current directory otherwise
    pub fn detect() -> Result<Self, PlatformError> {
        if let Ok(root) = std::env::var(ROOT_ENV) {
            debug!("Using tree root from {}: {}", ROOT_ENV, root);
            return Ok(Self::from_root(root));
        }
        let cwd = std::env::current_dir()?;
        Ok(Self::from_root(cwd))
    }

    /// Per-platform (and, before merging, per-variant) output tree
    ///
    /// `tree_name` is `<platform>` or `<platform>-<variant>`.
    pub fn tree(&self, tree_name: &str) -> PathBuf {
        self.root.join(tree_name)
    }
}

/// The conventional slots inside one library's published output
///
/// The shape is identical for every library so that dependency wiring and
/// packaging never need per-library cases.
#[derive(Debug, Clone)]
pub struct SlotPaths {
    pub root: PathBuf,
}

impl SlotPaths {
    pub fn new(tree: &Path, library: &str) -> Self {
        Self {
            root: tree.join(library),
        }
    }

    pub fn include(&self) -> PathBuf {
        self.root.join("include")
    }

    pub fn lib(&self) -> PathBuf {
        self.root.join("lib")
    }

    pub fn bin(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn dist(&self) -> PathBuf {
        self.root.join("dist")
    }
}
