//! Run configuration
//!
//! One [`BuildConfig`] is constructed at process start and threaded as a
//! parameter into the dispatcher and every recipe. Nothing below the binary
//! consults environment variables or module-level state.

use depot_platform::{DepotPaths, Os};

use crate::Result;

/// Environment variable carrying the CI-provided release tag
pub const TAG_ENV: &str = "DEPOT_TAG";

/// Tag used when the environment does not provide one; never blocks a run
pub const PLACEHOLDER_TAG: &str = "0.0.pre0";

/// Immutable configuration for one invocation
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub os: Os,
    pub paths: DepotPaths,
    /// Release tag used to name the final archive
    pub tag: String,
}

impl BuildConfig {
    pub fn new(os: Os, paths: DepotPaths, tag: impl Into<String>) -> Self {
        Self {
            os,
            paths,
            tag: tag.into(),
        }
    }

    /// Detect configuration from the host: compile-time OS, `DEPOT_ROOT`
    /// or the current directory, and `DEPOT_TAG` or a placeholder.
    pub fn detect() -> Result<Self> {
        Ok(Self {
            os: Os::current(),
            paths: DepotPaths::detect()?,
            tag: resolve_tag(),
        })
    }
}

/// The CI tag if present and non-empty, the placeholder otherwise
pub fn resolve_tag() -> String {
    std::env::var(TAG_ENV)
        .ok()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_TAG.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config() {
        let config = BuildConfig::new(Os::Linux, DepotPaths::from_root("/tmp/x"), "v1.0");
        assert_eq!(config.tag, "v1.0");
        assert_eq!(config.os, Os::Linux);
    }
}
