//! Host platform detection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system the bundle is being built on (and for)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Macos,
    Windows,
}

impl Os {
    /// Detect the current operating system at compile time
    #[cfg(target_os = "linux")]
    pub const fn current() -> Self {
        Os::Linux
    }

    #[cfg(target_os = "macos")]
    pub const fn current() -> Self {
        Os::Macos
    }

    #[cfg(target_os = "windows")]
    pub const fn current() -> Self {
        Os::Windows
    }

    /// Returns the OS name as used in output tree and archive names
    pub const fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Macos => "macos",
            Os::Windows => "windows",
        }
    }

    /// Source archive extension preferred on this platform
    pub const fn archive_ext(&self) -> &'static str {
        match self {
            Os::Windows => "zip",
            _ => "tar.gz",
        }
    }

    /// Extension of the final distribution archive
    pub const fn package_ext(&self) -> &'static str {
        match self {
            Os::Windows => "zip",
            _ => "tar.gz",
        }
    }

    pub const fn is_windows(&self) -> bool {
        matches!(self, Os::Windows)
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_detection() {
        // Detection is compile-time; whatever we got must round-trip
        let os = Os::current();
        assert!(!os.as_str().is_empty());
    }

    #[test]
    fn test_archive_extensions() {
        assert_eq!(Os::Linux.archive_ext(), "tar.gz");
        assert_eq!(Os::Macos.archive_ext(), "tar.gz");
        assert_eq!(Os::Windows.archive_ext(), "zip");
        assert_eq!(Os::Windows.package_ext(), "zip");
        assert_eq!(Os::Linux.package_ext(), "tar.gz");
    }

    #[test]
    fn test_os_display() {
        assert_eq!(Os::Macos.to_string(), "macos");
        assert_eq!(Os::Linux.to_string(), "linux");
    }
}
