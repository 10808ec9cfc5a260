//! Architecture variant resolution
//!
//! macOS builds every library once per architecture and merges the trees
//! afterwards; Linux and Windows build exactly one unqualified variant.
//! This is pure configuration lookup, but every recipe blindly merges its
//! output into build invocations, so the tables here are load-bearing.

use std::collections::BTreeMap;

use depot_platform::Os;

/// Identifies a build variant; selected by enum, never by string suffixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantId {
    /// The single variant of platforms without an architecture split
    Default,
    Arm,
    X86,
}

impl VariantId {
    pub const fn as_str(&self) -> &'static str {
        match self {
            VariantId::Default => "",
            VariantId::Arm => "arm",
            VariantId::X86 => "x86",
        }
    }

    /// Suffix appended to the platform tree name ("", "-arm", "-x86")
    pub const fn tree_suffix(&self) -> &'static str {
        match self {
            VariantId::Default => "",
            VariantId::Arm => "-arm",
            VariantId::X86 => "-x86",
        }
    }
}

/// Build context for one (platform, architecture) combination
#[derive(Debug, Clone)]
pub struct Variant {
    pub id: VariantId,
    /// Extra compiler flags, injected through CFLAGS/LDFLAGS
    pub compiler_flags: Vec<String>,
    /// Extra flags for configure-style build systems
    pub configure_flags: Vec<String>,
    /// Extra flags for cmake-style build systems
    pub cmake_flags: Vec<String>,
    /// Environment overrides for child build tools
    pub env_overrides: BTreeMap<String, String>,
}

impl Variant {
    /// Ordered variants to build for a platform; never empty
    ///
    /// Arm comes first on macOS: the merger uses the first variant as the
    /// reference tree and puts its body first in header guards.
    pub fn resolve(os: Os) -> Vec<Variant> {
        match os {
            Os::Macos => vec![Self::macos_arm(), Self::macos_x86()],
            Os::Linux | Os::Windows => vec![Self::default_variant()],
        }
    }

    fn default_variant() -> Variant {
        Variant {
            id: VariantId::Default,
            compiler_flags: Vec::new(),
            configure_flags: Vec::new(),
            cmake_flags: Vec::new(),
            env_overrides: BTreeMap::new(),
        }
    }

    fn macos_arm() -> Variant {
        Variant {
            id: VariantId::Arm,
            compiler_flags: vec![
                "-arch".to_string(),
                "arm64".to_string(),
                "-mmacosx-version-min=11.0".to_string(),
            ],
            configure_flags: vec!["--host=aarch64-apple-darwin".to_string()],
            cmake_flags: vec![
                "-DCMAKE_OSX_ARCHITECTURES=arm64".to_string(),
                "-DCMAKE_OSX_DEPLOYMENT_TARGET=11.0".to_string(),
            ],
            env_overrides: BTreeMap::from([(
                "MACOSX_DEPLOYMENT_TARGET".to_string(),
                "11.0".to_string(),
            )]),
        }
    }

    fn macos_x86() -> Variant {
        Variant {
            id: VariantId::X86,
            compiler_flags: vec![
                "-arch".to_string(),
                "x86_64".to_string(),
                "-mmacosx-version-min=10.9".to_string(),
            ],
            configure_flags: vec!["--host=x86_64-apple-darwin".to_string()],
            cmake_flags: vec![
                "-DCMAKE_OSX_ARCHITECTURES=x86_64".to_string(),
                "-DCMAKE_OSX_DEPLOYMENT_TARGET=10.9".to_string(),
            ],
            env_overrides: BTreeMap::from([(
                "MACOSX_DEPLOYMENT_TARGET".to_string(),
                "10.9".to_string(),
            )]),
        }
    }

    /// Directory name of this variant's output tree, e.g. "macos-arm"
    pub fn tree_name(&self, os: Os) -> String {
        format!("{}{}", os, self.id.tree_suffix())
    }

    /// Compiler flags joined for use in CFLAGS-style variables
    pub fn compiler_flags_joined(&self) -> String {
        self.compiler_flags.join(" ")
    }

    pub fn is_default(&self) -> bool {
        self.id == VariantId::Default
    }
}
