//! Versioned patch-sets for vendored build files
//!
//! Keyed by (library, version, platform) so upgrading a bundled library is a
//! data change here, not a code change in the recipe. A substitution whose
//! target no longer exists fails the build loudly (see [`crate::patch`]).

use depot_platform::Os;

use crate::patch::{FilePatch, Substitution};

/// Patches to apply to a library's extracted source before building
pub fn patch_set(library: &str, version: &str, os: Os) -> &'static [FilePatch] {
    match (library, version, os) {
        ("libpng", "1.6.37", Os::Windows) => LIBPNG_1_6_37_WINDOWS,
        _ => &[],
    }
}

/// The vendored MSVC makefile hard-codes a sibling `..\zlib` checkout;
/// point it at the published zlib slot instead. nmake runs from
/// `work/lpng1637`, so the slot is two levels up.
const LIBPNG_1_6_37_WINDOWS: &[FilePatch] = &[FilePatch {
    file: "scripts/makefile.vcwin32",
    substitutions: &[
        Substitution {
            find: "-I..\\zlib",
            replace: "-I..\\..\\windows\\zlib\\include",
        },
        Substitution {
            find: "..\\zlib\\zlib.lib",
            replace: "..\\..\\windows\\zlib\\lib\\zlib.lib",
        },
    ],
}];
