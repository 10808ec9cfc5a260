//! Literal text patching of vendored build files
//!
//! A few libraries ship build files that hard-code paths or options we must
//! change before invoking them (retarget include/lib paths at our published
//! tree, drop incompatible options, remove toolchain pins). Patches are
//! literal substring replacements applied line by line across the whole file;
//! the pre-patch content is preserved next to the file as `<name>.orig`.
//!
//! Patch-sets are static data keyed by library and version (see
//! [`crate::recipes::patches`]), so a library upgrade is a data change.
//! Re-running a patch on an already-patched file is unsafe; recipes always
//! re-extract the source fresh before patching.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::{CoreError, Result};

/// One literal find/replace pair
#[derive(Debug, Clone, Copy)]
pub struct Substitution {
    pub find: &'static str,
    pub replace: &'static str,
}

/// All substitutions for one file, addressed relative to the source tree
#[derive(Debug, Clone, Copy)]
pub struct FilePatch {
    pub file: &'static str,
    pub substitutions: &'static [Substitution],
}

/// Apply a patch to a file inside an extracted source tree
///
/// Every pair is attempted against every line. A pair that matches no line
/// at all signals an upstream source change and fails the run; silently
/// no-op-ing here would ship a miscompiled library.
pub fn apply_patch(source_dir: &Path, patch: &FilePatch) -> Result<()> {
    let path = source_dir.join(patch.file);
    let content = fs::read_to_string(&path)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let backup = path.with_file_name(format!("{}.orig", file_name));
    fs::write(&backup, &content)?;

    let mut matched = vec![false; patch.substitutions.len()];
    let mut out = String::with_capacity(content.len());

    for line in content.lines() {
        let mut line = line.to_string();
        for (i, sub) in patch.substitutions.iter().enumerate() {
            if line.contains(sub.find) {
                matched[i] = true;
                line = line.replace(sub.find, sub.replace);
            }
        }
        out.push_str(&line);
        out.push('\n');
    }

    for (i, sub) in patch.substitutions.iter().enumerate() {
        if !matched[i] {
            return Err(CoreError::PatchTargetMissing {
                file: path.display().to_string(),
                needle: sub.find.to_string(),
            });
        }
    }

    fs::write(&path, out)?;
    debug!("Patched {} ({} substitution(s))", path.display(), patch.substitutions.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MAKEFILE: &str = "CFLAGS=-I..\\zlib -O2\nLIBS=..\\zlib\\zlib.lib\nall: png\n";

    #[test]
    fn test_apply_patch_rewrites_and_backs_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("makefile"), MAKEFILE).unwrap();

        let patch = FilePatch {
            file: "makefile",
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
        };

        apply_patch(temp.path(), &patch).unwrap();

        let patched = fs::read_to_string(temp.path().join("makefile")).unwrap();
        assert!(patched.contains("-I..\\..\\windows\\zlib\\include"));
        assert!(patched.contains("..\\..\\windows\\zlib\\lib\\zlib.lib"));
        assert!(!patched.contains("-I..\\zlib "));

        let backup = fs::read_to_string(temp.path().join("makefile.orig")).unwrap();
        assert_eq!(backup, MAKEFILE);
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("makefile"), MAKEFILE).unwrap();

        let patch = FilePatch {
            file: "makefile",
            substitutions: &[Substitution {
                find: "this-string-is-not-there",
                replace: "x",
            }],
        };

        let err = apply_patch(temp.path(), &patch).unwrap_err();
        match err {
            CoreError::PatchTargetMissing { needle, .. } => {
                assert_eq!(needle, "this-string-is-not-there");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_every_pair_applies_to_every_line() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config"), "opt=a\nother\nopt=a\n").unwrap();

        let patch = FilePatch {
            file: "config",
            substitutions: &[Substitution {
                find: "opt=a",
                replace: "opt=b",
            }],
        };

        apply_patch(temp.path(), &patch).unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("config")).unwrap(),
            "opt=b\nother\nopt=b\n"
        );
    }
}
