//! Per-library build recipes
//!
//! Every recipe composes the same primitives: fetch an archive into the
//! workspace, extract it, patch build files where the vendored defaults are
//! wrong for us, drive the library's own build system through the tool
//! runner, and publish static libraries, headers, and license text into the
//! library's slot. The shape is deliberately uniform; only file names and
//! flag lists differ per library.

pub mod patches;

pub mod freetype;
pub mod glm;
pub mod harfbuzz;
pub mod libogg;
pub mod libpng;
pub mod opus;
pub mod opusfile;
pub mod sdl2;
pub mod zlib;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::fetch;
use crate::recipe::RecipeContext;
use crate::tool::ToolCommand;
use crate::variant::Variant;

/// Fetch an archive into the workspace and unpack it there
///
/// The downloaded file is kept across runs (fetch skips existing files);
/// the extracted tree is the part recipes delete up front.
pub(crate) fn fetch_and_extract(ctx: &RecipeContext, url: &str, archive_name: &str) -> Result<()> {
    let archive = ctx.store.work_path(archive_name);
    fetch::fetch_url(url, &archive, None)?;
    fetch::unpack_archive(&archive, ctx.store.work_dir())
}

/// Environment for a build tool: variant overrides plus CFLAGS/CXXFLAGS
/// carrying the variant's compiler flags
pub(crate) fn base_env(variant: &Variant) -> BTreeMap<String, String> {
    let mut env = variant.env_overrides.clone();
    if !variant.compiler_flags.is_empty() {
        let flags = variant.compiler_flags_joined();
        env.insert("CFLAGS".to_string(), flags.clone());
        env.insert("CXXFLAGS".to_string(), flags.clone());
        env.insert("LDFLAGS".to_string(), flags);
    }
    env
}

/// Base `./configure` invocation with variant flags and environment applied
pub(crate) fn configure(ctx: &RecipeContext, src_dir: &Path) -> ToolCommand {
    ToolCommand::new("./configure", src_dir)
        .args(ctx.variant.configure_flags.iter().cloned())
        .envs(&base_env(ctx.variant))
}

pub(crate) fn make(dir: &Path) -> ToolCommand {
    ToolCommand::new("make", dir)
}

pub(crate) fn make_install(dir: &Path) -> ToolCommand {
    ToolCommand::new("make", dir).arg("install")
}

/// Absolute `out/` install prefix inside an extracted source tree
pub(crate) fn out_prefix(src_dir: &Path) -> Result<PathBuf> {
    Ok(fs::canonicalize(src_dir)?.join("out"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_platform::Os;

    #[test]
    fn test_base_env_empty_for_default_variant() {
        let variant = &Variant::resolve(Os::Linux)[0];
        assert!(base_env(variant).is_empty());
    }

    #[test]
    fn test_base_env_carries_arch_flags() {
        let variants = Variant::resolve(Os::Macos);
        let env = base_env(&variants[0]);
        assert!(env["CFLAGS"].contains("-arch arm64"));
        assert_eq!(env["CFLAGS"], env["LDFLAGS"]);
        assert_eq!(env["MACOSX_DEPLOYMENT_TARGET"], "11.0");
    }
}
