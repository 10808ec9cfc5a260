//! zlib: the compression library
//!
//! First link in the dependency chain; libpng builds against this slot.

use depot_platform::Os;

use crate::recipe::{LibrarySpec, RecipeContext};
use crate::store::publish_file;
use crate::tool::ToolCommand;
use crate::Result;

use super::{configure, fetch_and_extract, make, make_install};

pub const SPEC: LibrarySpec = LibrarySpec {
    name: "zlib",
    version: "1.2.11",
    deps: &[],
    build,
};

const FILEBASE: &str = "zlib-1.2.11";

fn archive_url(os: Os) -> String {
    if os.is_windows() {
        // zipfile releases are named with the dots stripped from the version
        let digits: String = SPEC.version.chars().filter(|c| c.is_ascii_digit()).collect();
        format!("https://zlib.net/zlib{digits}.zip")
    } else {
        format!("https://zlib.net/{FILEBASE}.tar.gz")
    }
}

fn build(ctx: &RecipeContext) -> Result<()> {
    let store = ctx.store;
    store.clean_work_entry(FILEBASE)?;
    let src = store.work_path(FILEBASE);
    let slot = store.slot(ctx.variant, SPEC.name);

    let ext = ctx.config.os.archive_ext();
    fetch_and_extract(ctx, &archive_url(ctx.config.os), &format!("{FILEBASE}.{ext}"))?;

    if ctx.config.os.is_windows() {
        ctx.runner
            .run(&ToolCommand::new("nmake", &src).arg("-f").arg("win32/Makefile.msc"))?;

        publish_file(&src.join("zlib.lib"), &slot.lib())?;
        publish_file(&src.join("zlib.pdb"), &slot.lib())?;
        publish_file(&src.join("zconf.h"), &slot.include())?;
        publish_file(&src.join("zlib.h"), &slot.include())?;
    } else {
        // zlib's configure reads the install prefix from the environment
        ctx.runner
            .run(&configure(ctx, &src).arg("--static").env("prefix", "out"))?;
        ctx.runner.run(&make(&src))?;
        ctx.runner.run(&make_install(&src))?;

        let out = src.join("out");
        publish_file(&out.join("include/zconf.h"), &slot.include())?;
        publish_file(&out.join("include/zlib.h"), &slot.include())?;
        publish_file(&out.join("lib/libz.a"), &slot.lib())?;
    }

    publish_file(&src.join("README"), &slot.dist())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_url_strips_version_dots() {
        assert_eq!(archive_url(Os::Windows), "https://zlib.net/zlib1211.zip");
    }

    #[test]
    fn test_unix_url_keeps_version() {
        assert_eq!(archive_url(Os::Linux), "https://zlib.net/zlib-1.2.11.tar.gz");
    }
}
