//! libpng: the image codec, built against the published zlib slot
//!
//! The first recipe with dependency wiring. On Unix the zlib paths are
//! injected through CPPFLAGS/LDFLAGS; on Windows the vendored MSVC makefile
//! is text-patched to the same locations before nmake runs.

use std::fs;

use depot_platform::Os;

use crate::patch::apply_patch;
use crate::recipe::{LibrarySpec, RecipeContext};
use crate::store::publish_file;
use crate::tool::ToolCommand;
use crate::wiring::{include_flags, lib_flags, wire};
use crate::Result;

use super::{base_env, fetch_and_extract, make, make_install, out_prefix, patches};

pub const SPEC: LibrarySpec = LibrarySpec {
    name: "libpng",
    version: "1.6.37",
    deps: &["zlib"],
    build,
};

fn filebase(os: Os) -> &'static str {
    if os.is_windows() { "lpng1637" } else { "libpng-1.6.37" }
}

fn build(ctx: &RecipeContext) -> Result<()> {
    let os = ctx.config.os;
    let store = ctx.store;
    let filebase = filebase(os);
    store.clean_work_entry(filebase)?;
    let src = store.work_path(filebase);
    let slot = store.slot(ctx.variant, SPEC.name);

    let ext = os.archive_ext();
    let url = format!("http://prdownloads.sourceforge.net/libpng/{filebase}.{ext}?download");
    fetch_and_extract(ctx, &url, &format!("{filebase}.{ext}"))?;

    // Validate the zlib slot before any tool runs, on every platform; the
    // Windows makefile patch encodes the same locations as relative paths
    let deps = wire(store, ctx.variant, SPEC.deps)?;

    for patch in patches::patch_set(SPEC.name, SPEC.version, os) {
        apply_patch(&src, patch)?;
    }

    if os.is_windows() {
        ctx.runner.run(
            &ToolCommand::new("nmake", &src)
                .arg("-f")
                .arg("scripts/makefile.vcwin32"),
        )?;

        publish_file(&src.join("libpng.lib"), &slot.lib())?;
        publish_file(&src.join("png.h"), &slot.include())?;
        publish_file(&src.join("pngconf.h"), &slot.include())?;
        publish_file(&src.join("pnglibconf.h"), &slot.include())?;
    } else {
        let prefix = out_prefix(&src)?;
        let mut env = base_env(ctx.variant);
        env.insert("CPPFLAGS".to_string(), include_flags(&deps));
        let ldflags = format!(
            "{} {}",
            lib_flags(&deps),
            ctx.variant.compiler_flags_joined()
        );
        env.insert("LDFLAGS".to_string(), ldflags.trim().to_string());

        ctx.runner.run(
            &ToolCommand::new("./configure", &src)
                .arg(format!("--prefix={}", prefix.display()))
                .arg("--disable-shared")
                .args(ctx.variant.configure_flags.iter().cloned())
                .envs(&env),
        )?;
        ctx.runner.run(&make(&src))?;
        ctx.runner.run(&make_install(&src))?;

        let out = src.join("out");
        let headers = out.join("include/libpng16");
        publish_file(&headers.join("png.h"), &slot.include())?;
        publish_file(&headers.join("pngconf.h"), &slot.include())?;
        publish_file(&headers.join("pnglibconf.h"), &slot.include())?;
        let lib = publish_file(&out.join("lib/libpng16.a"), &slot.lib())?;
        // alias kept as a plain copy so downstream stays a simple file walk
        fs::copy(&lib, slot.lib().join("libpng.a"))?;
    }

    publish_file(&src.join("LICENSE"), &slot.dist())?;
    Ok(())
}
