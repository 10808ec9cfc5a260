//! opusfile: ogg demuxing and opus decoding in one library
//!
//! Depends on the libogg and opus slots for the current variant. Its
//! configure script takes dependency locations through DEPS_CFLAGS and
//! DEPS_LIBS rather than pkg-config, which suits the wiring here.

use crate::recipe::{LibrarySpec, RecipeContext};
use crate::store::{publish_file, publish_tree};
use crate::wiring::{include_flags, lib_flags, wire};
use crate::Result;

use super::{configure, fetch_and_extract, make, make_install, out_prefix};

pub const SPEC: LibrarySpec = LibrarySpec {
    name: "opusfile",
    version: "0.11",
    deps: &["libogg", "opus"],
    build,
};

const FILEBASE: &str = "opusfile-0.11";
const URL: &str = "https://downloads.xiph.org/releases/opus/opusfile-0.11.tar.gz";

fn build(ctx: &RecipeContext) -> Result<()> {
    let store = ctx.store;
    store.clean_work_entry(FILEBASE)?;
    let src = store.work_path(FILEBASE);
    let slot = store.slot(ctx.variant, SPEC.name);

    fetch_and_extract(ctx, URL, &format!("{FILEBASE}.tar.gz"))?;

    let deps = wire(store, ctx.variant, SPEC.deps)?;

    // opus installs its headers under include/opus, and opusfile includes
    // them unprefixed, so that subdirectory goes on the search path too
    let mut deps_cflags = include_flags(&deps);
    if let Some(opus) = deps.iter().find(|d| d.library == "opus") {
        deps_cflags.push_str(&format!(" -I{}/opus", opus.include.display()));
    }
    let deps_libs = format!("{} -logg -lopus", lib_flags(&deps));

    let prefix = out_prefix(&src)?;
    ctx.runner.run(
        &configure(ctx, &src)
            .arg(format!("--prefix={}", prefix.display()))
            .arg("--disable-shared")
            .arg("--enable-static")
            .arg("--disable-http")
            .arg("--disable-examples")
            .arg("--disable-doc")
            .env("DEPS_CFLAGS", deps_cflags)
            .env("DEPS_LIBS", deps_libs),
    )?;
    ctx.runner.run(&make(&src))?;
    ctx.runner.run(&make_install(&src))?;

    let out = src.join("out");
    publish_tree(&out.join("include/opus"), &slot.include().join("opus"))?;
    publish_file(&out.join("lib/libopusfile.a"), &slot.lib())?;
    publish_file(&src.join("COPYING"), &slot.dist())?;
    Ok(())
}
