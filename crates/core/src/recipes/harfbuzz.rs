//! harfbuzz: the text shaper, built against the published freetype slot
//!
//! Everything besides the freetype integration is switched off; the shaper
//! is consumed as a static library next to freetype's.

use crate::recipe::{LibrarySpec, RecipeContext};
use crate::store::{publish_file, publish_tree};
use crate::wiring::wire;
use crate::Result;

use super::{configure, fetch_and_extract, make, make_install, out_prefix};

pub const SPEC: LibrarySpec = LibrarySpec {
    name: "harfbuzz",
    version: "2.6.4",
    deps: &["freetype"],
    build,
};

const FILEBASE: &str = "harfbuzz-2.6.4";
const URL: &str = "https://github.com/harfbuzz/harfbuzz/archive/refs/tags/2.6.4.tar.gz";

fn build(ctx: &RecipeContext) -> Result<()> {
    let store = ctx.store;
    store.clean_work_entry(FILEBASE)?;
    let src = store.work_path(FILEBASE);
    let slot = store.slot(ctx.variant, SPEC.name);

    fetch_and_extract(ctx, URL, &format!("{FILEBASE}.tar.gz"))?;

    let deps = wire(store, ctx.variant, SPEC.deps)?;
    let freetype = &deps[0];
    let freetype_cflags = format!("-I{}/freetype2", freetype.include.display());
    let freetype_libs = format!("-L{} -lfreetype", freetype.lib.display());

    let prefix = out_prefix(&src)?;
    ctx.runner.run(
        &configure(ctx, &src)
            .arg(format!("--prefix={}", prefix.display()))
            .arg("--disable-shared")
            .arg("--enable-static")
            .arg("--with-freetype=yes")
            .arg("--with-glib=no")
            .arg("--with-gobject=no")
            .arg("--with-cairo=no")
            .arg("--with-fontconfig=no")
            .arg("--with-icu=no")
            .env("FREETYPE_CFLAGS", freetype_cflags)
            .env("FREETYPE_LIBS", freetype_libs),
    )?;
    ctx.runner.run(&make(&src))?;
    ctx.runner.run(&make_install(&src))?;

    let out = src.join("out");
    publish_tree(
        &out.join("include/harfbuzz"),
        &slot.include().join("harfbuzz"),
    )?;
    publish_file(&out.join("lib/libharfbuzz.a"), &slot.lib())?;
    publish_file(&src.join("COPYING"), &slot.dist())?;
    Ok(())
}
