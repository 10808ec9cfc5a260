//! libogg: the container format library
//!
//! Built before opusfile, which demuxes ogg streams.

use crate::recipe::{LibrarySpec, RecipeContext};
use crate::store::{publish_file, publish_tree};
use crate::Result;

use super::{configure, fetch_and_extract, make, make_install, out_prefix};

pub const SPEC: LibrarySpec = LibrarySpec {
    name: "libogg",
    version: "1.3.4",
    deps: &[],
    build,
};

const FILEBASE: &str = "libogg-1.3.4";
const URL: &str = "https://downloads.xiph.org/releases/ogg/libogg-1.3.4.tar.gz";

fn build(ctx: &RecipeContext) -> Result<()> {
    let store = ctx.store;
    store.clean_work_entry(FILEBASE)?;
    let src = store.work_path(FILEBASE);
    let slot = store.slot(ctx.variant, SPEC.name);

    fetch_and_extract(ctx, URL, &format!("{FILEBASE}.tar.gz"))?;

    let prefix = out_prefix(&src)?;
    ctx.runner.run(
        &configure(ctx, &src)
            .arg(format!("--prefix={}", prefix.display()))
            .arg("--disable-shared")
            .arg("--enable-static"),
    )?;
    ctx.runner.run(&make(&src))?;
    ctx.runner.run(&make_install(&src))?;

    let out = src.join("out");
    publish_tree(&out.join("include/ogg"), &slot.include().join("ogg"))?;
    publish_file(&out.join("lib/libogg.a"), &slot.lib())?;
    publish_file(&src.join("COPYING"), &slot.dist())?;
    Ok(())
}
