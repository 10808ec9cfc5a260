//! opus: the audio codec

use crate::recipe::{LibrarySpec, RecipeContext};
use crate::store::{publish_file, publish_tree};
use crate::Result;

use super::{configure, fetch_and_extract, make, make_install, out_prefix};

pub const SPEC: LibrarySpec = LibrarySpec {
    name: "opus",
    version: "1.3.1",
    deps: &[],
    build,
};

const FILEBASE: &str = "opus-1.3.1";
const URL: &str = "https://archive.mozilla.org/pub/opus/opus-1.3.1.tar.gz";

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
            .arg("--enable-static")
            .arg("--disable-doc")
            .arg("--disable-extra-programs"),
    )?;
    ctx.runner.run(&make(&src))?;
    ctx.runner.run(&make_install(&src))?;

    let out = src.join("out");
    publish_tree(&out.join("include/opus"), &slot.include().join("opus"))?;
    publish_file(&out.join("lib/libopus.a"), &slot.lib())?;
    publish_file(&src.join("COPYING"), &slot.dist())?;
    Ok(())
}
