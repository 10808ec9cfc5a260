//! freetype: the font rasterizer
//!
//! Built self-contained: every optional dependency is disabled so the
//! static library has a predictable footprint. harfbuzz builds against
//! this slot afterwards.

use crate::recipe::{LibrarySpec, RecipeContext};
use crate::store::{publish_file, publish_tree};
use crate::Result;

use super::{configure, fetch_and_extract, make, make_install, out_prefix};

pub const SPEC: LibrarySpec = LibrarySpec {
    name: "freetype",
    version: "2.10.1",
    deps: &[],
    build,
};

const FILEBASE: &str = "freetype-2.10.1";
const URL: &str = "https://download.savannah.gnu.org/releases/freetype/freetype-2.10.1.tar.gz";

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
            .arg("--with-zlib=no")
            .arg("--with-bzip2=no")
            .arg("--with-png=no")
            .arg("--with-harfbuzz=no"),
    )?;
    ctx.runner.run(&make(&src))?;
    ctx.runner.run(&make_install(&src))?;

    let out = src.join("out");
    publish_tree(
        &out.join("include/freetype2"),
        &slot.include().join("freetype2"),
    )?;
    publish_file(&out.join("lib/libfreetype.a"), &slot.lib())?;
    publish_file(&src.join("docs/FTL.TXT"), &slot.dist())?;
    Ok(())
}
