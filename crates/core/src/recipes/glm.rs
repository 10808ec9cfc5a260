//! glm: header-only math library
//!
//! Nothing to compile; fetch, extract, and copy the headers.

use crate::recipe::{LibrarySpec, RecipeContext};
use crate::store::{publish_file, publish_tree};
use crate::Result;

use super::fetch_and_extract;

pub const SPEC: LibrarySpec = LibrarySpec {
    name: "glm",
    version: "0.9.9.5",
    deps: &[],
    build,
};

const FILEBASE: &str = "glm-0.9.9.5";
const URL: &str = "https://github.com/g-truc/glm/releases/download/0.9.9.5/glm-0.9.9.5.zip";

fn build(ctx: &RecipeContext) -> Result<()> {
    let store = ctx.store;
    // the zip extracts to work/glm, not work/glm-<version>
    store.clean_work_entry("glm")?;
    let slot = store.slot(ctx.variant, SPEC.name);

    // releases are zip-only, on every platform
    fetch_and_extract(ctx, URL, &format!("{FILEBASE}.zip"))?;

    let src = store.work_path("glm");
    publish_tree(&src.join("glm"), &slot.include().join("glm"))?;
    publish_file(&src.join("copying.txt"), &slot.dist())?;
    Ok(())
}
