//! Command dispatch
//!
//! Maps CLI tokens onto recipe invocations. `all` expands to the full
//! registry; `package` appends merging (on multi-variant platforms) and
//! packaging after whatever builds were requested. Selected libraries
//! always run in registry order, so `depot libpng zlib` still builds zlib
//! first. Unknown tokens are warned about and ignored.

use tracing::{info, warn};

use crate::Result;
use crate::config::BuildConfig;
use crate::merge;
use crate::package;
use crate::recipe::{self, LibrarySpec, RecipeContext};
use crate::store::Store;
use crate::tool::ToolRunner;
use crate::variant::Variant;

/// Convenience token expanding to the complete registry
pub const ALL_TOKEN: &str = "all";

/// Token requesting the packager after the requested builds
pub const PACKAGE_TOKEN: &str = "package";

/// What one set of CLI tokens asks for
#[derive(Debug)]
pub struct Selection {
    /// Selected recipes, in registry (build) order
    pub specs: Vec<&'static LibrarySpec>,
    pub package: bool,
}

/// Resolve tokens against the registry
pub fn select(tokens: &[String]) -> Selection {
    let registry = recipe::registry();
    let mut package = false;
    let mut wanted: Vec<&str> = Vec::new();

    for token in tokens {
        match token.as_str() {
            ALL_TOKEN => wanted.extend(registry.iter().map(|s| s.name)),
            PACKAGE_TOKEN => package = true,
            other if recipe::find_spec(other).is_some() => wanted.push(other),
            other => warn!("Ignoring unknown target '{}'", other),
        }
    }

    let specs = registry
        .iter()
        .filter(|s| wanted.contains(&s.name))
        .collect();

    Selection { specs, package }
}

/// Run the requested recipes and, if asked, merge and package the result
///
/// A prerequisite that is *not* part of the selection is allowed as long as
/// its slot is already published from a previous run; the dependency wiring
/// validates that on disk before the dependent build starts.
pub fn dispatch(tokens: &[String], config: &BuildConfig, runner: &dyn ToolRunner) -> Result<()> {
    recipe::validate_registry(recipe::registry())?;

    let selection = select(tokens);
    if selection.specs.is_empty() && !selection.package {
        info!("Nothing selected, nothing to do");
        return Ok(());
    }

    let store = Store::new(config.os, config.paths.clone());
    let variants = Variant::resolve(config.os);

    for spec in &selection.specs {
        for variant in &variants {
            let ctx = RecipeContext {
                config,
                store: &store,
                variant,
                runner,
            };
            recipe::run_recipe(spec, &ctx)?;
        }
    }

    if selection.package {
        if variants.len() > 1 {
            merge::merge_variants(&store, &variants, runner)?;
        }
        let archive = package::package(&store, &config.tag)?;
        info!("Wrote {}", archive.display());
    }

    Ok(())
}
