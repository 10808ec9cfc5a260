//! Build recipes and the fixed registry
//!
//! One recipe per bundled library, all with the same shape: clean slate,
//! fetch, extract, patch, invoke the library's native build system, publish
//! into the slot. The registry order is the build order. Dependencies are
//! declared explicitly and the registry is validated at startup, so a
//! reordering that puts a dependent before its prerequisite is a
//! configuration error before any build begins, not a silent stale-header
//! build.

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use tracing::info;

use crate::Result;
use crate::config::BuildConfig;
use crate::error::CoreError;
use crate::recipes;
use crate::store::Store;
use crate::tool::ToolRunner;
use crate::variant::Variant;

/// Everything a recipe needs for one (platform, variant) invocation
pub struct RecipeContext<'a> {
    pub config: &'a BuildConfig,
    pub store: &'a Store,
    pub variant: &'a Variant,
    pub runner: &'a dyn ToolRunner,
}

/// Static metadata for one bundled library
#[derive(Debug, Clone, Copy)]
pub struct LibrarySpec {
    pub name: &'static str,
    pub version: &'static str,
    /// Prerequisites whose published slots this recipe reads
    pub deps: &'static [&'static str],
    pub build: fn(&RecipeContext) -> Result<()>,
}

/// The complete recipe list, in build order
///
/// Codec libraries precede the container library, the font library precedes
/// the text-shaping library; [`validate_registry`] enforces this shape.
static REGISTRY: &[LibrarySpec] = &[
    recipes::sdl2::SPEC,
    recipes::glm::SPEC,
    recipes::zlib::SPEC,
    recipes::libpng::SPEC,
    recipes::libogg::SPEC,
    recipes::opus::SPEC,
    recipes::opusfile::SPEC,
    recipes::freetype::SPEC,
    recipes::harfbuzz::SPEC,
];

pub fn registry() -> &'static [LibrarySpec] {
    REGISTRY
}

pub fn find_spec(name: &str) -> Option<&'static LibrarySpec> {
    REGISTRY.iter().find(|s| s.name == name)
}

/// Validate that a recipe list is dependency-consistent
///
/// Checks that every declared prerequisite exists, that the dependency graph
/// is acyclic, and that the list order is a topological order (prerequisites
/// strictly before dependents).
pub fn validate_registry(specs: &[LibrarySpec]) -> Result<()> {
    let mut graph = DiGraph::<&str, ()>::new();
    let mut nodes = BTreeMap::new();
    for spec in specs {
        nodes.insert(spec.name, graph.add_node(spec.name));
    }
    for spec in specs {
        for dep in spec.deps {
            let from = nodes.get(dep).ok_or_else(|| {
                CoreError::Registry(format!(
                    "'{}' depends on unknown library '{}'",
                    spec.name, dep
                ))
            })?;
            graph.add_edge(*from, nodes[spec.name], ());
        }
    }

    toposort(&graph, None).map_err(|cycle| {
        CoreError::Registry(format!(
            "dependency cycle involving '{}'",
            graph[cycle.node_id()]
        ))
    })?;

    for (i, spec) in specs.iter().enumerate() {
        for dep in spec.deps {
            let pos = specs
                .iter()
                .position(|s| s.name == *dep)
                .expect("checked above");
            if pos >= i {
                return Err(CoreError::Registry(format!(
                    "'{}' is listed before its prerequisite '{}'",
                    spec.name, dep
                )));
            }
        }
    }

    Ok(())
}

/// Run one recipe for one (platform, variant) pair
///
/// The slot is deleted first so a rerun after any failure starts clean;
/// recipes delete their own extracted source tree the same way.
pub fn run_recipe(spec: &LibrarySpec, ctx: &RecipeContext) -> Result<()> {
    let variant = ctx.variant.id.as_str();
    if variant.is_empty() {
        info!("Building {} {}", spec.name, spec.version);
    } else {
        info!("Building {} {} ({})", spec.name, spec.version, variant);
    }

    ctx.store.init()?;
    ctx.store.clean_slot(ctx.variant, spec.name)?;
    (spec.build)(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &RecipeContext) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_shipped_registry_is_valid() {
        validate_registry(registry()).unwrap();
    }

    #[test]
    fn test_registry_covers_expected_roster() {
        let names: Vec<_> = registry().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                "SDL2", "glm", "zlib", "libpng", "libogg", "opus", "opusfile", "freetype",
                "harfbuzz"
            ]
        );
    }

    #[test]
    fn test_dependent_before_prerequisite_is_rejected() {
        let specs = [
            LibrarySpec {
                name: "libpng",
                version: "1.6.37",
                deps: &["zlib"],
                build: noop,
            },
            LibrarySpec {
                name: "zlib",
                version: "1.2.11",
                deps: &[],
                build: noop,
            },
        ];
        let err = validate_registry(&specs).unwrap_err();
        match err {
            CoreError::Registry(msg) => assert!(msg.contains("prerequisite 'zlib'")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_dependency_is_rejected() {
        let specs = [LibrarySpec {
            name: "libpng",
            version: "1.6.37",
            deps: &["zlib"],
            build: noop,
        }];
        assert!(matches!(
            validate_registry(&specs),
            Err(CoreError::Registry(_))
        ));
    }

    #[test]
    fn test_dependency_cycle_is_rejected() {
        let specs = [
            LibrarySpec {
                name: "a",
                version: "1",
                deps: &["b"],
                build: noop,
            },
            LibrarySpec {
                name: "b",
                version: "1",
                deps: &["a"],
                build: noop,
            },
        ];
        let err = validate_registry(&specs).unwrap_err();
        match err {
            CoreError::Registry(msg) => assert!(msg.contains("cycle")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
