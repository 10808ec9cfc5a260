//! Merging per-architecture output trees into one universal tree
//!
//! Invoked only on platforms that build more than one variant. Modelled as
//! classify-then-apply: every relative path in the union of the variant
//! trees gets a [`MergeAction`], then the action is applied into the merged
//! tree. A pair that cannot be merged safely aborts packaging; silently
//! picking one variant's file would ship a mismatched library on the other
//! architecture.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::Result;
use crate::error::CoreError;
use crate::store::{Store, remove_path};
use crate::tool::{ToolCommand, ToolRunner};
use crate::variant::Variant;

/// File names excluded from merging entirely (per-platform debris)
const MERGE_EXCLUDE: &[&str] = &[".DS_Store"];

const ARM_GUARD: &str = "#if defined(__aarch64__)";
const ELSE_GUARD: &str = "#else";
const END_GUARD: &str = "#endif";

/// How one relative path is merged across variant trees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// Bytewise identical in every variant: copy the reference file
    CopyIdentical,
    /// Static libraries and bin/ artifacts: combine with the fat-binary tool
    CombineBinaries,
    /// Text that differs: both bodies under architecture guards, first
    /// variant (arm) first
    GuardText,
}

/// Decide how the bodies found at one relative path merge
pub fn classify(rel: &Path, bodies: &[Vec<u8>]) -> Result<MergeAction> {
    if bodies.windows(2).all(|w| w[0] == w[1]) {
        return Ok(MergeAction::CopyIdentical);
    }
    if is_binary_artifact(rel) {
        return Ok(MergeAction::CombineBinaries);
    }
    if bodies.len() == 2 && bodies.iter().all(|b| std::str::from_utf8(b).is_ok()) {
        return Ok(MergeAction::GuardText);
    }
    Err(CoreError::MergeConflict {
        path: rel.display().to_string(),
        message: "files differ and are neither static libraries nor mergeable text".to_string(),
    })
}

/// Static libraries and anything published under a bin/ slot are combined
/// into fat binaries rather than diffed
fn is_binary_artifact(rel: &Path) -> bool {
    if rel
        .extension()
        .is_some_and(|ext| ext == "a" || ext == "lib")
    {
        return true;
    }
    rel.components().any(|c| c.as_os_str() == "bin")
}

/// Merge every variant tree into the unqualified platform tree
pub fn merge_variants(store: &Store, variants: &[Variant], runner: &dyn ToolRunner) -> Result<()> {
    if variants.len() < 2 {
        return Ok(());
    }

    let trees: Vec<(&'static str, PathBuf)> = variants
        .iter()
        .map(|v| (v.id.as_str(), store.variant_tree(v)))
        .collect();
    let merged = store.merged_tree();
    remove_path(&merged)?;
    info!("Merging {} variant trees into {}", trees.len(), merged.display());

    // union of relative paths; a path present in only one tree is caught below
    let mut rels: BTreeSet<PathBuf> = BTreeSet::new();
    for (_, tree) in &trees {
        if !tree.is_dir() {
            return Err(CoreError::MissingArtifact(tree.clone()));
        }
        for entry in WalkDir::new(tree) {
            let entry = entry.map_err(|e| CoreError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry
                .file_name()
                .to_str()
                .is_some_and(|name| MERGE_EXCLUDE.contains(&name))
            {
                debug!("Excluding {} from merge", entry.path().display());
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(tree)
                .map_err(|_| CoreError::MissingArtifact(entry.path().to_path_buf()))?;
            rels.insert(rel.to_path_buf());
        }
    }

    for rel in &rels {
        let sources: Vec<PathBuf> = trees.iter().map(|(_, tree)| tree.join(rel)).collect();

        for ((name, _), src) in trees.iter().zip(&sources) {
            if !src.is_file() {
                return Err(CoreError::MergeConflict {
                    path: rel.display().to_string(),
                    message: format!("missing from the '{}' variant tree", name),
                });
            }
        }

        let bodies = sources
            .iter()
            .map(|src| fs::read(src).map_err(CoreError::Io))
            .collect::<Result<Vec<_>>>()?;

        let dest = merged.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        match classify(rel, &bodies)? {
            MergeAction::CopyIdentical => {
                fs::copy(&sources[0], &dest)?;
            }
            MergeAction::CombineBinaries => {
                debug!("Combining {} into a fat binary", rel.display());
                let mut cmd =
                    ToolCommand::new("lipo", store.paths().root.clone()).arg("-create");
                for src in &sources {
                    cmd = cmd.arg(src.display().to_string());
                }
                cmd = cmd.arg("-output").arg(dest.display().to_string());
                runner.run(&cmd)?;
            }
            MergeAction::GuardText => {
                let first = String::from_utf8_lossy(&bodies[0]);
                let second = String::from_utf8_lossy(&bodies[1]);
                fs::write(&dest, guard_merge(&first, &second))?;
            }
        }
    }

    Ok(())
}

/// Both bodies in one file, selected by an architecture guard
fn guard_merge(arm_body: &str, x86_body: &str) -> String {
    let mut out = String::with_capacity(arm_body.len() + x86_body.len() + 64);
    out.push_str(ARM_GUARD);
    out.push('\n');
    out.push_str(arm_body);
    if !arm_body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(ELSE_GUARD);
    out.push('\n');
    out.push_str(x86_body);
    if !x86_body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(END_GUARD);
    out.push('\n');
    out
}
