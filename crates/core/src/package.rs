//! Final distribution packaging
//!
//! Enumerates the published platform tree (a directory walk, never a
//! hard-coded list), adds the top-level readme and a freshly written version
//! marker, and writes one archive rooted under [`PACKAGE_PREFIX`]: a zip on
//! Windows, a tar.gz elsewhere.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

use crate::Result;
use crate::error::CoreError;
use crate::store::Store;

/// Top-level directory name inside the archive, and the archive name stem
pub const PACKAGE_PREFIX: &str = "depot";

/// Name of the version marker file written at packaging time
pub const VERSION_FILE: &str = "version.txt";

/// Package the published tree for the store's platform
///
/// Returns the path of the archive written into the tree root.
pub fn package(store: &Store, tag: &str) -> Result<PathBuf> {
    let os = store.os();
    let root = &store.paths().root;
    let tree = store.merged_tree();
    if !tree.is_dir() {
        return Err(CoreError::MissingArtifact(tree));
    }

    let readme = root.join("README.md");
    if !readme.is_file() {
        return Err(CoreError::MissingArtifact(readme));
    }

    let version_file = root.join(VERSION_FILE);
    fs::write(&version_file, format!("{}\n", tag))?;

    // (absolute source, path inside the archive)
    let mut files: Vec<(PathBuf, String)> = vec![
        (readme, format!("{}/README.md", PACKAGE_PREFIX)),
        (version_file, format!("{}/{}", PACKAGE_PREFIX, VERSION_FILE)),
    ];

    let tree_name = os.as_str();
    for entry in WalkDir::new(&tree).sort_by_file_name() {
        let entry = entry.map_err(|e| CoreError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(&tree)
            .map_err(|_| CoreError::MissingArtifact(entry.path().to_path_buf()))?;
        files.push((
            entry.path().to_path_buf(),
            format!("{}/{}/{}", PACKAGE_PREFIX, tree_name, rel.display()),
        ));
    }

    let archive_name = format!(
        "{}-{}-{}.{}",
        PACKAGE_PREFIX,
        tree_name,
        tag,
        os.package_ext()
    );
    let dest = root.join(&archive_name);

    info!("Packaging {} file(s) into {}", files.len(), dest.display());
    if os.is_windows() {
        write_zip(&dest, &files)?;
    } else {
        write_tar_gz(&dest, &files)?;
    }

    Ok(dest)
}

fn write_tar_gz(dest: &Path, files: &[(PathBuf, String)]) -> Result<()> {
    let file = File::create(dest)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (src, name) in files {
        builder.append_path_with_name(src, name)?;
    }
    builder.into_inner()?.finish()?;
    Ok(())
}

fn write_zip(dest: &Path, files: &[(PathBuf, String)]) -> Result<()> {
    use zip::write::SimpleFileOptions;

    let file = File::create(dest)?;
    let mut writer = zip::ZipWriter::new(file);
    for (src, name) in files {
        writer
            .start_file(name.as_str(), SimpleFileOptions::default())
            .map_err(|e| CoreError::Package(format!("failed to start '{}': {}", name, e)))?;
        let mut reader = File::open(src)?;
        std::io::copy(&mut reader, &mut writer)?;
    }
    writer
        .finish()
        .map_err(|e| CoreError::Package(format!("failed to finish zip: {}", e)))?;
    Ok(())
}
