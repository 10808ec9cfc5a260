//! Source archive fetching and extraction

use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::{CoreError, Result};

/// Fetch a URL to the given path, skipping the download if the file exists
///
/// An existing file is trusted as-is unless a checksum is supplied; this is
/// what makes re-runs cheap after a failed build. When `expected_sha256` is
/// given the file content is verified either way. Callers that want the
/// historical permissive behavior pass `None`.
pub fn fetch_url(url: &str, dest: &Path, expected_sha256: Option<&str>) -> Result<()> {
    if dest.exists() {
        debug!("File '{}' exists, skipping download", dest.display());
        if let Some(expected) = expected_sha256 {
            verify_sha256(dest, expected)?;
        }
        return Ok(());
    }

    info!("Fetching {}", url);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let response = reqwest::blocking::get(url)?;
    let response = response.error_for_status()?;
    let bytes = response.bytes()?;

    if let Some(expected) = expected_sha256 {
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let actual = hex::encode(hasher.finalize());
        if actual != expected {
            return Err(CoreError::HashMismatch {
                path: dest.display().to_string(),
                expected: expected.to_string(),
                actual,
            });
        }
        debug!("Hash verified: {}", expected);
    }

    let mut file = File::create(dest)?;
    file.write_all(&bytes)?;

    info!("Downloaded to {}", dest.display());
    Ok(())
}

fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let actual = hex::encode(hasher.finalize());
    if actual != expected {
        return Err(CoreError::HashMismatch {
            path: path.display().to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Unpack an archive into the destination directory
///
/// Supports:
/// - `.tar.gz` / `.tgz` (including mirrors that serve the tarball wrapped in
///   a second gzip layer)
/// - `.tar`
/// - `.zip`
///
/// Entry paths are preserved: source archives carry their own top-level
/// directory and recipes address the extracted tree by that name. Extraction
/// is not transactional; a failed extraction leaves debris that the next
/// clean-slate deletion discards.
pub fn unpack_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    let path_str = archive_path
        .to_str()
        .ok_or_else(|| CoreError::UnsupportedArchive("non-UTF-8 archive path".to_string()))?;

    fs::create_dir_all(dest)?;

    if path_str.ends_with(".tar.gz") || path_str.ends_with(".tgz") {
        unpack_tar_gz(archive_path, dest)?;
    } else if path_str.ends_with(".tar") {
        unpack_tar(archive_path, dest)?;
    } else if path_str.ends_with(".zip") {
        unpack_zip(archive_path, dest)?;
    } else {
        return Err(CoreError::UnsupportedArchive(path_str.to_string()));
    }

    info!("Unpacked to {}", dest.display());
    Ok(())
}

fn unpack_tar_gz(archive_path: &Path, dest: &Path) -> Result<()> {
    let raw = fs::read(archive_path)?;
    let mut data = gunzip(&raw, archive_path)?;

    // Some release mirrors serve a gzip of the .tar.gz itself; unwrap the
    // second layer when the decompressed payload is again gzip
    if data.len() >= 2 && data[..2] == GZIP_MAGIC {
        debug!("'{}' is double-wrapped, decompressing again", archive_path.display());
        data = gunzip(&data, archive_path)?;
    }

    let mut archive = tar::Archive::new(&data[..]);
    archive.unpack(dest)?;
    Ok(())
}

fn gunzip(bytes: &[u8], archive_path: &Path) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| CoreError::Extract {
            archive: archive_path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(out)
}

fn unpack_tar(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = tar::Archive::new(std::io::BufReader::new(file));
    archive.unpack(dest)?;
    Ok(())
}

fn unpack_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(std::io::BufReader::new(file)).map_err(|e| CoreError::Extract {
            archive: archive_path.display().to_string(),
            message: format!("failed to open zip: {}", e),
        })?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(|e| CoreError::Extract {
            archive: archive_path.display().to_string(),
            message: format!("failed to read zip entry: {}", e),
        })?;

        let path = file.enclosed_name().ok_or_else(|| CoreError::Extract {
            archive: archive_path.display().to_string(),
            message: "invalid zip entry name".to_string(),
        })?;

        let dest_path = dest.join(&path);

        if file.is_dir() {
            fs::create_dir_all(&dest_path)?;
        } else {
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut outfile = File::create(&dest_path)?;
            std::io::copy(&mut file, &mut outfile)?;

            // Set executable bit on Unix if needed
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode))?;
                }
            }
        }
    }

    Ok(())
}
