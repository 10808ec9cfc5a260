//! End-to-end pipeline tests with stubbed external tools.
//!
//! Every source archive is pre-seeded into the workspace (the fetcher skips
//! existing files, so nothing touches the network) and a scripted runner
//! stands in for configure/make/lipo, writing the install trees a real build
//! would produce. What stays real: extraction, patching, wiring validation,
//! publishing, merging, and packaging.

#![cfg(unix)]

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use depot_core::config::BuildConfig;
use depot_core::dispatch::dispatch;
use depot_core::error::CoreError;
use depot_core::tool::{ToolCommand, ToolRunner};
use depot_core::{Result, Store, Variant};
use depot_platform::{DepotPaths, Os};

/// Stands in for every external build tool. `make install` writes the
/// install tree a real build would have produced for the library inferred
/// from the working directory; everything else succeeds silently.
struct StubToolRunner;

impl ToolRunner for StubToolRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<()> {
        if cmd.program == "make" && cmd.args == ["install"] {
            let src_dir = source_dir(&cmd.cwd);
            write_install_tree(&src_dir);
        }
        if cmd.program == "lipo" {
            let pos = cmd.args.iter().position(|a| a == "-output").unwrap();
            fs::write(&cmd.args[pos + 1], b"fat\n").unwrap();
        }
        Ok(())
    }
}

/// SDL2 configures out-of-tree in `<src>/build`; everything else in `<src>`
fn source_dir(cwd: &Path) -> PathBuf {
    if cwd.file_name().is_some_and(|n| n == "build") {
        cwd.parent().unwrap().to_path_buf()
    } else {
        cwd.to_path_buf()
    }
}

fn write_install_tree(src_dir: &Path) {
    let name = src_dir.file_name().unwrap().to_str().unwrap();
    let out = src_dir.join("out");
    let files: &[&str] = match name {
        "SDL2-2.0.10" => &[
            "lib/libSDL2.a",
            "lib/libSDL2main.a",
            "include/SDL2/SDL.h",
            "bin/sdl2-config",
        ],
        "zlib-1.2.11" => &["include/zconf.h", "include/zlib.h", "lib/libz.a"],
        "libpng-1.6.37" => &[
            "include/libpng16/png.h",
            "include/libpng16/pngconf.h",
            "include/libpng16/pnglibconf.h",
            "lib/libpng16.a",
        ],
        "libogg-1.3.4" => &["include/ogg/ogg.h", "lib/libogg.a"],
        "opus-1.3.1" => &["include/opus/opus.h", "lib/libopus.a"],
        "opusfile-0.11" => &["include/opus/opusfile.h", "lib/libopusfile.a"],
        "freetype-2.10.1" => &["include/freetype2/ft2build.h", "lib/libfreetype.a"],
        "harfbuzz-2.6.4" => &["include/harfbuzz/hb.h", "lib/libharfbuzz.a"],
        other => panic!("stub has no install tree for '{other}'"),
    };
    for rel in files {
        let path = out.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        if rel.ends_with("sdl2-config") {
            fs::write(&path, "#!/bin/sh\nprefix=/stub/out\nexec_prefix=${prefix}\n").unwrap();
        } else {
            fs::write(&path, "stub\n").unwrap();
        }
    }
}

fn write_tar_gz(dest: &Path, entries: &[(&str, &str)]) {
    let mut builder = tar::Builder::new(GzEncoder::new(
        File::create(dest).unwrap(),
        Compression::default(),
    ));
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

fn write_zip(dest: &Path, entries: &[(&str, &str)]) {
    use zip::write::SimpleFileOptions;
    let mut writer = zip::ZipWriter::new(File::create(dest).unwrap());
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

/// Seed every library's source archive into `work/`; the fetcher will skip
/// the download because the files exist.
fn seed_archives(work: &Path) {
    fs::create_dir_all(work).unwrap();
    write_tar_gz(
        &work.join("SDL2-2.0.10.tar.gz"),
        &[
            ("SDL2-2.0.10/README-SDL.txt", "SDL license\n"),
            ("SDL2-2.0.10/configure", "#!/bin/sh\n"),
        ],
    );
    write_zip(
        &work.join("glm-0.9.9.5.zip"),
        &[
            ("glm/glm/glm.hpp", "#pragma once\n"),
            ("glm/copying.txt", "glm license\n"),
        ],
    );
    write_tar_gz(
        &work.join("zlib-1.2.11.tar.gz"),
        &[("zlib-1.2.11/README", "zlib license\n")],
    );
    write_tar_gz(
        &work.join("libpng-1.6.37.tar.gz"),
        &[("libpng-1.6.37/LICENSE", "libpng license\n")],
    );
    write_tar_gz(
        &work.join("libogg-1.3.4.tar.gz"),
        &[("libogg-1.3.4/COPYING", "ogg license\n")],
    );
    write_tar_gz(
        &work.join("opus-1.3.1.tar.gz"),
        &[("opus-1.3.1/COPYING", "opus license\n")],
    );
    write_tar_gz(
        &work.join("opusfile-0.11.tar.gz"),
        &[("opusfile-0.11/COPYING", "opusfile license\n")],
    );
    write_tar_gz(
        &work.join("freetype-2.10.1.tar.gz"),
        &[("freetype-2.10.1/docs/FTL.TXT", "freetype license\n")],
    );
    write_tar_gz(
        &work.join("harfbuzz-2.6.4.tar.gz"),
        &[("harfbuzz-2.6.4/COPYING", "harfbuzz license\n")],
    );
}

fn test_config(root: &Path) -> BuildConfig {
    BuildConfig::new(Os::current(), DepotPaths::from_root(root), "test-tag")
}

fn tokens(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Relative paths of every file under a directory.
fn walk_files(dir: &Path) -> BTreeSet<String> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .display()
                .to_string()
        })
        .collect()
}

/// Map of relative path to content for every file under a directory.
fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().display().to_string();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn all_package_builds_and_archives_everything() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());
    seed_archives(&config.paths.work);
    fs::write(temp.path().join("README.md"), "# bundled libraries\n").unwrap();

    dispatch(&tokens(&["all", "package"]), &config, &StubToolRunner).unwrap();

    let os = Os::current();
    let store = Store::new(os, config.paths.clone());
    let tree = store.merged_tree();

    // every library published the conventional slots
    assert!(tree.join("SDL2/lib/libSDL2.a").is_file());
    assert!(tree.join("SDL2/dist/README-SDL.txt").is_file());
    assert!(tree.join("glm/include/glm/glm.hpp").is_file());
    assert!(tree.join("zlib/include/zlib.h").is_file());
    assert!(tree.join("libpng/lib/libpng.a").is_file());
    assert!(tree.join("libpng/lib/libpng16.a").is_file());
    assert!(tree.join("libogg/lib/libogg.a").is_file());
    assert!(tree.join("opus/lib/libopus.a").is_file());
    assert!(tree.join("opusfile/lib/libopusfile.a").is_file());
    assert!(tree.join("freetype/include/freetype2/ft2build.h").is_file());
    assert!(tree.join("harfbuzz/lib/libharfbuzz.a").is_file());

    // the published sdl2-config was retargeted at the unpacked release
    let sdl2_config = fs::read_to_string(tree.join("SDL2/bin/sdl2-config")).unwrap();
    assert!(sdl2_config.contains(&format!("prefix=../depot/{}/SDL2", os)));
    assert!(!sdl2_config.contains("/stub/out"));

    // exactly one archive, named with platform and tag
    let archive = temp
        .path()
        .join(format!("depot-{}-test-tag.{}", os, os.package_ext()));
    assert!(archive.is_file(), "missing {}", archive.display());

    // the archive's file list equals the walked tree plus readme and marker
    let mut expected: BTreeSet<String> = walk_files(&tree)
        .into_iter()
        .map(|rel| format!("depot/{}/{}", os, rel))
        .collect();
    expected.insert("depot/README.md".to_string());
    expected.insert("depot/version.txt".to_string());

    let mut tar = tar::Archive::new(GzDecoder::new(File::open(&archive).unwrap()));
    let actual: BTreeSet<String> = tar
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().display().to_string())
        .collect();
    assert_eq!(actual, expected);

    assert_eq!(
        fs::read_to_string(temp.path().join("version.txt")).unwrap(),
        "test-tag\n"
    );
}

#[test]
fn rerunning_a_recipe_reproduces_the_slot_exactly() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());
    seed_archives(&config.paths.work);

    let store = Store::new(Os::current(), config.paths.clone());
    let variants = Variant::resolve(Os::current());
    let slot_root = store.variant_tree(&variants[0]).join("zlib");

    dispatch(&tokens(&["zlib"]), &config, &StubToolRunner).unwrap();
    let first = snapshot(&slot_root);
    assert!(!first.is_empty());

    dispatch(&tokens(&["zlib"]), &config, &StubToolRunner).unwrap();
    let second = snapshot(&slot_root);

    assert_eq!(first, second);
}

#[test]
fn dependent_without_published_prerequisite_fails_loudly() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());
    seed_archives(&config.paths.work);

    let err = dispatch(&tokens(&["opusfile"]), &config, &StubToolRunner).unwrap_err();
    match err {
        CoreError::MissingPrerequisite { library, .. } => {
            assert_eq!(library, "libogg");
        }
        other => panic!("unexpected error: {other}"),
    }

    // nothing was published for the dependent either
    let store = Store::new(Os::current(), config.paths.clone());
    assert!(!store.merged_tree().join("opusfile").exists());
}

#[test]
fn prerequisite_from_a_previous_run_satisfies_wiring() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());
    seed_archives(&config.paths.work);

    dispatch(&tokens(&["libogg", "opus"]), &config, &StubToolRunner).unwrap();
    // separate invocation, prerequisites already on disk
    dispatch(&tokens(&["opusfile"]), &config, &StubToolRunner).unwrap();

    let store = Store::new(Os::current(), config.paths.clone());
    let variants = Variant::resolve(Os::current());
    assert!(
        store
            .variant_tree(&variants[0])
            .join("opusfile/lib/libopusfile.a")
            .is_file()
    );
}

#[test]
fn empty_token_list_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());

    dispatch(&[], &config, &StubToolRunner).unwrap();
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}
