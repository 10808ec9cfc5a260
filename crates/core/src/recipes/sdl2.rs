//! SDL2: the multimedia/windowing library
//!
//! The largest recipe: out-of-tree configure build on Unix, solution build
//! on Windows, and a published `sdl2-config` script whose install prefix is
//! rewritten to resolve relative to the unpacked release.

use std::fs;
use std::path::Path;

use depot_platform::Os;

use crate::package::PACKAGE_PREFIX;
use crate::recipe::{LibrarySpec, RecipeContext};
use crate::store::{publish_file, publish_tree};
use crate::tool::ToolCommand;
use crate::{CoreError, Result};

use super::{base_env, fetch_and_extract, make, make_install, out_prefix};

pub const SPEC: LibrarySpec = LibrarySpec {
    name: "SDL2",
    version: "2.0.10",
    deps: &[],
    build,
};

const FILEBASE: &str = "SDL2-2.0.10";
const URL_BASE: &str = "https://www.libsdl.org/release/SDL2-2.0.10";

/// Feature set trimmed to what bundled applications actually link against
const CONFIGURE_FLAGS: &[&str] = &[
    "--disable-shared",
    "--enable-static",
    "--disable-render",
    "--disable-haptic",
    "--disable-file",
    "--disable-filesystem",
    "--disable-loadso",
    "--disable-power",
    "--enable-sse2",
    "--enable-alsa",
    "--disable-oss",
    "--disable-esd",
    "--disable-pulseaudio",
    "--disable-arts",
    "--disable-nas",
    "--disable-diskaudio",
    "--disable-dummyaudio",
    "--disable-sndio",
    "--enable-video-x11",
    "--disable-video-cocoa",
    "--disable-video-directfb",
    "--disable-video-vulkan",
    "--disable-video-dummy",
    "--enable-video-opengl",
    "--disable-video-opengles",
    "--disable-input-tslib",
    "--enable-pthreads",
    "--enable-pthread-sem",
    "--disable-directx",
    "--enable-sdl-dlopen",
];

fn build(ctx: &RecipeContext) -> Result<()> {
    let store = ctx.store;
    store.clean_work_entry(FILEBASE)?;
    let src = store.work_path(FILEBASE);
    let slot = store.slot(ctx.variant, SPEC.name);

    let ext = ctx.config.os.archive_ext();
    fetch_and_extract(ctx, &format!("{URL_BASE}.{ext}"), &format!("{FILEBASE}.{ext}"))?;

    if ctx.config.os.is_windows() {
        let vc_dir = src.join("VisualC");
        ctx.runner.run(
            &ToolCommand::new("msbuild", &vc_dir)
                .arg("SDL.sln")
                .arg("/p:PlatformToolset=v142,Configuration=Release,Platform=x64")
                .arg("/t:SDL2,SDL2main"),
        )?;

        let release = vc_dir.join("x64/Release");
        publish_file(&release.join("SDL2.lib"), &slot.lib())?;
        publish_file(&release.join("SDL2main.lib"), &slot.lib())?;
        publish_file(&release.join("SDL2.dll"), &slot.dist())?;
        publish_tree(&src.join("include"), &slot.include())?;
    } else {
        let build_dir = src.join("build");
        fs::create_dir_all(&build_dir)?;
        let prefix = out_prefix(&src)?;

        ctx.runner.run(
            &ToolCommand::new("../configure", &build_dir)
                .arg(format!("--prefix={}", prefix.display()))
                .args(CONFIGURE_FLAGS.iter().copied())
                .args(ctx.variant.configure_flags.iter().cloned())
                .envs(&base_env(ctx.variant)),
        )?;
        ctx.runner.run(&make(&build_dir))?;
        ctx.runner.run(&make_install(&build_dir))?;

        let out = src.join("out");
        publish_file(&out.join("lib/libSDL2.a"), &slot.lib())?;
        publish_file(&out.join("lib/libSDL2main.a"), &slot.lib())?;
        publish_tree(&out.join("include/SDL2"), &slot.include().join("SDL2"))?;
        publish_sdl2_config(ctx.config.os, &out.join("bin/sdl2-config"), &slot.bin())?;
    }

    publish_file(&src.join("README-SDL.txt"), &slot.dist())?;
    Ok(())
}

/// Install `sdl2-config` with its `prefix=` line retargeted at the unpacked
/// release location; exactly one such line must exist
fn publish_sdl2_config(os: Os, src: &Path, bin_dir: &Path) -> Result<()> {
    if !src.is_file() {
        return Err(CoreError::MissingArtifact(src.to_path_buf()));
    }

    let content = fs::read_to_string(src)?;
    let mut found = false;
    let mut out = String::with_capacity(content.len());
    for line in content.lines() {
        if line.starts_with("prefix=") {
            if found {
                return Err(CoreError::Recipe {
                    library: SPEC.name.to_string(),
                    message: "multiple prefix= lines in sdl2-config".to_string(),
                });
            }
            found = true;
            out.push_str(&format!("prefix=../{}/{}/SDL2\n", PACKAGE_PREFIX, os));
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }
    if !found {
        return Err(CoreError::Recipe {
            library: SPEC.name.to_string(),
            message: "no prefix= line in sdl2-config".to_string(),
        });
    }

    fs::create_dir_all(bin_dir)?;
    let dest = bin_dir.join("sdl2-config");
    fs::write(&dest, out)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&dest, fs::Permissions::from_mode(0o744))?;
    }
    Ok(())
}
