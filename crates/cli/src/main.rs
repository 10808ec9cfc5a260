use anyhow::Result;
use clap::Parser;
use owo_colors::{OwoColorize, Stream};
use tracing_subscriber::EnvFilter;

use depot_core::{BuildConfig, SystemRunner, dispatch, recipe};

/// depot - fetch, build, and bundle third-party C libraries
///
/// Builds each requested library from a pinned source release with its own
/// build system and publishes static libraries, headers, and license texts
/// into a per-platform tree, optionally archived for distribution.
#[derive(Parser)]
#[command(name = "depot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Libraries to build, plus the tokens `all` and `package`
    targets: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .without_time()
        .init();

    // A bare invocation must never kick off a multi-hour build
    if cli.targets.is_empty() {
        print_usage();
        return Ok(());
    }

    let config = BuildConfig::detect()?;
    println!(
        "Will build for '{}'",
        config
            .os
            .as_str()
            .if_supports_color(Stream::Stdout, |s| s.bold())
    );

    dispatch::dispatch(&cli.targets, &config, &SystemRunner)?;
    Ok(())
}

fn print_usage() {
    println!(
        "{}",
        "usage: depot [LIBRARY ...] [all] [package]"
            .if_supports_color(Stream::Stdout, |s| s.bold())
    );
    println!();
    println!("Rebuilds bundled third-party libraries from source; a full run can");
    println!("take a long time. Nothing is built unless targets are given.");
    println!();
    println!("Libraries, in build order:");
    for spec in recipe::registry() {
        println!("  {:<10} {}", spec.name, spec.version);
    }
    println!();
    println!("  all        build every library above, in order");
    println!("  package    archive the published tree after any builds");
}
