/*!
    Program to generate DuckyScript v1.0 payload with random unique 4-digit codes (e.g. for Flipper Zero BadUSB).
    Every run saves a new file, with version number one above the highest already present in output directory.
 ```
Usage:
   ducky_codes [-n COUNT] [--base-name NAME] [--out DIR] [-v]
where:
   COUNT - how many random 4-digit codes to generate (default: 100, max: 10000)
   NAME  - base filename used before _vN suffix (default: notepad_100_codes)
   DIR   - output directory (default: your Desktop)
```
   Result is written to `DIR/NAME_vN.txt` and its path printed on standard output.
   Diagnostics go to standard error; set `RUST_LOG` or use `-v` / `-vv` to see more of them.
   License: MIT - see `Cargo.toml`.
   Copyright (c) 2026 Grzegorz Wierzchowski.
 */

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod ducky;
mod error;
mod sampler;
mod versioning;

use config::{Cli, Config};
use versioning::DirLister;

/// Runs the whole generation: sampling, version allocation and writing.
/// Codes are drawn before touching the filesystem, so a too large count leaves no trace behind.
fn generate<R: Rng + ?Sized>(config: &Config, rng: &mut R, lister: &impl DirLister) -> Result<PathBuf> {
    let codes = sampler::sample_codes(config.count, rng)?;
    let target = versioning::allocate(&config.base_name, &config.out_dir, lister)?;
    debug!(path = %target.display(), "writing payload");
    ducky::write_script(&target, &codes)?;
    Ok(target)
}

/// Resolves command line and generates payload. Any error here makes the process exit with status 1.
fn run<R: Rng + ?Sized>(cli: &Cli, rng: &mut R, lister: &impl DirLister) -> Result<PathBuf> {
    let config = Config::resolve(cli)?;
    generate(&config, rng, lister)
}

/// The only line printed to stdout on success.
fn confirmation(path: &Path) -> String {
    format!("✅ Fresh payload saved: {}", path.display())
}

/// Program main function.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let target = run(&cli, &mut rand::thread_rng(), &versioning::FsLister)?;
    println!("{}", confirmation(&target));
    Ok(())
}

/// Logs go to stderr, stdout is left for the result line.
/// `RUST_LOG` wins over `-v` flags.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

///////////////////////////////////////////////////////////////////////////////////////////////////
/// Tests
///
