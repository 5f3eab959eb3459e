/*!
 * Command line definition and its resolution into run configuration.
 */

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use clap::{ArgAction, Parser};
use tracing::debug;

use crate::error::PayloadError;

pub const DEFAULT_COUNT: i64 = 100;
pub const DEFAULT_BASE_NAME: &str = "notepad_100_codes";

#[derive(Parser, Debug)]
#[command(
    name = "ducky_codes",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate a DuckyScript v1.0 payload of random 4-digit codes, saved to Desktop with auto-incrementing version."
)]
pub struct Cli {
    /// How many random 4-digit codes to generate
    #[arg(
        short = 'n',
        long,
        value_name = "COUNT",
        default_value_t = DEFAULT_COUNT,
        allow_negative_numbers = true
    )]
    pub count: i64,

    /// Base filename used before _vN suffix
    #[arg(long, value_name = "NAME", default_value = DEFAULT_BASE_NAME)]
    pub base_name: String,

    /// Output directory (default: your Desktop)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Log more details to stderr (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Settings of a single run. Built once from the command line, never changed afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub count: usize,
    pub base_name: String,
    /// Always absolute.
    pub out_dir: PathBuf,
}

impl Config {
    /// Validates `cli` and resolves output directory against the process environment.
    pub fn resolve(cli: &Cli) -> Result<Self, PayloadError> {
        let count = check_count(cli.count)?;
        let cwd = env::current_dir()
            .map_err(|e| PayloadError::io("Cannot determine current directory", e))?;
        let home = dirs::home_dir();
        let out_dir = match &cli.out {
            Some(out) => out.clone(),
            None => dirs::desktop_dir()
                .or_else(|| home.as_ref().map(|h| h.join("Desktop")))
                .unwrap_or_else(|| cwd.clone()),
        };
        let config = Self::build(count, &cli.base_name, &out_dir, home.as_deref(), &cwd);
        debug!(?config, "configuration resolved");
        Ok(config)
    }

    fn build(count: usize, base_name: &str, out: &Path, home: Option<&Path>, cwd: &Path) -> Self {
        Config {
            count,
            base_name: base_name.to_owned(),
            out_dir: resolve_path(&expand_home(out, home), cwd),
        }
    }
}

fn check_count(count: i64) -> Result<usize, PayloadError> {
    if count <= 0 {
        return Err(PayloadError::Configuration { count });
    }
    // Values not fitting usize are far above the code universe anyway; sampler rejects them.
    Ok(usize::try_from(count).unwrap_or(usize::MAX))
}

/// Replaces leading `~` with `home`. `~user` forms are left as they are.
fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Makes `path` absolute. Existing part of the path has its symlinks resolved before `..` is
/// applied, the part which does not exist yet is normalised lexically.
fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() { path.to_path_buf() } else { cwd.join(path) };
    let mut out = PathBuf::new();
    for comp in joined.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(name) => {
                out.push(name);
                if let Ok(real) = fs::canonicalize(&out) {
                    out = real;
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

///////////////////////////////////////////////////////////////////////////////////////////////////
/// Tests
///
