/*!
 * Picks the next free `<base>_v<N>.txt` name in output directory.
 *
 * Directory listing is the only source of truth, there is no separate counter file.
 * Two processes allocating in the same directory at the same time may get the same number,
 * and the later write then replaces the earlier one. No locking is done about that.
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::PayloadError;

/// Access to directory contents needed by version allocation.
pub trait DirLister {
    /// Creates `dir` with all missing parents. Succeeds if it already exists.
    fn ensure_dir(&self, dir: &Path) -> io::Result<()>;

    /// Names of entries in `dir`.
    fn file_names(&self, dir: &Path) -> io::Result<Vec<String>>;
}

/// `DirLister` backed by real filesystem.
pub struct FsLister;

impl DirLister for FsLister {
    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn file_names(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            // Names which are not UTF-8 can not match the pattern anyway.
            if let Ok(name) = entry?.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }
}

/// Returns `N` if `name` is exactly `<base_name>_v<N>.txt`.
/// Digit runs which do not fit into `u64` give `None`.
pub fn parse_version(base_name: &str, name: &str) -> Option<u64> {
    let digits = name
        .strip_prefix(base_name)?
        .strip_prefix("_v")?
        .strip_suffix(".txt")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Highest version among `names` plus one (1 when nothing matches).
/// `None` when the highest version is already `u64::MAX`.
pub fn next_version<'a>(base_name: &str, names: impl IntoIterator<Item = &'a str>) -> Option<u64> {
    names
        .into_iter()
        .filter_map(|name| parse_version(base_name, name))
        .max()
        .unwrap_or(0)
        .checked_add(1)
}

pub fn versioned_file_name(base_name: &str, version: u64) -> String {
    format!("{}_v{}.txt", base_name, version)
}

/// Makes sure `out_dir` exists and returns path of the next version file in it.
pub fn allocate(base_name: &str, out_dir: &Path, lister: &impl DirLister) -> Result<PathBuf, PayloadError> {
    lister
        .ensure_dir(out_dir)
        .map_err(|e| PayloadError::io(format!("Cannot create output directory {}", out_dir.display()), e))?;
    let names = lister
        .file_names(out_dir)
        .map_err(|e| PayloadError::io(format!("Cannot list output directory {}", out_dir.display()), e))?;
    debug!(dir = %out_dir.display(), entries = names.len(), "scanned output directory");

    let version = next_version(base_name, names.iter().map(String::as_str))
        .ok_or_else(|| PayloadError::VersionExhausted { base_name: base_name.to_owned() })?;
    info!(base_name, version, "allocated version");
    Ok(out_dir.join(versioned_file_name(base_name, version)))
}

///////////////////////////////////////////////////////////////////////////////////////////////////
/// Tests
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    const BASE: &str = "notepad_100_codes";

    /// In-memory directory, records created directories.
    struct FakeLister {
        names: Vec<&'static str>,
        created: RefCell<Vec<PathBuf>>,
        fail_create: bool,
    }

    impl FakeLister {
        fn with(names: &[&'static str]) -> Self {
            FakeLister { names: names.to_vec(), created: RefCell::new(Vec::new()), fail_create: false }
        }
    }

    impl DirLister for FakeLister {
        fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
            if self.fail_create {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.created.borrow_mut().push(dir.to_path_buf());
            Ok(())
        }

        fn file_names(&self, _dir: &Path) -> io::Result<Vec<String>> {
            Ok(self.names.iter().map(|n| n.to_string()).collect())
        }
    }

    #[test]
    fn parse_exact_pattern() {
        assert_eq!(parse_version(BASE, "notepad_100_codes_v1.txt"), Some(1));
        assert_eq!(parse_version(BASE, "notepad_100_codes_v007.txt"), Some(7));
        assert_eq!(parse_version(BASE, "notepad_100_codes_v.txt"), None);
        assert_eq!(parse_version(BASE, "notepad_100_codes_v1.txt.bak"), None);
        assert_eq!(parse_version(BASE, "notepad_100_codes_v1a.txt"), None);
        assert_eq!(parse_version(BASE, "notepad_100_codes_v+1.txt"), None);
        assert_eq!(parse_version(BASE, "other_v5.txt"), None);
        assert_eq!(parse_version(BASE, "notepad_100_codes_x_v5.txt"), None);
        assert_eq!(parse_version(BASE, "notepad_100_codes_v5.TXT"), None);
    }

    #[test]
    fn parse_overflow_ignored() {
        assert_eq!(parse_version(BASE, "notepad_100_codes_v18446744073709551615.txt"), Some(u64::MAX));
        assert_eq!(parse_version(BASE, "notepad_100_codes_v18446744073709551616.txt"), None);
        assert_eq!(parse_version(BASE, "notepad_100_codes_v99999999999999999999999.txt"), None);
    }

    #[test]
    fn next_version_empty() {
        assert_eq!(next_version(BASE, Vec::new()), Some(1));
        assert_eq!(next_version(BASE, vec!["readme.txt", "other_v9.txt"]), Some(1));
    }

    #[test]
    fn next_version_ignores_gaps() {
        let names = vec!["notepad_100_codes_v1.txt", "notepad_100_codes_v3.txt"];
        assert_eq!(next_version(BASE, names), Some(4));
    }

    #[test]
    fn next_version_skips_malformed() {
        let names = vec![
            "notepad_100_codes_v2.txt",
            "notepad_100_codes_v99999999999999999999999.txt",
            "notepad_100_codes_vX.txt",
        ];
        assert_eq!(next_version(BASE, names), Some(3));
    }

    #[test]
    fn next_version_exhausted() {
        assert_eq!(next_version(BASE, vec!["notepad_100_codes_v18446744073709551615.txt"]), None);
    }

    #[test]
    fn base_names_do_not_mix() {
        let names = vec!["pins_v10.txt", "pins_extra_v20.txt", "notepad_100_codes_v2.txt"];
        assert_eq!(next_version("pins", names.clone()), Some(11));
        assert_eq!(next_version("pins_extra", names.clone()), Some(21));
        assert_eq!(next_version(BASE, names), Some(3));
    }

    #[test]
    fn allocate_with_fake_lister() {
        let lister = FakeLister::with(&["notepad_100_codes_v1.txt", "notepad_100_codes_v3.txt"]);
        let path = allocate(BASE, Path::new("/out"), &lister).unwrap();
        assert_eq!(path, Path::new("/out").join("notepad_100_codes_v4.txt"));
        assert_eq!(*lister.created.borrow(), vec![PathBuf::from("/out")]);
    }

    #[test]
    fn allocate_reports_exhaustion() {
        let lister = FakeLister::with(&["pins_v18446744073709551615.txt"]);
        let err = allocate("pins", Path::new("/out"), &lister).unwrap_err();
        assert!(matches!(err, PayloadError::VersionExhausted { ref base_name } if base_name == "pins"));
    }

    #[test]
    fn allocate_reports_io_error() {
        let mut lister = FakeLister::with(&[]);
        lister.fail_create = true;
        let err = allocate(BASE, Path::new("/out"), &lister).unwrap_err();
        assert!(matches!(err, PayloadError::Io { .. }));
        assert!(err.to_string().contains("Cannot create output directory"));
    }

    #[test]
    fn allocate_creates_missing_dirs() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("a").join("b");
        let path = allocate(BASE, &out, &FsLister).unwrap();
        assert!(out.is_dir());
        assert_eq!(path, out.join("notepad_100_codes_v1.txt"));
        // Nothing written yet, so allocation is repeatable.
        assert_eq!(allocate(BASE, &out, &FsLister).unwrap(), path);
    }

    #[test]
    fn allocate_on_existing_files() {
        let tmp = TempDir::new().unwrap();
        for name in &["notepad_100_codes_v1.txt", "notepad_100_codes_v3.txt", "notes.txt"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }
        let path = allocate(BASE, tmp.path(), &FsLister).unwrap();
        assert_eq!(path, tmp.path().join("notepad_100_codes_v4.txt"));
    }
}
