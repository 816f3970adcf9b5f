// src/paths.rs

//! Path guard: resolve user-supplied file names against the working
//! directory and refuse anything that escapes it.

use std::env;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::errors::{Result, RunnerError};

/// Resolve `path` to an absolute, canonical path.
///
/// Existing paths are canonicalized by the OS (symlinks and `..` collapsed).
/// For paths that do not exist yet, the longest existing ancestor is
/// canonicalized and the remaining components are appended after lexical
/// normalization, so a missing file still gets a stable location that can be
/// checked against the base directory.
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    if let Ok(canonical) = fs::canonicalize(&absolute) {
        return Ok(canonical);
    }

    let normalized = normalize_lexically(&absolute);
    for ancestor in normalized.ancestors().skip(1) {
        if let Ok(canonical_ancestor) = fs::canonicalize(ancestor) {
            // `ancestor` is a prefix of `normalized` by construction.
            let rest = normalized.strip_prefix(ancestor).unwrap_or(Path::new(""));
            return Ok(canonical_ancestor.join(rest));
        }
    }

    Ok(normalized)
}

/// Join `segments` onto `base` and make sure the result stays inside `base`.
///
/// Both sides are resolved first; containment is checked component-wise, so a
/// sibling such as `/srv/base2` is not considered inside `/srv/base`.
pub fn safe_join<P: AsRef<Path>>(base: &Path, segments: &[P]) -> Result<PathBuf> {
    let base_path = resolve(base)?;

    let mut joined = base_path.clone();
    for segment in segments {
        joined.push(segment.as_ref());
    }
    let candidate = resolve(&joined)?;

    if candidate.starts_with(&base_path) {
        debug!(base = ?base_path, resolved = ?candidate, "path accepted");
        Ok(candidate)
    } else {
        Err(RunnerError::PathTraversal(candidate))
    }
}

/// Ensure `path` exists and can be opened for reading.
pub fn ensure_readable(path: &Path) -> Result<PathBuf> {
    match fs::metadata(path) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(RunnerError::NotFound(path.to_path_buf()));
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(RunnerError::PermissionDenied(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    }

    match File::open(path) {
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            Err(RunnerError::PermissionDenied(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Locate an executable the way a shell would.
///
/// Names containing a path separator are checked as-is; bare names are
/// looked up on `PATH`. Returns `None` when nothing runnable is found.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let search = env::var_os("PATH")?;
    env::split_paths(&search)
        .map(|dir| dir.join(name))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root / prefix.
                if matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
