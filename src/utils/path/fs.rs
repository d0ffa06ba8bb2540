//! Filesystem path utilities.
//!
//! Lexical operations only (no symlink resolution), so results are stable
//! whether or not the target exists:
//! - `normalize_path` - absolute form for CLI-provided paths
//! - `clean_path` / `join_lexical` - `.` and `..` folding
//! - `relative_path` / `to_posix` / `display_path` - root-relative forms for messages

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Relative paths are taken from the current directory. See [`normalize_path_from`].
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    match std::env::current_dir() {
        Ok(cwd) => normalize_path_from(&cwd, path),
        Err(_) => path.canonicalize().unwrap_or_else(|_| clean_path(path)),
    }
}

/// Normalize `path` to absolute form, taking relative paths from `base`.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to the lexically cleaned join when the path does not exist.
pub fn normalize_path_from(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    joined.canonicalize().unwrap_or_else(|_| clean_path(&joined))
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => result.push(".."),
            },
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Join a `/`-separated relative or site-absolute path onto `base`.
///
/// Leading slashes on `rel` are dropped so `/img/a.png` lands under `base`
/// instead of replacing it.
///
/// # Examples
/// ```ignore
/// join_lexical("/site/static", "/img/a.png") -> "/site/static/img/a.png"
/// join_lexical("/site/docs", "../img/a.png") -> "/site/img/a.png"
/// ```
pub fn join_lexical(base: &Path, rel: &str) -> PathBuf {
    let mut joined = base.to_path_buf();
    for part in rel.trim_start_matches('/').split('/') {
        joined.push(part);
    }
    clean_path(&joined)
}

/// Compute `to` relative to the directory `from`.
///
/// Both paths are cleaned first. Returns an empty path when they are equal.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = clean_path(from);
    let to = clean_path(to);

    let from_parts: Vec<_> = from.components().collect();
    let to_parts: Vec<_> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..from_parts.len() {
        result.push("..");
    }
    for part in &to_parts[common..] {
        result.push(part.as_os_str());
    }
    result
}

/// Render a relative path with forward slashes regardless of platform.
pub fn to_posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Display form used in user-facing messages: relative to `root`, forward slashes.
pub fn display_path(root: &Path, path: &Path) -> String {
    to_posix(&relative_path(root, path))
}
