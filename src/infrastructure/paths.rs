//! Path manipulation utilities for the Zellij sandbox.

use std::path::{Path, PathBuf};

/// Returns the data directory for jsonscope files (traces).
///
/// Resolves to `~/.local/share/zellij/jsonscope` on the host.
///
/// # Examples
///
/// ```
/// use jsonscope::infrastructure::get_data_dir;
///
/// assert_eq!(get_data_dir().to_str(), Some("/host/.local/share/zellij/jsonscope"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("jsonscope")
}

/// Expands tilde paths to use the `/host` prefix for Zellij sandbox.
///
/// # Examples
///
/// ```
/// use jsonscope::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/data/big.json"), "/host/data/big.json");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

/// Maps a user-supplied document path to a path readable from the sandbox.
///
/// Relative paths are taken relative to `/host`.
///
/// # Examples
///
/// ```
/// use jsonscope::infrastructure::sandbox_path;
///
/// assert_eq!(sandbox_path("~/a.json"), "/host/a.json");
/// assert_eq!(sandbox_path("logs/a.json"), "/host/logs/a.json");
/// assert_eq!(sandbox_path("/tmp/a.json"), "/tmp/a.json");
/// ```
#[must_use]
pub fn sandbox_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('~') || path.starts_with('/') {
        expand_tilde(path)
    } else {
        format!("/host/{}", path.trim_start_matches("./"))
    }
}

/// Removes the `/host` prefix from sandbox paths.
///
/// # Examples
///
/// ```
/// use jsonscope::infrastructure::strip_host_prefix;
///
/// assert_eq!(strip_host_prefix("/host/home/user/a.json"), "/home/user/a.json");
/// assert_eq!(strip_host_prefix("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn strip_host_prefix(path: &str) -> String {
    path.strip_prefix("/host").unwrap_or(path).to_string()
}

/// Whether a path reported by a filesystem event is the configured document.
///
/// Both sides are mapped into the sandbox first, so `~/a.json`,
/// `/host/a.json` and the relative `a.json` all name the same file.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use jsonscope::infrastructure::is_same_file;
///
/// assert!(is_same_file("~/data/out.json", Path::new("/host/data/out.json")));
/// assert!(!is_same_file("~/data/out.json", Path::new("/host/other/out.json")));
/// ```
#[must_use]
pub fn is_same_file(configured: &str, reported: &Path) -> bool {
    let Some(reported) = reported.to_str() else {
        return false;
    };
    let normalize = |path: &str| PathBuf::from(strip_host_prefix(&sandbox_path(path)));
    normalize(configured) == normalize(reported)
}

/// Shortens a path for the header, keeping its tail when it is wider than
/// `max_width` characters.
#[must_use]
pub fn display_path(path: &str, max_width: usize) -> String {
    let path = if path.starts_with("/host/") {
        format!("~{}", strip_host_prefix(path))
    } else {
        path.to_string()
    };

    let len = path.chars().count();
    if len <= max_width {
        return path;
    }
    let keep = max_width.saturating_sub(3);
    let tail: String = path.chars().skip(len - keep).collect();
    format!("...{tail}")
}
