//! Locating the session file to read.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use snss_reader::SessionFileKind;

/// The file to decode and the kind that picks its dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub kind: SessionFileKind,
}

/// Resolve the session file from, in order: an explicit path, a profile
/// directory, or the default Chrome profile under `$HOME`.
pub fn resolve(
    path: Option<&Path>,
    profile_dir: Option<&Path>,
    kind: SessionFileKind,
) -> Result<Target> {
    let path = match (path, profile_dir) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(dir)) => kind.path_in(dir),
        (None, None) => kind.path_in(&default_profile_dir()?),
    };

    Ok(Target { path, kind })
}

pub fn default_profile_dir() -> Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .context("HOME not set; please pass --profile-dir")?;
    Ok(default_profile_dir_in(&home))
}

/// Default Chrome profile relative to a home directory.
pub fn default_profile_dir_in(home: &Path) -> PathBuf {
    if cfg!(target_os = "macos") {
        home.join("Library/Application Support/Google/Chrome/Default")
    } else {
        home.join(".config/google-chrome/Default")
    }
}
