use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use crate::error::{CotorError, Result};

/// Default name of the tools directory below the project root.
pub const TOOLS_DIR: &str = "tools";

/// Returns the isolated install directory of a tool: `<tools>/.<name>`.
pub fn install_dir<P: AsRef<Path>>(tools_dir: P, name: &str) -> PathBuf {
    tools_dir.as_ref().join(format!(".{name}"))
}

/// Returns a file inside a tool's install directory.
pub fn install_file<P: AsRef<Path>>(tools_dir: P, name: &str, file: &str) -> PathBuf {
    install_dir(tools_dir, name).join(file)
}

/// Returns the path of a tool's shim: `<tools>/<name>`.
pub fn shim_path<P: AsRef<Path>>(tools_dir: P, name: &str) -> PathBuf {
    tools_dir.as_ref().join(name)
}

/// Returns the path of the optional `<tools>/<name>.phar` symlink.
pub fn phar_path<P: AsRef<Path>>(tools_dir: P, name: &str) -> PathBuf {
    tools_dir.as_ref().join(format!("{name}.phar"))
}

/// Returns the install directory used by older releases, before tools were hidden.
/// It shares its path with the shim.
pub fn legacy_dir<P: AsRef<Path>>(tools_dir: P, name: &str) -> PathBuf {
    tools_dir.as_ref().join(name)
}

/// Finds the directory a tool is installed in, falling back to the legacy layout.
pub fn find_install_dir<P: AsRef<Path>>(tools_dir: P, name: &str) -> Option<PathBuf> {
    let target_dir = install_dir(&tools_dir, name);
    if target_dir.is_dir() {
        return Some(target_dir);
    }
    let legacy = legacy_dir(&tools_dir, name);
    legacy.is_dir().then_some(legacy)
}

/// Lists the hidden tool directories below `tools_dir`, sorted by name.
pub fn installed_dirs<P: AsRef<Path>>(tools_dir: P) -> Result<Vec<PathBuf>> {
    let tools_dir = tools_dir.as_ref();
    let mut dirs = Vec::new();
    for entry in WalkDir::new(tools_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(tools_dir).to_path_buf();
            CotorError::io(path, e.into())
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if file_name.starts_with('.') && file_name != "." && file_name != ".." {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// Recovers the tool name from a hidden install directory, `tools/.phpstan` → `phpstan`.
pub fn path_to_name<P: AsRef<Path>>(install_dir: P) -> String {
    let file_name = install_dir
        .as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.strip_prefix('.') {
        Some(name) => name.to_string(),
        None => file_name,
    }
}
