use std::path::Path;
use crate::error::{CotorError, Result};

const WRAPPER: &str = r#"#!/bin/sh
# This file was created automatically by cotor as a tool wrapper.

DIR=$(CDPATH= cd -- "$(dirname -- "$0")" && pwd -P)

"%COMPOSER%" install --working-dir="$DIR/.%NAME%" --quiet
exec "$DIR/.%NAME%/vendor/bin/%NAME%" "$@"
"#;

/// Renders the shim script for a tool.
///
/// The script refreshes the tool's isolated dependency tree quietly and then replaces
/// itself with the tool's binary, so arguments and exit status pass through unchanged.
pub fn render_shim(name: &str, composer: &str) -> String {
    WRAPPER.replace("%NAME%", name).replace("%COMPOSER%", composer)
}

/// Writes the shim for `name` to `shim_path`.
///
/// An existing shim is kept unless `overwrite` is set. Returns whether a file was written.
///
/// # Example
///
/// ```no_run
/// use cotor::write_shim;
///
/// write_shim("tools/phpstan", "phpstan", "composer", false).unwrap();
/// ```
pub fn write_shim<P: AsRef<Path>>(
    shim_path: P,
    name: &str,
    composer: &str,
    overwrite: bool,
) -> Result<bool> {
    let shim_path = shim_path.as_ref();
    if shim_path.exists() {
        if !overwrite {
            return Ok(false);
        }
        std::fs::remove_file(shim_path).map_err(|e| CotorError::io(shim_path, e))?;
    }
    std::fs::write(shim_path, render_shim(name, composer))
        .map_err(|e| CotorError::io(shim_path, e))?;
    make_executable(shim_path)?;
    Ok(true)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| CotorError::io(path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Links `<name>.phar` to the shim, for projects whose scripts still call the
/// `tools/<name>.phar` files older tool runners produced.
#[cfg(unix)]
pub fn create_phar_link<P: AsRef<Path>>(phar_path: P, shim_path: P, overwrite: bool) -> Result<()> {
    use std::os::unix::fs::symlink;
    let phar_path = phar_path.as_ref();
    if phar_path.symlink_metadata().is_ok() {
        if !overwrite {
            return Ok(());
        }
        std::fs::remove_file(phar_path).map_err(|e| CotorError::io(phar_path, e))?;
    }
    let target = shim_path
        .as_ref()
        .file_name()
        .map(Path::new)
        .unwrap_or_else(|| shim_path.as_ref());
    symlink(target, phar_path).map_err(|e| CotorError::io(phar_path, e))
}

#[cfg(not(unix))]
pub fn create_phar_link<P: AsRef<Path>>(_phar_path: P, _shim_path: P, _overwrite: bool) -> Result<()> {
    tracing::warn!("phar links are only supported on unix");
    Ok(())
}
