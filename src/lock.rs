use std::path::Path;
use serde::Deserialize;
use crate::error::{CotorError, Result};

/// File name of the lock file composer writes into every tool directory.
pub const COMPOSER_LOCK: &str = "composer.lock";

/// The part of a `composer.lock` needed to read back resolved versions.
#[derive(Deserialize, Debug, Default)]
pub struct ComposerLock {
    #[serde(default)]
    pub packages: Vec<LockedPackage>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LockedPackage {
    pub name: String,
    pub version: String,
}

impl ComposerLock {
    pub fn parse(content: &str) -> std::result::Result<ComposerLock, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Loads the lock file at `path`, `Ok(None)` if there is none.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<ComposerLock>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|e| CotorError::io(path, e))?;
        ComposerLock::parse(&content)
            .map(Some)
            .map_err(|source| CotorError::LockParse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Returns the locked entry for a composer name.
    pub fn find(&self, composer_name: &str) -> Option<&LockedPackage> {
        self.packages.iter().find(|package| package.name == composer_name)
    }
}
