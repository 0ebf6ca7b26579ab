use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use crate::paths::TOOLS_DIR;

/// Name of the per-project configuration file.
pub const PROJECT_CONFIG: &str = "cotor.toml";
/// Name of the configuration file inside the global config directory.
pub const GLOBAL_CONFIG: &str = "config.toml";

/// Settings read from `cotor.toml`.
///
/// The project file (next to `composer.json`) wins over the global file in the user's
/// config directory; command line flags win over both.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Tools directory, relative to the project root.
    pub tools_dir: PathBuf,
    /// Composer executable used for installs and embedded in shims.
    pub composer: String,
    /// Create a `<tool>.phar` symlink next to every shim.
    pub phar_link: bool,
    /// Do not commit the tools' `composer.lock` files.
    pub no_lock: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tools_dir: PathBuf::from(TOOLS_DIR),
            composer: "composer".to_string(),
            phar_link: false,
            no_lock: false,
        }
    }
}

impl Config {
    /// Loads a configuration file.
    ///
    /// # Errors
    /// Returns an error if the file can't be read or deserialized.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Resolves the configuration for a project: the project file if present, else the
    /// global file if present, else defaults.
    pub fn discover<P: AsRef<Path>>(project_root: P) -> Result<Config> {
        let project = project_root.as_ref().join(PROJECT_CONFIG);
        if project.exists() {
            return Config::load(project);
        }
        match global_config_file() {
            Ok(global) if global.exists() => Config::load(global),
            _ => Ok(Config::default()),
        }
    }

    /// The tools directory as an absolute path below `project_root`.
    pub fn tools_dir_in<P: AsRef<Path>>(&self, project_root: P) -> PathBuf {
        project_root.as_ref().join(&self.tools_dir)
    }
}

pub fn get_global_config_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "cotor", "cotor")
        .ok_or_else(|| anyhow!("Could not get project directories"))?;
    Ok(proj_dirs.config_dir().to_path_buf())
}

pub fn global_config_file() -> Result<PathBuf> {
    Ok(get_global_config_dir()?.join(GLOBAL_CONFIG))
}
