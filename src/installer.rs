//! Install, extend and update workflows.
//!
//! Every public operation returns an [`Outcome`]. Errors never escape: they are reported
//! through the [`Reporter`] and mapped onto `Invalid` (nothing was attempted) or
//! `Failure` (composer or the filesystem rejected the attempt). Problems with
//! `composer.json` are only warnings, the tool itself still counts as installed.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use regex::Regex;
use tracing::{debug, info, warn};
use crate::composer::Composer;
use crate::error::{CotorError, Outcome, Result};
use crate::lock::{ComposerLock, COMPOSER_LOCK};
use crate::manifest::{ComposerJson, COMPOSER_JSON};
use crate::package::{Package, WILDCARD};
use crate::paths;
use crate::registry;
use crate::report::Reporter;
use crate::shims;
use crate::version::SemanticVersion;

const GITIGNORE: &str = "/vendor/\n";
const GITIGNORE_NO_LOCK: &str = "/vendor/\n/composer.lock\n";

static OUTDATED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\S+/\S+\s+(?P<current>\S+)\s+\S\s+(?P<new>\S+)")
        .expect("valid outdated pattern")
});

/// Flags of the `install` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Remove an existing installation and overwrite the manifest entry.
    pub force: bool,
    /// Keep the tool's `composer.lock` out of version control.
    pub no_lock: bool,
    /// Link `<tool>.phar` to the shim.
    pub phar_link: bool,
}

/// What `composer outdated --direct` said about a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutdatedStatus {
    UpToDate,
    Outdated { current: String, candidate: String },
    /// Output that did not match the expected table, trimmed.
    Unrecognized(String),
}

/// Interprets the output of `composer outdated --direct`.
pub fn parse_outdated(output: &str) -> OutdatedStatus {
    let output = output.trim();
    if output.is_empty() {
        return OutdatedStatus::UpToDate;
    }
    match OUTDATED_LINE.captures(output) {
        Some(captures) => OutdatedStatus::Outdated {
            current: captures["current"].to_string(),
            candidate: captures["new"].to_string(),
        },
        None => OutdatedStatus::Unrecognized(output.to_string()),
    }
}

/// Manages the tools of one project.
pub struct Installer {
    project_root: PathBuf,
    tools_dir: PathBuf,
    composer: Composer,
    reporter: Box<dyn Reporter>,
}

impl Installer {
    pub fn new<P: AsRef<Path>, T: AsRef<Path>>(
        project_root: P,
        tools_dir: T,
        composer: Composer,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        Installer {
            project_root: project_root.as_ref().to_path_buf(),
            tools_dir: tools_dir.as_ref().to_path_buf(),
            composer,
            reporter,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn tools_dir(&self) -> &Path {
        &self.tools_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_root.join(COMPOSER_JSON)
    }

    /// Installs one tool, or every tool tracked in `composer.json` when `identifier` is `None`.
    pub fn install(&self, identifier: Option<&str>, options: InstallOptions) -> Outcome {
        let result = match identifier {
            Some(identifier) => self.install_one(identifier, options),
            None => self.install_all(options),
        };
        self.conclude(result)
    }

    /// Requires `extension` into an installed tool and tracks it in `composer.json`.
    pub fn extend(&self, tool: &str, extension: &str, version: Option<&str>) -> Outcome {
        let result = self.extend_tool(tool, extension, version);
        self.conclude(result)
    }

    /// Runs `composer update` for one installed tool.
    pub fn update(&self, identifier: &str) -> Outcome {
        let result = self.update_tool(identifier);
        self.conclude(result)
    }

    /// Runs `composer update` for every installed tool.
    pub fn update_all(&self) -> Outcome {
        let result = self.installed_tools().map(|dirs| {
            let mut outcome = Outcome::Success;
            for dir in dirs {
                let name = paths::path_to_name(&dir);
                match self.composer.run("update", &dir) {
                    Ok(_) => self.reporter.done(&format!("{name} updated successfully.")),
                    Err(e) => {
                        self.reporter
                            .failed(&format!("Failed to update {name}: {}", error_output(&e)));
                        outcome = outcome.worst(Outcome::Failure);
                    }
                }
            }
            outcome
        });
        self.conclude(result)
    }

    /// Runs an arbitrary composer command in every installed tool.
    pub fn run_all(&self, command: &str, arguments: &[String]) -> Outcome {
        let command_line = std::iter::once(self.composer.program())
            .chain(std::iter::once(command))
            .chain(arguments.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        let result = self.installed_tools().map(|dirs| {
            let mut outcome = Outcome::Success;
            for dir in dirs {
                let name = paths::path_to_name(&dir);
                match self.composer.run_with_args(command, &dir, arguments) {
                    Ok(_) => self
                        .reporter
                        .done(&format!("\"{command_line}\" on {name} runs successfully.")),
                    Err(e) => {
                        self.reporter.failed(&format!(
                            "Failed to run \"{command_line}\" on {name}: {}",
                            error_output(&e)
                        ));
                        outcome = outcome.worst(Outcome::Failure);
                    }
                }
            }
            outcome
        });
        self.conclude(result)
    }

    /// Reports for every installed tool whether a newer direct dependency is available.
    pub fn outdated(&self) -> Outcome {
        let result = self.installed_tools().map(|dirs| {
            let mut outcome = Outcome::Success;
            for dir in dirs {
                let name = paths::path_to_name(&dir);
                let output = self
                    .composer
                    .run_with_args("outdated", &dir, &["--direct".to_string()]);
                match output.map(|output| parse_outdated(&output.stdout)) {
                    Ok(OutdatedStatus::UpToDate) => {
                        self.reporter.done(&format!("{name} is up-to-date."))
                    }
                    Ok(OutdatedStatus::Outdated { current, candidate }) => self
                        .reporter
                        .notice(&format!("{name} is outdated: {current} => {candidate}")),
                    Ok(OutdatedStatus::Unrecognized(raw)) => {
                        self.reporter.notice(&format!("{name} is outdated: {raw}"))
                    }
                    Err(e) => {
                        self.reporter.failed(&format!(
                            "Failed to check if {name} is outdated: {}",
                            error_output(&e)
                        ));
                        outcome = outcome.worst(Outcome::Failure);
                    }
                }
            }
            outcome
        });
        self.conclude(result)
    }

    fn conclude(&self, result: Result<Outcome>) -> Outcome {
        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.reporter.error(&e.to_string());
                e.outcome()
            }
        }
    }

    fn install_one(&self, identifier: &str, options: InstallOptions) -> Result<Outcome> {
        let package = registry::resolve(identifier)?;
        self.ensure_tools_dir()?;
        self.install_tool(&package, options)?;

        let resolved = self.installed_version(&self.tool_dir(&package), &package, package.name());
        // An explicitly requested constraint wins over the one derived from the lock file.
        let package = if package.is_wildcard() { resolved } else { package };

        if let Some(mut composer_json) = self.load_manifest() {
            let migrated = self.migrate_manifest(&mut composer_json);
            if composer_json.track_tool(&package, options.force) || migrated {
                self.save_manifest(&composer_json);
            }
        }

        self.reporter
            .success(&format!("{} installed successfully.", package.name()));
        Ok(Outcome::Success)
    }

    fn install_all(&self, options: InstallOptions) -> Result<Outcome> {
        let mut composer_json = self.load_manifest().ok_or(CotorError::MissingManifest)?;
        let mut changed = self.migrate_manifest(&mut composer_json);
        let tools = composer_json.tracked_tools();
        if tools.is_empty() {
            if changed {
                self.save_manifest(&composer_json);
            }
            return Err(CotorError::NoTrackedTools);
        }
        self.ensure_tools_dir()?;

        let mut outcome = Outcome::Success;
        for (composer_name, version) in tools {
            let package = match Package::from_composer_name(&composer_name, &version) {
                Ok(package) => package,
                Err(e) => {
                    self.reporter.failed(&e.to_string());
                    outcome = outcome.worst(e.outcome());
                    continue;
                }
            };
            match self.install_tool(&package, options) {
                Ok(()) => {}
                Err(CotorError::AlreadyInstalled(name)) => {
                    self.reporter.notice(&format!(
                        "{name} is already installed. Use --force to re-install it."
                    ));
                    continue;
                }
                Err(e) => {
                    self.reporter.failed(&format!(
                        "Failed to install {}: {}",
                        package.name(),
                        error_output(&e)
                    ));
                    outcome = outcome.worst(e.outcome());
                    continue;
                }
            }

            let resolved =
                self.installed_version(&self.tool_dir(&package), &package, package.name());
            let package = if package.is_wildcard() { resolved } else { package };
            changed |= composer_json.track_tool(&package, options.force);
            self.reporter
                .done(&format!("{} installed successfully.", package.name()));
        }

        if changed {
            self.save_manifest(&composer_json);
        }

        Ok(outcome.worst(self.install_extensions(&composer_json)))
    }

    /// Installs every extension tracked in `composer.json` that is missing from its tool.
    fn install_extensions(&self, composer_json: &ComposerJson) -> Outcome {
        let mut outcome = Outcome::Success;
        for tracked in composer_json.tracked_extensions() {
            if tracked.extensions.is_empty() {
                self.reporter
                    .notice(&format!("{} has empty extensions configuration.", tracked.tool));
                continue;
            }
            let tool: Package = match tracked.tool.parse() {
                Ok(tool) => tool,
                Err(e) => {
                    self.reporter.failed(&e.to_string());
                    outcome = outcome.worst(e.outcome());
                    continue;
                }
            };
            for (name, version) in &tracked.extensions {
                let result = Package::from_composer_name(name, version)
                    .and_then(|extension| self.install_extension(&tool, &extension));
                match result {
                    Ok(true) => self.reporter.done(&format!(
                        "Extension {} for {} installed successfully.",
                        name,
                        tool.name()
                    )),
                    Ok(false) => info!("{} is already installed. Skipping...", name),
                    Err(e) => {
                        self.reporter.failed(&format!(
                            "Failed to install extension {} for {}: {}",
                            name,
                            tool.name(),
                            error_output(&e)
                        ));
                        outcome = outcome.worst(Outcome::Failure);
                    }
                }
            }
        }
        outcome
    }

    /// Returns `false` when the extension is already present in the tool's vendor directory.
    fn install_extension(&self, tool: &Package, extension: &Package) -> Result<bool> {
        let target_dir = paths::find_install_dir(&self.tools_dir, tool.name())
            .ok_or_else(|| CotorError::NotInstalled(tool.name().to_string()))?;
        let extension_dir = target_dir
            .join("vendor")
            .join(extension.vendor())
            .join(extension.name());
        if extension_dir.is_dir() {
            return Ok(false);
        }
        self.composer.require(&target_dir, extension)?;
        Ok(true)
    }

    /// Materializes the isolated directory of a tool and its shim.
    fn install_tool(&self, package: &Package, options: InstallOptions) -> Result<()> {
        let name = package.name();
        let target_dir = paths::install_dir(&self.tools_dir, name);
        if target_dir.is_dir() {
            if !options.force {
                return Err(CotorError::AlreadyInstalled(name.to_string()));
            }
            info!("Removing {}", target_dir.display());
            std::fs::remove_dir_all(&target_dir).map_err(|e| CotorError::io(&target_dir, e))?;
        }
        self.remove_legacy_layout(name)?;

        std::fs::create_dir_all(&target_dir).map_err(|e| CotorError::io(&target_dir, e))?;
        let gitignore = paths::install_file(&self.tools_dir, name, ".gitignore");
        let content = if options.no_lock { GITIGNORE_NO_LOCK } else { GITIGNORE };
        std::fs::write(&gitignore, content).map_err(|e| CotorError::io(&gitignore, e))?;

        if let Err(e) = self.composer.require(&target_dir, package) {
            // Nothing was installed, so a plain retry must not hit "already installed".
            if let Err(cleanup) = std::fs::remove_dir_all(&target_dir) {
                warn!("Could not remove {}: {}", target_dir.display(), cleanup);
            }
            return Err(e);
        }

        let shim_path = paths::shim_path(&self.tools_dir, name);
        if shims::write_shim(&shim_path, name, self.composer.program(), options.force)? {
            debug!("Wrote shim {}", shim_path.display());
        }
        if options.phar_link {
            shims::create_phar_link(paths::phar_path(&self.tools_dir, name), shim_path, options.force)?;
        }
        Ok(())
    }

    /// Older releases installed tools into `<tools>/<name>`, where the shim lives now.
    fn remove_legacy_layout(&self, name: &str) -> Result<()> {
        let legacy_dir = paths::legacy_dir(&self.tools_dir, name);
        if legacy_dir.is_dir() {
            info!("Removing legacy tool directory {}", legacy_dir.display());
            std::fs::remove_dir_all(&legacy_dir).map_err(|e| CotorError::io(&legacy_dir, e))?;
        }
        Ok(())
    }

    fn extend_tool(&self, tool: &str, extension: &str, version: Option<&str>) -> Result<Outcome> {
        if let Some((extension, extension_version)) = extension.split_once(':') {
            return Err(CotorError::VersionInExtensionName {
                tool: tool.to_string(),
                extension: extension.to_string(),
                version: extension_version.to_string(),
            });
        }
        let extension_package = Package::from_composer_name(extension, version.unwrap_or(WILDCARD))?;
        if !self.tools_dir.is_dir() {
            return Err(CotorError::MissingToolsDir);
        }
        let package = registry::resolve(tool)?;
        let target_dir = paths::find_install_dir(&self.tools_dir, package.name())
            .ok_or_else(|| CotorError::NotInstalled(package.name().to_string()))?;

        let composer_json = self.load_manifest();
        self.composer.require(&target_dir, &extension_package)?;

        if let Some(mut composer_json) = composer_json {
            let resolved = self.installed_version(&target_dir, &extension_package, package.name());
            let extension_package = match version {
                Some(version) => resolved.with_version(version),
                None => resolved,
            };
            composer_json.track_extension(&package, &extension_package);
            self.save_manifest(&composer_json);
        }

        self.reporter.success(&format!(
            "Extended {} with {} successfully.",
            package.name(),
            extension
        ));
        Ok(Outcome::Success)
    }

    fn update_tool(&self, identifier: &str) -> Result<Outcome> {
        if !self.tools_dir.is_dir() {
            return Err(CotorError::MissingToolsDir);
        }
        let package = registry::resolve(identifier)?;
        let target_dir = paths::find_install_dir(&self.tools_dir, package.name())
            .ok_or_else(|| CotorError::NotInstalled(package.name().to_string()))?;
        self.composer.run("update", &target_dir)?;
        self.reporter
            .success(&format!("{} updated successfully.", package.name()));
        Ok(Outcome::Success)
    }

    /// Lists installed tool directories, failing when there is no tools directory.
    fn installed_tools(&self) -> Result<Vec<PathBuf>> {
        if !self.tools_dir.is_dir() {
            return Err(CotorError::MissingToolsDir);
        }
        let dirs = paths::installed_dirs(&self.tools_dir)?;
        if dirs.is_empty() {
            self.reporter
                .warning("Could not find any tools! Did you miss to run `install`?");
        }
        Ok(dirs)
    }

    fn ensure_tools_dir(&self) -> Result<()> {
        if !self.tools_dir.is_dir() {
            std::fs::create_dir_all(&self.tools_dir)
                .map_err(|e| CotorError::io(&self.tools_dir, e))?;
            self.reporter
                .info(&format!("Created tools directory {}", self.tools_dir.display()));
        }
        Ok(())
    }

    fn tool_dir(&self, package: &Package) -> PathBuf {
        paths::install_dir(&self.tools_dir, package.name())
    }

    /// Reads the version composer resolved for `package` from the lock file in
    /// `target_dir` and turns it into a minor constraint. Falls back to `package`
    /// unchanged, with a warning, when that is not possible.
    fn installed_version(&self, target_dir: &Path, package: &Package, tool_name: &str) -> Package {
        let lock = match ComposerLock::load(target_dir.join(COMPOSER_LOCK)) {
            Ok(Some(lock)) => lock,
            Ok(None) => {
                self.reporter
                    .warning(&format!("Could not find composer.lock of {tool_name}!"));
                return package.clone();
            }
            Err(e) => {
                self.reporter
                    .warning(&format!("Could not parse composer.lock of {tool_name}: {e}"));
                return package.clone();
            }
        };
        let Some(locked) = lock.find(&package.composer_name()) else {
            self.reporter.warning(&format!(
                "Could not find {} in composer.lock of {tool_name}!",
                package.composer_name()
            ));
            return package.clone();
        };
        match SemanticVersion::parse(&locked.version) {
            Ok(version) => package.with_version(&version.to_minor_constraint()),
            Err(e) => {
                self.reporter
                    .warning(&format!("Could not parse composer.lock of {tool_name}: {e}"));
                package.clone()
            }
        }
    }

    fn load_manifest(&self) -> Option<ComposerJson> {
        let path = self.manifest_path();
        if !path.exists() {
            return None;
        }
        match ComposerJson::load(&path) {
            Ok(composer_json) => Some(composer_json),
            Err(e) => {
                self.reporter.warning(&e.to_string());
                None
            }
        }
    }

    fn migrate_manifest(&self, composer_json: &mut ComposerJson) -> bool {
        let migrated = composer_json.migrate_legacy_extras();
        if migrated {
            info!("Moved the tools block from \"extras\" to \"extra\" in {}", COMPOSER_JSON);
        }
        migrated
    }

    fn save_manifest(&self, composer_json: &ComposerJson) {
        if let Err(e) = composer_json.save(self.manifest_path()) {
            self.reporter
                .warning(&format!("Failed to update composer.json: {e}"));
        }
    }
}

/// The diagnostic text of an error: composer's stderr when it failed, the message otherwise.
fn error_output(error: &CotorError) -> String {
    match error {
        CotorError::Process { stderr, .. } => stderr.clone(),
        other => other.to_string(),
    }
}
