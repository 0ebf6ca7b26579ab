//! Invocation of the external `composer` executable.

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, instrument};
use crate::error::{CotorError, Result};
use crate::package::Package;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (0 = success)
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a program to completion and captures its output.
pub trait Runner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

/// [`Runner`] spawning real processes. Calls block until the process exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// The composer executable, always run against an explicit working directory.
pub struct Composer {
    program: String,
    runner: Box<dyn Runner>,
}

impl Composer {
    pub fn new(program: impl Into<String>, runner: Box<dyn Runner>) -> Self {
        Composer {
            program: program.into(),
            runner,
        }
    }

    /// Composer found on `PATH` (or at `program`), spawned as a real process.
    pub fn system(program: impl Into<String>) -> Self {
        Composer::new(program, Box::new(ProcessRunner))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// `composer require`s `package` into `target_dir`, constrained when the package
    /// carries a version.
    pub fn require(&self, target_dir: &Path, package: &Package) -> Result<CommandOutput> {
        self.run_with_args("require", target_dir, &[package.require_argument()])
    }

    pub fn run(&self, command: &str, target_dir: &Path) -> Result<CommandOutput> {
        self.run_with_args(command, target_dir, &[])
    }

    /// Runs `composer <command> --working-dir=<target_dir> <arguments...>`.
    ///
    /// # Errors
    /// A non-zero exit becomes [`CotorError::Process`] carrying the captured stderr,
    /// a spawn failure becomes [`CotorError::Spawn`].
    #[instrument(skip(self, target_dir, arguments), fields(dir = %target_dir.display()))]
    pub fn run_with_args(
        &self,
        command: &str,
        target_dir: &Path,
        arguments: &[String],
    ) -> Result<CommandOutput> {
        let mut args = vec![
            command.to_string(),
            format!("--working-dir={}", target_dir.display()),
        ];
        args.extend(arguments.iter().cloned());
        debug!("Running {} {}", self.program, args.join(" "));

        let output = self
            .runner
            .run(&self.program, &args)
            .map_err(|source| CotorError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        debug!(exit_code = output.exit_code, "{} {} finished", self.program, command);
        if !output.success() {
            return Err(CotorError::Process {
                command: command.to_string(),
                stderr: output.stderr.trim_end().to_string(),
            });
        }
        Ok(output)
    }
}
