use anyhow::{Context, Result};
use tracing::debug;
use cotor::config::Config;
use cotor::{Composer, ConsoleReporter, InstallOptions, Installer, Outcome};
use crate::cli::{CotorCommand, CLI};

pub fn execute(cli: CLI) -> Result<Outcome> {
    let cwd = std::env::current_dir().context("Could not determine the current directory")?;
    let mut config = Config::discover(&cwd)?;
    if let Some(composer) = cli.composer {
        config.composer = composer;
    }
    if let Some(tools_dir) = cli.tools_dir {
        config.tools_dir = tools_dir;
    }
    debug!(?config, "Resolved configuration");

    let installer = Installer::new(
        &cwd,
        config.tools_dir_in(&cwd),
        Composer::system(config.composer.as_str()),
        Box::new(ConsoleReporter),
    );

    let outcome = match cli.command {
        CotorCommand::Install { name, force, no_lock, phar_link } => {
            let options = InstallOptions {
                force,
                no_lock: no_lock || config.no_lock,
                phar_link: phar_link || config.phar_link,
            };
            installer.install(name.as_deref(), options)
        }
        CotorCommand::Extend { name, extension, version } => {
            installer.extend(&name, &extension, version.as_deref())
        }
        CotorCommand::Update { name } => installer.update(&name),
        CotorCommand::UpdateAll => installer.update_all(),
        CotorCommand::RunAll { command, args } => installer.run_all(&command, &args),
        CotorCommand::Outdated => installer.outdated(),
    };
    Ok(outcome)
}
