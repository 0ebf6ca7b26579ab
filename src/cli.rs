use std::path::PathBuf;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    #[command(subcommand)]
    pub(crate) command: CotorCommand,

    /// Composer executable used for installs and embedded in shims
    #[clap(long, global = true, env = "COTOR_COMPOSER")]
    pub(crate) composer: Option<String>,

    /// Tools directory, relative to the project root
    #[clap(long, global = true)]
    pub(crate) tools_dir: Option<PathBuf>,

    /// More diagnostic output (-v info, -vv debug)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum CotorCommand {
    /// Installs a tool into `tools/.<name>/`. Without a name, installs every tool tracked in `composer.json`
    Install {
        /// Shortcut or composer name of the tool, optionally with a constraint: <name>[:<version>]
        name: Option<String>,
        /// Re-install already installed tools and overwrite their tracked constraint
        #[clap(short, long)]
        force: bool,
        /// Do not commit the tool's `composer.lock`
        #[clap(long)]
        no_lock: bool,
        /// Additionally create a `<name>.phar` link to the shim
        #[clap(long)]
        phar_link: bool,
    },
    /// Adds an extension (plugin) to an installed tool
    Extend {
        /// Shortcut or composer name of the installed tool
        name: String,
        /// Composer name of the extension, without a version
        extension: String,
        /// Version constraint of the extension
        version: Option<String>,
    },
    /// Runs `composer update` for one installed tool
    Update {
        name: String,
    },
    /// Runs `composer update` for every installed tool
    UpdateAll,
    /// Runs a composer command in every installed tool
    RunAll {
        /// Composer command, e.g. `audit`
        command: String,
        /// Arguments passed on to composer
        #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Shows which installed tools have a newer version
    Outdated,
}
