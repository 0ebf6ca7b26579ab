//! # Cotor Core Library
//!
//! This crate contains the core logic of `cotor` – an installer for PHP composer tools that keeps
//! every tool in its own isolated directory, so tools never fight over shared dependencies.
//!
//! A tool such as `phpstan` ends up in `tools/.phpstan/` with its own `composer.json` and
//! `composer.lock`, next to an executable shim `tools/phpstan` that installs missing dependencies
//! and forwards every invocation. Installed tools and their extensions are tracked in the
//! project's `composer.json` under `extra.cotor`, so `cotor install` can restore them later.
//!
//! This library is built for the `cotor` CLI, but the [`Installer`] can be driven by other
//! front ends as well.
//!
//! ## Modules Overview
//! - [`installer`] – Install, extend, update and batch workflows
//! - [`composer`] – Running the composer executable
//! - [`registry`] – Shortcuts for well-known tools and resolving tool identifiers
//! - [`package`] – `vendor/name` packages with version constraints
//! - [`version`] – Semantic versions and the constraints derived from them
//! - [`manifest`] – Reading and writing `composer.json` without losing its layout
//! - [`extra`] – The `extra.cotor` tracking block
//! - [`lock`] – Reading resolved versions from `composer.lock`
//! - [`shims`] – Creating the executable shims
//! - [`paths`] – Layout of the tools directory
//! - [`config`] – `cotor.toml` configuration
//! - [`report`] – User-facing messages
//! - [`logging`] – Diagnostic logging
//! - [`error`] – Errors and operation outcomes

pub mod composer;
pub mod config;
pub mod error;
pub mod extra;
pub mod installer;
pub mod lock;
pub mod logging;
pub mod manifest;
pub mod package;
pub mod paths;
pub mod registry;
pub mod report;
pub mod shims;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;

pub use composer::{CommandOutput, Composer, ProcessRunner, Runner};
pub use config::Config;
pub use error::{CotorError, ErrorKind, Outcome};
pub use extra::TrackedExtensions;
pub use installer::{parse_outdated, InstallOptions, Installer, OutdatedStatus};
pub use lock::{ComposerLock, LockedPackage};
pub use manifest::ComposerJson;
pub use package::Package;
pub use report::{ConsoleReporter, Level, Reporter};
pub use shims::*;
pub use version::SemanticVersion;
