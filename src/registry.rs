use crate::error::{CotorError, Result};
use crate::package::{Package, WILDCARD};

/// Short names that can be used instead of a tool's composer name.
///
/// Lookups are case-sensitive. Misspelled aliases of popular tools are kept on purpose.
pub const REGISTERED_TOOLS: &[(&str, &str)] = &[
    ("php-cs-fixer", "friendsofphp/php-cs-fixer"),
    ("phpcsfixer", "friendsofphp/php-cs-fixer"),
    ("phpstan", "phpstan/phpstan"),
    ("phpunit", "phpunit/phpunit"),
    ("psalm", "vimeo/psalm"),
    ("pslam", "vimeo/psalm"),
    ("rector", "rector/rector"),
];

/// Returns the composer name registered for `alias`.
pub fn lookup(alias: &str) -> Option<&'static str> {
    REGISTERED_TOOLS
        .iter()
        .find(|(short, _)| *short == alias)
        .map(|(_, composer_name)| *composer_name)
}

/// All registered shortcuts, in registration order.
pub fn shortcuts() -> Vec<&'static str> {
    REGISTERED_TOOLS.iter().map(|(short, _)| *short).collect()
}

/// Resolves a tool identifier given by the user.
///
/// The identifier is either a registered alias or a `vendor/name` composer name, each
/// optionally followed by `:<constraint>`.
///
/// # Errors
/// [`CotorError::UnknownTool`] for an unregistered alias and
/// [`CotorError::InvalidPackageName`] for a malformed composer name.
///
/// # Example
///
/// ```
/// use cotor::registry::resolve;
///
/// let package = resolve("phpstan:^1.10").unwrap();
/// assert_eq!(package.composer_name(), "phpstan/phpstan");
/// assert_eq!(package.version(), "^1.10");
/// ```
pub fn resolve(identifier: &str) -> Result<Package> {
    let (name, version) = match identifier.split_once(':') {
        Some((name, version)) if !version.is_empty() => (name, version),
        Some((name, _)) => (name, WILDCARD),
        None => (identifier, WILDCARD),
    };
    if name.contains('/') {
        return Package::from_composer_name(name, version);
    }
    let composer_name = lookup(name).ok_or_else(|| CotorError::UnknownTool(name.to_string()))?;
    Package::from_composer_name(composer_name, version)
}
