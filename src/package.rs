use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use regex::Regex;
use crate::error::{CotorError, Result};

/// A single vendor or package segment as composer accepts it. Also keeps `.` and `..`
/// out of the paths derived from package names.
static NAME_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([_.-]?[a-z0-9]+)*$").expect("valid name pattern"));

/// Version used when no constraint was requested.
pub const WILDCARD: &str = "*";

/// A composer package identity with the version constraint it should be installed at.
///
/// Packages are values: [`Package::with_version`] returns a new instance instead of
/// mutating the existing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Package {
    vendor: String,
    name: String,
    version: String,
}

impl Package {
    /// Creates a package from its parts.
    ///
    /// # Errors
    /// Returns [`CotorError::InvalidPackageName`] if `vendor` or `name` is not a valid
    /// composer name segment (lowercase alphanumerics joined by single `_`, `.` or `-`).
    pub fn new(vendor: &str, name: &str, version: &str) -> Result<Package> {
        if !is_valid_part(vendor) || !is_valid_part(name) {
            return Err(CotorError::InvalidPackageName(format!("{vendor}/{name}")));
        }
        Ok(Package {
            vendor: vendor.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    /// Parses a combined `vendor/name` string.
    ///
    /// # Errors
    /// Fails unless the string contains exactly one `/` with a non-empty part on each side.
    pub fn from_composer_name(composer_name: &str, version: &str) -> Result<Package> {
        let mut split = composer_name.split('/');
        match (split.next(), split.next(), split.next()) {
            (Some(vendor), Some(name), None) => Package::new(vendor, name, version)
                .map_err(|_| CotorError::InvalidPackageName(composer_name.to_string())),
            _ => Err(CotorError::InvalidPackageName(composer_name.to_string())),
        }
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The `vendor/name` identity used as lookup key in lock files and manifests.
    pub fn composer_name(&self) -> String {
        format!("{}/{}", self.vendor, self.name)
    }

    pub fn with_version(&self, version: &str) -> Package {
        Package {
            vendor: self.vendor.clone(),
            name: self.name.clone(),
            version: version.to_string(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.version == WILDCARD
    }

    /// The argument handed to `composer require`: the bare name when unconstrained,
    /// `vendor/name:<constraint>` otherwise.
    pub fn require_argument(&self) -> String {
        if self.is_wildcard() || self.version.is_empty() {
            self.composer_name()
        } else {
            format!("{}:{}", self.composer_name(), self.version)
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vendor, self.name)
    }
}

impl FromStr for Package {
    type Err = CotorError;

    fn from_str(s: &str) -> Result<Self> {
        Package::from_composer_name(s, WILDCARD)
    }
}

fn is_valid_part(part: &str) -> bool {
    NAME_PART.is_match(part)
}
