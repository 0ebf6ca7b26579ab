use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use regex::Regex;
use semver::Version;
use crate::error::{CotorError, Result};

static STRICT_SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)$").expect("valid semver pattern"));

/// A strict `major.minor.patch` version as found in a tool's `composer.lock`.
///
/// Only plain releases are accepted (an optional leading `v` is allowed), pre-release
/// or build suffixes are rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SemanticVersion {
    inner: Version,
}

impl SemanticVersion {
    /// # Errors
    /// Returns [`CotorError::InvalidVersion`] if `version` does not match `v?\d+\.\d+\.\d+`.
    pub fn parse(version: &str) -> Result<SemanticVersion> {
        let invalid = || CotorError::InvalidVersion(version.to_string());
        let captures = STRICT_SEMVER.captures(version).ok_or_else(invalid)?;
        let part = |i: usize| -> Result<u64> {
            captures[i].parse::<u64>().map_err(|_| invalid())
        };
        Ok(SemanticVersion {
            inner: Version::new(part(1)?, part(2)?, part(3)?),
        })
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// The caret constraint pinning the major and minor part, e.g. `3.4.12` → `^3.4`.
    pub fn to_minor_constraint(&self) -> String {
        format!("^{}.{}", self.inner.major, self.inner.minor)
    }

    pub fn as_semver(&self) -> &Version {
        &self.inner
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl FromStr for SemanticVersion {
    type Err = CotorError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}
