use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, CotorError>;

/// Result of a user-facing operation, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation completed.
    Success,
    /// The operation was attempted and composer or the filesystem rejected it.
    Failure,
    /// A precondition stopped the operation before anything was attempted.
    Invalid,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Failure => 1,
            Outcome::Invalid => 2,
        }
    }

    /// Combines two outcomes of a batch, keeping the more severe one.
    pub fn worst(self, other: Outcome) -> Outcome {
        match (self, other) {
            (Outcome::Failure, _) | (_, Outcome::Failure) => Outcome::Failure,
            (Outcome::Invalid, _) | (_, Outcome::Invalid) => Outcome::Invalid,
            _ => Outcome::Success,
        }
    }
}

/// Broad classes of [`CotorError`], deciding how an error is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UserInput,
    Precondition,
    ExternalProcess,
    Manifest,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum CotorError {
    #[error("Unknown tool {0}!")]
    UnknownTool(String),

    #[error("Invalid package name \"{0}\", expected <vendor>/<name>")]
    InvalidPackageName(String),

    #[error("Given string ({0}) is no valid semver string!")]
    InvalidVersion(String),

    #[error("Do not add a version to the extension name! Try: cotor extend {tool} {extension} {version}")]
    VersionInExtensionName {
        tool: String,
        extension: String,
        version: String,
    },

    #[error("{0} is already installed. You can update it with \"cotor update {0}\" or force a re-installation with the \"--force\" flag.")]
    AlreadyInstalled(String),

    #[error("{0} is not installed. You can install it with \"cotor install {0}\".")]
    NotInstalled(String),

    #[error("There is no tools directory! Did you miss to install something first?")]
    MissingToolsDir,

    #[error("No composer.json found!")]
    MissingManifest,

    #[error("No tools specified in composer.json. Please give the short name of the tool or its composer name for installation.")]
    NoTrackedTools,

    #[error("Failed to run composer: {stderr}")]
    Process { command: String, stderr: String },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse composer.json: {0}")]
    ManifestParse(#[source] serde_json::Error),

    #[error("composer.json must contain a JSON object")]
    ManifestNotObject,

    #[error("Failed to serialize composer.json: {0}")]
    ManifestSerialize(#[source] serde_json::Error),

    #[error("Failed to parse {path}: {source}")]
    LockParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CotorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CotorError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CotorError::UnknownTool(_)
            | CotorError::InvalidPackageName(_)
            | CotorError::InvalidVersion(_)
            | CotorError::VersionInExtensionName { .. } => ErrorKind::UserInput,
            CotorError::AlreadyInstalled(_)
            | CotorError::NotInstalled(_)
            | CotorError::MissingToolsDir
            | CotorError::MissingManifest
            | CotorError::NoTrackedTools => ErrorKind::Precondition,
            CotorError::Process { .. } | CotorError::Spawn { .. } => ErrorKind::ExternalProcess,
            CotorError::ManifestParse(_)
            | CotorError::ManifestNotObject
            | CotorError::ManifestSerialize(_)
            | CotorError::LockParse { .. } => ErrorKind::Manifest,
            CotorError::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self.kind() {
            ErrorKind::UserInput | ErrorKind::Precondition => Outcome::Invalid,
            ErrorKind::ExternalProcess | ErrorKind::Io | ErrorKind::Manifest => Outcome::Failure,
        }
    }
}
