use crate::outcome::FetchStatus;

/// The main error enum for this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] SourceParseError),
}

/// Errors encountered when building a data source from its parameters.
#[derive(Debug, thiserror::Error)]
pub enum SourceParseError {
    /// A required parameter was not given.
    #[error("missing required parameter '{key}'")]
    MissingParameter { key: String },

    /// A required parameter was given as an empty string.
    #[error("parameter '{key}' must not be empty")]
    EmptyParameter { key: String },

    /// An optional parameter could not be interpreted.
    #[error("invalid value '{value}' for parameter '{key}'")]
    InvalidParameter { key: String, value: String },

    /// The `params` value of a data source document was not a table.
    #[error("expected 'params' to be a toml table")]
    ParamsNotTable,

    /// A toml deserialisation error occurred.
    #[error(transparent)]
    TomlInvalid(#[from] toml::de::Error),

    /// A json error occurred.
    #[error(transparent)]
    JsonInvalid(#[from] serde_json::Error),
}

/// Every way a fetch can fail. None of these are swallowed: each is logged and then returned.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to create directory '{}'", .path.display())]
    DirectoryCreation {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Command '{command}' exited with status {status}\n{stderr}")]
    Clone {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("failed to run command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command '{command}' timed out after {}s", .after.as_secs())]
    TimedOut {
        command: String,
        after: std::time::Duration,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// The outcome classification of this failure.
    pub fn status(&self) -> FetchStatus {
        match self {
            Self::DirectoryCreation { .. } => FetchStatus::DirectoryCreationFailed,
            Self::Clone { .. } => FetchStatus::CloneFailed,
            Self::Spawn { .. } | Self::TimedOut { .. } | Self::Io(_) => {
                FetchStatus::UnexpectedError
            }
        }
    }

    /// Human-readable detail. For a failed clone this is exactly the trimmed stderr of `hg`.
    pub fn detail(&self) -> String {
        match self {
            Self::DirectoryCreation { source, .. } => source.to_string(),
            Self::Clone { stderr, .. } => stderr.clone(),
            other => other.to_string(),
        }
    }
}
