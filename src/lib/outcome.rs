//! The result of fetching a repository, in a shape hosts can inspect or serialise.

use crate::error::FetchError;

pub type FetchResult = Result<HgArtefact, FetchError>;

/// A working copy produced by a successful clone.
#[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq, Clone)]
pub struct HgArtefact {
    pub local: std::path::PathBuf,
    pub remote: String,
}

#[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum FetchStatus {
    Succeeded,
    DirectoryCreationFailed,
    CloneFailed,
    UnexpectedError,
}

impl FetchStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::DirectoryCreationFailed => write!(f, "directory-creation-failed"),
            Self::CloneFailed => write!(f, "clone-failed"),
            Self::UnexpectedError => write!(f, "unexpected-error"),
        }
    }
}

/// One classification plus detail text per fetch.
#[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq, Clone)]
pub struct FetchOutcome {
    pub status: FetchStatus,
    pub detail: String,
}

impl From<&FetchResult> for FetchOutcome {
    fn from(result: &FetchResult) -> Self {
        match result {
            Ok(artefact) => Self {
                status: FetchStatus::Succeeded,
                detail: format!(
                    "cloned {} into {}",
                    artefact.remote,
                    artefact.local.display()
                ),
            },
            Err(err) => Self {
                status: err.status(),
                detail: err.detail(),
            },
        }
    }
}

impl std::fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.detail)
    }
}
