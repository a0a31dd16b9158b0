//! Typed parameters for a Mercurial data source, and the TOML documents they are read from.
//!
//! A data source document looks like this:
//!
//! ```toml
//! name = "upstream-hg"
//! dependencies = []
//!
//! [params]
//! repo_url = "https://www.mercurial-scm.org/repo/hello"
//! target_directory = "/srv/mirrors/hello"
//! # Optional: path to the hg executable, otherwise `$HG` or `hg` on PATH
//! hg = "/usr/local/bin/hg"
//! # Optional: kill the clone after this many seconds
//! timeout_secs = 600
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, SourceParseError};
use crate::hg::{DEFAULT_PROGRAM, HgSpec};

/// Keys every parameter mapping must provide, in the order a configuration form shows them.
pub const REQUIRED_PARAMETERS: &[&str] = &["repo_url", "target_directory"];

/// Environment variable naming the `hg` executable when no `hg` parameter is given.
pub const HG_ENV_VAR: &str = "HG";

#[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq, Clone)]
pub struct MercurialParams {
    pub repo_url: String,
    pub target_directory: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl MercurialParams {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(repo_url: S, target_directory: P) -> Self {
        Self {
            repo_url: repo_url.into(),
            target_directory: target_directory.into(),
            hg: None,
            timeout_secs: None,
        }
    }

    fn enforce_required<'a, F>(lookup: F) -> Result<(), SourceParseError>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        for key in REQUIRED_PARAMETERS {
            match lookup(*key) {
                None => {
                    return Err(SourceParseError::MissingParameter {
                        key: key.to_string(),
                    });
                }
                Some("") => {
                    return Err(SourceParseError::EmptyParameter {
                        key: key.to_string(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Parse a toml table of parameters. Both required keys must be present and non-empty.
    pub fn try_from_table(table: &toml::Table) -> Result<Self, SourceParseError> {
        // A key holding a non-string value is left for serde to report
        Self::enforce_required(|key| {
            table
                .get(key)
                .map(|value| value.as_str().unwrap_or("<non-string>"))
        })?;
        let params = toml::Value::Table(table.to_owned()).try_into::<Self>()?;
        params.validate()?;
        Ok(params)
    }

    /// Build from values that may be absent, such as command-line flags. The path is kept as
    /// given, so non-UTF-8 directories survive.
    pub fn try_from_parts(
        repo_url: Option<String>,
        target_directory: Option<PathBuf>,
    ) -> Result<Self, SourceParseError> {
        let missing = |key: &str| SourceParseError::MissingParameter {
            key: key.to_string(),
        };
        let empty = |key: &str| SourceParseError::EmptyParameter {
            key: key.to_string(),
        };
        let repo_url = repo_url.ok_or_else(|| missing("repo_url"))?;
        if repo_url.is_empty() {
            return Err(empty("repo_url"));
        }
        let target_directory = target_directory.ok_or_else(|| missing("target_directory"))?;
        if target_directory.as_os_str().is_empty() {
            return Err(empty("target_directory"));
        }
        Ok(Self::new(repo_url, target_directory))
    }

    /// Check the optional parameters. A zero timeout would kill every clone on the first poll.
    pub fn validate(&self) -> Result<(), SourceParseError> {
        if self.timeout_secs == Some(0) {
            return Err(SourceParseError::InvalidParameter {
                key: "timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Parse a plain string mapping, as a host framework might hold it.
    pub fn try_from_map(map: &HashMap<String, String>) -> Result<Self, SourceParseError> {
        Self::enforce_required(|key| map.get(key).map(String::as_str))?;
        let timeout_secs = match map.get("timeout_secs") {
            Some(secs) => Some(secs.parse::<u64>().map_err(|_| {
                SourceParseError::InvalidParameter {
                    key: "timeout_secs".to_string(),
                    value: secs.clone(),
                }
            })?),
            None => None,
        };
        let params = Self {
            repo_url: map["repo_url"].clone(),
            target_directory: PathBuf::from(&map["target_directory"]),
            hg: map.get("hg").cloned(),
            timeout_secs,
        };
        params.validate()?;
        Ok(params)
    }

    /// The executable to run: the `hg` parameter, then `$HG`, then `hg` on `PATH`.
    pub fn program(&self) -> String {
        resolve_program(self.hg.as_deref(), std::env::var(HG_ENV_VAR).ok())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The clone this configuration describes.
    pub fn to_spec(&self) -> HgSpec {
        HgSpec::new(self.repo_url.clone(), self.target_directory.clone())
            .with_program(self.program())
            .with_timeout(self.timeout())
    }
}

fn resolve_program(param: Option<&str>, env: Option<String>) -> String {
    match (param, env) {
        (Some(program), _) if !program.is_empty() => program.to_string(),
        (_, Some(program)) if !program.is_empty() => program,
        _ => DEFAULT_PROGRAM.to_string(),
    }
}

/// A whole data source document: the shared data source fields plus `[params]`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DataSourceConfig {
    pub name: Option<String>,
    pub session: Option<String>,
    pub dependencies: Vec<String>,
    pub subscribers: Vec<String>,
    pub params: MercurialParams,
}

#[derive(Debug, serde::Deserialize)]
struct RawDataSourceConfig {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    session: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    subscribers: Vec<String>,
    #[serde(default)]
    params: Option<toml::Value>,
}

impl DataSourceConfig {
    /// Parse a data source document. A missing `[params]` table reports the first missing key.
    pub fn try_parse_toml<S: AsRef<str>>(toml_str: S) -> Result<Self, SourceParseError> {
        let raw: RawDataSourceConfig = toml::from_str(toml_str.as_ref())?;
        let params = match raw.params {
            Some(toml::Value::Table(table)) => MercurialParams::try_from_table(&table)?,
            Some(_) => return Err(SourceParseError::ParamsNotTable),
            None => MercurialParams::try_from_table(&toml::Table::new())?,
        };
        Ok(Self {
            name: raw.name,
            session: raw.session,
            dependencies: raw.dependencies,
            subscribers: raw.subscribers,
            params,
        })
    }

    /// Read and parse a data source document from disk.
    pub fn read<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        let document = std::fs::read_to_string(path)?;
        Ok(Self::try_parse_toml(document)?)
    }
}

#[cfg(test)]
use SourceParseError::*;


#[cfg(test)]
mod test_parsing_documents {
    use super::*;

    #[test]
    fn parse_full_document() {
        let document = r#"
            name = "upstream-hg"
            session = "abc123"
            dependencies = ["credentials"]
            subscribers = ["indexer"]

            [params]
            repo_url = "https://hg.example.com/repo"
            target_directory = "/tmp/repo"
        "#;
        let config = DataSourceConfig::try_parse_toml(document).unwrap();
        assert_eq!(config.name.as_deref(), Some("upstream-hg"));
        assert_eq!(config.session.as_deref(), Some("abc123"));
        assert_eq!(config.dependencies, vec!["credentials"]);
        assert_eq!(config.subscribers, vec!["indexer"]);
        assert_eq!(config.params.repo_url, "https://hg.example.com/repo");
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            DataSourceConfig::read(tmp.path().join("nope.toml")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn parse_invalid_toml_str_fails() {
        let document = "this is not a valid toml document :( uh-oh!";
        assert!(matches!(
            DataSourceConfig::try_parse_toml(document),
            Err(TomlInvalid(_))
        ));
    }

    #[test]
    fn parse_doc_missing_params_fails() {
        let document = r#"name = "no-params""#;
        assert!(matches!(
            DataSourceConfig::try_parse_toml(document),
            Err(MissingParameter { key }) if key == "repo_url"
        ));
    }

    #[test]
    fn parse_doc_params_not_a_table_fails() {
        let document = r#"params = "actually a string""#;
        assert!(matches!(
            DataSourceConfig::try_parse_toml(document),
            Err(ParamsNotTable)
        ));
    }
}
