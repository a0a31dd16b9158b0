//! The Mercurial data source as a host framework sees it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{DataSourceConfig, MercurialParams};
use crate::error::SourceParseError;
use crate::logger::{Logger, TracingLogger};
use crate::metadata::{ConnectionData, load_icon};
use crate::outcome::FetchResult;

/// Fields every data source in a host framework carries.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct DataSourceInfo {
    pub name: Option<String>,
    /// Opaque session handle owned by the host.
    pub session: Option<String>,
    /// Names of data sources that must be fetched before this one.
    pub dependencies: Vec<String>,
    /// Names of consumers notified by the host when this source has been fetched.
    pub subscribers: Vec<String>,
}

impl DataSourceInfo {
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Clones a Mercurial repository into a local directory.
pub struct MercurialDataSource {
    info: DataSourceInfo,
    params: MercurialParams,
    logger: Arc<dyn Logger>,
    icon_path: Option<PathBuf>,
}

impl std::fmt::Debug for MercurialDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MercurialDataSource")
            .field("info", &self.info)
            .field("params", &self.params)
            .field("icon_path", &self.icon_path)
            .finish_non_exhaustive()
    }
}

impl MercurialDataSource {
    /// Logs through `tracing` until another logger is given with [`with_logger`](Self::with_logger).
    pub fn new(info: DataSourceInfo, params: MercurialParams) -> Self {
        Self {
            info,
            params,
            logger: Arc::new(TracingLogger),
            icon_path: None,
        }
    }

    /// Build from an untyped parameter table. Missing or empty required keys fail here rather
    /// than when fetching.
    pub fn from_table(info: DataSourceInfo, params: &toml::Table) -> Result<Self, SourceParseError> {
        Ok(Self::new(info, MercurialParams::try_from_table(params)?))
    }

    pub fn from_config(config: DataSourceConfig) -> Self {
        let info = DataSourceInfo {
            name: config.name,
            session: config.session,
            dependencies: config.dependencies,
            subscribers: config.subscribers,
        };
        Self::new(info, config.params)
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Where to look for the SVG returned by [`get_icon`](Self::get_icon).
    pub fn with_icon_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.icon_path = Some(path.into());
        self
    }

    pub fn info(&self) -> &DataSourceInfo {
        &self.info
    }

    pub fn params(&self) -> &MercurialParams {
        &self.params
    }

    pub fn name(&self) -> Option<&str> {
        self.info.name.as_deref()
    }

    /// Clone `repo_url` into `target_directory`.
    pub fn fetch(&self) -> FetchResult {
        self.params.to_spec().fetch(self.logger.as_ref())
    }

    pub fn get_icon(&self) -> String {
        load_icon(self.icon_path.as_deref())
    }

    pub fn get_connection_data(&self) -> ConnectionData {
        ConnectionData::mercurial()
    }

    pub fn icon_path(&self) -> Option<&Path> {
        self.icon_path.as_deref()
    }
}
