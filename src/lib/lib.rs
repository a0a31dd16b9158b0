//! A data source connector that clones a Mercurial repository into a local directory.
//!
//! The clone itself is delegated to the `hg` executable, which must be installed and available
//! on `PATH` (or named by the `HG` environment variable, or the `hg` parameter). This crate
//! prepares the target directory, runs `hg clone <repo_url> <target_directory>`, and reports
//! what happened both through an injected [`Logger`] and as a returned [`FetchResult`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use mercurial_source::{DataSourceInfo, MercurialDataSource, MercurialParams, FetchOutcome};
//!
//! let params = MercurialParams::new(
//!     "https://www.mercurial-scm.org/repo/hello",
//!     std::env::temp_dir().join("hello"),
//! );
//! let source = MercurialDataSource::new(DataSourceInfo::named("hello"), params);
//! let result = source.fetch();
//! println!("{}", FetchOutcome::from(&result));
//! ```
//!
//! Parameters can also be read from a TOML document, see [`DataSourceConfig`]:
//!
//! ```rust
//! use mercurial_source::{DataSourceConfig, MercurialDataSource};
//!
//! let document = r#"
//! name = "hello"
//!
//! [params]
//! repo_url = "https://www.mercurial-scm.org/repo/hello"
//! target_directory = "/srv/mirrors/hello"
//! "#;
//! let source = MercurialDataSource::from_config(DataSourceConfig::try_parse_toml(document)?);
//! assert_eq!(source.get_connection_data().connection_type, "Mercurial");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Failures
//!
//! Every failure is logged and then returned as a [`FetchError`]; nothing is swallowed. Use
//! [`FetchError::status`] or [`FetchOutcome`] to classify it as `directory-creation-failed`,
//! `clone-failed` or `unexpected-error`. A missing `repo_url` or `target_directory` is caught
//! earlier, when the parameters are parsed.
//!
//! No timeout is applied unless `timeout_secs` is set, so a hung `hg` blocks the caller.

mod config;
mod error;
pub mod hg;
pub mod logger;
mod metadata;
mod outcome;
mod source;

#[doc(inline)]
pub use crate::config::{DataSourceConfig, HG_ENV_VAR, MercurialParams, REQUIRED_PARAMETERS};
#[doc(inline)]
pub use crate::error::{Error, FetchError, SourceParseError};
#[doc(inline)]
pub use crate::hg::HgSpec;
#[doc(inline)]
pub use crate::logger::{Logger, MemoryLogger, TracingLogger};
#[doc(inline)]
pub use crate::metadata::{
    BUNDLED_ICON, CONNECTION_TYPE, ConnectionData, DEFAULT_ICON, load_icon,
};
#[doc(inline)]
pub use crate::outcome::{FetchOutcome, FetchResult, FetchStatus, HgArtefact};
#[doc(inline)]
pub use crate::source::{DataSourceInfo, MercurialDataSource};
