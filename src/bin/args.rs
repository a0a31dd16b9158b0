use std::path::PathBuf;

use clap::FromArgMatches;
use clap::{CommandFactory, Parser};

use mercurial_source::{DataSourceConfig, MercurialParams};

use crate::error::AppError;

// Shamelessly borrowed from https://github.com/crate-ci/clap-cargo/blob/0378657ffdf2b67bcd6f1ab56e04a1322b92dd0e/src/style.rs
use anstyle::AnsiColor::*;
use anstyle::Effects;
use anstyle::Style;

const HEADER: Style = Green.on_default().effects(Effects::BOLD);
const USAGE: Style = Green.on_default().effects(Effects::BOLD);
const LITERAL: Style = Cyan.on_default().effects(Effects::BOLD);
const PLACEHOLDER: Style = Cyan.on_default();
const ERROR: Style = Red.on_default().effects(Effects::BOLD);
const VALID: Style = Cyan.on_default().effects(Effects::BOLD);
const INVALID: Style = Yellow.on_default().effects(Effects::BOLD);

const APP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(HEADER)
    .usage(USAGE)
    .literal(LITERAL)
    .placeholder(PLACEHOLDER)
    .error(ERROR)
    .valid(VALID)
    .invalid(INVALID);

#[derive(Debug, Parser)]
#[command(name = "fetch-mercurial")]
#[command(about = "Clone a Mercurial repository into a local directory")]
#[command(long_about = None)]
#[command(styles = APP_STYLING)]
#[command(term_width = 80)]
struct Args {
    /// Log debug output. Otherwise the level is taken from `RUST_LOG`, defaulting to info.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Clone a repository with `hg clone`
    Fetch {
        /// TOML file describing the data source. Its `[params]` table must give `repo_url` and
        /// `target_directory`.
        #[arg(
            long,
            short = 'p',
            value_name = "PATH",
            conflicts_with_all = ["repo_url", "target_directory"]
        )]
        params: Option<PathBuf>,

        /// Remote repository to clone.
        #[arg(long, value_name = "URL")]
        repo_url: Option<String>,

        /// Directory to clone into. Created if it does not exist.
        #[arg(long, value_name = "PATH")]
        target_directory: Option<PathBuf>,

        /// The `hg` executable to run. If omitted, check the `HG` environment variable and then
        /// `hg` on `PATH`.
        #[arg(long, value_name = "PATH")]
        hg: Option<String>,

        /// Kill `hg` if the clone takes longer than this many seconds.
        #[arg(long, short = 't', value_name = "SECS")]
        timeout: Option<u64>,

        /// Output format for the fetch outcome
        #[arg(long, short = 'f', value_enum, value_name = "FORMAT")]
        format: Option<OutputFormat>,
    },
    /// Print the connection type and the fields needed to configure it
    Connection {
        /// Output format
        #[arg(long, short = 'f', value_enum, value_name = "FORMAT")]
        format: Option<OutputFormat>,
    },
    /// Print the connector's SVG icon
    Icon {
        /// SVG file to use. The built-in icon is printed if it can't be read.
        #[arg(long, value_name = "PATH")]
        icon: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Output in JSON format
    Json,
    /// Output in TOML format
    Toml,
}

#[derive(Debug)]
pub struct ValidatedArgs {
    pub verbose: bool,
    pub command: ValidatedCommand,
}

#[derive(Debug)]
pub enum ValidatedCommand {
    Fetch {
        config: DataSourceConfig,
        format: Option<OutputFormat>,
    },
    Connection {
        format: Option<OutputFormat>,
    },
    Icon {
        icon: Option<PathBuf>,
    },
}

impl ValidatedArgs {
    fn load_params_file(path: PathBuf) -> Result<DataSourceConfig, AppError> {
        DataSourceConfig::read(&path).map_err(|err| match err {
            mercurial_source::Error::Parse(err) => {
                AppError::params_parse(path.display().to_string(), err)
            }
            mercurial_source::Error::Io(err) => {
                AppError::params_read(path.display().to_string(), err)
            }
        })
    }

    fn config_from_flags(
        repo_url: Option<String>,
        target_directory: Option<PathBuf>,
    ) -> Result<DataSourceConfig, AppError> {
        let params = MercurialParams::try_from_parts(repo_url, target_directory).map_err(|e| {
            AppError::arg_validation(format!(
                "{e}: give --params or both --repo-url and --target-directory"
            ))
        })?;
        Ok(DataSourceConfig {
            name: None,
            session: None,
            dependencies: Vec::new(),
            subscribers: Vec::new(),
            params,
        })
    }
}

impl TryFrom<Command> for ValidatedCommand {
    type Error = AppError;

    fn try_from(command: Command) -> Result<Self, Self::Error> {
        match command {
            Command::Fetch {
                params,
                repo_url,
                target_directory,
                hg,
                timeout,
                format,
            } => {
                let mut config = match params {
                    Some(path) => ValidatedArgs::load_params_file(path)?,
                    None => ValidatedArgs::config_from_flags(repo_url, target_directory)?,
                };
                // Flags override the params file
                if hg.is_some() {
                    config.params.hg = hg;
                }
                if timeout.is_some() {
                    config.params.timeout_secs = timeout;
                }
                config
                    .params
                    .validate()
                    .map_err(|e| AppError::arg_validation(e.to_string()))?;
                Ok(ValidatedCommand::Fetch { config, format })
            }
            Command::Connection { format } => Ok(ValidatedCommand::Connection { format }),
            Command::Icon { icon } => Ok(ValidatedCommand::Icon { icon }),
        }
    }
}

static VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn parse() -> Result<ValidatedArgs, AppError> {
    let matches = Args::command().version(VERSION).get_matches();
    let args = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(err) => {
            err.format(&mut Args::command()).exit();
        }
    };
    Ok(ValidatedArgs {
        verbose: args.verbose,
        command: ValidatedCommand::try_from(args.command)?,
    })
}
