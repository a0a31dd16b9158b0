use std::io::Write;
use std::sync::Arc;

use mercurial_source::{DataSourceConfig, FetchOutcome, MercurialDataSource};

use crate::args::OutputFormat;
use crate::error::AppError;
use crate::progress::{SpinnerLogger, complete_progress_spinner, make_progress_spinner};

/// Serialise `value` in the requested format, or `None` for human-readable output.
pub fn render<T: serde::Serialize>(
    value: &T,
    format: Option<OutputFormat>,
) -> Result<Option<String>, AppError> {
    match format {
        Some(OutputFormat::Json) => serde_json::to_string_pretty(value)
            .map(Some)
            .map_err(|e| AppError::output("json", e)),
        Some(OutputFormat::Toml) => toml::to_string(value)
            .map(Some)
            .map_err(|e| AppError::output("toml", e)),
        None => Ok(None),
    }
}

pub fn run(config: DataSourceConfig, format: Option<OutputFormat>) -> Result<(), AppError> {
    let prefix = config
        .name
        .clone()
        .unwrap_or_else(|| config.params.repo_url.clone());
    let bar = make_progress_spinner(prefix);
    let source = MercurialDataSource::from_config(config)
        .with_logger(Arc::new(SpinnerLogger::new(bar.clone())));

    let result = source.fetch();
    let outcome = FetchOutcome::from(&result);
    let message = match &result {
        Ok(artefact) => format!("😸 {} -> {}", bar.prefix(), artefact.local.display()),
        Err(_) => format!("😿 failed to fetch '{}'", bar.prefix()),
    };
    complete_progress_spinner(&bar, result.is_ok(), message);

    let mut stdout = std::io::stdout().lock();
    match render(&outcome, format)? {
        Some(rendered) => writeln!(stdout, "{rendered}")?,
        None => match &result {
            Ok(artefact) => writeln!(
                stdout,
                "✅ 🔗 Cloned repository into {}",
                artefact.local.display()
            )?,
            Err(err) => {
                eprintln!("❌ Failed to fetch source ({}): {}", outcome.status, err)
            }
        },
    }

    match result {
        Ok(_) => Ok(()),
        Err(_) => Err(AppError::fetch()),
    }
}
