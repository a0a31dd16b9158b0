use std::io::Write;
use std::process::ExitCode;

use args::ValidatedCommand;
use error::{AppError, AppErrorKind};

mod args;
mod error;
mod fetch;
mod logging;
mod progress;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // A failed fetch has already been reported
            if *err.error_kind() != AppErrorKind::Fetch {
                eprintln!("❌ {err}");
                let mut cause = std::error::Error::source(&err);
                while let Some(e) = cause {
                    eprintln!("   caused by: {e}");
                    cause = e.source();
                }
            }
            err.into()
        }
    }
}

fn run() -> Result<(), AppError> {
    let args = args::parse()?;
    logging::init(args.verbose);

    match args.command {
        ValidatedCommand::Fetch { config, format } => fetch::run(config, format),
        ValidatedCommand::Connection { format } => {
            let data = mercurial_source::ConnectionData::mercurial();
            let mut stdout = std::io::stdout().lock();
            match fetch::render(&data, format)? {
                Some(rendered) => writeln!(stdout, "{rendered}")?,
                None => {
                    writeln!(stdout, "{}", data.connection_type)?;
                    for field in &data.fields {
                        writeln!(stdout, "  {field}")?;
                    }
                }
            }
            Ok(())
        }
        ValidatedCommand::Icon { icon } => {
            writeln!(
                std::io::stdout().lock(),
                "{}",
                mercurial_source::load_icon(icon.as_deref())
            )?;
            Ok(())
        }
    }
}
