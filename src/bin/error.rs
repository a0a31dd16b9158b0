use std::process::ExitCode;

/// Categories of application errors that can be matched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorKind {
    /// Argument validation errors
    ArgValidation,
    /// General IO errors
    IO,
    /// Params file reading errors
    ParamsRead,
    /// Params file parsing errors
    ParamsParse,
    /// The fetch failed. The failure has already been logged and reported, so this variant only
    /// exists to produce the correct `ExitCode`.
    Fetch,
    /// Errors rendering output
    Output,
}

/// Internal error type that contains all application error variants.
#[derive(Debug, thiserror::Error)]
pub enum AppErrorInner {
    #[error("Argument error: {0}")]
    ArgValidation(String),
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("Failed to read params file: {params}")]
    ParamsRead {
        params: String,
        #[source]
        err: std::io::Error,
    },
    #[error("Failed to parse params file: {params}")]
    ParamsParse {
        params: String,
        #[source]
        err: mercurial_source::SourceParseError,
    },
    #[error("Failed to fetch repository")]
    Fetch,
    #[error("Failed to render output as {format}: {message}")]
    Output { format: String, message: String },
}

/// The main application-level error type. We keep the concrete error kind so it can be turned
/// into an exit code after the error has been reported.
///
/// This type uses the newtype pattern to wrap a boxed inner error, reducing stack size.
#[derive(Debug)]
pub struct AppError(Box<AppErrorInner>, AppErrorKind);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl AppError {
    pub fn new(inner: AppErrorInner, kind: AppErrorKind) -> Self {
        Self(Box::new(inner), kind)
    }

    /// Get the error kind for pattern matching
    pub fn error_kind(&self) -> &AppErrorKind {
        &self.1
    }

    pub fn arg_validation(msg: String) -> Self {
        Self::new(AppErrorInner::ArgValidation(msg), AppErrorKind::ArgValidation)
    }

    pub fn params_read(params: String, err: std::io::Error) -> Self {
        Self::new(AppErrorInner::ParamsRead { params, err }, AppErrorKind::ParamsRead)
    }

    pub fn params_parse(params: String, err: mercurial_source::SourceParseError) -> Self {
        Self::new(AppErrorInner::ParamsParse { params, err }, AppErrorKind::ParamsParse)
    }

    pub fn fetch() -> Self {
        Self::new(AppErrorInner::Fetch, AppErrorKind::Fetch)
    }

    pub fn output<S: ToString>(format: &str, message: S) -> Self {
        Self::new(
            AppErrorInner::Output {
                format: format.to_string(),
                message: message.to_string(),
            },
            AppErrorKind::Output,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::new(AppErrorInner::IO(err), AppErrorKind::IO)
    }
}

impl From<AppError> for ExitCode {
    fn from(error: AppError) -> Self {
        ExitCode::from(match error.error_kind() {
            AppErrorKind::Fetch => 1,
            AppErrorKind::ArgValidation => 2,
            _ => 3,
        })
    }
}
