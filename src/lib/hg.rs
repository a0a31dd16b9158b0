//! Cloning Mercurial repositories with the `hg` executable.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus};
use std::time::{Duration, Instant};

use crate::error::FetchError;
use crate::logger::Logger;
use crate::outcome::{FetchResult, HgArtefact};

/// Used when no executable is configured and `HG` is unset.
pub const DEFAULT_PROGRAM: &str = "hg";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A remote Mercurial repository and the directory it should be cloned into.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct HgSpec {
    url: String,
    target_directory: PathBuf,
    program: String,
    timeout: Option<Duration>,
}

impl HgSpec {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(url: S, target_directory: P) -> Self {
        Self {
            url: url.into(),
            target_directory: target_directory.into(),
            program: DEFAULT_PROGRAM.to_string(),
            timeout: None,
        }
    }

    /// Use `program` instead of `hg` on `PATH`.
    pub fn with_program<S: Into<String>>(mut self, program: S) -> Self {
        self.program = program.into();
        self
    }

    /// Kill the clone if it has not finished after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The upstream URL.
    pub fn upstream(&self) -> &str {
        &self.url
    }

    pub fn target_directory(&self) -> &Path {
        &self.target_directory
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Clone the repository into the target directory, creating the directory first if needed.
    ///
    /// Every failure is logged through `logger` and returned.
    pub fn fetch<L: Logger + ?Sized>(&self, logger: &L) -> FetchResult {
        logger.log(&format!(
            "Starting fetch process for Mercurial repository '{}' into directory '{}'.",
            self.url,
            self.target_directory.display()
        ));
        prepare_directory(&self.target_directory, logger)?;
        match self.run_clone() {
            Ok(()) => {
                logger.log("Successfully cloned Mercurial repository.");
                Ok(HgArtefact {
                    local: self.target_directory.clone(),
                    remote: self.url.clone(),
                })
            }
            Err(err @ FetchError::Clone { .. }) => {
                logger.log(&format!(
                    "Error cloning Mercurial repository: {}",
                    err.detail()
                ));
                Err(err)
            }
            Err(err) => {
                logger.log(&format!(
                    "Unexpected error cloning Mercurial repository: {err}"
                ));
                Err(err)
            }
        }
    }

    /// The command line as it would be typed, for error messages.
    pub fn command_line(&self) -> String {
        format!(
            "{} clone {} {}",
            self.program,
            self.url,
            self.target_directory.display()
        )
    }

    fn run_clone(&self) -> Result<(), FetchError> {
        let command = self.command_line();
        let mut child = clone_command(self)
            .spawn()
            .map_err(|source| FetchError::Spawn {
                command: command.clone(),
                source,
            })?;
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);
        let status = match self.timeout {
            Some(limit) => match wait_with_timeout(&mut child, limit)? {
                Some(status) => status,
                None => {
                    return Err(FetchError::TimedOut {
                        command,
                        after: limit,
                    });
                }
            },
            None => match child.wait() {
                Ok(status) => status,
                Err(err) => {
                    let _ = kill_and_reap(&mut child);
                    return Err(err.into());
                }
            },
        };
        let stdout = collect(stdout)?;
        let stderr = collect(stderr)?;
        tracing::debug!(%command, %status, stdout = %stdout.trim(), "hg clone exited");
        if status.success() {
            Ok(())
        } else {
            Err(FetchError::Clone {
                command,
                status,
                stderr: stderr.trim().to_string(),
            })
        }
    }
}

impl std::fmt::Display for HgSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.url, self.target_directory.display())?;
        if let Some(timeout) = self.timeout {
            write!(f, " [timeout: {}s]", timeout.as_secs())?;
        }
        Ok(())
    }
}

/// Make sure `path` exists as a directory, creating it and any missing parents.
///
/// Does nothing when the path already exists.
pub fn prepare_directory<L: Logger + ?Sized>(path: &Path, logger: &L) -> Result<(), FetchError> {
    if path.exists() {
        return Ok(());
    }
    match std::fs::create_dir_all(path) {
        Ok(()) => {
            logger.log(&format!("Created directory: {}", path.display()));
            Ok(())
        }
        Err(source) => {
            logger.log(&format!(
                "Failed to create directory '{}': {source}",
                path.display()
            ));
            Err(FetchError::DirectoryCreation {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// `<program> clone <url> <target>` with output captured rather than streamed.
pub fn clone_command(spec: &HgSpec) -> std::process::Command {
    let mut hg = std::process::Command::new(&spec.program);
    hg.arg("clone")
        .arg(&spec.url)
        .arg(&spec.target_directory);
    hg.stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .stdin(std::process::Stdio::null());
    hg
}

// Read a pipe to the end on its own thread so the child never blocks on a full pipe.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> std::thread::JoinHandle<std::io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(
    handle: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
) -> std::io::Result<String> {
    let Some(handle) = handle else {
        return Ok(String::new());
    };
    let bytes = handle
        .join()
        .map_err(|_| std::io::Error::other("pipe reader thread panicked"))??;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// `Ok(None)` means the child was killed after `limit` elapsed. On every return the child has
// exited or been killed.
fn wait_with_timeout(child: &mut Child, limit: Duration) -> std::io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) if start.elapsed() >= limit => {
                kill_and_reap(child)?;
                return Ok(None);
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(err) => {
                let _ = kill_and_reap(child);
                return Err(err);
            }
        }
    }
}

fn kill_and_reap(child: &mut Child) -> std::io::Result<()> {
    // The child may have exited between try_wait and kill
    let _ = child.kill();
    child.wait().map(|_| ())
}
