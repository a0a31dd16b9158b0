use indicatif::{ProgressBar, ProgressStyle};

use mercurial_source::{Logger, TracingLogger};

pub fn make_progress_spinner(prefix: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template("{prefix:.cyan.bold/blue.bold} 🔎 {msg:.cyan/blue} {spinner}")
            .map(|style| style.tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(prefix);
    pb
}

pub fn complete_progress_spinner(pb: &ProgressBar, succeeded: bool, message: String) {
    let template = if succeeded {
        "{prefix:.cyan.bold/blue.bold} {msg:.cyan/blue}"
    } else {
        "{prefix:.cyan.bold/blue.bold} {msg:.red.bold}"
    };
    if let Ok(style) = ProgressStyle::with_template(template) {
        pb.set_style(style);
    }
    pb.finish_with_message(message);
}

/// Shows each message on the spinner while still forwarding it to `tracing`.
pub struct SpinnerLogger {
    bar: ProgressBar,
    inner: TracingLogger,
}

impl SpinnerLogger {
    pub fn new(bar: ProgressBar) -> Self {
        Self {
            bar,
            inner: TracingLogger,
        }
    }
}

impl Logger for SpinnerLogger {
    fn log(&self, message: &str) {
        self.bar.set_message(message.to_string());
        self.bar.suspend(|| self.inner.log(message));
    }
}
