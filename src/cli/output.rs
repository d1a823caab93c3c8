//! Shared output utilities for CLI commands
//!
//! Commands report through the [`Output`] sink instead of printing directly,
//! so the same command code drives the terminal and the tests. Also home to
//! the progress [`Spinner`] and the elapsed-time [`Stamp`].

use owo_colors::OwoColorize;
use std::io::{IsTerminal, Write};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Where a command sends its user-facing messages
pub trait Output: Send + Sync {
    /// Report a failure. Handled failures produce exactly one of these.
    fn error(&self, message: &str);

    /// Report a non-fatal warning
    fn warn(&self, message: &str);

    /// Print a plain line (usage examples and the like)
    fn print(&self, message: &str);

    /// Report a successful outcome
    fn success(&self, message: &str);

    /// Show a progress indicator until the returned guard is stopped or dropped
    fn spinner(&self, label: &str) -> Spinner;
}

/// Colored terminal output. Diagnostics go to stderr, success to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalOutput;

impl Output for TerminalOutput {
    fn error(&self, message: &str) {
        eprintln!("{} {}", "Error!".red().bold(), message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", "WARN!".yellow().bold(), message);
    }

    fn print(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn success(&self, message: &str) {
        println!("{} {}", "Success!".green().bold(), message);
    }

    fn spinner(&self, label: &str) -> Spinner {
        if std::io::stderr().is_terminal() {
            Spinner::animated(label.to_string())
        } else {
            eprintln!("{}", label);
            Spinner::detached()
        }
    }
}

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

/// Guard for a running progress indicator
#[derive(Debug)]
pub struct Spinner {
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    /// A spinner with nothing to animate
    pub fn detached() -> Self {
        Self { task: None }
    }

    fn animated(label: String) -> Self {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            eprintln!("{}", label);
            return Self::detached();
        };

        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(SPINNER_INTERVAL);
            for frame in SPINNER_FRAMES.iter().cycle() {
                ticker.tick().await;
                let mut stderr = std::io::stderr();
                let _ = write!(stderr, "\r{} {}", frame.cyan(), label);
                let _ = stderr.flush();
            }
        });

        Self { task: Some(task) }
    }

    /// Stop the indicator and clear its line
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\r\x1b[2K");
            let _ = stderr.flush();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.halt();
    }
}

/// Timer started when a command begins, rendered as `[123ms]`
#[derive(Debug, Clone, Copy)]
pub struct Stamp {
    started: Instant,
}

impl Stamp {
    pub fn start() -> Self {
        Self { started: Instant::now() }
    }

    /// Time since the stamp was started
    pub fn elapsed(&self) -> String {
        format_elapsed(self.started.elapsed())
    }
}

/// Format a duration the way command timings are shown
pub fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms < 1_000 {
        format!("[{}ms]", ms)
    } else if ms < 60_000 {
        format!("[{}s]", (ms + 500) / 1_000)
    } else {
        format!("[{}m]", (ms + 30_000) / 60_000)
    }
}

/// Join common names for display
pub fn format_cns(cns: &[String]) -> String {
    cns.join(", ")
}
