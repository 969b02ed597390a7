//! Where the extract command reports: status lines on stderr, or one JSON
//! document on stdout.

use std::io::IsTerminal;
use std::time::Duration;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// What the command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Progress and result lines on stderr.
    #[default]
    Human,
    /// Failures only.
    Quiet,
    /// One JSON document on stdout, nothing on stderr.
    Json,
}

/// Prints status for one command run.
#[derive(Debug, Clone)]
pub struct Reporter {
    mode: Mode,
    color: bool,
}

impl Reporter {
    /// Colors are used only on a terminal, and never when `NO_COLOR` is set
    /// (https://no-color.org/).
    pub fn new(mode: Mode, no_color: bool) -> Self {
        let color = !no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stderr().is_terminal();
        Self { mode, color }
    }

    /// Reporter that never emits escape codes.
    pub fn plain(mode: Mode) -> Self {
        Self { mode, color: false }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn reading(&self, address: &str) {
        if self.mode == Mode::Human {
            eprintln!("  Reading {address}...");
        }
    }

    pub fn wrote(&self, target: &str, bytes: usize, elapsed: Duration) {
        if self.mode == Mode::Human {
            eprintln!("{}", self.wrote_line(target, bytes, elapsed));
        }
    }

    pub fn failed(&self, message: &str) {
        let mark = self.paint(RED, if self.color { "\u{2717}" } else { "!!" });
        eprintln!("  {mark} {message}");
    }

    pub fn json(&self, value: &serde_json::Value) {
        if let Ok(s) = serde_json::to_string_pretty(value) {
            println!("{s}");
        }
    }

    fn wrote_line(&self, target: &str, bytes: usize, elapsed: Duration) -> String {
        let mark = self.paint(GREEN, if self.color { "\u{2713}" } else { "OK" });
        format!(
            "  {mark} Wrote {} to {} {}",
            format_size(bytes),
            self.paint(BOLD, target),
            self.paint(DIM, &format!("({:.1}s)", elapsed.as_secs_f64()))
        )
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

/// Human-readable size of the saved text, e.g. "28.7 KB".
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
