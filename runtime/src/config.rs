//! Run configuration for the `sitetext` binary.

use crate::acquisition::address::normalize_address;
use crate::acquisition::fetcher::{DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT};
use crate::extraction::extractor::{ExtractOptions, DEFAULT_MAX_DEPTH, DEFAULT_SEPARATOR};
use std::path::{Path, PathBuf};

/// Default destination for extracted text.
pub const DEFAULT_OUTPUT_PATH: &str = "./out.txt";

/// Output path meaning "write to stdout".
pub const STDOUT_PATH: &str = "-";

/// Everything one extraction run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Normalized address of the top-level document.
    pub address: String,
    /// Where the text goes; [`STDOUT_PATH`] for stdout.
    pub output_path: PathBuf,
    pub separator: String,
    pub max_depth: usize,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Config {
    /// Config for `address` with every other field at its default.
    /// The address gets `https://` when it has no scheme.
    pub fn new(address: &str) -> Self {
        Self {
            address: normalize_address(address),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            separator: DEFAULT_SEPARATOR.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Whether output goes to stdout instead of a file.
    pub fn writes_to_stdout(&self) -> bool {
        self.output_path.as_os_str() == STDOUT_PATH
    }

    /// Extractor options derived from this config.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            separator: self.separator.clone(),
            max_depth: self.max_depth,
        }
    }
}
