//! Extract the human-visible text of a web page.
//!
//! Markup, `<script>`/`<style>`/`<noscript>` payloads and structural
//! whitespace are dropped; `<iframe>` documents are fetched and their text
//! inlined where the frame sits.

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod extraction;

pub use acquisition::fetcher::{FetchError, Fetcher, HttpFetcher};
pub use config::Config;
pub use extraction::error::{ErrorKind, ExtractError};
pub use extraction::extract_text;
pub use extraction::extractor::{ExtractOptions, Extractor};
