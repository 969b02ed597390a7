//! Visible-text extraction.
//!
//! Tokenizes fetched HTML and walks the tokens, keeping the text a reader
//! would see and inlining embedded frames.

pub mod error;
pub mod extractor;
pub mod tokenizer;

use crate::acquisition::fetcher::HttpFetcher;
use error::ExtractError;
use extractor::{ExtractOptions, Extractor};
use std::sync::Arc;

/// Extract the visible text at `address` over HTTP, joining fragments with
/// `separator`.
///
/// Uses an [`HttpFetcher`] with default timeout and user agent, and the
/// default frame nesting limit. Build an [`Extractor`] directly for anything
/// else.
pub fn extract_text(address: &str, separator: &str) -> Result<String, ExtractError> {
    let fetcher = HttpFetcher::with_defaults().map_err(|source| ExtractError::FetchFailed {
        address: address.to_string(),
        source,
    })?;
    let options = ExtractOptions {
        separator: separator.to_string(),
        ..ExtractOptions::default()
    };
    Extractor::new(Arc::new(fetcher), options).extract_text(address)
}
