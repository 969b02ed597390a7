//! The visible-text walk.
//!
//! [`Extractor`] fetches a document, streams it through the [`Tokenizer`]
//! and keeps every text run a reader would see. `<iframe src>` references
//! are fetched and walked in place, depth first, so framed content lands
//! where the frame sits in the including page.

use crate::acquisition::address::{document_key, resolve_frame_src};
use crate::acquisition::fetcher::Fetcher;
use crate::extraction::error::ExtractError;
use crate::extraction::tokenizer::{Attribute, Token, Tokenizer};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default join delimiter between text fragments.
pub const DEFAULT_SEPARATOR: &str = " ";

/// Default limit on frame nesting below the top-level document.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Text under these parents is never shown to a reader.
const HIDDEN_PARENTS: &[&str] = &["script", "style", "noscript"];

/// Knobs for an [`Extractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Inserted after every text fragment and every inlined frame.
    pub separator: String,
    /// Frames nested deeper than this fail with [`ExtractError::TooDeep`].
    /// The top-level document is depth 0.
    pub max_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Pulls visible text out of documents reachable through a [`Fetcher`].
pub struct Extractor {
    fetcher: Arc<dyn Fetcher>,
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(fetcher: Arc<dyn Fetcher>, options: ExtractOptions) -> Self {
        Self { fetcher, options }
    }

    /// Extract the visible text of the document at `address`, with the
    /// text of its frames inlined.
    ///
    /// Either the whole text comes back or an error does; a failure in any
    /// frame discards everything collected so far.
    pub fn extract_text(&self, address: &str) -> Result<String, ExtractError> {
        let mut trail = vec![document_key(address)];
        let text = self.extract_at(address, &mut trail)?;
        info!("extracted {} chars from {address}", text.chars().count());
        Ok(text)
    }

    /// Walk one document. `trail` holds the document keys from the
    /// top-level document down to and including `address`.
    fn extract_at(&self, address: &str, trail: &mut Vec<String>) -> Result<String, ExtractError> {
        debug!("fetching {address} (depth {})", trail.len() - 1);
        let body = self
            .fetcher
            .fetch(address)
            .map_err(|source| ExtractError::FetchFailed {
                address: address.to_string(),
                source,
            })?;

        let separator = self.options.separator.as_str();
        let mut tokenizer = Tokenizer::new(&body);
        let mut parent_tag = String::new();
        let mut text = String::new();

        loop {
            let token = tokenizer
                .next_token()
                .map_err(|source| ExtractError::MalformedDocument {
                    address: address.to_string(),
                    source,
                })?;

            match token {
                Token::EndOfStream => break,
                // A frame with a src is replaced by its text and never
                // becomes the parent tag.
                Token::StartTag {
                    name, attributes, ..
                } => match frame_src(&name, &attributes) {
                    Some(src) => {
                        if let Some(framed) = self.extract_frame(address, src, trail)? {
                            text.push_str(&framed);
                            text.push_str(separator);
                        }
                    }
                    None => parent_tag = name,
                },
                Token::EndTag { name } => parent_tag = name,
                Token::Text(run) => {
                    if HIDDEN_PARENTS.contains(&parent_tag.as_str()) {
                        continue;
                    }
                    let line = run.trim();
                    if line.is_empty() {
                        continue;
                    }
                    text.push_str(line);
                    text.push_str(separator);
                }
            }
        }

        Ok(text.trim().to_string())
    }

    /// Resolve and walk one `<iframe src>`. `Ok(None)` means the frame
    /// names nothing fetchable and contributes no text.
    fn extract_frame(
        &self,
        parent: &str,
        src: &str,
        trail: &mut Vec<String>,
    ) -> Result<Option<String>, ExtractError> {
        let Some(frame) = resolve_frame_src(parent, src) else {
            debug!("skipping frame {src:?} in {parent}");
            return Ok(None);
        };

        let key = document_key(&frame);
        if trail.contains(&key) {
            return Err(ExtractError::CycleDetected { address: frame });
        }
        if trail.len() > self.options.max_depth {
            return Err(ExtractError::TooDeep {
                address: frame,
                max_depth: self.options.max_depth,
            });
        }

        debug!("entering frame {frame} from {parent}");
        trail.push(key);
        let result = self.extract_at(&frame, trail);
        trail.pop();

        match result {
            Ok(text) => Ok(Some(text)),
            Err(e) => {
                if e.address() == frame {
                    warn!("frame {frame} in {parent} failed: {e}");
                }
                Err(e)
            }
        }
    }
}

/// The `src` of an `<iframe>` start tag, if it has one.
fn frame_src<'t>(name: &str, attributes: &'t [Attribute]) -> Option<&'t str> {
    if name != "iframe" {
        return None;
    }
    attributes
        .iter()
        .find(|attr| attr.key == "src")
        .map(|attr| attr.value.as_str())
}
