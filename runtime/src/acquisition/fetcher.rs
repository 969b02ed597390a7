//! Document fetching.
//!
//! The extractor only needs one capability from the network: give me the
//! body behind this address. [`Fetcher`] is that seam; [`HttpFetcher`] is
//! the blocking HTTP implementation used by the binary.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("sitetext/", env!("CARGO_PKG_VERSION"));

/// Why a document could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme {scheme:?} in {address}")]
    UnsupportedScheme { address: String, scheme: String },
    #[error("request to {address} failed: {source}")]
    Request {
        address: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{address} answered with HTTP {status}")]
    Status { address: String, status: u16 },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Retrieves the body of a document by address.
///
/// One attempt per call: no caching, no retries. Implementations must have
/// released any connection by the time they return.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, address: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP(S) fetcher backed by `reqwest`.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given request timeout and user agent.
    pub fn new(timeout_ms: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Build a fetcher with [`DEFAULT_TIMEOUT_MS`] and [`DEFAULT_USER_AGENT`].
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, address: &str) -> Result<Vec<u8>, FetchError> {
        let url = Url::parse(address).map_err(|source| FetchError::InvalidAddress {
            address: address.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme {
                address: address.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        let request_failed = |source| FetchError::Request {
            address: address.to_string(),
            source,
        };

        let resp = self.client.get(url).send().map_err(request_failed)?;
        let status = resp.status();
        debug!("GET {address} -> {status}");
        if !status.is_success() {
            return Err(FetchError::Status {
                address: address.to_string(),
                status: status.as_u16(),
            });
        }

        let charset = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(declared_charset);

        // The body is read to the end here, which hands the connection back
        // before any tokenizing starts.
        match charset {
            Some(cs) if !is_utf8_label(&cs) => {
                debug!("transcoding {address} from {cs}");
                resp.text()
                    .map(String::into_bytes)
                    .map_err(request_failed)
            }
            _ => resp
                .bytes()
                .map(|body| body.to_vec())
                .map_err(request_failed),
        }
    }
}

/// Pull the `charset` parameter out of a `Content-Type` value.
fn declared_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim();
        (!value.is_empty()).then(|| value.to_ascii_lowercase())
    })
}

fn is_utf8_label(charset: &str) -> bool {
    matches!(charset, "utf-8" | "utf8" | "unicode-1-1-utf-8")
}
