//! Getting documents off the network.
//!
//! Provides the [`fetcher::Fetcher`] capability used by the extractor and
//! the address rules applied before and during a fetch.

pub mod address;
pub mod fetcher;
