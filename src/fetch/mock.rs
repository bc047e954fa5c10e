//! Mock fetcher for testing
//!
//! Returns canned bodies without touching the network and records every
//! call so tests can assert on fetch counts.

use std::collections::HashMap;

use super::Fetcher;
use crate::error::FetchError;

enum Canned {
    Body(Vec<u8>),
    Failure(u16),
}

/// Fetcher that serves predefined bodies by URL
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, Canned>,
    /// Served for URLs without a canned response
    default_body: Option<Vec<u8>>,
    /// Every (target, url) requested, in call order; `None` for uncached fetches
    requests: Vec<(Option<String>, String)>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`
    pub fn with_response(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.into(), Canned::Body(body.into()));
        self
    }

    /// Fail `url` with an HTTP status
    pub fn with_failure(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Canned::Failure(status));
        self
    }

    /// Serve `body` for any URL without a canned response
    pub fn with_default(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.default_body = Some(body.into());
        self
    }

    /// All requests made so far
    pub fn requests(&self) -> &[(Option<String>, String)] {
        &self.requests
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// Number of requests made for `url`
    pub fn count_for(&self, url: &str) -> usize {
        self.requests.iter().filter(|(_, u)| u == url).count()
    }

    pub fn clear_requests(&mut self) {
        self.requests.clear();
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&mut self, target: &str, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.push((Some(target.to_string()), url.to_string()));
        self.serve(url)
    }

    fn fetch_uncached(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.push((None, url.to_string()));
        self.serve(url)
    }
}

impl MockFetcher {
    fn serve(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match (self.responses.get(url), &self.default_body) {
            (Some(Canned::Body(body)), _) => Ok(body.clone()),
            (Some(Canned::Failure(status)), _) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            (None, Some(body)) => Ok(body.clone()),
            (None, None) => Err(FetchError::Other(format!("no mock response for {url}"))),
        }
    }
}
