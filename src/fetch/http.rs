//! Blocking HTTP fetcher with ETag validators
//!
//! Validators live in `<data_dir>/.etag.json` keyed by URL. A 200 stores the
//! body under the binding target and records the ETag; a 304 serves the
//! stored body. Uncached fetches bypass both the validators and the store.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ETAG, IF_NONE_MATCH};
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};
use url::Url;

use super::Fetcher;
use crate::error::{FetchError, Result};
use crate::store::DataDirStore;

/// Timeout for a single request
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Validator file name inside the data directory
pub const ETAG_FILE: &str = ".etag.json";

const USER_AGENT: &str = "sitegen/0.1";

pub struct HttpFetcher {
    client: Client,
    store: DataDirStore,
    /// URL → ETag
    etags: BTreeMap<String, String>,
}

impl HttpFetcher {
    /// Create a fetcher rooted at `store`, loading saved validators
    pub fn new(store: DataDirStore) -> std::result::Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;
        Self::with_client(client, store)
    }

    /// Same as [`HttpFetcher::new`] with a caller-built client
    pub fn with_client(client: Client, store: DataDirStore) -> std::result::Result<Self, FetchError> {
        let etags = match store.read(ETAG_FILE) {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(error = %e, "ignoring malformed {}", ETAG_FILE);
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => return Err(FetchError::Io(e)),
        };

        Ok(Self {
            client,
            store,
            etags,
        })
    }

    /// Stored validator for `url`
    pub fn etag(&self, url: &str) -> Option<&str> {
        self.etags.get(url).map(String::as_str)
    }
}

fn validate_url(url: &str) -> std::result::Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        details: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            details: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn send(client: &Client, url: &str, etag: Option<&str>) -> std::result::Result<Response, FetchError> {
    let mut request = client.get(validate_url(url)?);
    if let Some(etag) = etag {
        request = request.header(IF_NONE_MATCH, etag);
    }
    request.send().map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })
}

fn read_body(response: Response, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
}

impl Fetcher for HttpFetcher {
    #[instrument(skip(self))]
    fn fetch(&mut self, target: &str, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let response = send(&self.client, url, self.etag(url))?;

        match response.status() {
            StatusCode::OK => {
                let etag = response
                    .headers()
                    .get(ETAG)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let body = read_body(response, url)?;

                if let Some(etag) = etag {
                    self.etags.insert(url.to_string(), etag);
                }
                self.store.write(target, &body)?;
                debug!(bytes = body.len(), "fetched");
                Ok(body)
            }
            StatusCode::NOT_MODIFIED => {
                debug!("not modified, serving stored copy");
                self.store
                    .read(target)?
                    .ok_or_else(|| FetchError::NotModifiedWithoutCopy {
                        url: url.to_string(),
                        target: target.to_string(),
                    })
            }
            status => Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    #[instrument(skip(self))]
    fn fetch_uncached(&mut self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let response = send(&self.client, url, None)?;
        match response.status() {
            StatusCode::OK => {
                let body = read_body(response, url)?;
                debug!(bytes = body.len(), "fetched");
                Ok(body)
            }
            status => Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    fn persist(&mut self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.etags)?;
        self.store.write(ETAG_FILE, &bytes)?;
        Ok(())
    }
}
