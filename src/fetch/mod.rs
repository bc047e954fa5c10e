//! # Fetch Capability
//!
//! How bindings reach the network. The evaluation context only sees the
//! [`Fetcher`] trait:
//!
//! ```rust,ignore
//! pub trait Fetcher {
//!     fn fetch(&mut self, target: &str, url: &str) -> Result<Vec<u8>, FetchError>;
//!     fn fetch_uncached(&mut self, url: &str) -> Result<Vec<u8>, FetchError>;
//!     fn persist(&mut self) -> Result<()>;
//! }
//! ```
//!
//! Contract for implementations:
//! - a successful fetch durably stores the bytes under `target`, so an
//!   eager binding can fall back to them when a later fetch fails
//! - a "not modified" answer returns the bytes previously stored for `target`
//! - `fetch_uncached` stores nothing and sends no validators; lazy bindings
//!   use it so only their persisted map is ever written under their target
//! - timeouts and retries belong to the implementation, never the core
//!
//! | Fetcher | Use Case |
//! |---------|----------|
//! | [`HttpFetcher`] | Production: blocking HTTP with ETag validators |
//! | [`MockFetcher`] | Tests: canned bodies, failure simulation, call log |

mod http;
mod mock;

pub use http::{HttpFetcher, ETAG_FILE, FETCH_TIMEOUT};
pub use mock::MockFetcher;

use crate::error::{FetchError, Result};

/// Synchronous fetch capability injected into the evaluation context
pub trait Fetcher {
    /// Retrieve `url`, storing the body under `target`
    fn fetch(&mut self, target: &str, url: &str) -> std::result::Result<Vec<u8>, FetchError>;

    /// Retrieve `url` without storing the body or using validators
    fn fetch_uncached(&mut self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;

    /// Flush validator state at the end of a successful render
    fn persist(&mut self) -> Result<()> {
        Ok(())
    }
}
