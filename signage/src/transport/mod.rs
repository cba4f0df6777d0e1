pub mod http;

pub use http::HttpFetcher;

use crate::error::Result;

/// Download collaborator used for feeds and speaker photos
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait Fetcher: Send + Sync {
    /// Fetch the full body at `url`
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
