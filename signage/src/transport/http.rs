use std::time::Duration;

use super::Fetcher;
use crate::error::{Result, SignageError};

// Some photo hosts refuse requests without a browser-like agent
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.11 (KHTML, like Gecko) Chrome/23.0.1271.95 Safari/537.11";

/// Blocking HTTP implementation of [`Fetcher`]
pub struct HttpFetcher {
  http_client: reqwest::blocking::Client,
}

impl HttpFetcher {
  pub fn new(timeout: Duration) -> Result<Self> {
    let http_client = reqwest::blocking::Client::builder()
      .timeout(timeout)
      .user_agent(USER_AGENT)
      .build()?;

    Ok(Self { http_client })
  }
}

impl Fetcher for HttpFetcher {
  fn fetch(&self, url: &str) -> Result<Vec<u8>> {
    let download_error = |e: reqwest::Error| SignageError::Download {
      url: url.to_string(),
      reason: e.to_string(),
    };

    log::trace!("GET {}", url);
    let response = self
      .http_client
      .get(url)
      .send()
      .map_err(download_error)?
      .error_for_status()
      .map_err(download_error)?;

    let body = response.bytes().map_err(download_error)?;
    log::trace!("GET {} returned {} bytes", url, body.len());
    Ok(body.to_vec())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_http_fetcher_creation() {
    let fetcher = HttpFetcher::new(Duration::from_secs(5));
    assert!(fetcher.is_ok());
  }

  #[test]
  fn test_unreachable_host_is_download_error() {
    let fetcher = HttpFetcher::new(Duration::from_millis(200)).unwrap();
    match fetcher.fetch("http://127.0.0.1:9/speakers") {
      Err(SignageError::Download { url, .. }) => assert_eq!(url, "http://127.0.0.1:9/speakers"),
      other => panic!("expected Download error, got {:?}", other.map(|b| b.len())),
    }
  }
}
