use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Result, ScraperError};

/// Retrieves the raw markup behind a URL.
///
/// Status codes are not inspected: whatever body the server returns is
/// handed to the parser. Only transport failures and body read failures are
/// errors.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl Fetch for reqwest::Client {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");

        let response = self.get(url).send().await.map_err(|e| ScraperError::Http {
            url: url.to_owned(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "upstream returned non-success status, parsing body anyway");
        }

        response.text().await.map_err(|e| ScraperError::ResponseBody {
            url: url.to_owned(),
            source: e,
        })
    }
}
