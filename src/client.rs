use std::sync::Arc;

use tracing::instrument;

use crate::cache::TtlCache;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::model::*;
use crate::scraper::{MatchScraper, TableScraper};

/// Upstream pages scraped by [`DatabrusClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrls {
    pub upcoming: String,
    pub previous: String,
    pub table: String,
}

/// The main entry point for reading Databrus FC data.
///
/// `DatabrusClient` owns one match scraper and one table scraper, each with
/// its own cache, and knows which upstream page backs each listing.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> databrus_scraper::Result<()> {
/// use databrus_scraper::{DatabrusClient, SourceUrls};
///
/// let client = DatabrusClient::new(
///     SourceUrls {
///         upcoming: "https://example.com/kommende".into(),
///         previous: "https://example.com/historikk".into(),
///         table: "https://example.com/tabell".into(),
///     },
///     30 * 60,
/// );
/// let matches = client.all_matches().await?;
/// println!("Found {} matches", matches.len());
/// # Ok(())
/// # }
/// ```
pub struct DatabrusClient {
    urls: SourceUrls,
    matches: MatchScraper,
    table: TableScraper,
}

impl DatabrusClient {
    /// Create a client backed by a default [`reqwest::Client`].
    pub fn new(urls: SourceUrls, cache_ttl_secs: u64) -> Self {
        Self::with_fetch(urls, cache_ttl_secs, Arc::new(reqwest::Client::new()))
    }

    /// Create a client using the provided [`Fetch`] implementation.
    ///
    /// Use this to configure timeouts, proxies, headers, or to substitute a
    /// stub in tests.
    pub fn with_fetch(urls: SourceUrls, cache_ttl_secs: u64, fetch: Arc<dyn Fetch>) -> Self {
        Self {
            urls,
            matches: MatchScraper::new(Arc::clone(&fetch), TtlCache::new(cache_ttl_secs)),
            table: TableScraper::new(fetch, TtlCache::new(cache_ttl_secs)),
        }
    }

    /// Fixtures that have not been played yet.
    #[instrument(skip(self))]
    pub async fn upcoming_matches(&self) -> Result<Vec<Match>> {
        self.matches
            .get_matches(&self.urls.upcoming, MatchType::Upcoming)
            .await
    }

    /// Played matches with their final scores.
    #[instrument(skip(self))]
    pub async fn previous_matches(&self) -> Result<Vec<Match>> {
        self.matches
            .get_matches(&self.urls.previous, MatchType::Previous)
            .await
    }

    /// Upcoming followed by previous matches, fetched concurrently.
    ///
    /// Fails as a whole if either listing fails.
    #[instrument(skip(self))]
    pub async fn all_matches(&self) -> Result<Vec<Match>> {
        let (mut upcoming, previous) =
            tokio::try_join!(self.upcoming_matches(), self.previous_matches())?;
        upcoming.extend(previous);
        Ok(upcoming)
    }

    /// Current league standings.
    #[instrument(skip(self))]
    pub async fn table(&self) -> Result<Vec<TableEntry>> {
        self.table.get_table(&self.urls.table).await
    }

    /// Drop every cached listing.
    pub fn clear_caches(&self) {
        self.matches.clear_cache();
        self.table.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::test_support::StubFetch;

    const UPCOMING_HTML: &str = include_str!("../tests/fixtures/upcoming_matches.html");
    const PREVIOUS_HTML: &str = include_str!("../tests/fixtures/previous_matches.html");
    const TABLE_HTML: &str = include_str!("../tests/fixtures/table.html");

    fn urls() -> SourceUrls {
        SourceUrls {
            upcoming: "https://example.com/upcoming".into(),
            previous: "https://example.com/previous".into(),
            table: "https://example.com/table".into(),
        }
    }

    fn full_stub() -> StubFetch {
        StubFetch::default()
            .with_page("https://example.com/upcoming", UPCOMING_HTML)
            .with_page("https://example.com/previous", PREVIOUS_HTML)
            .with_page("https://example.com/table", TABLE_HTML)
    }

    #[tokio::test]
    async fn test_all_matches_lists_upcoming_first() {
        let client = DatabrusClient::with_fetch(urls(), 60, Arc::new(full_stub()));

        let matches = client.all_matches().await.unwrap();

        assert_eq!(
            matches.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            ["12345", "12346", "67890", "67891"]
        );
        assert!(matches[..2].iter().all(|m| m.match_type == MatchType::Upcoming));
        assert!(matches[2..].iter().all(|m| m.match_type == MatchType::Previous));
    }

    #[tokio::test]
    async fn test_all_matches_fails_when_one_listing_fails() {
        let fetch = StubFetch::default().with_page("https://example.com/upcoming", UPCOMING_HTML);
        let client = DatabrusClient::with_fetch(urls(), 60, Arc::new(fetch));

        assert!(client.all_matches().await.is_err());
    }

    #[tokio::test]
    async fn test_clear_caches_resets_both_scrapers() {
        let fetch = Arc::new(full_stub());
        let client = DatabrusClient::with_fetch(urls(), 60, fetch.clone());

        client.all_matches().await.unwrap();
        client.table().await.unwrap();
        client.all_matches().await.unwrap();
        client.table().await.unwrap();
        assert_eq!(fetch.calls(), 3);

        client.clear_caches();
        client.table().await.unwrap();
        assert_eq!(fetch.calls(), 4);
    }
}
