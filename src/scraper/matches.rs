use std::sync::{Arc, LazyLock};

use ::scraper::{ElementRef, Html, Selector};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use regex::Regex;
use tracing::{debug, instrument};

use crate::cache::TtlCache;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::model::{Match, MatchType};
use crate::scraper::element_text;

const MATCH_KEY_ATTR: &str = "wire:key";
const MATCH_KEY_PREFIX: &str = "listkamp_";

/// Team-name cells that are really venue lines.
const VENUE_MARKERS: [&str; 2] = ["sportsenter", "\u{2013}"];

/// Fixture and result lists, memoized per `(url, type)`.
pub struct MatchScraper {
    fetch: Arc<dyn Fetch>,
    cache: TtlCache<Vec<Match>>,
}

impl MatchScraper {
    pub fn new(fetch: Arc<dyn Fetch>, cache: TtlCache<Vec<Match>>) -> Self {
        Self { fetch, cache }
    }

    /// Return the matches listed at `url`, classified as `match_type`.
    ///
    /// A cache hit returns the stored list without touching the network.
    /// A miss fetches once, parses, and stores the result, even when empty.
    #[instrument(skip(self))]
    pub async fn get_matches(&self, url: &str, match_type: MatchType) -> Result<Vec<Match>> {
        let key = cache_key(url, match_type);
        if let Some(matches) = self.cache.get(&key) {
            debug!(%match_type, "cache hit for matches");
            return Ok(matches);
        }

        debug!(%match_type, "cache miss for matches, fetching and parsing");
        let body = self.fetch.fetch_text(url).await?;
        let matches = parse_matches(&Html::parse_document(&body), match_type);
        debug!(count = matches.len(), %match_type, "parsed match list");

        self.cache.set(key, matches.clone());
        Ok(matches)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.size()
    }
}

fn cache_key(url: &str, match_type: MatchType) -> String {
    format!("{url}:{match_type}")
}

/// Selectors and `x-data` patterns for a match listing, compiled once.
struct MatchMarkup {
    node: Selector,
    data: Selector,
    team: Selector,
    timestamp: Regex,
    home_goals: Regex,
    away_goals: Regex,
}

static MARKUP: LazyLock<MatchMarkup> = LazyLock::new(|| MatchMarkup {
    node: Selector::parse("li").expect("valid match node selector"),
    data: Selector::parse("[x-data]").expect("valid data block selector"),
    team: Selector::parse(".truncate").expect("valid team selector"),
    timestamp: Regex::new(r"timestamp:\s*(\d+)").expect("valid timestamp regex"),
    home_goals: Regex::new(r"homegoals:\s*'(\d+)'").expect("valid homegoals regex"),
    away_goals: Regex::new(r"awaygoals:\s*'(\d+)'").expect("valid awaygoals regex"),
});

impl MatchMarkup {
    fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
        pattern
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    fn datetime(&self, data: &str) -> Option<DateTime<Utc>> {
        let seconds = Self::capture(&self.timestamp, data)?.parse::<i64>().ok()?;
        DateTime::from_timestamp(seconds, 0)
    }

    fn score(pattern: &Regex, data: &str) -> String {
        Self::capture(pattern, data).unwrap_or("0").to_string()
    }
}

pub(crate) fn parse_matches(document: &Html, match_type: MatchType) -> Vec<Match> {
    let markup = &*MARKUP;
    document
        .select(&markup.node)
        .filter_map(|node| {
            let id = node
                .value()
                .attr(MATCH_KEY_ATTR)?
                .strip_prefix(MATCH_KEY_PREFIX)?;
            parse_match_node(&node, id, match_type, markup)
        })
        .collect_vec()
}

fn parse_match_node(
    node: &ElementRef,
    id: &str,
    match_type: MatchType,
    markup: &MatchMarkup,
) -> Option<Match> {
    if id.is_empty() {
        debug!("skipping match node without id");
        return None;
    }

    let data = node
        .select(&markup.data)
        .next()
        .and_then(|el| el.value().attr("x-data"))
        .unwrap_or_default();

    let teams = node
        .select(&markup.team)
        .map(|el| element_text(&el))
        .filter(|name| is_team_name(name))
        .collect_vec();
    let [home_team, away_team, ..] = teams.as_slice() else {
        debug!(id, found = teams.len(), "skipping match node without two teams");
        return None;
    };

    let Some(datetime) = markup.datetime(data) else {
        debug!(id, "skipping match node without timestamp");
        return None;
    };

    let (id, home_team, away_team) = (id.to_string(), home_team.clone(), away_team.clone());
    Some(match match_type {
        MatchType::Upcoming => Match::upcoming(id, home_team, away_team, datetime),
        MatchType::Previous => Match::previous(
            id,
            home_team,
            away_team,
            datetime,
            MatchMarkup::score(&markup.home_goals, data),
            MatchMarkup::score(&markup.away_goals, data),
        ),
    })
}

fn is_team_name(text: &str) -> bool {
    !text.is_empty() && !VENUE_MARKERS.iter().any(|marker| text.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::test_support::StubFetch;

    const UPCOMING_HTML: &str = include_str!("../../tests/fixtures/upcoming_matches.html");
    const PREVIOUS_HTML: &str = include_str!("../../tests/fixtures/previous_matches.html");

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    fn scraper_for(fetch: Arc<StubFetch>) -> MatchScraper {
        MatchScraper::new(fetch, TtlCache::new(30 * 60))
    }

    fn parse(html: &str, match_type: MatchType) -> Vec<Match> {
        parse_matches(&Html::parse_document(html), match_type)
    }

    #[tokio::test]
    async fn test_parse_upcoming_matches() {
        let url = "https://example.com/upcoming";
        let fetch = Arc::new(StubFetch::default().with_page(url, UPCOMING_HTML));
        let scraper = scraper_for(fetch.clone());

        let matches = scraper.get_matches(url, MatchType::Upcoming).await.unwrap();

        assert_eq!(
            matches,
            vec![
                Match::upcoming("12345".into(), "Team A".into(), "Team B".into(), at(1769900400)),
                Match::upcoming("12346".into(), "Team C".into(), "Team D".into(), at(1769904000)),
            ]
        );
        assert_eq!(fetch.requested_urls(), vec![url.to_string()]);
    }

    #[tokio::test]
    async fn test_parse_previous_matches_with_scores() {
        let url = "https://example.com/previous";
        let fetch = Arc::new(StubFetch::default().with_page(url, PREVIOUS_HTML));
        let scraper = scraper_for(fetch);

        let matches = scraper.get_matches(url, MatchType::Previous).await.unwrap();

        assert_eq!(
            matches,
            vec![
                Match::previous(
                    "67890".into(),
                    "Team X".into(),
                    "Team Y".into(),
                    at(1768000000),
                    "3".into(),
                    "2".into(),
                ),
                Match::previous(
                    "67891".into(),
                    "Team Z".into(),
                    "Team W".into(),
                    at(1768003600),
                    "1".into(),
                    "1".into(),
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let url = "https://example.com/upcoming";
        let fetch = Arc::new(StubFetch::default().with_page(url, UPCOMING_HTML));
        let scraper = scraper_for(fetch.clone());

        let first = scraper.get_matches(url, MatchType::Upcoming).await.unwrap();
        assert_eq!(fetch.calls(), 1);

        let second = scraper.get_matches(url, MatchType::Upcoming).await.unwrap();
        assert_eq!(fetch.calls(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_cache_key_separates_types_and_urls() {
        let fetch = Arc::new(
            StubFetch::default()
                .with_page("https://example.com/a", PREVIOUS_HTML)
                .with_page("https://example.com/b", PREVIOUS_HTML),
        );
        let scraper = scraper_for(fetch.clone());

        let upcoming = scraper
            .get_matches("https://example.com/a", MatchType::Upcoming)
            .await
            .unwrap();
        let previous = scraper
            .get_matches("https://example.com/a", MatchType::Previous)
            .await
            .unwrap();
        scraper
            .get_matches("https://example.com/b", MatchType::Previous)
            .await
            .unwrap();

        assert_eq!(fetch.calls(), 3);
        assert_eq!(scraper.cached_entries(), 3);
        assert!(upcoming.iter().all(|m| m.home_score.is_none()));
        assert!(previous.iter().all(|m| m.home_score.is_some()));
    }

    #[tokio::test]
    async fn test_empty_result_is_cached() {
        let url = "https://example.com/empty";
        let fetch =
            Arc::new(StubFetch::default().with_page(url, "<html><body></body></html>"));
        let scraper = scraper_for(fetch.clone());

        assert!(scraper.get_matches(url, MatchType::Upcoming).await.unwrap().is_empty());
        assert!(scraper.get_matches(url, MatchType::Upcoming).await.unwrap().is_empty());
        assert_eq!(fetch.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_and_is_not_cached() {
        let fetch = Arc::new(StubFetch::default());
        let scraper = scraper_for(fetch.clone());

        assert!(scraper
            .get_matches("https://example.com/down", MatchType::Upcoming)
            .await
            .is_err());
        assert_eq!(scraper.cached_entries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetches_after_ttl_expires() {
        let url = "https://example.com/previous";
        let fetch = Arc::new(StubFetch::default().with_page(url, PREVIOUS_HTML));
        let scraper = MatchScraper::new(fetch.clone(), TtlCache::new(60));

        scraper.get_matches(url, MatchType::Previous).await.unwrap();
        tokio::time::advance(std::time::Duration::from_secs(60)).await;
        scraper.get_matches(url, MatchType::Previous).await.unwrap();
        assert_eq!(fetch.calls(), 1);

        tokio::time::advance(std::time::Duration::from_secs(1)).await;
        let matches = scraper.get_matches(url, MatchType::Previous).await.unwrap();
        assert_eq!(fetch.calls(), 2);
        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let url = "https://example.com/upcoming";
        let fetch = Arc::new(StubFetch::default().with_page(url, UPCOMING_HTML));
        let scraper = scraper_for(fetch.clone());

        scraper.get_matches(url, MatchType::Upcoming).await.unwrap();
        scraper.clear_cache();
        scraper.get_matches(url, MatchType::Upcoming).await.unwrap();

        assert_eq!(fetch.calls(), 2);
    }

    #[test]
    fn test_skips_node_without_timestamp() {
        let html = r#"
            <ul><li wire:key="listkamp_99999">
              <div x-data="{}">
                <div class="truncate">Team A</div>
                <div class="truncate">Team B</div>
              </div>
            </li></ul>"#;
        assert!(parse(html, MatchType::Upcoming).is_empty());
    }

    #[test]
    fn test_skips_node_with_one_team() {
        let html = r#"
            <ul><li wire:key="listkamp_88888">
              <div x-data="{ timestamp: 1769900400 }">
                <div class="truncate">Team A</div>
              </div>
            </li></ul>"#;
        assert!(parse(html, MatchType::Upcoming).is_empty());
    }

    #[test]
    fn test_skips_nodes_without_listing_key() {
        let html = r#"
            <ul>
              <li wire:key="other_1">
                <div x-data="{ timestamp: 1769900400 }">
                  <div class="truncate">Team A</div>
                  <div class="truncate">Team B</div>
                </div>
              </li>
              <li wire:key="listkamp_">
                <div x-data="{ timestamp: 1769900400 }">
                  <div class="truncate">Team A</div>
                  <div class="truncate">Team B</div>
                </div>
              </li>
            </ul>"#;
        assert!(parse(html, MatchType::Upcoming).is_empty());
    }

    #[test]
    fn test_previous_match_without_goals_defaults_to_zero() {
        let html = r#"
            <ul><li wire:key="listkamp_5">
              <div x-data="{ homegoals: '', timestamp: 1768000000 }">
                <div class="truncate">Home</div>
                <div class="truncate">Away</div>
              </div>
            </li></ul>"#;
        let matches = parse(html, MatchType::Previous);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].home_score.as_deref(), Some("0"));
        assert_eq!(matches[0].away_score.as_deref(), Some("0"));
    }

    #[test]
    fn test_upcoming_ignores_goals_in_data_block() {
        let matches = parse(PREVIOUS_HTML, MatchType::Upcoming);

        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .all(|m| m.home_score.is_none() && m.away_score.is_none()));
    }

    #[test]
    fn test_venue_lines_are_not_teams() {
        assert!(is_team_name("Team A"));
        assert!(!is_team_name(""));
        assert!(!is_team_name("Bøler sportsenter"));
        assert!(!is_team_name("Bane 1 \u{2013} 2"));
    }
}
