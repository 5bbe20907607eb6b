use std::sync::Arc;

use ::scraper::{ElementRef, Html, Selector};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cache::TtlCache;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::model::TableEntry;
use crate::scraper::{element_text, parse_leading_int};

const TABLE_COLUMNS: usize = 9;

/// League standings, memoized per URL.
pub struct TableScraper {
    fetch: Arc<dyn Fetch>,
    cache: TtlCache<Vec<TableEntry>>,
}

impl TableScraper {
    pub fn new(fetch: Arc<dyn Fetch>, cache: TtlCache<Vec<TableEntry>>) -> Self {
        Self { fetch, cache }
    }

    /// Return the standings rows at `url` in page order.
    #[instrument(skip(self))]
    pub async fn get_table(&self, url: &str) -> Result<Vec<TableEntry>> {
        if let Some(entries) = self.cache.get(url) {
            debug!("cache hit for table");
            return Ok(entries);
        }

        debug!("cache miss for table, fetching and parsing");
        let body = self.fetch.fetch_text(url).await?;
        let entries = parse_table(&Html::parse_document(&body))?;
        debug!(count = entries.len(), "parsed standings table");

        self.cache.set(url, entries.clone());
        Ok(entries)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.size()
    }
}

pub(crate) fn parse_table(document: &Html) -> Result<Vec<TableEntry>> {
    let row_selector = Selector::parse("table.text-sm tbody tr")?;
    let td_selector = Selector::parse("td")?;

    let entries = document
        .select(&row_selector)
        .filter_map(|row| {
            let cells = row.select(&td_selector).collect_vec();
            parse_row(&cells)
        })
        .collect_vec();
    Ok(entries)
}

fn parse_row(cells: &[ElementRef]) -> Option<TableEntry> {
    if cells.len() < TABLE_COLUMNS {
        debug!(columns = cells.len(), "skipping standings row with missing columns");
        return None;
    }

    let text = cells.iter().map(element_text).collect_vec();

    let Some(position) = parse_leading_int(&text[0]) else {
        debug!(cell = %text[0], "skipping standings row with invalid position");
        return None;
    };

    let team = text[1].clone();
    if team.is_empty() {
        debug!(position, "skipping standings row without team");
        return None;
    }

    let (goals_for, goals_against) = parse_goals(&text[6]);

    Some(TableEntry {
        position,
        team,
        matches_played: parse_leading_int(&text[2]),
        wins: parse_leading_int(&text[3]),
        draws: parse_leading_int(&text[4]),
        losses: parse_leading_int(&text[5]),
        goals_for,
        goals_against,
        goal_difference: parse_leading_int(&text[7]),
        points: parse_leading_int(&text[8]),
    })
}

/// Split a `"<for> - <against>"` cell. Either side that is missing or not
/// numeric counts as zero.
fn parse_goals(cell: &str) -> (i32, i32) {
    let mut sides = cell.split('-').map(str::trim);
    let mut side = || sides.next().and_then(parse_leading_int).unwrap_or(0);
    let goals_for = side();
    let goals_against = side();
    (goals_for, goals_against)
}
