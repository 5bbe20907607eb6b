//! Scrapes Databrus FC fixtures, results and league standings from the
//! club's public pages and caches the parsed records in memory.

pub use cache::TtlCache;
pub use client::{DatabrusClient, SourceUrls};
pub use config::{Config, ConfigError};
pub use error::{Result, ScraperError};
pub use fetch::Fetch;
pub use model::*;
pub use crate::scraper::{MatchScraper, TableScraper};

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod scraper;
