use ::scraper::error::SelectorErrorKind;

/// All errors that can occur while fetching or parsing Databrus pages.
///
/// Malformed markup is not an error: rows and match nodes that cannot be
/// read are skipped. Only transport failures and broken selectors/patterns
/// surface here.
#[derive(thiserror::Error, Debug)]
pub enum ScraperError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// Any other failure reported by a [`Fetch`](crate::Fetch) implementation.
    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },
}

impl<'a> From<SelectorErrorKind<'a>> for ScraperError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        ScraperError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
