//! Listing query, page and error types.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use thiserror::Error;

use crate::candidate::Candidate;
use crate::http::HttpError;

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortMode {
    Hot,
    New,
    Rising,
    Top,
    Controversial,
}

impl SortMode {
    pub const ALL: [SortMode; 5] = [
        SortMode::Hot,
        SortMode::New,
        SortMode::Rising,
        SortMode::Top,
        SortMode::Controversial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Hot => "hot",
            SortMode::New => "new",
            SortMode::Rising => "rising",
            SortMode::Top => "top",
            SortMode::Controversial => "controversial",
        }
    }

    /// True for sort modes that are ranked within a time window.
    pub fn requires_window(&self) -> bool {
        matches!(self, SortMode::Top | SortMode::Controversial)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| QueryError::UnknownSort(s.to_string()))
    }
}

/// Time window for `top` and `controversial` listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 6] = [
        TimeWindow::Hour,
        TimeWindow::Day,
        TimeWindow::Week,
        TimeWindow::Month,
        TimeWindow::Year,
        TimeWindow::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|window| window.as_str() == wanted)
            .ok_or_else(|| QueryError::UnknownWindow(s.to_string()))
    }
}

/// Invalid sort/window combination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown sort mode '{0}' (expected hot, new, rising, top or controversial)")]
    UnknownSort(String),

    #[error("unknown time window '{0}' (expected hour, day, week, month, year or all)")]
    UnknownWindow(String),

    #[error("sort mode '{0}' requires a time window")]
    MissingWindow(SortMode),
}

/// A validated sort mode plus the window it needs, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingQuery {
    sort: SortMode,
    window: Option<TimeWindow>,
}

impl ListingQuery {
    /// Validate a sort/window pair.
    ///
    /// A window given for a sort that does not use one is ignored.
    pub fn new(sort: SortMode, window: Option<TimeWindow>) -> Result<Self, QueryError> {
        if !sort.requires_window() {
            return Ok(Self { sort, window: None });
        }
        match window {
            Some(window) => Ok(Self {
                sort,
                window: Some(window),
            }),
            None => Err(QueryError::MissingWindow(sort)),
        }
    }

    /// Parse and validate raw configuration strings.
    ///
    /// An empty window string counts as absent. A non-empty window is
    /// validated even when the sort mode does not use it.
    pub fn parse(sort: &str, window: Option<&str>) -> Result<Self, QueryError> {
        let sort: SortMode = sort.parse()?;
        let window = window
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::parse::<TimeWindow>)
            .transpose()?;
        Self::new(sort, window)
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// The window, only set for sort modes that use one.
    pub fn window(&self) -> Option<TimeWindow> {
        self.window
    }
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            sort: SortMode::Hot,
            window: None,
        }
    }
}

impl fmt::Display for ListingQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.window {
            Some(window) => write!(f, "{} ({})", self.sort, window),
            None => write!(f, "{}", self.sort),
        }
    }
}

/// One parsed listing page.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub candidates: Vec<Candidate>,
    /// Opaque continuation token, `None` on the last page.
    pub after: Option<String>,
}

/// Failure fetching or parsing one listing page.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("listing returned status {0}")]
    Status(u16),

    #[error("malformed listing: {0}")]
    Malformed(String),

    #[error("invalid listing URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("listing base URL cannot take a path: {0}")]
    BaseUrl(String),
}

/// Source of paginated listings.
///
/// Implementations fetch one page per call and do not retry.
pub trait ListingSource: Send + Sync {
    fn fetch_page(
        &self,
        feed: &str,
        query: &ListingQuery,
        after: Option<&str>,
    ) -> impl Future<Output = Result<ListingPage, ListingError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("hot".parse(), Ok(SortMode::Hot));
        assert_eq!("Controversial".parse(), Ok(SortMode::Controversial));
        assert_eq!(
            "best".parse::<SortMode>(),
            Err(QueryError::UnknownSort("best".to_string()))
        );
    }

    #[test]
    fn test_time_window_parse() {
        assert_eq!("all".parse(), Ok(TimeWindow::All));
        assert!("decade".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn test_top_requires_window() {
        assert_eq!(
            ListingQuery::new(SortMode::Top, None),
            Err(QueryError::MissingWindow(SortMode::Top))
        );
        assert_eq!(
            ListingQuery::parse("controversial", Some("")),
            Err(QueryError::MissingWindow(SortMode::Controversial))
        );

        let query = ListingQuery::parse("top", Some("week")).unwrap();
        assert_eq!(query.window(), Some(TimeWindow::Week));
    }

    #[test]
    fn test_window_ignored_for_hot() {
        let query = ListingQuery::parse("hot", Some("week")).unwrap();
        assert_eq!(query.sort(), SortMode::Hot);
        assert_eq!(query.window(), None);
    }

    #[test]
    fn test_unknown_window_always_rejected() {
        assert_eq!(
            ListingQuery::parse("top", Some("fortnight")),
            Err(QueryError::UnknownWindow("fortnight".to_string()))
        );
        assert_eq!(
            ListingQuery::parse("new", Some("fortnight")),
            Err(QueryError::UnknownWindow("fortnight".to_string()))
        );
    }

    #[test]
    fn test_query_display() {
        let query = ListingQuery::parse("top", Some("day")).unwrap();
        assert_eq!(query.to_string(), "top (day)");
        assert_eq!(ListingQuery::default().to_string(), "hot");
    }
}
