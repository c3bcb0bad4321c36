//! Query classification.
//!
//! Decides which of the four query shapes a value is. A leading run of
//! digits wins over everything else, so `"123 Main St"` is an OSM id, not an
//! address. Any other text with a non-whitespace character is an address.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::models::{Query, QueryKind};

/// Shown when a query cannot be classified
pub const INVALID_QUERY_MESSAGE: &str = "Please enter valid location details.";

static OSM_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+").unwrap());
static ADDRESS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Please enter valid location details. (got {0:?})")]
    Invalid(String),
}

/// Classify a text query.
///
/// Returns `None` for empty or whitespace-only text, after logging the
/// user-facing diagnostic.
pub fn classify_text(text: &str) -> Option<QueryKind> {
    if OSM_ID.is_match(text) {
        Some(QueryKind::OsmId)
    } else if ADDRESS.is_match(text) {
        Some(QueryKind::Address)
    } else {
        warn!("{}", INVALID_QUERY_MESSAGE);
        None
    }
}

/// Classify a query value.
///
/// Textual variants are re-checked against their contents, so a hand-built
/// `Query::Address(String::new())` still comes back as `None`.
pub fn classify(query: &Query) -> Option<QueryKind> {
    match query {
        Query::Polygon(_) => Some(QueryKind::Polygon),
        Query::Coordinates(_) => Some(QueryKind::Coordinates),
        Query::OsmId(text) | Query::Address(text) => classify_text(text),
    }
}

impl Query {
    /// Build a textual query, picking the variant the classifier assigns
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        match classify_text(text) {
            Some(QueryKind::OsmId) => Ok(Query::OsmId(text.to_string())),
            Some(QueryKind::Address) => Ok(Query::Address(text.to_string())),
            _ => Err(QueryError::Invalid(text.to_string())),
        }
    }
}

impl std::str::FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::parse(s)
    }
}
