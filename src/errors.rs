use std::time::Duration;

use thiserror::Error;

/// Errors produced while resolving a query against the page
#[derive(Debug, Error)]
pub enum QueryError {
    /// No element matched (the "get" and "find" policies)
    #[error("Unable to find an element by {locator}{}", waited_suffix(.waited))]
    NoSuchElement {
        locator: String,
        /// How long a "find" query polled before giving up
        waited: Option<Duration>,
    },

    /// More than one element matched a singular query
    #[error(
        "Found {count} elements by {locator}, expected exactly one:\n\n{}",
        .elements.join("\n\n")
    )]
    MultipleSuchElements {
        locator: String,
        count: usize,
        /// Outer HTML of every match, truncated for display
        elements: Vec<String>,
    },

    /// The locator value cannot be expressed for its strategy
    #[error("Invalid locator {locator}: {reason}")]
    InvalidLocator { locator: String, reason: String },

    /// The configured backend has no translation for this locator
    #[error("{locator} is not supported by the {backend} backend")]
    UnsupportedLocator {
        locator: String,
        backend: &'static str,
    },

    /// The DOM query library could not be installed into the page
    #[error("DOM query library is not available in the page after injection")]
    LibraryUnavailable,

    /// The configured library source could not be loaded
    #[error("Failed to load DOM query library from {source_name}: {reason}")]
    LibrarySource { source_name: String, reason: String },

    /// The page returned something other than a list of elements
    #[error("Unexpected response from the page: {0}")]
    InvalidResponse(String),

    /// WebDriver command failed
    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),
}

fn waited_suffix(waited: &Option<Duration>) -> String {
    match waited {
        Some(waited) => format!(" within {}ms", waited.as_millis()),
        None => String::new(),
    }
}

impl QueryError {
    /// True for the zero-match error of `get`/`find` style queries
    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::NoSuchElement { .. })
    }

    /// True when a singular query matched several elements
    pub fn is_too_many(&self) -> bool {
        matches!(self, QueryError::MultipleSuchElements { .. })
    }

    /// Number of elements that matched, when known
    pub fn match_count(&self) -> Option<usize> {
        match self {
            QueryError::NoSuchElement { .. } => Some(0),
            QueryError::MultipleSuchElements { count, .. } => Some(*count),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
