//! # webdriver-testing-library
#![allow(clippy::uninlined_format_args)]
//!
//! Testing-Library style queries over a WebDriver session.
//!
//! Find elements the way a user would (by role, visible text, label,
//! placeholder, alt text, title, test id, or form value) or by plain
//! CSS/XPath, under the familiar result-count policies:
//!
//! - `get*` fails when nothing or more than one element matches
//! - `query*` returns `None` (or an empty list) when nothing matches
//! - `find*` polls until something matches or the timeout passes
//!
//! Semantic queries run through `@testing-library/dom`, injected into the
//! page on first use. Set `semantic_backend` to `xpath` to translate them
//! into XPath instead.
//!
//! ## Library Usage
//!
//! ```no_run
//! use webdriver_testing_library::{BrowserType, Config, Locator, SessionBuilder};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let screen = SessionBuilder::new(BrowserType::Firefox)
//!     .headless(true)
//!     .screen(Config::load()?)
//!     .await?;
//!
//! screen.driver().goto("https://example.com/login").await?;
//!
//! let email = screen.get_by_label_text("Email address").await?;
//! email.send_keys("user@example.com").await?;
//!
//! let form = screen.get(Locator::css("form#login")).await?;
//! screen
//!     .within(&form)
//!     .get(Locator::role("button").with_name("Sign in"))
//!     .await?
//!     .click()
//!     .await?;
//!
//! let banner = screen.find_by_text("Welcome back").await?;
//! assert!(screen.query_by_text("Invalid password").await?.is_none());
//! # let _ = banner;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! [`Config::load`] starts from defaults, reads
//! `$WDTL_CONFIG` or `<config dir>/webdriver-testing-library/config.json`
//! when present, then applies `WDTL_*` environment overrides.

/// Result-count policies
pub mod cardinality;

/// Query configuration
pub mod config;

/// Driver seam and the fantoccini implementation
pub mod driver;

/// Error types
pub mod errors;

/// Injected DOM query library
pub mod library;

/// Locator value objects
pub mod locator;

/// Query surface
pub mod screen;

/// WebDriver session setup
pub mod session;

/// Locator translation into native queries and library calls
pub mod translate;

#[cfg(test)]
mod mock;

pub use cardinality::Cardinality;
pub use config::Config;
pub use driver::Driver;
pub use errors::{QueryError, Result};
pub use library::LibrarySource;
pub use locator::{By, Locator, Pattern, QueryOptions};
pub use screen::Screen;
pub use session::{BrowserType, SessionBuilder, ViewportSize, is_webdriver_running};
pub use translate::SemanticBackend;
