//! Testing-Library style query surface
//!
//! A [`Screen`] wraps a driver and resolves [`Locator`]s under one of six
//! result-count policies:
//!
//! | method      | 0 matches       | 1 match   | 2+ matches      |
//! |-------------|-----------------|-----------|-----------------|
//! | `get`       | `NoSuchElement` | element   | `MultipleSuchElements` |
//! | `query`     | `None`          | element   | `MultipleSuchElements` |
//! | `find`      | polls, then `NoSuchElement` | element | `MultipleSuchElements` |
//! | `get_all`   | `NoSuchElement` | `[el]`    | all             |
//! | `query_all` | `[]`            | `[el]`    | all             |
//! | `find_all`  | polls, then `NoSuchElement` | `[el]` | all     |

use std::sync::Arc;

use fantoccini::Client;
use tracing::{debug, warn};

use crate::cardinality::{Cardinality, Verdict, judge, poll_until_found};
use crate::config::Config;
use crate::driver::Driver;
use crate::errors::{QueryError, Result};
use crate::library::DomLibrary;
use crate::locator::{Locator, Pattern};
use crate::translate::{Plan, Translator};

/// Entry point for queries, over the whole document or within an element
#[derive(Clone)]
pub struct Screen<D: Driver = Client> {
    driver: D,
    config: Arc<Config>,
    library: Arc<DomLibrary>,
    scope: Option<D::Element>,
}

macro_rules! semantic_queries {
    ($(
        $by:literal => $ctor:ident:
            $get:ident, $query:ident, $find:ident,
            $get_all:ident, $query_all:ident, $find_all:ident;
    )*) => {
        $(
            #[doc = concat!("Single element by ", $by, ", now")]
            pub async fn $get(&self, value: impl Into<Pattern>) -> Result<D::Element> {
                self.get(Locator::$ctor(value)).await
            }

            #[doc = concat!("Optional element by ", $by, ", now")]
            pub async fn $query(&self, value: impl Into<Pattern>) -> Result<Option<D::Element>> {
                self.query(Locator::$ctor(value)).await
            }

            #[doc = concat!("Single element by ", $by, ", polling until it appears")]
            pub async fn $find(&self, value: impl Into<Pattern>) -> Result<D::Element> {
                self.find(Locator::$ctor(value)).await
            }

            #[doc = concat!("Non-empty list of elements by ", $by, ", now")]
            pub async fn $get_all(&self, value: impl Into<Pattern>) -> Result<Vec<D::Element>> {
                self.get_all(Locator::$ctor(value)).await
            }

            #[doc = concat!("Possibly empty list of elements by ", $by, ", now")]
            pub async fn $query_all(&self, value: impl Into<Pattern>) -> Result<Vec<D::Element>> {
                self.query_all(Locator::$ctor(value)).await
            }

            #[doc = concat!("Non-empty list of elements by ", $by, ", polling until some appear")]
            pub async fn $find_all(&self, value: impl Into<Pattern>) -> Result<Vec<D::Element>> {
                self.find_all(Locator::$ctor(value)).await
            }
        )*
    };
}

impl<D: Driver> Screen<D> {
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, Config::default())
    }

    pub fn with_config(driver: D, config: Config) -> Self {
        let library = DomLibrary::new(config.library.clone(), &config.test_id_attribute);
        Screen {
            driver,
            config: Arc::new(config),
            library: Arc::new(library),
            scope: None,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Element the lookups are restricted to, if any
    pub fn scope(&self) -> Option<&D::Element> {
        self.scope.as_ref()
    }

    /// Screen whose lookups only see descendants of `element`
    pub fn within(&self, element: &D::Element) -> Self {
        Screen {
            driver: self.driver.clone(),
            config: Arc::clone(&self.config),
            library: Arc::clone(&self.library),
            scope: Some(element.clone()),
        }
    }

    /// Exactly one match, now
    pub async fn get(&self, locator: impl Into<Locator>) -> Result<D::Element> {
        let locator = locator.into();
        let found = self.resolve(Cardinality::Get, &locator).await?;
        found
            .into_iter()
            .next()
            .ok_or_else(|| not_found(&locator, None))
    }

    /// At most one match, now
    pub async fn query(&self, locator: impl Into<Locator>) -> Result<Option<D::Element>> {
        let locator = locator.into();
        let found = self.resolve(Cardinality::Query, &locator).await?;
        Ok(found.into_iter().next())
    }

    /// Exactly one match, polling until it appears or the timeout passes
    pub async fn find(&self, locator: impl Into<Locator>) -> Result<D::Element> {
        let locator = locator.into();
        let found = self.resolve(Cardinality::Find, &locator).await?;
        found
            .into_iter()
            .next()
            .ok_or_else(|| not_found(&locator, Some(self.config.timeout())))
    }

    /// One or more matches, now
    pub async fn get_all(&self, locator: impl Into<Locator>) -> Result<Vec<D::Element>> {
        let locator = locator.into();
        self.resolve(Cardinality::GetAll, &locator).await
    }

    /// Any number of matches, now
    pub async fn query_all(&self, locator: impl Into<Locator>) -> Result<Vec<D::Element>> {
        let locator = locator.into();
        self.resolve(Cardinality::QueryAll, &locator).await
    }

    /// One or more matches, polling until some appear or the timeout passes
    pub async fn find_all(&self, locator: impl Into<Locator>) -> Result<Vec<D::Element>> {
        let locator = locator.into();
        self.resolve(Cardinality::FindAll, &locator).await
    }

    semantic_queries! {
        "role" => role:
            get_by_role, query_by_role, find_by_role,
            get_all_by_role, query_all_by_role, find_all_by_role;
        "text" => text:
            get_by_text, query_by_text, find_by_text,
            get_all_by_text, query_all_by_text, find_all_by_text;
        "label text" => label_text:
            get_by_label_text, query_by_label_text, find_by_label_text,
            get_all_by_label_text, query_all_by_label_text, find_all_by_label_text;
        "placeholder" => placeholder:
            get_by_placeholder, query_by_placeholder, find_by_placeholder,
            get_all_by_placeholder, query_all_by_placeholder, find_all_by_placeholder;
        "alt text" => alt_text:
            get_by_alt_text, query_by_alt_text, find_by_alt_text,
            get_all_by_alt_text, query_all_by_alt_text, find_all_by_alt_text;
        "title" => title:
            get_by_title, query_by_title, find_by_title,
            get_all_by_title, query_all_by_title, find_all_by_title;
        "test id" => test_id:
            get_by_test_id, query_by_test_id, find_by_test_id,
            get_all_by_test_id, query_all_by_test_id, find_all_by_test_id;
        "display value" => display_value:
            get_by_display_value, query_by_display_value, find_by_display_value,
            get_all_by_display_value, query_all_by_display_value, find_all_by_display_value;
    }

    async fn resolve(&self, policy: Cardinality, locator: &Locator) -> Result<Vec<D::Element>> {
        let (matches, waited) = if policy.waits() {
            let timeout = self.config.timeout();
            let found = poll_until_found(timeout, self.config.poll_interval(), || {
                self.search(locator)
            })
            .await?;
            (found, Some(timeout))
        } else {
            (self.search(locator).await?, None)
        };

        debug!(
            "{} by {}: {} match(es)",
            policy.as_str(),
            locator,
            matches.len()
        );

        match judge(policy, matches) {
            Verdict::Matched(found) => Ok(found),
            Verdict::Empty if policy.allows_empty() => Ok(Vec::new()),
            Verdict::Empty => Err(not_found(locator, waited)),
            Verdict::TooMany(found) => Err(self.too_many(locator, found).await),
        }
    }

    /// One lookup, no count policy applied
    async fn search(&self, locator: &Locator) -> Result<Vec<D::Element>> {
        let translator = Translator {
            backend: self.config.semantic_backend,
            test_id_attribute: &self.config.test_id_attribute,
        };

        match translator.plan(locator, self.scope.is_some())? {
            Plan::Native(query) => {
                debug!("Finding elements with {:?}", query);
                self.driver
                    .find_elements(self.scope.as_ref(), &query)
                    .await
            }
            Plan::Script {
                function,
                matcher,
                options,
            } => {
                debug!("Calling {} with {} {}", function, matcher, options);
                self.library
                    .query_all(&self.driver, self.scope.as_ref(), function, &matcher, &options)
                    .await
            }
        }
    }

    async fn too_many(&self, locator: &Locator, found: Vec<D::Element>) -> QueryError {
        let mut elements = Vec::with_capacity(found.len());
        for element in &found {
            let markup = match self.driver.outer_html(element).await {
                Ok(html) => truncate_markup(&html, self.config.debug_print_limit),
                Err(e) => {
                    warn!("Could not render matched element: {}", e);
                    format!("<unavailable: {}>", e)
                }
            };
            elements.push(markup);
        }

        QueryError::MultipleSuchElements {
            locator: locator.to_string(),
            count: found.len(),
            elements,
        }
    }
}

fn not_found(locator: &Locator, waited: Option<std::time::Duration>) -> QueryError {
    QueryError::NoSuchElement {
        locator: locator.to_string(),
        waited,
    }
}

/// Cut `html` to `limit` characters, marking the cut
fn truncate_markup(html: &str, limit: usize) -> String {
    match html.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &html[..cut]),
        None => html.to_string(),
    }
}

#[cfg(test)]
#[path = "screen_test.rs"]
mod tests;
