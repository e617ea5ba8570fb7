//! Page-side DOM query library
//!
//! Semantic queries run through `@testing-library/dom`, which is injected
//! into the page the first time a query finds it missing. Navigation drops
//! the injected helper, so every query first attempts the call and only
//! injects (then retries once) when the page reports the helper absent.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::driver::Driver;
use crate::errors::{QueryError, Result};

/// UMD bundle of `@testing-library/dom`, exposing the `TestingLibraryDom` global
pub const DEFAULT_LIBRARY_URL: &str =
    "https://unpkg.com/@testing-library/dom@10/dist/@testing-library/dom.umd.min.js";

/// Installs `window.__wdtl__` from the `TestingLibraryDom` global
pub(crate) const INSTALL_SCRIPT: &str = include_str!("../js/install.js");

/// Returns `null` when the helper is missing, otherwise the matches
pub(crate) const QUERY_SCRIPT: &str = r#"
var lib = window.__wdtl__;
if (!lib) {
    return null;
}
function toMatcher(value) {
    if (value && typeof value === 'object') {
        return new RegExp(value.source, value.flags);
    }
    return value;
}
var container = arguments[0] || document.body;
var options = arguments[3] || {};
if (options.name !== undefined) {
    options.name = toMatcher(options.name);
}
return Array.prototype.slice.call(
    lib[arguments[1]](container, toMatcher(arguments[2]), options)
);
"#;

const LOAD_URL_SCRIPT: &str = r#"
var url = arguments[0];
var done = arguments[arguments.length - 1];
if (window.TestingLibraryDom) {
    done(true);
    return;
}
var script = document.createElement('script');
script.src = url;
script.onload = function () { done(!!window.TestingLibraryDom); };
script.onerror = function () { done(false); };
(document.head || document.documentElement).appendChild(script);
"#;

const LOAD_INLINE_SCRIPT: &str = r#"
if (!window.TestingLibraryDom) {
    var script = document.createElement('script');
    script.textContent = arguments[0];
    (document.head || document.documentElement).appendChild(script);
}
return !!window.TestingLibraryDom;
"#;

/// Where the library bundle comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibrarySource {
    /// Loaded by the page through a script tag
    Url(String),
    /// Read from disk and inlined into the page
    File(PathBuf),
    /// Bundle text inlined into the page
    Inline(String),
}

impl Default for LibrarySource {
    fn default() -> Self {
        LibrarySource::Url(DEFAULT_LIBRARY_URL.to_string())
    }
}

impl LibrarySource {
    /// Short description used in logs and errors
    pub fn describe(&self) -> String {
        match self {
            LibrarySource::Url(url) => url.clone(),
            LibrarySource::File(path) => path.display().to_string(),
            LibrarySource::Inline(code) => format!("inline bundle ({} bytes)", code.len()),
        }
    }

    /// Check that a URL source is absolute and loadable by a page
    pub fn validate(&self) -> anyhow::Result<()> {
        if let LibrarySource::Url(raw) = self {
            let parsed = url::Url::parse(raw)
                .map_err(|e| anyhow::anyhow!("Invalid library URL '{}': {}", raw, e))?;
            if !matches!(parsed.scheme(), "http" | "https" | "file") {
                anyhow::bail!("Unsupported library URL scheme: {}", parsed.scheme());
            }
        }
        Ok(())
    }
}

/// Calls into the injected library, installing it on demand
#[derive(Debug, Clone)]
pub struct DomLibrary {
    source: LibrarySource,
    configure: Value,
}

impl DomLibrary {
    pub fn new(source: LibrarySource, test_id_attribute: &str) -> Self {
        DomLibrary {
            source,
            configure: json!({ "testIdAttribute": test_id_attribute }),
        }
    }

    pub fn source(&self) -> &LibrarySource {
        &self.source
    }

    /// Run `function` from the library against `scope` (or the whole body)
    pub async fn query_all<D: Driver>(
        &self,
        driver: &D,
        scope: Option<&D::Element>,
        function: &str,
        matcher: &Value,
        options: &Value,
    ) -> Result<Vec<D::Element>> {
        let container = match scope {
            Some(element) => driver.element_arg(element)?,
            None => Value::Null,
        };
        let args = vec![
            container,
            Value::String(function.to_string()),
            matcher.clone(),
            options.clone(),
        ];

        if let Some(found) = self.try_query(driver, args.clone()).await? {
            return Ok(found);
        }

        self.install(driver).await?;

        self.try_query(driver, args)
            .await?
            .ok_or(QueryError::LibraryUnavailable)
    }

    async fn try_query<D: Driver>(&self, driver: &D, args: Vec<Value>) -> Result<Option<Vec<D::Element>>> {
        let value = driver.execute(QUERY_SCRIPT, args).await?;
        if value.is_null() {
            debug!("DOM query helper not present in page");
            return Ok(None);
        }
        driver.elements_from_value(value).map(Some)
    }

    /// Load the bundle into the current page and install the helper
    pub async fn install<D: Driver>(&self, driver: &D) -> Result<()> {
        info!("Injecting DOM query library from {}", self.source.describe());

        let loaded = match &self.source {
            LibrarySource::Url(url) => {
                driver
                    .execute_async(LOAD_URL_SCRIPT, vec![Value::String(url.clone())])
                    .await?
            }
            LibrarySource::File(path) => {
                let code = tokio::fs::read_to_string(path).await.map_err(|e| {
                    QueryError::LibrarySource {
                        source_name: self.source.describe(),
                        reason: e.to_string(),
                    }
                })?;
                driver
                    .execute(LOAD_INLINE_SCRIPT, vec![Value::String(code)])
                    .await?
            }
            LibrarySource::Inline(code) => {
                driver
                    .execute(LOAD_INLINE_SCRIPT, vec![Value::String(code.clone())])
                    .await?
            }
        };

        if !loaded.as_bool().unwrap_or(false) {
            return Err(QueryError::LibrarySource {
                source_name: self.source.describe(),
                reason: "bundle did not define the TestingLibraryDom global".to_string(),
            });
        }

        let installed = driver
            .execute(INSTALL_SCRIPT, vec![self.configure.clone()])
            .await?;
        if !installed.as_bool().unwrap_or(false) {
            return Err(QueryError::LibraryUnavailable);
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "library_test.rs"]
mod tests;
