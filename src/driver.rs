//! Driver seam
//!
//! Everything the query layer needs from a browser session, implemented for
//! `fantoccini::Client`.

use async_trait::async_trait;
use fantoccini::Client;
use fantoccini::elements::{Element, ElementRef};
use serde_json::Value;

use crate::errors::{QueryError, Result};
use crate::translate::NativeQuery;

/// W3C WebDriver key of a serialized element reference
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Key used by pre-W3C drivers
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Browser session operations used by [`Screen`](crate::Screen)
#[async_trait]
pub trait Driver: Clone + Send + Sync {
    type Element: Clone + Send + Sync;

    /// Run a native query against the document, or below `scope`
    async fn find_elements(
        &self,
        scope: Option<&Self::Element>,
        query: &NativeQuery,
    ) -> Result<Vec<Self::Element>>;

    /// Execute synchronous JavaScript in the page
    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value>;

    /// Execute JavaScript that reports through its trailing callback argument
    async fn execute_async(&self, script: &str, args: Vec<Value>) -> Result<Value>;

    /// Encode an element as a script argument
    fn element_arg(&self, element: &Self::Element) -> Result<Value>;

    /// Decode a script result holding a list of element references
    fn elements_from_value(&self, value: Value) -> Result<Vec<Self::Element>>;

    /// Serialized outer markup of an element
    async fn outer_html(&self, element: &Self::Element) -> Result<String>;
}

/// Extract element ids from a JSON array of element references
pub fn element_ids(value: Value) -> Result<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(QueryError::InvalidResponse(format!(
            "expected a list of elements, got {}",
            value
        )));
    };

    items
        .into_iter()
        .map(|item| {
            item.get(ELEMENT_KEY)
                .or_else(|| item.get(LEGACY_ELEMENT_KEY))
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    QueryError::InvalidResponse(format!("expected an element reference, got {}", item))
                })
        })
        .collect()
}

#[async_trait]
impl Driver for Client {
    type Element = Element;

    async fn find_elements(&self, scope: Option<&Element>, query: &NativeQuery) -> Result<Vec<Element>> {
        let found = match scope {
            Some(element) => element.find_all(query.as_locator()).await?,
            None => self.find_all(query.as_locator()).await?,
        };
        Ok(found)
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        Ok(Client::execute(self, script, args).await?)
    }

    async fn execute_async(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        Ok(Client::execute_async(self, script, args).await?)
    }

    fn element_arg(&self, element: &Element) -> Result<Value> {
        serde_json::to_value(element).map_err(|e| QueryError::InvalidResponse(e.to_string()))
    }

    fn elements_from_value(&self, value: Value) -> Result<Vec<Element>> {
        Ok(element_ids(value)?
            .into_iter()
            .map(|id| Element::from_element_id(self.clone(), ElementRef::from(id)))
            .collect())
    }

    async fn outer_html(&self, element: &Element) -> Result<String> {
        Ok(element.html(false).await?)
    }
}
