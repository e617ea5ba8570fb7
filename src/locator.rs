//! Locator value objects
//!
//! A [`Locator`] pairs a lookup strategy ([`By`]) with a value and, for the
//! semantic strategies, optional [`QueryOptions`] that are forwarded to the
//! DOM query library.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lookup strategy of a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum By {
    // Structural strategies, resolved by the driver
    Id,
    Css,
    XPath,
    TagName,
    Name,
    LinkText,
    PartialLinkText,
    ClassName,
    // Semantic strategies
    Role,
    Text,
    LabelText,
    Placeholder,
    AltText,
    Title,
    TestId,
    DisplayValue,
}

impl By {
    pub const ALL: [By; 16] = [
        By::Id,
        By::Css,
        By::XPath,
        By::TagName,
        By::Name,
        By::LinkText,
        By::PartialLinkText,
        By::ClassName,
        By::Role,
        By::Text,
        By::LabelText,
        By::Placeholder,
        By::AltText,
        By::Title,
        By::TestId,
        By::DisplayValue,
    ];

    /// Whether this strategy describes the element by what a user perceives
    pub fn is_semantic(&self) -> bool {
        matches!(
            self,
            By::Role
                | By::Text
                | By::LabelText
                | By::Placeholder
                | By::AltText
                | By::Title
                | By::TestId
                | By::DisplayValue
        )
    }

    /// Name of the strategy, using WebDriver's spelling for structural ones
    pub fn as_str(&self) -> &'static str {
        match self {
            By::Id => "id",
            By::Css => "css selector",
            By::XPath => "xpath",
            By::TagName => "tag name",
            By::Name => "name",
            By::LinkText => "link text",
            By::PartialLinkText => "partial link text",
            By::ClassName => "class name",
            By::Role => "role",
            By::Text => "text",
            By::LabelText => "label text",
            By::Placeholder => "placeholder",
            By::AltText => "alt text",
            By::Title => "title",
            By::TestId => "test id",
            By::DisplayValue => "display value",
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for By {
    type Err = anyhow::Error;

    /// Parse a strategy name (case-insensitive, `-`/`_` treated as spaces)
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        let by = match normalized.as_str() {
            "css" => By::Css,
            "tag" => By::TagName,
            "class" => By::ClassName,
            "label" => By::LabelText,
            "testid" => By::TestId,
            other => match By::ALL.iter().find(|by| by.as_str() == other) {
                Some(by) => *by,
                None => anyhow::bail!("Unknown locator strategy: {}", s),
            },
        };
        Ok(by)
    }
}

/// Value matched by a semantic locator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pattern {
    /// Plain string, compared according to [`QueryOptions::exact`]
    Literal(String),
    /// JavaScript regular expression
    Regex { source: String, flags: String },
}

impl Pattern {
    pub fn regex(source: impl Into<String>) -> Self {
        Pattern::Regex {
            source: source.into(),
            flags: String::new(),
        }
    }

    pub fn regex_with_flags(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Pattern::Regex {
            source: source.into(),
            flags: flags.into(),
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Pattern::Literal(s) => Some(s),
            Pattern::Regex { .. } => None,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(s) => write!(f, "{:?}", s),
            Pattern::Regex { source, flags } => write!(f, "/{}/{}", source, flags),
        }
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::Literal(s.to_string())
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Pattern::Literal(s)
    }
}

impl From<&String> for Pattern {
    fn from(s: &String) -> Self {
        Pattern::Literal(s.clone())
    }
}

/// Options forwarded to the semantic queries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    /// Exact, case-sensitive match (the library default) or substring match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,
    /// Accessible name filter for role queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Pattern>,
    /// Heading level filter for role queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Include elements hidden from the accessibility tree
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// Restrict text and label queries to elements matching this CSS selector
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

impl QueryOptions {
    pub fn is_empty(&self) -> bool {
        self == &QueryOptions::default()
    }

    /// Substring matching requested
    pub fn is_inexact(&self) -> bool {
        self.exact == Some(false)
    }
}

/// How to find zero or more elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub by: By,
    pub value: Pattern,
    #[serde(default, skip_serializing_if = "QueryOptions::is_empty")]
    pub options: QueryOptions,
}

impl Locator {
    pub fn new(by: By, value: impl Into<Pattern>) -> Self {
        Locator {
            by,
            value: value.into(),
            options: QueryOptions::default(),
        }
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::new(By::Id, id.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(By::Css, selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::new(By::XPath, expression.into())
    }

    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::new(By::TagName, tag.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::new(By::Name, name.into())
    }

    pub fn link_text(text: impl Into<String>) -> Self {
        Self::new(By::LinkText, text.into())
    }

    pub fn partial_link_text(text: impl Into<String>) -> Self {
        Self::new(By::PartialLinkText, text.into())
    }

    pub fn class_name(class: impl Into<String>) -> Self {
        Self::new(By::ClassName, class.into())
    }

    pub fn role(role: impl Into<Pattern>) -> Self {
        Self::new(By::Role, role)
    }

    pub fn text(text: impl Into<Pattern>) -> Self {
        Self::new(By::Text, text)
    }

    pub fn label_text(text: impl Into<Pattern>) -> Self {
        Self::new(By::LabelText, text)
    }

    pub fn placeholder(text: impl Into<Pattern>) -> Self {
        Self::new(By::Placeholder, text)
    }

    pub fn alt_text(text: impl Into<Pattern>) -> Self {
        Self::new(By::AltText, text)
    }

    pub fn title(text: impl Into<Pattern>) -> Self {
        Self::new(By::Title, text)
    }

    pub fn test_id(id: impl Into<Pattern>) -> Self {
        Self::new(By::TestId, id)
    }

    pub fn display_value(value: impl Into<Pattern>) -> Self {
        Self::new(By::DisplayValue, value)
    }

    /// Require an exact match (`true`) or a case-insensitive substring match
    pub fn exact(mut self, exact: bool) -> Self {
        self.options.exact = Some(exact);
        self
    }

    /// Filter role matches by accessible name
    pub fn with_name(mut self, name: impl Into<Pattern>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    /// Filter heading role matches by level
    pub fn level(mut self, level: u8) -> Self {
        self.options.level = Some(level);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.options.hidden = Some(hidden);
        self
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.options.selector = Some(selector.into());
        self
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.by, self.value)?;
        if let Some(name) = &self.options.name {
            write!(f, " named {}", name)?;
        }
        if let Some(level) = self.options.level {
            write!(f, " at level {}", level)?;
        }
        Ok(())
    }
}

impl From<(By, &str)> for Locator {
    fn from((by, value): (By, &str)) -> Self {
        Locator::new(by, value)
    }
}

impl From<(By, String)> for Locator {
    fn from((by, value): (By, String)) -> Self {
        Locator::new(by, value)
    }
}

impl From<&Locator> for Locator {
    fn from(locator: &Locator) -> Self {
        locator.clone()
    }
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod tests;
