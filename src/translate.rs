//! Locator translation
//!
//! Turns a [`Locator`] into either a driver-native query (CSS, XPath, id,
//! link text) or a call into the injected DOM query library.

use fantoccini::Locator as WdLocator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{QueryError, Result};
use crate::locator::{By, Locator, Pattern, QueryOptions};

/// How semantic locators are resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticBackend {
    /// Delegate to `@testing-library/dom` injected into the page
    #[default]
    Script,
    /// Translate into hand-built XPath
    XPath,
}

impl SemanticBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticBackend::Script => "script",
            SemanticBackend::XPath => "xpath",
        }
    }
}

impl std::str::FromStr for SemanticBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "script" | "js" | "javascript" => Ok(SemanticBackend::Script),
            "xpath" => Ok(SemanticBackend::XPath),
            _ => anyhow::bail!("Unsupported semantic backend: {}", s),
        }
    }
}

/// Query the driver can execute on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeQuery {
    Id(String),
    Css(String),
    XPath(String),
    LinkText(String),
}

impl NativeQuery {
    pub fn as_locator(&self) -> WdLocator<'_> {
        match self {
            NativeQuery::Id(id) => WdLocator::Id(id),
            NativeQuery::Css(css) => WdLocator::Css(css),
            NativeQuery::XPath(xpath) => WdLocator::XPath(xpath),
            NativeQuery::LinkText(text) => WdLocator::LinkText(text),
        }
    }
}

/// Resolved plan for a locator
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Native(NativeQuery),
    /// Call `window.__wdtl__[function](container, matcher, options)`
    Script {
        function: &'static str,
        matcher: Value,
        options: Value,
    },
}

/// Translation settings taken from the screen configuration
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    pub backend: SemanticBackend,
    pub test_id_attribute: &'a str,
}

impl Translator<'_> {
    /// Build the plan for `locator`; `scoped` makes generated XPath relative
    pub fn plan(&self, locator: &Locator, scoped: bool) -> Result<Plan> {
        if !locator.by.is_semantic() {
            return structural(locator, scoped).map(Plan::Native);
        }

        match self.backend {
            SemanticBackend::Script => script_call(locator),
            SemanticBackend::XPath => {
                let union = self.semantic_xpath(locator)?;
                Ok(Plan::Native(NativeQuery::XPath(union.render(scoped))))
            }
        }
    }

    fn semantic_xpath(&self, locator: &Locator) -> Result<XPathUnion> {
        let options = &locator.options;
        let unsupported = || QueryError::UnsupportedLocator {
            locator: locator.to_string(),
            backend: SemanticBackend::XPath.as_str(),
        };

        let value = locator.value.as_literal().ok_or_else(unsupported)?;
        if options.selector.as_deref().is_some_and(|s| s != "*") {
            return Err(unsupported());
        }
        let inexact = options.is_inexact();

        let union = match locator.by {
            By::Role => role_xpath(value, options).ok_or_else(unsupported)?,
            By::Text => XPathUnion::single(format!(
                "//*[not(self::script or self::style)][text()[{}]]",
                text_condition(".", value, inexact)
            )),
            By::LabelText => {
                let label = text_condition(".", value, inexact);
                XPathUnion(vec![
                    format!("//*[@id=//label[{}]/@for]", label),
                    format!(
                        "//label[{}]//*[self::input or self::select or self::textarea or self::button]",
                        label
                    ),
                    format!("//*[@aria-labelledby=//*[@id][{}]/@id]", label),
                    format!(
                        "//*[not(self::label)][@aria-label][{}]",
                        text_condition("@aria-label", value, inexact)
                    ),
                ])
            }
            By::Placeholder => XPathUnion::single(format!(
                "//*[@placeholder][{}]",
                text_condition("@placeholder", value, inexact)
            )),
            By::AltText => XPathUnion::single(format!(
                "//*[self::img or self::input or self::area][@alt][{}]",
                text_condition("@alt", value, inexact)
            )),
            By::Title => XPathUnion(vec![
                format!("//*[@title][{}]", text_condition("@title", value, inexact)),
                format!(
                    "//*[local-name()='title'][parent::*[local-name()='svg']][{}]",
                    text_condition(".", value, inexact)
                ),
            ]),
            By::TestId => {
                let attribute = self.test_id_attribute;
                if !is_plain_name(attribute) {
                    return Err(QueryError::InvalidLocator {
                        locator: locator.to_string(),
                        reason: format!("'{}' is not a valid attribute name", attribute),
                    });
                }
                let attr = format!("@{}", attribute);
                XPathUnion::single(format!(
                    "//*[{}][{}]",
                    attr,
                    text_condition(&attr, value, inexact)
                ))
            }
            By::DisplayValue => return Err(unsupported()),
            _ => unreachable!("structural locators are translated natively"),
        };

        Ok(union)
    }
}

fn structural(locator: &Locator, scoped: bool) -> Result<NativeQuery> {
    let invalid = |reason: &str| QueryError::InvalidLocator {
        locator: locator.to_string(),
        reason: reason.to_string(),
    };

    let value = match &locator.value {
        Pattern::Literal(value) => value.as_str(),
        Pattern::Regex { .. } => return Err(invalid("regular expressions need a semantic locator")),
    };
    if value.is_empty() {
        return Err(invalid("value must not be empty"));
    }

    let query = match locator.by {
        By::Id => NativeQuery::Id(value.to_string()),
        By::Css => NativeQuery::Css(value.to_string()),
        By::XPath => NativeQuery::XPath(value.to_string()),
        By::LinkText => NativeQuery::LinkText(value.to_string()),
        By::TagName => {
            if !is_plain_name(value) {
                return Err(invalid("not a valid tag name"));
            }
            NativeQuery::Css(value.to_string())
        }
        By::Name => NativeQuery::Css(format!("[name={}]", css_string(value))),
        By::ClassName => {
            if value.split_whitespace().count() != 1 || value.trim() != value {
                return Err(invalid("compound class names are not permitted"));
            }
            NativeQuery::Css(format!(".{}", css_identifier(value)))
        }
        By::PartialLinkText => NativeQuery::XPath(
            XPathUnion::single(format!(
                "//a[contains(normalize-space(.), {})]",
                xpath_literal(value)
            ))
            .render(scoped),
        ),
        _ => unreachable!("semantic locators are planned separately"),
    };

    Ok(query)
}

fn script_call(locator: &Locator) -> Result<Plan> {
    let function = match locator.by {
        By::Role => "queryAllByRole",
        By::Text => "queryAllByText",
        By::LabelText => "queryAllByLabelText",
        By::Placeholder => "queryAllByPlaceholderText",
        By::AltText => "queryAllByAltText",
        By::Title => "queryAllByTitle",
        By::TestId => "queryAllByTestId",
        By::DisplayValue => "queryAllByDisplayValue",
        _ => unreachable!("structural locators are translated natively"),
    };

    let encode = |value: serde_json::Result<Value>| {
        value.map_err(|e| QueryError::InvalidLocator {
            locator: locator.to_string(),
            reason: e.to_string(),
        })
    };

    Ok(Plan::Script {
        function,
        matcher: encode(serde_json::to_value(&locator.value))?,
        options: encode(serde_json::to_value(&locator.options))?,
    })
}

/// XPath expression built from `//`-rooted branches joined with `|`
#[derive(Debug, Clone, PartialEq, Eq)]
struct XPathUnion(Vec<String>);

impl XPathUnion {
    fn single(branch: String) -> Self {
        XPathUnion(vec![branch])
    }

    fn render(&self, scoped: bool) -> String {
        self.0
            .iter()
            .map(|branch| {
                if scoped {
                    format!(".{}", branch)
                } else {
                    branch.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

fn role_xpath(role: &str, options: &QueryOptions) -> Option<XPathUnion> {
    let mut condition = match implicit_role(role) {
        Some(implicit) => format!(
            "@role={} or (not(@role) and ({}))",
            xpath_literal(role),
            implicit
        ),
        None => format!("@role={}", xpath_literal(role)),
    };

    if let Some(level) = options.level {
        condition = if (1..=6).contains(&level) {
            format!("({}) and (@aria-level='{1}' or self::h{1})", condition, level)
        } else {
            format!("({}) and @aria-level='{}'", condition, level)
        };
    }

    let mut branch = format!("//*[{}]", condition);

    if let Some(name) = &options.name {
        let name = name.as_literal()?;
        let inexact = options.is_inexact();
        let sources = [".", "@aria-label", "@title", "@alt"]
            .iter()
            .map(|expr| text_condition(expr, name, inexact))
            .chain(std::iter::once(format!(
                "(self::input and {})",
                text_condition("@value", name, inexact)
            )))
            .collect::<Vec<_>>();
        branch.push_str(&format!("[{}]", sources.join(" or ")));
    }

    Some(XPathUnion::single(branch))
}

/// Elements carrying `role` without an explicit `role` attribute
fn implicit_role(role: &str) -> Option<&'static str> {
    let condition = match role {
        "button" => {
            "self::button or (self::input and (@type='button' or @type='submit' or @type='reset' or @type='image'))"
        }
        "link" => "(self::a or self::area) and @href",
        "heading" => "self::h1 or self::h2 or self::h3 or self::h4 or self::h5 or self::h6",
        "textbox" => {
            "self::textarea or (self::input and (not(@type) or @type='text' or @type='email' or @type='tel' or @type='url'))"
        }
        "searchbox" => "self::input and @type='search'",
        "checkbox" => "self::input and @type='checkbox'",
        "radio" => "self::input and @type='radio'",
        "spinbutton" => "self::input and @type='number'",
        "slider" => "self::input and @type='range'",
        "combobox" => "self::select and not(@multiple) and (not(@size) or @size<=1)",
        "listbox" => "(self::select and (@multiple or @size>1)) or self::datalist",
        "option" => "self::option",
        "list" => "self::ul or self::ol or self::menu",
        "listitem" => "self::li",
        "img" => "self::img and not(@alt='')",
        "navigation" => "self::nav",
        "main" => "self::main",
        "article" => "self::article",
        "complementary" => "self::aside",
        "form" => "self::form and (@name or @aria-label or @aria-labelledby)",
        "table" => "self::table",
        "row" => "self::tr",
        "cell" => "self::td",
        "columnheader" => "self::th",
        "dialog" => "self::dialog",
        "separator" => "self::hr",
        "progressbar" => "self::progress",
        _ => return None,
    };
    Some(condition)
}

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// XPath predicate comparing the normalized string value of `expr` to `value`
fn text_condition(expr: &str, value: &str, inexact: bool) -> String {
    if inexact {
        format!(
            "contains(translate(normalize-space({}), '{}', '{}'), {})",
            expr,
            UPPER,
            LOWER,
            xpath_literal(&value.to_ascii_lowercase())
        )
    } else {
        format!("normalize-space({})={}", expr, xpath_literal(value))
    }
}

/// Quote `value` as an XPath 1.0 string literal
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }

    // Both quote kinds present: splice single quotes in with concat()
    let parts = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect::<Vec<_>>()
        .join(", \"'\", ");
    format!("concat({})", parts)
}

/// Quote `value` as a double-quoted CSS string
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            '\r' => out.push_str("\\d "),
            '\0' => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape `value` for use as a CSS identifier, like `CSS.escape`
pub fn css_identifier(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let single_dash = value == "-";
    for (i, c) in value.chars().enumerate() {
        let leading = i == 0 || (i == 1 && value.starts_with('-'));
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            '0'..='9' if leading => out.push_str(&format!("\\{:x} ", c as u32)),
            '-' if single_dash => out.push_str("\\-"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Tag or attribute name safe to splice into CSS and XPath unquoted
fn is_plain_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "translate_test.rs"]
mod tests;
