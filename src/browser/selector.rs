//! Element locator strategies.
//!
//! Selenium-style `By` selectors for the strategies the site flows use.
//!
//! # Example
//!
//! ```ignore
//! use kktix_sniper::By;
//!
//! // CSS selector (default)
//! let proceed = browser.wait_for_clickable(&By::css(".btn.btn-primary.btn-lg"), wait).await?;
//!
//! // By ID
//! let username = browser.wait_for_element(&By::id("user_login"), wait).await?;
//!
//! // By class
//! let entry = browser.find_elements(&By::class("btn-point")).await?;
//!
//! // By XPath (marker text probes)
//! let sold_out = browser.find_elements(&By::xpath("//*[contains(text(), '已售完')]")).await?;
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// By Enum
// ============================================================================

/// Element locator strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum By {
    /// CSS selector (most common).
    #[serde(rename = "css")]
    Css(String),

    /// XPath expression.
    #[serde(rename = "xpath")]
    XPath(String),

    /// Element ID (shorthand for `#id`).
    #[serde(rename = "id")]
    Id(String),

    /// Name attribute (shorthand for `[name='...']`).
    #[serde(rename = "name")]
    Name(String),

    /// Class name, single class (shorthand for `.class`).
    #[serde(rename = "class")]
    Class(String),

    /// Tag name.
    #[serde(rename = "tag")]
    Tag(String),

    /// Exact link text (for `<a>` elements).
    #[serde(rename = "linkText")]
    LinkText(String),

    /// Partial text content match.
    #[serde(rename = "partialText")]
    PartialText(String),
}

impl By {
    /// Creates a CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Creates an XPath selector.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Creates an ID selector.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Creates a name attribute selector.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Creates a class name selector.
    #[inline]
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// Creates a tag name selector.
    #[inline]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// Creates a link text selector.
    #[inline]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::LinkText(text.into())
    }

    /// Creates a partial text content selector.
    #[inline]
    pub fn partial_text(text: impl Into<String>) -> Self {
        Self::PartialText(text.into())
    }

    /// Returns the strategy name for the wire protocol.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
            Self::Id(_) => "id",
            Self::Name(_) => "name",
            Self::Class(_) => "class",
            Self::Tag(_) => "tag",
            Self::LinkText(_) => "linkText",
            Self::PartialText(_) => "partialText",
        }
    }

    /// Returns the selector value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v)
            | Self::XPath(v)
            | Self::Id(v)
            | Self::Name(v)
            | Self::Class(v)
            | Self::Tag(v)
            | Self::LinkText(v)
            | Self::PartialText(v) => v,
        }
    }
}

// ============================================================================
// From implementations for ergonomics
// ============================================================================

impl From<&str> for By {
    /// Converts a string to a CSS selector (default strategy).
    fn from(s: &str) -> Self {
        Self::Css(s.to_string())
    }
}

impl From<String> for By {
    /// Converts a string to a CSS selector (default strategy).
    fn from(s: String) -> Self {
        Self::Css(s)
    }
}

impl std::fmt::Display for By {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

// ============================================================================
// Tests
// ============================================================================
