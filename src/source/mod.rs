//! Event sources that feed the tree builder.
//!
//! A source turns one document into a sequence of three event kinds:
//! element open (with attributes), element close, and text. Nothing
//! downstream cares where the events came from, so a strict XML reader
//! and a forgiving tag-soup tokenizer are interchangeable.
//!
//! - [`XmlSource`] - streaming reader built on `quick-xml`
//! - [`TagSoup`] - regex tokenizer for input that is not well-formed XML

mod tagsoup;
mod xml;

use thiserror::Error;

pub use tagsoup::TagSoup;
pub use xml::{XmlSource, DEFAULT_MAX_DEPTH};

/// Errors raised by an event source. The tree builder itself never fails.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying XML reader gave up on the input.
    #[error("XML parse error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// SEC-003: Element nesting exceeds the configured limit.
    #[error("element nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),
}

/// One structural event from a markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open { tag: String, attrs: Attributes },
    Close { tag: String },
    Text(String),
}

impl Event {
    pub fn open(tag: impl Into<String>, attrs: Attributes) -> Self {
        Event::Open {
            tag: tag.into(),
            attrs,
        }
    }

    pub fn close(tag: impl Into<String>) -> Self {
        Event::Close { tag: tag.into() }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Event::Text(s.into())
    }
}

/// Attributes of an element, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Value of the first attribute called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
