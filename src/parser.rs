//! The parse entry points shared by both formats.
//!
//! [`FeedParser`] pairs a [`TreeBuilder`] with an event source chosen by
//! [`ParseOptions::mode`]. The RSS and Atom modules only supply a
//! [`Format`]: the node type, the dispatch table, and how to unwrap the
//! finished root.

use std::io::BufRead;
use std::path::Path;

use anyhow::Context;
use thiserror::Error;

use crate::config::{ParseMode, ParseOptions};
use crate::engine::{DispatchTable, TreeBuilder, TreeNode};
use crate::source::{Event, SourceError, TagSoup, XmlSource};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read feed: {0}")]
    Source(#[from] SourceError),

    #[error("Failed to read feed input: {0}")]
    Io(#[from] std::io::Error),
}

/// A feed format the builder can produce.
pub trait Format {
    type Node: TreeNode + 'static;
    type Feed;

    /// Short name used in log events.
    const NAME: &'static str;

    fn dispatch() -> &'static DispatchTable<Self::Node>;

    fn root() -> Self::Node;

    fn into_feed(root: Self::Node) -> Self::Feed;

    fn entry_count(feed: &Self::Feed) -> usize;
}

/// Reusable parser for one feed format. See [`crate::rss::Parser`] and
/// [`crate::atom::Parser`].
pub struct FeedParser<F: Format> {
    builder: TreeBuilder<F::Node>,
    options: ParseOptions,
}

impl<F: Format> Default for FeedParser<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Format> FeedParser<F> {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            builder: TreeBuilder::new(F::dispatch(), F::root).with_max_depth(options.max_depth),
            options,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses a whole document.
    ///
    /// Only [`ParseMode::Strict`] can fail; the other modes always return
    /// a best-effort tree.
    pub fn parse(&mut self, text: &str) -> Result<F::Feed, ParseError> {
        match self.options.mode {
            ParseMode::Strict => Ok(self.parse_strict(text)?),
            ParseMode::TagSoup => Ok(self.parse_soup(text)),
            ParseMode::StrictThenTagSoup => match self.parse_strict(text) {
                Ok(feed) => Ok(feed),
                Err(e) => {
                    tracing::debug!(
                        format = F::NAME,
                        error = %e,
                        "Strict parse failed, retrying as tag soup"
                    );
                    Ok(self.parse_soup(text))
                }
            },
        }
    }

    /// Parses from a reader. Strict mode streams; the tag-soup modes need
    /// the whole document and read it into memory first. Bytes that are
    /// not UTF-8 are replaced, as the strict reader does.
    pub fn parse_reader<R: BufRead>(&mut self, mut reader: R) -> Result<F::Feed, ParseError> {
        if self.options.mode == ParseMode::Strict {
            let source = XmlSource::from_reader(reader).with_max_depth(self.options.max_depth);
            return Ok(self.parse_events(source)?);
        }
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse(&String::from_utf8_lossy(&bytes))
    }

    /// Reads and parses a feed file. Legacy encodings such as Latin-1 are
    /// read lossily rather than rejected.
    pub fn parse_file(&mut self, path: &Path) -> anyhow::Result<F::Feed> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read feed file {}", path.display()))?;
        self.parse(&String::from_utf8_lossy(&bytes))
            .with_context(|| format!("Failed to parse {} feed {}", F::NAME, path.display()))
    }

    /// Builds a tree from any event source.
    pub fn parse_events<I, E>(&mut self, events: I) -> Result<F::Feed, E>
    where
        I: IntoIterator<Item = Result<Event, E>>,
    {
        let feed = F::into_feed(self.builder.run(events)?);
        tracing::debug!(format = F::NAME, entries = F::entry_count(&feed), "Parsed feed");
        Ok(feed)
    }

    /// Drops any half-built tree. Parsing resets on its own, so this is
    /// only needed after driving the builder by hand.
    pub fn reset(&mut self) {
        self.builder.reset();
    }

    fn parse_strict(&mut self, text: &str) -> Result<F::Feed, SourceError> {
        let source = XmlSource::from_str(text).with_max_depth(self.options.max_depth);
        self.parse_events(source)
    }

    fn parse_soup(&mut self, text: &str) -> F::Feed {
        match self.parse_events(TagSoup::new(text)) {
            Ok(feed) => feed,
            // The tokenizer yields no errors; keep whatever was built
            Err(e) => {
                tracing::warn!(format = F::NAME, error = %e, "Tag soup source failed");
                F::into_feed(self.builder.finish())
            }
        }
    }
}
