//! Tolerant RSS and Atom parsing into typed trees.
//!
//! A document is read as a stream of open, close and text events (from
//! `quick-xml`, or from a regex tokenizer when the input is not
//! well-formed) and a format-independent builder grows a tree of typed
//! nodes from them. Malformed structure is recovered from, never reported:
//! unmatched closes are ignored, unknown elements are dropped, and dates
//! that do not parse are kept as text.
//!
//! - [`rss`] - RSS 0.90 through 2.0 and RSS 1.0 (RDF)
//! - [`atom`] - Atom 1.0 and 0.3
//! - [`ext`] - Dublin Core, content module, iTunes, FeedBurner, and other
//!   vocabularies embedded in the format nodes
//! - [`engine`] - the builder, namespace canonicalizer and mixed-content
//!   recorder
//! - [`source`] - event sources
//!
//! ```
//! use syndication::{rss, ParseMode, ParseOptions};
//!
//! // Unclosed <item>, unescaped ampersand: not XML, still a feed
//! let soup = "<rss><channel><title>Fish & Chips</title><item><title>Cod";
//!
//! let options = ParseOptions { mode: ParseMode::TagSoup, ..ParseOptions::default() };
//! let feed = rss::Parser::with_options(options).parse(soup).unwrap();
//! assert_eq!(feed.channel.unwrap().title.as_deref(), Some("Fish & Chips"));
//! assert_eq!(feed.items[0].title.as_deref(), Some("Cod"));
//! ```

pub mod atom;
pub mod config;
pub mod engine;
pub mod ext;
pub mod parser;
pub mod rss;
pub mod source;
pub mod util;

pub use config::{ConfigError, ParseMode, ParseOptions};
pub use engine::{ContentKind, MixedContent};
pub use parser::{FeedParser, Format, ParseError};
pub use util::DateValue;
