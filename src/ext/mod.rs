//! Optional field groups that feeds borrow from other vocabularies.
//!
//! Each group is a plain struct that node types embed when the vocabulary
//! applies to them. Groups see fields after namespace canonicalization,
//! so `dc:creator` arrives as `dc:creator` whatever prefix the feed used.
//! Both setters return whether the group took the field; a node tries its
//! own fields first and then each embedded group in turn.
//!
//! | Group | Prefix | Embedded in |
//! |-------|--------|-------------|
//! | [`DublinCore`] | `dc:`, `dcterms:` | RSS channel, item, image, text input |
//! | [`ContentModule`] | `content:` | RSS channel, item |
//! | [`PodcastCommon`], [`PodcastChannel`], [`PodcastItem`] | `itunes:` | RSS channel, item |
//! | [`Feedburner`] | `feedburner:` | RSS item |
//! | [`Syndication`] | `sy:` | RSS channel |
//! | [`GoogleData`] | `gd:` | Atom feed, entry |

mod content;
mod dublin_core;
mod feedburner;
mod google;
mod podcast;
mod syndication;

pub use content::ContentModule;
pub use dublin_core::DublinCore;
pub use feedburner::Feedburner;
pub use google::GoogleData;
pub use podcast::{parse_duration, PodcastChannel, PodcastCommon, PodcastItem};
pub use syndication::Syndication;

/// Stores `value` in a text field. Later occurrences overwrite earlier ones.
pub(crate) fn put(slot: &mut Option<String>, value: &str) -> bool {
    *slot = Some(value.to_string());
    true
}
