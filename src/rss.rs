//! RSS front-end.
//!
//! One tree shape covers RSS 0.90 through 2.0 and RSS 1.0 (RDF). Items
//! are collected on the [`Feed`] whether they sit inside `<channel>`
//! (0.9x, 2.0) or beside it (0.90, 1.0), and `<entry>` is read as an item
//! so Atom-flavoured feeds still yield something useful.
//!
//! ```
//! let xml = r#"<rss version="2.0"><channel>
//!     <title>Example</title>
//!     <item><title>First</title><category>dull</category></item>
//! </channel></rss>"#;
//!
//! let feed = syndication::rss::Parser::new().parse(xml).unwrap();
//! assert_eq!(feed.channel.unwrap().title.as_deref(), Some("Example"));
//! assert_eq!(feed.items[0].categories, vec!["dull"]);
//! ```

use std::sync::LazyLock;

use serde::Serialize;

use crate::engine::{DispatchTable, TreeNode};
use crate::ext::{
    put, ContentModule, DublinCore, Feedburner, PodcastChannel, PodcastCommon, PodcastItem,
    Syndication,
};
use crate::parser::{FeedParser, Format};
use crate::source::Attributes;
use crate::util::{parse_number, DateValue};

/// Parser for every RSS dialect.
pub type Parser = FeedParser<Rss>;

// ============================================================================
// Tree
// ============================================================================

/// Root of a parsed RSS document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feed {
    pub channel: Option<Channel>,
    /// Every item in the document, in order.
    pub items: Vec<Item>,
    /// RSS 0.90 and 1.0 put these beside the channel instead of inside it.
    pub image: Option<Image>,
    pub textinput: Option<TextInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub copyright: Option<String>,
    pub language: Option<String>,
    pub managing_editor: Option<String>,
    pub web_master: Option<String>,
    pub pub_date: Option<DateValue>,
    pub last_build_date: Option<DateValue>,
    pub categories: Vec<String>,
    pub generator: Option<String>,
    pub docs: Option<String>,
    /// Minutes the channel may be cached.
    pub ttl: Option<u32>,
    pub rating: Option<String>,
    /// Hours (0-23, GMT) aggregators may skip. `24` is read as `0`.
    pub skip_hours: Vec<u8>,
    pub skip_days: Vec<String>,
    pub image: Option<Image>,
    pub cloud: Option<Cloud>,
    pub textinput: Option<TextInput>,
    pub dublin_core: DublinCore,
    pub content: ContentModule,
    pub podcast: PodcastCommon,
    pub podcast_channel: PodcastChannel,
    pub syndication: Syndication,
}

impl Channel {
    fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "title" => put(&mut self.title, value),
            "link" => put(&mut self.link, value),
            "description" => put(&mut self.description, value),
            "copyright" => put(&mut self.copyright, value),
            "language" => put(&mut self.language, value),
            "managingeditor" => put(&mut self.managing_editor, value),
            "webmaster" => put(&mut self.web_master, value),
            "pubdate" => set_date(&mut self.pub_date, value),
            "lastbuilddate" => set_date(&mut self.last_build_date, value),
            "category" => {
                self.categories.push(value.to_string());
                true
            }
            "generator" => put(&mut self.generator, value),
            "docs" => put(&mut self.docs, value),
            "ttl" => {
                self.ttl = parse_number(value);
                true
            }
            "rating" => put(&mut self.rating, value),
            "hour" => {
                if let Some(hour) = skip_hour(value) {
                    self.skip_hours.push(hour);
                }
                true
            }
            "day" => {
                self.skip_days.push(value.to_string());
                true
            }
            _ => {
                self.dublin_core.set_text(field, value)
                    || self.content.set_text(field, value)
                    || self.podcast.set_text(field, value)
                    || self.podcast_channel.set_text(field, value)
                    || self.syndication.set_text(field, value)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Item {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub categories: Vec<String>,
    pub comments: Option<String>,
    pub enclosure: Option<Enclosure>,
    pub guid: Option<Guid>,
    pub pub_date: Option<DateValue>,
    pub source: Option<Source>,
    pub dublin_core: DublinCore,
    pub content: ContentModule,
    pub podcast: PodcastCommon,
    pub podcast_item: PodcastItem,
    pub feedburner: Feedburner,
}

impl Item {
    fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "title" => put(&mut self.title, value),
            "link" => put(&mut self.link, value),
            "description" => put(&mut self.description, value),
            "author" => put(&mut self.author, value),
            "category" => {
                self.categories.push(value.to_string());
                true
            }
            "comments" => put(&mut self.comments, value),
            "guid" => {
                self.guid.get_or_insert_with(Guid::default).value = value.to_string();
                true
            }
            "pubdate" => set_date(&mut self.pub_date, value),
            "source" => {
                self.source.get_or_insert_with(Source::default).title = Some(value.to_string());
                true
            }
            _ => {
                self.dublin_core.set_text(field, value)
                    || self.content.set_text(field, value)
                    || self.podcast.set_text(field, value)
                    || self.podcast_item.set_text(field, value)
                    || self.feedburner.set_text(field, value)
            }
        }
    }

    fn set_from_attrs(&mut self, field: &str, attrs: &Attributes) {
        match field {
            "guid" => {
                self.guid = Some(Guid {
                    value: String::new(),
                    is_permalink: attrs
                        .get("isPermaLink")
                        .map_or(true, |v| !v.trim().eq_ignore_ascii_case("false")),
                });
            }
            "source" => {
                self.source = Some(Source {
                    title: None,
                    url: attrs.get("url").map(String::from),
                });
            }
            _ => {
                self.podcast.set_from_attrs(field, attrs);
            }
        }
    }

    /// The item's identity: its guid, else its link.
    pub fn id(&self) -> Option<&str> {
        self.guid
            .as_ref()
            .map(|g| g.value.as_str())
            .filter(|v| !v.is_empty())
            .or(self.link.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guid {
    pub value: String,
    /// Whether `value` is a URL to the item. Defaults to `true`.
    pub is_permalink: bool,
}

impl Default for Guid {
    fn default() -> Self {
        Self {
            value: String::new(),
            is_permalink: true,
        }
    }
}

/// The channel an item was republished from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Source {
    pub title: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Image {
    pub url: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub description: Option<String>,
    pub dublin_core: DublinCore,
}

impl Image {
    fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "url" => put(&mut self.url, value),
            "title" => put(&mut self.title, value),
            "link" => put(&mut self.link, value),
            "width" => {
                self.width = parse_number(value);
                true
            }
            "height" => {
                self.height = parse_number(value);
                true
            }
            "description" => put(&mut self.description, value),
            _ => self.dublin_core.set_text(field, value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub name: Option<String>,
    pub link: Option<String>,
    pub dublin_core: DublinCore,
}

impl TextInput {
    fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "title" => put(&mut self.title, value),
            "description" => put(&mut self.description, value),
            "name" => put(&mut self.name, value),
            "link" => put(&mut self.link, value),
            _ => self.dublin_core.set_text(field, value),
        }
    }
}

/// rssCloud registration endpoint, read from attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cloud {
    pub domain: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub register_procedure: Option<String>,
    pub protocol: Option<String>,
}

impl Cloud {
    fn from_attrs(attrs: &Attributes) -> Self {
        Self {
            domain: attrs.get("domain").map(String::from),
            port: attrs.get("port").and_then(parse_number),
            path: attrs.get("path").map(String::from),
            register_procedure: attrs.get("registerProcedure").map(String::from),
            protocol: attrs.get("protocol").map(String::from),
        }
    }
}

/// Media attached to an item, read from attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Enclosure {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub length: Option<u64>,
}

impl Enclosure {
    fn from_attrs(attrs: &Attributes) -> Self {
        Self {
            url: attrs.get("url").map(String::from),
            mime_type: attrs.get("type").map(String::from),
            length: attrs.get("length").and_then(parse_number),
        }
    }
}

fn set_date(slot: &mut Option<DateValue>, value: &str) -> bool {
    *slot = Some(DateValue::parse(value));
    true
}

fn skip_hour(value: &str) -> Option<u8> {
    match parse_number::<u8>(value)? {
        24 => Some(0),
        hour if hour < 24 => Some(hour),
        hour => {
            tracing::trace!(hour, "Ignoring out of range skip hour");
            None
        }
    }
}

// ============================================================================
// Builder wiring
// ============================================================================

/// A node of the RSS tree while it is being built.
#[derive(Debug)]
pub enum RssNode {
    Feed(Feed),
    Channel(Channel),
    Item(Item),
    Image(Image),
    TextInput(TextInput),
    Cloud(Cloud),
    Enclosure(Enclosure),
}

impl TreeNode for RssNode {
    fn set_text(&mut self, field: &str, value: &str) -> bool {
        match self {
            RssNode::Channel(channel) => channel.set_text(field, value),
            RssNode::Item(item) => item.set_text(field, value),
            RssNode::Image(image) => image.set_text(field, value),
            RssNode::TextInput(input) => input.set_text(field, value),
            RssNode::Feed(_) | RssNode::Cloud(_) | RssNode::Enclosure(_) => false,
        }
    }

    fn set_from_attrs(&mut self, field: &str, attrs: &Attributes) {
        match self {
            RssNode::Item(item) => item.set_from_attrs(field, attrs),
            RssNode::Channel(channel) => {
                channel.podcast.set_from_attrs(field, attrs);
            }
            _ => {}
        }
    }

    fn holds(&self, field: &str, child: &Self) -> bool {
        matches!(
            (self, field, child),
            (RssNode::Feed(_), "channel", RssNode::Channel(_))
                | (RssNode::Feed(_), "item" | "entry", RssNode::Item(_))
                | (RssNode::Feed(_), "image", RssNode::Image(_))
                | (RssNode::Feed(_), "textinput", RssNode::TextInput(_))
                | (RssNode::Channel(_), "image", RssNode::Image(_))
                | (RssNode::Channel(_), "cloud", RssNode::Cloud(_))
                | (RssNode::Channel(_), "textinput", RssNode::TextInput(_))
                | (RssNode::Item(_), "enclosure", RssNode::Enclosure(_))
        )
    }

    fn attach(&mut self, _field: &str, child: Self) {
        match (self, child) {
            (RssNode::Feed(feed), RssNode::Channel(channel)) => feed.channel = Some(channel),
            (RssNode::Feed(feed), RssNode::Item(item)) => feed.items.push(item),
            (RssNode::Feed(feed), RssNode::Image(image)) => feed.image = Some(image),
            (RssNode::Feed(feed), RssNode::TextInput(input)) => feed.textinput = Some(input),
            (RssNode::Channel(channel), RssNode::Image(image)) => channel.image = Some(image),
            (RssNode::Channel(channel), RssNode::Cloud(cloud)) => channel.cloud = Some(cloud),
            (RssNode::Channel(channel), RssNode::TextInput(input)) => {
                channel.textinput = Some(input)
            }
            (RssNode::Item(item), RssNode::Enclosure(enclosure)) => {
                item.enclosure = Some(enclosure)
            }
            (parent, child) => {
                tracing::trace!(?parent, ?child, "Child has no slot in parent");
            }
        }
    }
}

static DISPATCH: LazyLock<DispatchTable<RssNode>> = LazyLock::new(|| {
    DispatchTable::new(&[
        ("item", new_item),
        ("entry", new_item),
        ("image", new_image),
        ("channel", new_channel),
        ("cloud", new_cloud),
        ("textinput", new_textinput),
        ("enclosure", new_enclosure),
    ])
});

fn new_item(_: &Attributes) -> RssNode {
    RssNode::Item(Item::default())
}

fn new_image(_: &Attributes) -> RssNode {
    RssNode::Image(Image::default())
}

fn new_channel(_: &Attributes) -> RssNode {
    RssNode::Channel(Channel::default())
}

fn new_cloud(attrs: &Attributes) -> RssNode {
    RssNode::Cloud(Cloud::from_attrs(attrs))
}

fn new_textinput(_: &Attributes) -> RssNode {
    RssNode::TextInput(TextInput::default())
}

fn new_enclosure(attrs: &Attributes) -> RssNode {
    RssNode::Enclosure(Enclosure::from_attrs(attrs))
}

/// Marker type tying the RSS tree to [`FeedParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Rss;

impl Format for Rss {
    type Node = RssNode;
    type Feed = Feed;

    const NAME: &'static str = "rss";

    fn dispatch() -> &'static DispatchTable<RssNode> {
        &DISPATCH
    }

    fn root() -> RssNode {
        RssNode::Feed(Feed::default())
    }

    fn into_feed(root: RssNode) -> Feed {
        match root {
            RssNode::Feed(feed) => feed,
            _ => Feed::default(),
        }
    }

    fn entry_count(feed: &Feed) -> usize {
        feed.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_hour_normalization() {
        assert_eq!(skip_hour("24"), Some(0));
        assert_eq!(skip_hour(" 23 "), Some(23));
        assert_eq!(skip_hour("0"), Some(0));
        assert_eq!(skip_hour("25"), None);
        assert_eq!(skip_hour("noon"), None);
    }

    #[test]
    fn test_item_falls_through_to_extensions() {
        let mut item = Item::default();
        assert!(item.set_text("dc:creator", "someone"));
        assert!(item.set_text("feedburner:origlink", "http://example.com/a"));
        assert!(item.set_text("itunes:duration", "20:01"));
        assert!(!item.set_text("ttl", "60"));
        assert_eq!(item.podcast_item.duration, Some(1201));
    }

    #[test]
    fn test_guid_attribute_then_text() {
        let mut item = Item::default();
        let attrs: Attributes = [("isPermaLink", "false")].into_iter().collect();
        item.set_from_attrs("guid", &attrs);
        item.set_text("guid", "tag:example.com,2004:1");
        let guid = item.guid.as_ref().unwrap();
        assert!(!guid.is_permalink);
        assert_eq!(item.id(), Some("tag:example.com,2004:1"));

        let mut item = Item::default();
        item.set_text("link", "http://example.com/");
        item.set_text("guid", "http://example.com/1");
        assert!(item.guid.as_ref().unwrap().is_permalink);
    }

    #[test]
    fn test_id_falls_back_to_link() {
        let mut item = Item::default();
        item.set_text("link", "http://example.com/");
        assert_eq!(item.id(), Some("http://example.com/"));
    }

    #[test]
    fn test_holds_only_matching_slots() {
        let feed = Rss::root();
        let item = RssNode::Item(Item::default());
        let cloud = RssNode::Cloud(Cloud::default());
        assert!(feed.holds("item", &item));
        assert!(feed.holds("entry", &item));
        assert!(!feed.holds("cloud", &cloud));
        assert!(!item.holds("cloud", &cloud));
    }

    #[test]
    fn test_attribute_nodes() {
        let attrs: Attributes = [
            ("url", "http://example.com/a.mp3"),
            ("length", "12216320"),
            ("type", "audio/mpeg"),
        ]
        .into_iter()
        .collect();
        let enclosure = Enclosure::from_attrs(&attrs);
        assert_eq!(enclosure.length, Some(12_216_320));
        assert_eq!(enclosure.mime_type.as_deref(), Some("audio/mpeg"));

        let attrs: Attributes = [("port", "eighty")].into_iter().collect();
        assert_eq!(Cloud::from_attrs(&attrs).port, None);
    }
}
