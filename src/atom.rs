//! Atom front-end (RFC 4287, plus the 0.3 draft's element names).
//!
//! Text constructs (`title`, `subtitle`, `summary`, `content`) are
//! [`MixedContent`]: whatever markup they carry is rebuilt verbatim rather
//! than parsed into nodes.
//!
//! ```
//! let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
//!   <title type="html">&lt;b&gt;Tacos&lt;/b&gt;</title>
//!   <entry><title>First</title><link href="http://example.com/1"/></entry>
//! </feed>"#;
//!
//! let feed = syndication::atom::Parser::new().parse(xml).unwrap();
//! let title = feed.title.unwrap();
//! assert_eq!(title.html(), "<b>Tacos</b>");
//! assert_eq!(title.plain(), "Tacos");
//! assert_eq!(feed.entries[0].link(), Some("http://example.com/1"));
//! ```

use std::sync::LazyLock;

use serde::Serialize;

use crate::engine::{DispatchTable, MixedContent, Recorder, TreeNode};
use crate::ext::{put, GoogleData};
use crate::parser::{FeedParser, Format};
use crate::source::Attributes;
use crate::util::{parse_number, DateValue};

/// Parser for Atom 1.0 and 0.3.
pub type Parser = FeedParser<Atom>;

// ============================================================================
// Tree
// ============================================================================

/// An Atom feed, or the `<source>` metadata copied into an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feed {
    pub title: Option<MixedContent>,
    /// `<subtitle>`, or `<tagline>` in Atom 0.3.
    pub subtitle: Option<MixedContent>,
    pub updated: Option<DateValue>,
    pub generator: Option<String>,
    pub icon: Option<String>,
    pub id: Option<String>,
    pub logo: Option<String>,
    pub rights: Option<String>,
    pub info: Option<String>,
    pub author: Option<Person>,
    pub entries: Vec<Entry>,
    pub categories: Vec<Category>,
    pub contributors: Vec<Person>,
    pub links: Vec<Link>,
    pub google: GoogleData,
}

impl Feed {
    fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "updated" | "modified" => set_date(&mut self.updated, value),
            "generator" => put(&mut self.generator, value),
            "icon" => put(&mut self.icon, value),
            "id" => put(&mut self.id, value),
            "logo" => put(&mut self.logo, value),
            "rights" | "copyright" => put(&mut self.rights, value),
            "info" => put(&mut self.info, value),
            _ => false,
        }
    }

    /// `href` of the feed's `alternate` link.
    pub fn link(&self) -> Option<&str> {
        alternate(&self.links)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub title: Option<MixedContent>,
    pub summary: Option<MixedContent>,
    pub content: Option<MixedContent>,
    /// `src` of out-of-line content.
    pub content_src: Option<String>,
    pub source: Option<Box<Feed>>,
    pub updated: Option<DateValue>,
    /// `<published>`, or `<issued>` in Atom 0.3.
    pub published: Option<DateValue>,
    pub created: Option<DateValue>,
    pub author: Option<Person>,
    pub rights: Option<String>,
    pub id: Option<String>,
    pub categories: Vec<Category>,
    pub links: Vec<Link>,
    pub contributors: Vec<Person>,
    pub google: GoogleData,
}

impl Entry {
    fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "updated" | "modified" => set_date(&mut self.updated, value),
            "published" | "issued" => set_date(&mut self.published, value),
            "created" => set_date(&mut self.created, value),
            "rights" | "copyright" => put(&mut self.rights, value),
            "id" => put(&mut self.id, value),
            _ => false,
        }
    }

    /// `href` of the entry's `alternate` link.
    pub fn link(&self) -> Option<&str> {
        alternate(&self.links)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Person {
    pub name: Option<String>,
    /// `<uri>`, or `<url>` in Atom 0.3.
    pub uri: Option<String>,
    pub email: Option<String>,
}

impl Person {
    fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "name" => put(&mut self.name, value),
            "uri" | "url" => put(&mut self.uri, value),
            "email" => put(&mut self.email, value),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: Option<String>,
    pub rel: Option<String>,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    pub title: Option<String>,
    pub hreflang: Option<String>,
    pub length: Option<u64>,
}

impl Link {
    fn from_attrs(attrs: &Attributes) -> Self {
        Self {
            href: attrs.get("href").map(String::from),
            rel: attrs.get("rel").map(String::from),
            mime_type: attrs.get("type").map(String::from),
            title: attrs.get("title").map(String::from),
            hreflang: attrs.get("hreflang").map(String::from),
            length: attrs.get("length").and_then(parse_number),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Category {
    pub term: Option<String>,
    pub label: Option<String>,
    pub scheme: Option<String>,
}

impl Category {
    fn from_attrs(attrs: &Attributes) -> Self {
        Self {
            term: attrs.get("term").map(String::from),
            label: attrs.get("label").map(String::from),
            scheme: attrs.get("scheme").map(String::from),
        }
    }
}

/// A missing `rel` means `alternate`.
fn alternate(links: &[Link]) -> Option<&str> {
    links
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
        .and_then(|l| l.href.as_deref())
}

fn set_date(slot: &mut Option<DateValue>, value: &str) -> bool {
    *slot = Some(DateValue::parse(value));
    true
}

// ============================================================================
// Builder wiring
// ============================================================================

/// A node of the Atom tree while it is being built.
#[derive(Debug)]
pub enum AtomNode {
    Feed(Feed),
    /// An entry's `<source>`: feed metadata that never holds entries.
    Source(Feed),
    Entry(Entry),
    Person(Person),
    Link(Link),
    Category(Category),
    /// A text construct being recorded.
    Text {
        recorder: Recorder,
        src: Option<String>,
    },
}

impl TreeNode for AtomNode {
    fn set_text(&mut self, field: &str, value: &str) -> bool {
        match self {
            AtomNode::Feed(feed) | AtomNode::Source(feed) => feed.set_text(field, value),
            AtomNode::Entry(entry) => entry.set_text(field, value),
            AtomNode::Person(person) => person.set_text(field, value),
            AtomNode::Link(_) | AtomNode::Category(_) | AtomNode::Text { .. } => false,
        }
    }

    fn set_from_attrs(&mut self, field: &str, attrs: &Attributes) {
        match self {
            AtomNode::Feed(feed) | AtomNode::Source(feed) => {
                feed.google.set_from_attrs(field, attrs);
            }
            AtomNode::Entry(entry) => {
                entry.google.set_from_attrs(field, attrs);
            }
            _ => {}
        }
    }

    fn holds(&self, field: &str, child: &Self) -> bool {
        matches!(
            (self, field, child),
            (AtomNode::Feed(_), "entry", AtomNode::Entry(_))
                | (
                    AtomNode::Feed(_) | AtomNode::Source(_) | AtomNode::Entry(_),
                    "author" | "contributor",
                    AtomNode::Person(_)
                )
                | (
                    AtomNode::Feed(_) | AtomNode::Source(_),
                    "title" | "subtitle" | "tagline",
                    AtomNode::Text { .. }
                )
                | (
                    AtomNode::Entry(_),
                    "title" | "summary" | "content",
                    AtomNode::Text { .. }
                )
                | (
                    AtomNode::Feed(_) | AtomNode::Source(_) | AtomNode::Entry(_),
                    "link",
                    AtomNode::Link(_)
                )
                | (
                    AtomNode::Feed(_) | AtomNode::Source(_) | AtomNode::Entry(_),
                    "category",
                    AtomNode::Category(_)
                )
                | (AtomNode::Entry(_), "source", AtomNode::Source(_))
        )
    }

    fn attach(&mut self, field: &str, child: Self) {
        match (self, field, child) {
            (AtomNode::Feed(feed), _, AtomNode::Entry(entry)) => feed.entries.push(entry),
            (AtomNode::Feed(feed) | AtomNode::Source(feed), "author", AtomNode::Person(p)) => {
                feed.author = Some(p)
            }
            (AtomNode::Feed(feed) | AtomNode::Source(feed), _, AtomNode::Person(p)) => {
                feed.contributors.push(p)
            }
            (
                AtomNode::Feed(feed) | AtomNode::Source(feed),
                "title",
                AtomNode::Text { recorder, .. },
            ) => feed.title = Some(recorder.into_content()),
            (AtomNode::Feed(feed) | AtomNode::Source(feed), _, AtomNode::Text { recorder, .. }) => {
                feed.subtitle = Some(recorder.into_content())
            }
            (AtomNode::Feed(feed) | AtomNode::Source(feed), _, AtomNode::Link(link)) => {
                feed.links.push(link)
            }
            (AtomNode::Feed(feed) | AtomNode::Source(feed), _, AtomNode::Category(c)) => {
                feed.categories.push(c)
            }

            (AtomNode::Entry(entry), "author", AtomNode::Person(p)) => entry.author = Some(p),
            (AtomNode::Entry(entry), _, AtomNode::Person(p)) => entry.contributors.push(p),
            (AtomNode::Entry(entry), "title", AtomNode::Text { recorder, .. }) => {
                entry.title = Some(recorder.into_content())
            }
            (AtomNode::Entry(entry), "summary", AtomNode::Text { recorder, .. }) => {
                entry.summary = Some(recorder.into_content())
            }
            (AtomNode::Entry(entry), _, AtomNode::Text { recorder, src }) => {
                entry.content = Some(recorder.into_content());
                entry.content_src = src;
            }
            (AtomNode::Entry(entry), _, AtomNode::Link(link)) => entry.links.push(link),
            (AtomNode::Entry(entry), _, AtomNode::Category(c)) => entry.categories.push(c),
            (AtomNode::Entry(entry), _, AtomNode::Source(source)) => {
                entry.source = Some(Box::new(source))
            }

            (parent, field, child) => {
                tracing::trace!(?parent, field, ?child, "Child has no slot in parent");
            }
        }
    }

    fn recorder(&mut self) -> Option<&mut Recorder> {
        match self {
            AtomNode::Text { recorder, .. } => Some(recorder),
            _ => None,
        }
    }
}

static DISPATCH: LazyLock<DispatchTable<AtomNode>> = LazyLock::new(|| {
    DispatchTable::new(&[
        ("entry", new_entry),
        ("author", new_person),
        ("contributor", new_person),
        ("title", new_text),
        ("subtitle", new_text),
        ("tagline", new_text),
        ("summary", new_text),
        ("content", new_text),
        ("link", new_link),
        ("category", new_category),
        ("source", new_source),
    ])
});

fn new_entry(_: &Attributes) -> AtomNode {
    AtomNode::Entry(Entry::default())
}

fn new_person(_: &Attributes) -> AtomNode {
    AtomNode::Person(Person::default())
}

fn new_text(attrs: &Attributes) -> AtomNode {
    AtomNode::Text {
        recorder: Recorder::new(attrs),
        src: attrs.get("src").map(String::from),
    }
}

fn new_link(attrs: &Attributes) -> AtomNode {
    AtomNode::Link(Link::from_attrs(attrs))
}

fn new_category(attrs: &Attributes) -> AtomNode {
    AtomNode::Category(Category::from_attrs(attrs))
}

fn new_source(_: &Attributes) -> AtomNode {
    AtomNode::Source(Feed::default())
}

/// Marker type tying the Atom tree to [`FeedParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Atom;

impl Format for Atom {
    type Node = AtomNode;
    type Feed = Feed;

    const NAME: &'static str = "atom";

    fn dispatch() -> &'static DispatchTable<AtomNode> {
        &DISPATCH
    }

    fn root() -> AtomNode {
        AtomNode::Feed(Feed::default())
    }

    fn into_feed(root: AtomNode) -> Feed {
        match root {
            AtomNode::Feed(feed) => feed,
            _ => Feed::default(),
        }
    }

    fn entry_count(feed: &Feed) -> usize {
        feed.entries.len()
    }
}
