use std::sync::LazyLock;
use std::vec::IntoIter;

use regex::Regex;

use super::{Attributes, Event, SourceError};

/// One markup token: CDATA section, comment, end tag, start tag, or text run.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!\[CDATA\[.*?\]\]>|<!--.*?-->|</[^<>]*>|<[^<>]*>|[^<]+|<")
        .expect("Invalid token regex")
});

static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^</?([^<>\s/]+)").expect("Invalid tag name regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w:.-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid attribute regex")
});

/// Permissive tokenizer for feeds that are not well-formed XML.
///
/// Splits the input into `<tag ...>`, `</tag>` and text runs without any
/// validation. Text is HTML-entity decoded, CDATA sections are passed
/// through verbatim, and a trailing `/>` produces an open event
/// immediately followed by the matching close. Comments, processing
/// instructions and doctype declarations are dropped.
///
/// Never fails: anything that does not look like a tag is text.
pub struct TagSoup {
    events: IntoIter<Event>,
}

impl TagSoup {
    pub fn new(text: &str) -> Self {
        Self {
            events: tokenize(text).into_iter(),
        }
    }
}

impl Iterator for TagSoup {
    type Item = Result<Event, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.next().map(Ok)
    }
}

fn tokenize(text: &str) -> Vec<Event> {
    let mut events = Vec::new();
    for token in TOKEN.find_iter(text).map(|m| m.as_str()) {
        if let Some(body) = token
            .strip_prefix("<![CDATA[")
            .and_then(|rest| rest.strip_suffix("]]>"))
        {
            events.push(Event::text(body));
        } else if token.starts_with("<!") || token.starts_with("<?") {
            continue;
        } else if token.starts_with('<') && token.len() > 1 {
            push_tag(token, &mut events);
        } else {
            events.push(Event::text(html_escape::decode_html_entities(token)));
        }
    }
    events
}

fn push_tag(token: &str, events: &mut Vec<Event>) {
    let Some(name) = TAG_NAME.captures(token).and_then(|c| c.get(1)) else {
        // "<>" or "< foo": not a tag after all
        events.push(Event::text(html_escape::decode_html_entities(token)));
        return;
    };
    let tag = name.as_str();

    if token.starts_with("</") {
        events.push(Event::close(tag));
        return;
    }

    let rest = &token[name.end()..];
    let attrs: Attributes = ATTRIBUTE
        .captures_iter(rest)
        .map(|c| {
            let value = c.get(2).or_else(|| c.get(3)).map_or("", |m| m.as_str());
            (
                c[1].to_string(),
                html_escape::decode_html_entities(value).into_owned(),
            )
        })
        .collect();
    events.push(Event::open(tag, attrs));
    if token.ends_with("/>") {
        events.push(Event::close(tag));
    }
}
