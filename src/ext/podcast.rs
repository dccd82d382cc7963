use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::put;
use crate::source::Attributes;

static HOURS_MINUTES_SECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d?\d):(\d\d):(\d\d)$").expect("Invalid duration regex")
});

static MINUTES_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d?\d):(\d\d)$").expect("Invalid duration regex"));

/// iTunes podcast fields shared by channels and episodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PodcastCommon {
    pub author: Option<String>,
    pub block: Option<String>,
    pub explicit: Option<String>,
    pub keywords: Option<String>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    /// `href` of `<itunes:image>`.
    pub image: Option<String>,
    /// In document order; nested subcategories follow their parent.
    pub categories: Vec<String>,
}

impl PodcastCommon {
    pub fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "itunes:author" => put(&mut self.author, value),
            "itunes:block" => put(&mut self.block, value),
            "itunes:explicit" => put(&mut self.explicit, value),
            "itunes:keywords" => put(&mut self.keywords, value),
            "itunes:subtitle" => put(&mut self.subtitle, value),
            "itunes:summary" => put(&mut self.summary, value),
            // Older feeds put the category name in the element body
            "itunes:category" => {
                self.categories.push(value.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn set_from_attrs(&mut self, field: &str, attrs: &Attributes) -> bool {
        match field {
            "itunes:category" => {
                if let Some(text) = attrs.get("text") {
                    self.categories.push(text.to_string());
                }
                true
            }
            "itunes:image" => {
                if let Some(href) = attrs.get("href") {
                    self.image = Some(href.to_string());
                }
                true
            }
            _ => false,
        }
    }
}

/// Channel-only podcast fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PodcastChannel {
    /// From `<itunes:owner><itunes:name>`.
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
    pub new_feed_url: Option<String>,
}

impl PodcastChannel {
    pub fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "itunes:name" => put(&mut self.owner_name, value),
            "itunes:email" => put(&mut self.owner_email, value),
            "itunes:new-feed-url" => put(&mut self.new_feed_url, value),
            _ => false,
        }
    }
}

/// Episode-only podcast fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PodcastItem {
    /// Running time in seconds.
    pub duration: Option<u32>,
}

impl PodcastItem {
    pub fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "itunes:duration" => {
                self.duration = parse_duration(value);
                true
            }
            _ => false,
        }
    }
}

/// Parses an `itunes:duration` into seconds.
///
/// Accepts `H:MM:SS`, `HH:MM:SS`, `M:SS`, `MM:SS` and a bare number of
/// seconds. Anything else yields `None`.
///
/// ```
/// use syndication::ext::parse_duration;
///
/// assert_eq!(parse_duration("12:34:56"), Some(45296));
/// assert_eq!(parse_duration("3:52"), Some(232));
/// assert_eq!(parse_duration("about an hour"), None);
/// ```
pub fn parse_duration(value: &str) -> Option<u32> {
    let value = value.trim();
    let seconds = if let Some(caps) = HOURS_MINUTES_SECONDS.captures(value) {
        let h: u32 = caps[1].parse().ok()?;
        let m: u32 = caps[2].parse().ok()?;
        let s: u32 = caps[3].parse().ok()?;
        h * 3600 + m * 60 + s
    } else if let Some(caps) = MINUTES_SECONDS.captures(value) {
        let m: u32 = caps[1].parse().ok()?;
        let s: u32 = caps[2].parse().ok()?;
        m * 60 + s
    } else if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        value.parse().ok()?
    } else {
        tracing::trace!(value, "Ignoring malformed podcast duration");
        return None;
    };
    Some(seconds)
}
