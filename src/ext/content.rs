use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::put;

static CDATA_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*)\]\]>").expect("Invalid CDATA regex"));

/// RSS content module (`content:encoded`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentModule {
    pub encoded: Option<String>,
}

impl ContentModule {
    pub fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "content:encoded" => put(&mut self.encoded, value),
            _ => false,
        }
    }

    /// The HTML carried by `content:encoded`.
    ///
    /// If the stored value still holds a CDATA section (a tag-soup source
    /// that saw it double-wrapped, for example) its body is returned as is.
    /// Otherwise the value was entity-escaped HTML and `&lt;`, `&gt;` and
    /// `&amp;` are decoded.
    pub fn decoded(&self) -> Option<Cow<'_, str>> {
        let encoded = self.encoded.as_deref()?;
        if let Some(body) = CDATA_BODY.captures(encoded).and_then(|c| c.get(1)) {
            return Some(Cow::Borrowed(body.as_str()));
        }
        if !encoded.contains('&') {
            return Some(Cow::Borrowed(encoded));
        }
        Some(Cow::Owned(
            encoded
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&amp;", "&"),
        ))
    }
}
