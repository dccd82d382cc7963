use std::sync::{LazyLock, OnceLock};

use regex::Regex;
use serde::Serialize;

use crate::source::Attributes;
use crate::util::{markup_to_plain, plain_to_html};

static DIV_WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*<div(?:\s[^>]*)?>\s*(.*?)\s*</div>\s*$").expect("Invalid wrapper regex")
});

/// Declared type of a mixed-content field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Text,
    Html,
    Xhtml,
}

impl ContentKind {
    /// Reads a `type` attribute. Missing or unrecognised types are text.
    pub fn from_type(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("html") | Some("text/html") => ContentKind::Html,
            Some("xhtml") | Some("application/xhtml+xml") => ContentKind::Xhtml,
            _ => ContentKind::Text,
        }
    }
}

/// Rebuilds an embedded markup fragment from structural events.
///
/// While a recorder is the builder's cursor it receives every event raw,
/// so nested tags become markup in its buffer rather than typed nodes.
/// Control returns to the parent only when the recorder's own tag closes.
#[derive(Debug, Clone)]
pub struct Recorder {
    kind: ContentKind,
    buffer: String,
    finalized: bool,
}

impl Recorder {
    pub fn new(attrs: &Attributes) -> Self {
        Self::with_kind(ContentKind::from_type(attrs.get("type")))
    }

    pub fn with_kind(kind: ContentKind) -> Self {
        Self {
            kind,
            buffer: String::new(),
            finalized: false,
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn start_element(&mut self, tag: &str, attrs: &Attributes) {
        if self.kind == ContentKind::Text {
            return;
        }
        self.buffer.push('<');
        self.buffer.push_str(local_name(tag));
        for (name, value) in attrs.iter() {
            // Prefixes are dropped from element names, so their bindings go too
            if name == "xmlns" || name.starts_with("xmlns:") {
                continue;
            }
            self.buffer.push(' ');
            self.buffer.push_str(name);
            self.buffer.push_str("=\"");
            self.buffer
                .push_str(&html_escape::encode_double_quoted_attribute(value));
            self.buffer.push('"');
        }
        self.buffer.push('>');
    }

    /// Close of a nested element. The recorder's own close goes through
    /// [`Recorder::finalize`] instead.
    pub fn end_element(&mut self, tag: &str) {
        if self.kind == ContentKind::Text {
            return;
        }
        self.buffer.push_str("</");
        self.buffer.push_str(local_name(tag));
        self.buffer.push('>');
    }

    pub fn text(&mut self, s: &str) {
        match self.kind {
            ContentKind::Text | ContentKind::Html => self.buffer.push_str(s),
            // Text arrives unescaped; keep the fragment well-formed
            ContentKind::Xhtml => self.buffer.push_str(&plain_to_html(s)),
        }
    }

    /// Strips one enclosing `<div>` from XHTML content. Runs at most once
    /// per recorder no matter how often it is called.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;
        if self.kind != ContentKind::Xhtml {
            return;
        }
        if let Some(inner) = DIV_WRAPPER
            .captures(&self.buffer)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .filter(|inner| balanced_divs(inner))
        {
            self.buffer = inner.to_string();
        }
    }

    pub fn into_content(mut self) -> MixedContent {
        self.finalize();
        MixedContent::new(self.kind, self.buffer)
    }
}

fn local_name(tag: &str) -> &str {
    tag.rsplit_once(':').map_or(tag, |(_, local)| local)
}

/// True if every `<div>` in `markup` is closed inside it, so the outer
/// pair really is one wrapper element and not two siblings.
fn balanced_divs(markup: &str) -> bool {
    let mut depth: i32 = 0;
    let mut rest = markup;
    while let Some(pos) = rest.find('<') {
        rest = &rest[pos + 1..];
        if rest.starts_with("/div>") {
            depth -= 1;
            if depth < 0 {
                return false;
            }
        } else if rest.starts_with("div>") || rest.starts_with("div ") {
            depth += 1;
        }
    }
    depth == 0
}

/// A field whose value may be plain text, escaped HTML, or an XHTML
/// fragment (Atom text constructs).
///
/// Exactly one representation is stored; the others are derived on first
/// use and cached:
///
/// - [`plain`](Self::plain) strips tags and decodes entities
/// - [`html`](Self::html) escapes `&`, `<` and `>` when stored as text
/// - [`xhtml`](Self::xhtml) falls back to HTML, then to escaped text
#[derive(Debug, Clone, Serialize)]
pub struct MixedContent {
    #[serde(rename = "type")]
    kind: ContentKind,
    value: String,
    #[serde(skip)]
    plain: OnceLock<String>,
    #[serde(skip)]
    escaped: OnceLock<String>,
}

impl MixedContent {
    pub fn new(kind: ContentKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            plain: OnceLock::new(),
            escaped: OnceLock::new(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(ContentKind::Text, value)
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// The stored representation, exactly as recorded.
    pub fn raw(&self) -> &str {
        &self.value
    }

    pub fn plain(&self) -> &str {
        match self.kind {
            ContentKind::Text => &self.value,
            ContentKind::Html | ContentKind::Xhtml => {
                self.plain.get_or_init(|| markup_to_plain(&self.value))
            }
        }
    }

    pub fn html(&self) -> &str {
        match self.kind {
            ContentKind::Html | ContentKind::Xhtml => &self.value,
            ContentKind::Text => self
                .escaped
                .get_or_init(|| plain_to_html(&self.value).into_owned()),
        }
    }

    pub fn xhtml(&self) -> &str {
        match self.kind {
            ContentKind::Xhtml => &self.value,
            ContentKind::Html | ContentKind::Text => self.html(),
        }
    }
}

impl PartialEq for MixedContent {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

impl Eq for MixedContent {}
